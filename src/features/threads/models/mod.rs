mod thread;

pub use thread::{Message, Thread};
