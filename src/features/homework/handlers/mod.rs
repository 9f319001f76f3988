pub mod homework_handler;

pub use homework_handler::{
    __path_ask_ai, __path_get_task, __path_list_tasks, ask_ai, get_task, list_tasks,
};
