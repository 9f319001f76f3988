//! Shared layer - response envelope, constants, validation and prompt
//! rendering used across features.

pub mod constants;
pub mod prompts;
pub mod test_helpers;
pub mod types;
pub mod validation;
