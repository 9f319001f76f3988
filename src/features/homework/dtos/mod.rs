pub mod homework_dto;

pub use homework_dto::{AskAiRequestDto, HomeworkTaskResponseDto, ListTasksQuery};
