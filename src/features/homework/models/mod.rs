mod homework_task;

pub use homework_task::HomeworkTask;
