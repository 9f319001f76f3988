mod homework_service;

pub use homework_service::HomeworkService;
