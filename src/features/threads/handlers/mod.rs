pub mod thread_handler;

pub use thread_handler::{
    __path_create_message, __path_create_task_thread, __path_delete_thread, __path_get_task_thread,
    __path_like_thread, __path_list_threads, __path_unlike_thread, __path_update_thread,
    create_message, create_task_thread, delete_thread, get_task_thread, like_thread, list_threads,
    unlike_thread, update_thread,
};
