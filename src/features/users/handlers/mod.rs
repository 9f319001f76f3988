pub mod user_handler;

pub use user_handler::{
    __path_delete_account, __path_get_profile, __path_update_account, delete_account, get_profile,
    update_account,
};
