//! Feature slices. Each feature owns its routes, handlers, DTOs, models and
//! services.

pub mod auth;
pub mod homework;
pub mod threads;
pub mod users;
