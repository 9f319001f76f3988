//! User account maintenance.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | DELETE | `/api/user/deleteAccount/{id}` | No | Delete a user and all dependent rows |
//! | PUT | `/api/user/deleteAccount/{id}` | No | Patch name/email |
//! | GET | `/api/users/me` | Bearer | Current user's profile |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::UserService;
