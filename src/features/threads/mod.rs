//! Discussion threads on homework tasks.
//!
//! Each homework task can host one thread; threads collect messages and
//! likes from other students.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/homework/{taskId}/thread` | No | Start a thread on a task |
//! | GET | `/api/homework/{taskId}/thread` | No | Get a task's thread |
//! | GET | `/api/thread` | No | List all threads |
//! | PUT | `/api/thread/{id}` | No | Update title/content |
//! | DELETE | `/api/thread/{id}` | No | Delete thread with messages and likes |
//! | POST | `/api/thread/{id}/message` | No | Post a message |
//! | POST | `/api/thread/{id}/like` | No | Like (idempotent) |
//! | DELETE | `/api/thread/{id}/like` | No | Unlike (idempotent) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ThreadService;
