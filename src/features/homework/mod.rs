//! Homework tasks and AI explanations.
//!
//! A student submits a photographed (OCR'd) or typed problem and receives a
//! generated explanation. Each successful generation is persisted as a
//! homework task, which a discussion thread can later attach to.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/ask-ai` | No | Generate explanation and save the task |
//! | GET | `/api/homework` | Bearer | List own tasks |
//! | GET | `/api/homework/{id}` | Bearer | Get one task |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::HomeworkService;
