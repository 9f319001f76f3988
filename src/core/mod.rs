//! Core layer - configuration, errors, database access and HTTP plumbing
//! shared by every feature.

pub mod config;
pub mod database;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod openapi;
