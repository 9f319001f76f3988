mod google;
mod jwks;
mod password;

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use google::GoogleIdTokenVerifier;
pub use jwks::JwksClient;
