//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod admin;
pub mod courses;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod role;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
