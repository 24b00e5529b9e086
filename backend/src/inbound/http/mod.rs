//! HTTP inbound adapter exposing REST endpoints.

pub mod appointments;
pub mod auth;
pub mod bills;
pub mod error;
pub mod health;
pub mod messages;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod treatments;
pub mod users;
pub mod validation;

pub use error::ApiResult;
