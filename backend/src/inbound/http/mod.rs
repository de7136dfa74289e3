//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod exercises;
pub mod health;
pub mod schemas;
pub mod sections;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
