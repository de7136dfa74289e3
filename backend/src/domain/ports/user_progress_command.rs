//! Driving ports for user registration, profile edits and progress.
//!
//! Inbound adapters hand over raw request values; the service validates
//! profile fields and feeds `points` through the leveling engine before a
//! single atomic write.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Error, User, UserId};

/// Request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
}

/// Partial update of a user.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUserRequest {
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Untyped absolute points total, present only when the body carried a
    /// `points` key.
    pub points: Option<Value>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProgressCommand: Send + Sync {
    /// Register a user at level 1 with zero points.
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error>;

    /// Apply profile changes and, when requested, a new points total.
    ///
    /// # Errors
    ///
    /// - `invalid_request` with `details.code` `E0601`/`E0602` for bad points.
    /// - `not_found` when the user does not exist.
    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error>;
}

/// Read access to user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Fetch one user.
    async fn fetch_user(&self, user_id: &UserId) -> Result<User, Error>;
}
