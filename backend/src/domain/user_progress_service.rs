//! User registration, profile edits and points progression.
//!
//! Implements [`UserProgressCommand`] and [`UserQuery`]. A points update is
//! validated and converted to `(points, level)` by the leveling engine before
//! the repository is touched; the repository then writes every changed column
//! in one statement.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::leveling::{LevelingError, progress_for};
use crate::domain::ports::{
    RegisterUserRequest, UpdateUserRequest, UserPersistenceError, UserProgressCommand, UserQuery,
    UserRepository,
};
use crate::domain::user::{UserValidationError, validate_email, validate_name};
use crate::domain::{Error, User, UserChanges, UserId};

/// Service backing the user driving ports.
#[derive(Clone)]
pub struct UserProgressService<R> {
    users: Arc<R>,
}

impl<R> UserProgressService<R> {
    /// Create a service over a user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
                .with_details(json!({ "field": "email" }))
        }
    }
}

fn map_validation_error(error: UserValidationError) -> Error {
    let field = match error {
        UserValidationError::EmptyName => "name",
        UserValidationError::EmptyEmail | UserValidationError::MalformedEmail => "email",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn map_leveling_error(error: LevelingError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": "points",
        "code": error.reason_code(),
    }))
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

impl<R> UserProgressService<R>
where
    R: UserRepository,
{
    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))
    }
}

#[async_trait]
impl<R> UserProgressCommand for UserProgressService<R>
where
    R: UserRepository,
{
    async fn register_user(&self, request: RegisterUserRequest) -> Result<User, Error> {
        let name = validate_name(&request.name).map_err(map_validation_error)?;
        let email = validate_email(&request.email).map_err(map_validation_error)?;
        let user = User::register(UserId::random(), name, email);
        self.users.insert(&user).await.map_err(map_user_error)?;
        Ok(user)
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<User, Error> {
        let UpdateUserRequest {
            user_id,
            name,
            email,
            points,
        } = request;
        let changes = UserChanges {
            name: name
                .as_deref()
                .map(validate_name)
                .transpose()
                .map_err(map_validation_error)?,
            email: email
                .as_deref()
                .map(validate_email)
                .transpose()
                .map_err(map_validation_error)?,
            progress: points
                .as_ref()
                .map(progress_for)
                .transpose()
                .map_err(map_leveling_error)?,
        };

        if changes.is_empty() {
            return self.load(&user_id).await;
        }

        self.users
            .apply_changes(&user_id, &changes)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(&user_id))
    }
}

#[async_trait]
impl<R> UserQuery for UserProgressService<R>
where
    R: UserRepository,
{
    async fn fetch_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.load(user_id).await
    }
}

#[cfg(test)]
#[path = "user_progress_service_tests.rs"]
mod tests;
