//! User account aggregate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::UserId;
use super::leveling::Progress;

/// Validation errors for user profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked an `@` separating local part and domain.
    #[error("email must contain '@'")]
    MalformedEmail,
}

/// Validate a profile name, returning the trimmed value.
pub fn validate_name(raw: &str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Validate an email address, returning the trimmed value.
///
/// Only the shape is checked; deliverability and uniqueness belong to the
/// registration flow.
pub fn validate_email(raw: &str) -> Result<String, UserValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(UserValidationError::MalformedEmail),
    }
}

/// Application user with leveling progress.
///
/// ## Invariants
/// - `progress` is only ever replaced through the leveling engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(flatten)]
    progress: Progress,
}

impl User {
    /// New account at level 1 with zero points.
    pub fn register(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::from_parts(id, name, email, Progress::starting())
    }

    /// Rebuild a user from stored parts.
    pub fn from_parts(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        progress: Progress,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            progress,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Profile name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Points and level.
    pub fn progress(&self) -> Progress {
        self.progress
    }
}

/// Field changes applied to a user in one atomic write.
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub progress: Option<Progress>,
}

impl UserChanges {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.progress.is_none()
    }

    /// Apply the changes to an in-memory copy.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(progress) = self.progress {
            user.progress = progress;
        }
    }
}
