//! Opaque entity identifiers.
//!
//! Every aggregate is keyed by a UUID v4 wrapped in its own newtype so a
//! section id can never be passed where an exercise id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors raised when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdValidationError {
    /// Input was empty.
    #[error("{kind} id must not be empty")]
    Empty { kind: &'static str },
    /// Input was not a canonical UUID (surrounding whitespace included).
    #[error("{kind} id must be a valid UUID")]
    Invalid { kind: &'static str },
}

fn parse_uuid(raw: &str, kind: &'static str) -> Result<Uuid, IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty { kind });
    }
    if raw.trim() != raw {
        return Err(IdValidationError::Invalid { kind });
    }
    Uuid::parse_str(raw).map_err(|_| IdValidationError::Invalid { kind })
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and parse an identifier from text.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                parse_uuid(raw.as_ref(), $kind).map(Self)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID, e.g. one read back from storage.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }
    };
}

define_entity_id! {
    /// Stable identifier of a user account.
    UserId => "user"
}

define_entity_id! {
    /// Stable identifier of a content section.
    SectionId => "section"
}

define_entity_id! {
    /// Stable identifier of an exercise.
    ExerciseId => "exercise"
}
