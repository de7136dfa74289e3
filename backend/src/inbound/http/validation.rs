//! Request parsing helpers shared by the HTTP handlers.

use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::domain::{Error, ExerciseId, SectionId, UserId};

/// HTTP field or path parameter name used in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_id_error(field, value))
}

pub(crate) fn parse_section_id(value: &str, field: FieldName) -> Result<SectionId, Error> {
    SectionId::new(value).map_err(|_| invalid_id_error(field, value))
}

pub(crate) fn parse_exercise_id(value: &str, field: FieldName) -> Result<ExerciseId, Error> {
    ExerciseId::new(value).map_err(|_| invalid_id_error(field, value))
}

/// Deserialize a field so that an explicit `null` is distinguishable from an
/// absent key: with `#[serde(default)]`, absent yields `None` and any present
/// value (including `null`) yields `Some`.
pub(crate) fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
