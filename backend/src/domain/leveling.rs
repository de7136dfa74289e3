//! Points to level progression.
//!
//! A points update is an absolute total, not an increment. Every
//! [`LEVEL_THRESHOLD`] points raises the level by one; the stored points are
//! the remainder:
//!
//! ```text
//! level  = floor(total / 100) + 1
//! points = total mod 100
//! ```

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::reason_code::ReasonCode;

/// Points needed to advance one level.
pub const LEVEL_THRESHOLD: u64 = 100;

/// Exclusive upper bound for totals expressed as JSON floats (`2^64`).
const U64_LIMIT_AS_F64: f64 = 18_446_744_073_709_551_616.0;

/// Rejections raised while interpreting a requested points total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelingError {
    /// The value was numeric but zero or negative.
    #[error("points must be greater than zero")]
    NonPositiveValue,
    /// The value was not a number representable as an unsigned integer.
    #[error("points must be an integer")]
    InvalidType,
}

impl LevelingError {
    /// Reason code reported to clients.
    pub fn reason_code(self) -> ReasonCode {
        match self {
            Self::NonPositiveValue => ReasonCode::NonPositivePoints,
            Self::InvalidType => ReasonCode::InvalidPointsType,
        }
    }
}

/// A validated, strictly positive points total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PointsTotal(NonZeroU64);

impl PointsTotal {
    /// Accept an already-typed total.
    pub fn new(total: u64) -> Result<Self, LevelingError> {
        NonZeroU64::new(total)
            .map(Self)
            .ok_or(LevelingError::NonPositiveValue)
    }

    /// Interpret an untyped request value.
    ///
    /// Sign is checked before integrality, so `-2.5` is reported as
    /// non-positive while `2.5` is reported as the wrong type.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use studyquest::domain::{LevelingError, PointsTotal};
    ///
    /// assert_eq!(PointsTotal::from_json(&json!(120)).map(|p| p.get()), Ok(120));
    /// assert_eq!(PointsTotal::from_json(&json!(0)), Err(LevelingError::NonPositiveValue));
    /// assert_eq!(PointsTotal::from_json(&json!("120")), Err(LevelingError::InvalidType));
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, LevelingError> {
        let Value::Number(number) = value else {
            return Err(LevelingError::InvalidType);
        };
        if let Some(total) = number.as_u64() {
            return Self::new(total);
        }
        if number.as_i64().is_some() {
            // as_u64 failed, so the integer is negative.
            return Err(LevelingError::NonPositiveValue);
        }
        let Some(float) = number.as_f64() else {
            return Err(LevelingError::InvalidType);
        };
        if float <= 0.0 {
            return Err(LevelingError::NonPositiveValue);
        }
        if float.fract() != 0.0 || float >= U64_LIMIT_AS_F64 {
            return Err(LevelingError::InvalidType);
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "value is a positive integer below 2^64"
        )]
        let total = float as u64;
        Self::new(total)
    }

    /// The raw total.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Stored progress state derived from a total.
///
/// ## Invariants
/// - `points < LEVEL_THRESHOLD`
/// - `level >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProgressParts")]
pub struct Progress {
    points: u64,
    level: u64,
}

#[derive(Deserialize)]
struct ProgressParts {
    points: u64,
    level: u64,
}

impl TryFrom<ProgressParts> for Progress {
    type Error = ProgressValidationError;

    fn try_from(value: ProgressParts) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.points, value.level)
    }
}

/// Rejections raised when rebuilding [`Progress`] from stored parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressValidationError {
    /// Stored points reached the threshold.
    #[error("points {points} must be below the level threshold")]
    PointsOutOfRange { points: u64 },
    /// Stored level was zero.
    #[error("level must be at least 1")]
    LevelOutOfRange,
}

impl Progress {
    /// Progress of a freshly registered user.
    pub const fn starting() -> Self {
        Self {
            points: 0,
            level: 1,
        }
    }

    /// Compute progress for an absolute total.
    pub fn from_total(total: PointsTotal) -> Self {
        let raw = total.get();
        Self {
            points: raw.rem_euclid(LEVEL_THRESHOLD),
            level: raw.div_euclid(LEVEL_THRESHOLD) + 1,
        }
    }

    /// Rebuild progress from persisted columns.
    pub fn try_from_parts(points: u64, level: u64) -> Result<Self, ProgressValidationError> {
        if points >= LEVEL_THRESHOLD {
            return Err(ProgressValidationError::PointsOutOfRange { points });
        }
        if level == 0 {
            return Err(ProgressValidationError::LevelOutOfRange);
        }
        Ok(Self { points, level })
    }

    /// Points carried inside the current level.
    pub fn points(&self) -> u64 {
        self.points
    }

    /// Current level, starting at 1.
    pub fn level(&self) -> u64 {
        self.level
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::starting()
    }
}

/// Interpret a requested points total as the progress it yields.
///
/// Pure: depends only on `requested`, never on the user's current progress.
pub fn progress_for(requested: &Value) -> Result<Progress, LevelingError> {
    PointsTotal::from_json(requested).map(Progress::from_total)
}
