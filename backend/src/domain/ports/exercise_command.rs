//! Driving port for creating, editing and removing exercises.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Error, Exercise, ExerciseId, ReasonCode, Section, SectionId};

/// Request to create an exercise at the end of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachExerciseRequest {
    pub section_id: SectionId,
    pub title: String,
    pub question: String,
    pub answers: Vec<String>,
}

/// Newly stored exercise together with its updated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedExercise {
    pub exercise: Exercise,
    pub section: Section,
}

/// Content changes for an exercise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateExerciseRequest {
    pub title: Option<String>,
    pub question: Option<String>,
    pub answers: Option<Vec<String>>,
}

/// Non-fatal drift found while detaching an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyWarning {
    pub code: ReasonCode,
    pub message: String,
    pub section_id: SectionId,
}

impl ConsistencyWarning {
    /// The owning section no longer exists.
    pub fn section_missing(section_id: SectionId) -> Self {
        Self {
            code: ReasonCode::DetachDrift,
            message: format!("section {section_id} no longer exists"),
            section_id,
        }
    }

    /// The owning section does not list the exercise.
    pub fn not_listed(section_id: SectionId, exercise_id: &ExerciseId) -> Self {
        Self {
            code: ReasonCode::DetachDrift,
            message: format!("section {section_id} did not list exercise {exercise_id}"),
            section_id,
        }
    }
}

/// Result of a detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachOutcome {
    /// Reference removed and exercise deleted.
    Detached,
    /// Exercise deleted; the section side had drifted.
    DetachedWithWarning(ConsistencyWarning),
    /// Nothing to do.
    AlreadyAbsent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseCommand: Send + Sync {
    /// Create an exercise and append it to its section.
    ///
    /// # Errors
    ///
    /// - `not_found` when the section does not exist.
    /// - `invalid_request` with `details.code` `E1101` when the section is full.
    async fn attach_exercise(&self, request: AttachExerciseRequest)
    -> Result<AttachedExercise, Error>;

    /// Update exercise content. The parent section never changes.
    async fn update_exercise(
        &self,
        exercise_id: &ExerciseId,
        request: UpdateExerciseRequest,
    ) -> Result<Exercise, Error>;

    /// Remove an exercise and its section reference. Idempotent.
    async fn detach_exercise(&self, exercise_id: &ExerciseId) -> Result<DetachOutcome, Error>;
}
