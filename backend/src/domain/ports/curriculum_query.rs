//! Read-side port for sections and exercises.

use async_trait::async_trait;

use crate::domain::{Error, Exercise, ExerciseId, Section, SectionId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurriculumQuery: Send + Sync {
    /// Fetch a section with its component list.
    async fn fetch_section(&self, section_id: &SectionId) -> Result<Section, Error>;

    /// Exercises of a section in display order.
    async fn list_section_exercises(&self, section_id: &SectionId)
    -> Result<Vec<Exercise>, Error>;

    /// Fetch one exercise.
    async fn fetch_exercise(&self, exercise_id: &ExerciseId) -> Result<Exercise, Error>;
}
