//! Port abstraction for exercise persistence.
use async_trait::async_trait;

use crate::domain::{Exercise, ExerciseId, SectionId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by exercise repository adapters.
    pub enum ExerciseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "exercise repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "exercise repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    /// Fetch an exercise by identifier.
    async fn find_by_id(&self, id: &ExerciseId)
    -> Result<Option<Exercise>, ExerciseRepositoryError>;

    /// Every exercise whose parent is `section`, in no particular order.
    async fn find_by_parent(
        &self,
        section: &SectionId,
    ) -> Result<Vec<Exercise>, ExerciseRepositoryError>;

    /// Persist a new exercise.
    async fn insert(&self, exercise: &Exercise) -> Result<(), ExerciseRepositoryError>;

    /// Overwrite content fields and `dateUpdated`. Returns `false` when the
    /// exercise no longer exists.
    async fn update(&self, exercise: &Exercise) -> Result<bool, ExerciseRepositoryError>;

    /// Delete an exercise. Returns `false` when it was already gone.
    async fn delete(&self, id: &ExerciseId) -> Result<bool, ExerciseRepositoryError>;
}
