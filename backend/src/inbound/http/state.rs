//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised against mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    CurriculumQuery, ExerciseCommand, SectionCommand, UserProgressCommand, UserQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserProgressCommand>,
    pub users_query: Arc<dyn UserQuery>,
    pub sections: Arc<dyn SectionCommand>,
    pub exercises: Arc<dyn ExerciseCommand>,
    pub curriculum: Arc<dyn CurriculumQuery>,
}

impl HttpState {
    /// Build state from port implementations.
    pub fn new(
        users: Arc<dyn UserProgressCommand>,
        users_query: Arc<dyn UserQuery>,
        sections: Arc<dyn SectionCommand>,
        exercises: Arc<dyn ExerciseCommand>,
        curriculum: Arc<dyn CurriculumQuery>,
    ) -> Self {
        Self {
            users,
            users_query,
            sections,
            exercises,
            curriculum,
        }
    }
}
