//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters and
//! return typed errors; driving ports are implemented by domain services and
//! return the domain [`Error`](crate::domain::Error).

mod macros;
pub(crate) use macros::define_port_error;

mod curriculum_query;
mod exercise_command;
mod exercise_repository;
mod section_command;
mod section_repository;
mod user_progress_command;
mod user_repository;

#[cfg(test)]
pub use curriculum_query::MockCurriculumQuery;
pub use curriculum_query::CurriculumQuery;
#[cfg(test)]
pub use exercise_command::MockExerciseCommand;
pub use exercise_command::{
    AttachExerciseRequest, AttachedExercise, ConsistencyWarning, DetachOutcome, ExerciseCommand,
    UpdateExerciseRequest,
};
#[cfg(test)]
pub use exercise_repository::MockExerciseRepository;
pub use exercise_repository::{ExerciseRepository, ExerciseRepositoryError};
#[cfg(test)]
pub use section_command::MockSectionCommand;
pub use section_command::{ReconciliationReport, SectionCommand};
#[cfg(test)]
pub use section_repository::MockSectionRepository;
pub use section_repository::{
    AppendOutcome, RemoveOutcome, SectionRepository, SectionRepositoryError,
};
#[cfg(test)]
pub use user_progress_command::{MockUserProgressCommand, MockUserQuery};
pub use user_progress_command::{
    RegisterUserRequest, UpdateUserRequest, UserProgressCommand, UserQuery,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
