//! Section and exercise lifecycle with component list integrity.
//!
//! Every exercise is created before its section references it, and the
//! reference is dropped before the exercise is deleted. A failure between the
//! two steps therefore leaves an unlisted exercise (an orphan) rather than a
//! reference to nothing. [`SectionCommand::reconcile_section`] repairs both
//! kinds of drift.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::exercise::ExerciseValidationError;
use crate::domain::ports::{
    AppendOutcome, AttachExerciseRequest, AttachedExercise, ConsistencyWarning, CurriculumQuery,
    DetachOutcome, ExerciseCommand, ExerciseRepository, ExerciseRepositoryError,
    ReconciliationReport, RemoveOutcome, SectionCommand, SectionRepository,
    SectionRepositoryError, UpdateExerciseRequest,
};
use crate::domain::{
    ComponentRef, Error, Exercise, ExerciseChanges, ExerciseDraft, ExerciseId, MAX_COMPONENTS,
    ReasonCode, Section, SectionId,
};

/// Unlisted exercises younger than this are assumed to belong to an attach
/// that has not yet appended its reference.
pub const ORPHAN_GRACE: TimeDelta = TimeDelta::minutes(5);

/// Service implementing the section, exercise and curriculum ports.
#[derive(Clone)]
pub struct SectionComponentService<S, E> {
    sections: Arc<S>,
    exercises: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<S, E> SectionComponentService<S, E> {
    /// Create a service over the section and exercise repositories.
    pub fn new(sections: Arc<S>, exercises: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sections,
            exercises,
            clock,
        }
    }
}

fn map_section_error(error: SectionRepositoryError) -> Error {
    match error {
        SectionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("section repository unavailable: {message}"))
        }
        SectionRepositoryError::Query { message } => {
            Error::internal(format!("section repository error: {message}"))
        }
    }
}

fn map_exercise_error(error: ExerciseRepositoryError) -> Error {
    match error {
        ExerciseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("exercise repository unavailable: {message}"))
        }
        ExerciseRepositoryError::Query { message } => {
            Error::internal(format!("exercise repository error: {message}"))
        }
    }
}

fn map_validation_error(error: ExerciseValidationError) -> Error {
    let field = match error {
        ExerciseValidationError::EmptyTitle => "title",
        ExerciseValidationError::EmptyQuestion => "question",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn capacity_exceeded(section_id: &SectionId) -> Error {
    Error::invalid_request(format!(
        "section {section_id} already holds {MAX_COMPONENTS} components"
    ))
    .with_details(json!({
        "code": ReasonCode::SectionAtCapacity,
        "sectionId": section_id,
        "limit": MAX_COMPONENTS,
    }))
}

fn section_not_found(id: &SectionId) -> Error {
    Error::not_found(format!("section {id} not found"))
}

fn exercise_not_found(id: &ExerciseId) -> Error {
    Error::not_found(format!("exercise {id} not found"))
}

/// Arrange exercises in component order, skipping unlisted ones.
fn in_display_order(section: &Section, exercises: Vec<Exercise>) -> Vec<Exercise> {
    let mut by_id: HashMap<Uuid, Exercise> = exercises
        .into_iter()
        .map(|exercise| (*exercise.id().as_uuid(), exercise))
        .collect();
    section
        .components()
        .iter()
        .filter_map(|component| by_id.remove(&component.comp_id()))
        .collect()
}

impl<S, E> SectionComponentService<S, E>
where
    S: SectionRepository,
    E: ExerciseRepository,
{
    async fn load_section(&self, id: &SectionId) -> Result<Section, Error> {
        self.sections
            .find_by_id(id)
            .await
            .map_err(map_section_error)?
            .ok_or_else(|| section_not_found(id))
    }

    async fn load_exercise(&self, id: &ExerciseId) -> Result<Exercise, Error> {
        self.exercises
            .find_by_id(id)
            .await
            .map_err(map_exercise_error)?
            .ok_or_else(|| exercise_not_found(id))
    }

    /// Undo an insert whose reference could not be appended.
    async fn discard_unlisted(&self, exercise: &Exercise) {
        if let Err(err) = self.exercises.delete(exercise.id()).await {
            warn!(
                exercise_id = %exercise.id(),
                section_id = %exercise.parent_section(),
                error = %err,
                "failed to discard unlisted exercise; leaving it for reconciliation"
            );
        }
    }

    fn drift_warning(outcome: RemoveOutcome, exercise: &Exercise) -> DetachOutcome {
        let section_id = *exercise.parent_section();
        let warning = match outcome {
            RemoveOutcome::Removed(_) => return DetachOutcome::Detached,
            RemoveOutcome::NotListed(_) => ConsistencyWarning::not_listed(section_id, exercise.id()),
            RemoveOutcome::SectionMissing => ConsistencyWarning::section_missing(section_id),
        };
        warn!(
            code = %warning.code,
            exercise_id = %exercise.id(),
            section_id = %section_id,
            "{}",
            warning.message
        );
        DetachOutcome::DetachedWithWarning(warning)
    }
}

#[async_trait]
impl<S, E> ExerciseCommand for SectionComponentService<S, E>
where
    S: SectionRepository,
    E: ExerciseRepository,
{
    async fn attach_exercise(
        &self,
        request: AttachExerciseRequest,
    ) -> Result<AttachedExercise, Error> {
        let AttachExerciseRequest {
            section_id,
            title,
            question,
            answers,
        } = request;
        let draft = ExerciseDraft::new(title, question, answers).map_err(map_validation_error)?;

        let section = self.load_section(&section_id).await?;
        if !section.has_capacity() {
            return Err(capacity_exceeded(&section_id));
        }

        let exercise = Exercise::create(ExerciseId::random(), section_id, draft, self.clock.utc());
        self.exercises
            .insert(&exercise)
            .await
            .map_err(map_exercise_error)?;

        let component = ComponentRef::exercise(exercise.id());
        match self
            .sections
            .append_component(&section_id, &component, MAX_COMPONENTS)
            .await
        {
            Ok(AppendOutcome::Appended(section)) => Ok(AttachedExercise { exercise, section }),
            Ok(AppendOutcome::AtCapacity(_)) => {
                self.discard_unlisted(&exercise).await;
                Err(capacity_exceeded(&section_id))
            }
            Ok(AppendOutcome::SectionMissing) => {
                self.discard_unlisted(&exercise).await;
                Err(section_not_found(&section_id))
            }
            Err(err) => {
                warn!(
                    exercise_id = %exercise.id(),
                    section_id = %section_id,
                    error = %err,
                    "component append failed after exercise insert"
                );
                Err(map_section_error(err))
            }
        }
    }

    async fn update_exercise(
        &self,
        exercise_id: &ExerciseId,
        request: UpdateExerciseRequest,
    ) -> Result<Exercise, Error> {
        let changes = ExerciseChanges::new(request.title, request.question, request.answers)
            .map_err(map_validation_error)?;
        let mut exercise = self.load_exercise(exercise_id).await?;
        exercise.apply_changes(changes, self.clock.utc());

        let updated = self
            .exercises
            .update(&exercise)
            .await
            .map_err(map_exercise_error)?;
        if !updated {
            return Err(exercise_not_found(exercise_id));
        }
        Ok(exercise)
    }

    async fn detach_exercise(&self, exercise_id: &ExerciseId) -> Result<DetachOutcome, Error> {
        let Some(exercise) = self
            .exercises
            .find_by_id(exercise_id)
            .await
            .map_err(map_exercise_error)?
        else {
            return Ok(DetachOutcome::AlreadyAbsent);
        };

        let removal = self
            .sections
            .remove_component(exercise.parent_section(), exercise_id.as_uuid())
            .await
            .map_err(map_section_error)?;
        let outcome = Self::drift_warning(removal, &exercise);

        self.exercises
            .delete(exercise_id)
            .await
            .map_err(map_exercise_error)?;
        Ok(outcome)
    }
}

#[async_trait]
impl<S, E> SectionCommand for SectionComponentService<S, E>
where
    S: SectionRepository,
    E: ExerciseRepository,
{
    async fn create_section(&self, title: String) -> Result<Section, Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::invalid_request("title must not be empty")
                .with_details(json!({ "field": "title" })));
        }
        let section = Section::new(SectionId::random(), title);
        self.sections
            .insert(&section)
            .await
            .map_err(map_section_error)?;
        Ok(section)
    }

    async fn reconcile_section(
        &self,
        section_id: &SectionId,
    ) -> Result<ReconciliationReport, Error> {
        // Read the section first: any exercise it lists was inserted earlier.
        let section = self.load_section(section_id).await?;
        let exercises = self
            .exercises
            .find_by_parent(section_id)
            .await
            .map_err(map_exercise_error)?;

        let existing: HashSet<Uuid> = exercises.iter().map(|e| *e.id().as_uuid()).collect();
        let mut report = ReconciliationReport::default();

        for component in section.components() {
            let comp_id = component.comp_id();
            if existing.contains(&comp_id) {
                continue;
            }
            self.sections
                .remove_component(section_id, &comp_id)
                .await
                .map_err(map_section_error)?;
            report.removed_references.push(comp_id);
        }

        let now = self.clock.utc();
        for exercise in exercises.iter().filter(|e| !section.lists(e.id())) {
            if now - exercise.date_created() < ORPHAN_GRACE {
                report.pending_orphans.push(*exercise.id());
                continue;
            }
            self.exercises
                .delete(exercise.id())
                .await
                .map_err(map_exercise_error)?;
            report.deleted_orphans.push(*exercise.id());
        }

        if !report.removed_references.is_empty() || !report.deleted_orphans.is_empty() {
            info!(
                section_id = %section_id,
                removed_references = report.removed_references.len(),
                deleted_orphans = report.deleted_orphans.len(),
                "section reconciled"
            );
        }
        Ok(report)
    }
}

#[async_trait]
impl<S, E> CurriculumQuery for SectionComponentService<S, E>
where
    S: SectionRepository,
    E: ExerciseRepository,
{
    async fn fetch_section(&self, section_id: &SectionId) -> Result<Section, Error> {
        self.load_section(section_id).await
    }

    async fn list_section_exercises(
        &self,
        section_id: &SectionId,
    ) -> Result<Vec<Exercise>, Error> {
        let section = self.load_section(section_id).await?;
        let exercises = self
            .exercises
            .find_by_parent(section_id)
            .await
            .map_err(map_exercise_error)?;
        Ok(in_display_order(&section, exercises))
    }

    async fn fetch_exercise(&self, exercise_id: &ExerciseId) -> Result<Exercise, Error> {
        self.load_exercise(exercise_id).await
    }
}

#[cfg(test)]
#[path = "section_component_service_tests.rs"]
mod tests;
