//! In-process store implementing every repository port.
//!
//! Used when no database is configured and by integration tests. All three
//! tables sit behind one mutex, so each port call is a single critical
//! section and the bounded append cannot overshoot.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    AppendOutcome, ExerciseRepository, ExerciseRepositoryError, RemoveOutcome, SectionRepository,
    SectionRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ComponentRef, Exercise, ExerciseId, Section, SectionId, User, UserChanges, UserId,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    sections: HashMap<SectionId, Section>,
    exercises: HashMap<ExerciseId, Exercise>,
}

/// Thread-safe in-memory implementation of the driven ports.
#[derive(Default)]
pub struct InMemoryLearningStore {
    state: Mutex<State>,
}

/// Marker for a poisoned lock; each port maps it to its own query error.
struct Poisoned;

impl InMemoryLearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, Poisoned> {
        self.state.lock().map_err(|_| Poisoned)
    }
}

impl From<Poisoned> for UserPersistenceError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

impl From<Poisoned> for SectionRepositoryError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

impl From<Poisoned> for ExerciseRepositoryError {
    fn from(_: Poisoned) -> Self {
        Self::query("in-memory store lock poisoned")
    }
}

#[async_trait]
impl UserRepository for InMemoryLearningStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock()?;
        if state.users.values().any(|u| u.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn apply_changes(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock()?;
        if let Some(email) = &changes.email
            && state
                .users
                .values()
                .any(|u| u.id() != id && u.email() == email.as_str())
        {
            return Err(UserPersistenceError::duplicate_email(email.as_str()));
        }
        Ok(state.users.get_mut(id).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl SectionRepository for InMemoryLearningStore {
    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, SectionRepositoryError> {
        Ok(self.lock()?.sections.get(id).cloned())
    }

    async fn insert(&self, section: &Section) -> Result<(), SectionRepositoryError> {
        self.lock()?.sections.insert(*section.id(), section.clone());
        Ok(())
    }

    async fn append_component(
        &self,
        id: &SectionId,
        component: &ComponentRef,
        capacity: usize,
    ) -> Result<AppendOutcome, SectionRepositoryError> {
        let mut state = self.lock()?;
        let Some(section) = state.sections.get_mut(id) else {
            return Ok(AppendOutcome::SectionMissing);
        };
        if section.components().len() >= capacity {
            return Ok(AppendOutcome::AtCapacity(section.clone()));
        }
        section
            .push_component(*component)
            .map_err(|err| SectionRepositoryError::query(err.to_string()))?;
        Ok(AppendOutcome::Appended(section.clone()))
    }

    async fn remove_component(
        &self,
        id: &SectionId,
        comp_id: &Uuid,
    ) -> Result<RemoveOutcome, SectionRepositoryError> {
        let mut state = self.lock()?;
        let Some(section) = state.sections.get_mut(id) else {
            return Ok(RemoveOutcome::SectionMissing);
        };
        if section.remove_component(*comp_id) {
            Ok(RemoveOutcome::Removed(section.clone()))
        } else {
            Ok(RemoveOutcome::NotListed(section.clone()))
        }
    }
}

#[async_trait]
impl ExerciseRepository for InMemoryLearningStore {
    async fn find_by_id(
        &self,
        id: &ExerciseId,
    ) -> Result<Option<Exercise>, ExerciseRepositoryError> {
        Ok(self.lock()?.exercises.get(id).cloned())
    }

    async fn find_by_parent(
        &self,
        section: &SectionId,
    ) -> Result<Vec<Exercise>, ExerciseRepositoryError> {
        let state = self.lock()?;
        let mut found: Vec<Exercise> = state
            .exercises
            .values()
            .filter(|e| e.parent_section() == section)
            .cloned()
            .collect();
        found.sort_by_key(Exercise::date_created);
        Ok(found)
    }

    async fn insert(&self, exercise: &Exercise) -> Result<(), ExerciseRepositoryError> {
        self.lock()?
            .exercises
            .insert(*exercise.id(), exercise.clone());
        Ok(())
    }

    async fn update(&self, exercise: &Exercise) -> Result<bool, ExerciseRepositoryError> {
        let mut state = self.lock()?;
        let Some(stored) = state.exercises.get_mut(exercise.id()) else {
            return Ok(false);
        };
        // Keep the stored parent and creation date; only content moves.
        *stored = Exercise::from_parts(
            *stored.id(),
            *stored.parent_section(),
            exercise.title().to_owned(),
            exercise.question().to_owned(),
            exercise.answers().to_vec(),
            stored.date_created(),
            exercise.date_updated(),
        );
        Ok(true)
    }

    async fn delete(&self, id: &ExerciseId) -> Result<bool, ExerciseRepositoryError> {
        Ok(self.lock()?.exercises.remove(id).is_some())
    }
}
