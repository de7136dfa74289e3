//! PostgreSQL-backed `ExerciseRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ExerciseRepository, ExerciseRepositoryError};
use crate::domain::{Exercise, ExerciseId, SectionId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ExerciseContentUpdate, ExerciseRow};
use super::pool::DbPool;
use super::schema::exercises;

/// Diesel implementation of [`ExerciseRepository`].
#[derive(Clone)]
pub struct DieselExerciseRepository {
    pool: DbPool,
}

impl DieselExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(error: diesel::result::Error, operation: &str) -> ExerciseRepositoryError {
    map_diesel_error(
        error,
        operation,
        ExerciseRepositoryError::query,
        ExerciseRepositoryError::connection,
    )
}

fn pool_error(error: super::pool::PoolError) -> ExerciseRepositoryError {
    map_pool_error(error, ExerciseRepositoryError::connection)
}

fn row_to_exercise(row: ExerciseRow) -> Exercise {
    Exercise::from_parts(
        ExerciseId::from_uuid(row.id),
        SectionId::from_uuid(row.section_id),
        row.title,
        row.question,
        row.answers,
        row.date_created,
        row.date_updated,
    )
}

fn exercise_to_row(exercise: &Exercise) -> ExerciseRow {
    ExerciseRow {
        id: *exercise.id().as_uuid(),
        section_id: *exercise.parent_section().as_uuid(),
        title: exercise.title().to_owned(),
        question: exercise.question().to_owned(),
        answers: exercise.answers().to_vec(),
        date_created: exercise.date_created(),
        date_updated: exercise.date_updated(),
    }
}

#[async_trait]
impl ExerciseRepository for DieselExerciseRepository {
    async fn find_by_id(
        &self,
        id: &ExerciseId,
    ) -> Result<Option<Exercise>, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = exercises::table
            .find(id.as_uuid())
            .select(ExerciseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "find exercise"))?;
        Ok(row.map(row_to_exercise))
    }

    async fn find_by_parent(
        &self,
        section: &SectionId,
    ) -> Result<Vec<Exercise>, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<ExerciseRow> = exercises::table
            .filter(exercises::section_id.eq(section.as_uuid()))
            .select(ExerciseRow::as_select())
            .order_by(exercises::date_created)
            .load(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "list exercises"))?;
        Ok(rows.into_iter().map(row_to_exercise).collect())
    }

    async fn insert(&self, exercise: &Exercise) -> Result<(), ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(exercises::table)
            .values(exercise_to_row(exercise))
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "insert exercise"))?;
        Ok(())
    }

    async fn update(&self, exercise: &Exercise) -> Result<bool, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(exercises::table.find(exercise.id().as_uuid()))
            .set(ExerciseContentUpdate {
                title: exercise.title(),
                question: exercise.question(),
                answers: exercise.answers(),
                date_updated: exercise.date_updated(),
            })
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "update exercise"))?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ExerciseId) -> Result<bool, ExerciseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(exercises::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "delete exercise"))?;
        Ok(deleted > 0)
    }
}
