//! PostgreSQL-backed `SectionRepository`.
//!
//! The component list is a `jsonb` array. Appends and removals are single
//! `UPDATE ... RETURNING` statements whose `WHERE` clause carries the
//! precondition, so PostgreSQL's row lock serialises concurrent writers.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Jsonb, Text, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    AppendOutcome, RemoveOutcome, SectionRepository, SectionRepositoryError,
};
use crate::domain::{ComponentRef, Section, SectionId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSectionRow, SectionRow};
use super::pool::DbPool;
use super::schema::sections;

const APPEND_SQL: &str = r#"
UPDATE sections
SET components = components || jsonb_build_array($2)
WHERE id = $1 AND jsonb_array_length(components) < $3
RETURNING id, title, components
"#;

const REMOVE_SQL: &str = r#"
UPDATE sections
SET components = COALESCE(
    (SELECT jsonb_agg(entry ORDER BY position)
     FROM jsonb_array_elements(components) WITH ORDINALITY AS listed(entry, position)
     WHERE entry->>'compId' <> $2),
    '[]'::jsonb)
WHERE id = $1 AND components @> jsonb_build_array(jsonb_build_object('compId', $2))
RETURNING id, title, components
"#;

/// Diesel implementation of [`SectionRepository`].
#[derive(Clone)]
pub struct DieselSectionRepository {
    pool: DbPool,
}

impl DieselSectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load(
        &self,
        conn: &mut diesel_async::AsyncPgConnection,
        id: &SectionId,
    ) -> Result<Option<Section>, SectionRepositoryError> {
        let row = sections::table
            .find(id.as_uuid())
            .select(SectionRow::as_select())
            .first(conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "find section"))?;
        row.map(row_to_section).transpose()
    }
}

fn diesel_error(error: diesel::result::Error, operation: &str) -> SectionRepositoryError {
    map_diesel_error(
        error,
        operation,
        SectionRepositoryError::query,
        SectionRepositoryError::connection,
    )
}

fn row_to_section(row: SectionRow) -> Result<Section, SectionRepositoryError> {
    let components: Vec<ComponentRef> = serde_json::from_value(row.components).map_err(|err| {
        SectionRepositoryError::query(format!("section {} has malformed components: {err}", row.id))
    })?;
    Section::try_from_parts(SectionId::from_uuid(row.id), row.title, components).map_err(|err| {
        SectionRepositoryError::query(format!("section {} violates list invariants: {err}", row.id))
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<serde_json::Value, SectionRepositoryError> {
    serde_json::to_value(value)
        .map_err(|err| SectionRepositoryError::query(format!("failed to encode components: {err}")))
}

#[async_trait]
impl SectionRepository for DieselSectionRepository {
    async fn find_by_id(&self, id: &SectionId) -> Result<Option<Section>, SectionRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SectionRepositoryError::connection))?;
        self.load(&mut conn, id).await
    }

    async fn insert(&self, section: &Section) -> Result<(), SectionRepositoryError> {
        let components = to_json(section.components())?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SectionRepositoryError::connection))?;
        diesel::insert_into(sections::table)
            .values(NewSectionRow {
                id: *section.id().as_uuid(),
                title: section.title(),
                components,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "insert section"))?;
        Ok(())
    }

    async fn append_component(
        &self,
        id: &SectionId,
        component: &ComponentRef,
        capacity: usize,
    ) -> Result<AppendOutcome, SectionRepositoryError> {
        let entry = to_json(component)?;
        let capacity = i32::try_from(capacity)
            .map_err(|_| SectionRepositoryError::query("capacity exceeds column range"))?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SectionRepositoryError::connection))?;

        let appended: Option<SectionRow> = sql_query(APPEND_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Jsonb, _>(&entry)
            .bind::<Integer, _>(capacity)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "append component"))?;
        if let Some(row) = appended {
            return row_to_section(row).map(AppendOutcome::Appended);
        }

        Ok(match self.load(&mut conn, id).await? {
            Some(section) => AppendOutcome::AtCapacity(section),
            None => AppendOutcome::SectionMissing,
        })
    }

    async fn remove_component(
        &self,
        id: &SectionId,
        comp_id: &Uuid,
    ) -> Result<RemoveOutcome, SectionRepositoryError> {
        let comp_id = comp_id.to_string();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SectionRepositoryError::connection))?;

        let removed: Option<SectionRow> = sql_query(REMOVE_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Text, _>(&comp_id)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "remove component"))?;
        if let Some(row) = removed {
            return row_to_section(row).map(RemoveOutcome::Removed);
        }

        Ok(match self.load(&mut conn, id).await? {
            Some(section) => RemoveOutcome::NotListed(section),
            None => RemoveOutcome::SectionMissing,
        })
    }
}
