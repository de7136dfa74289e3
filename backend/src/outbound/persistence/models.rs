//! Internal Diesel row structs.
//!
//! Never exposed outside the persistence adapter; repositories convert them
//! to domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{exercises, sections, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub points: i32,
    pub level: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub points: i32,
    pub level: i64,
}

/// Partial user update; `None` columns are left out of the `SET` clause.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub points: Option<i32>,
    pub level: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = sections)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SectionRow {
    pub id: Uuid,
    pub title: String,
    pub components: serde_json::Value,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sections)]
pub(crate) struct NewSectionRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub components: serde_json::Value,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = exercises)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExerciseRow {
    pub id: Uuid,
    pub section_id: Uuid,
    pub title: String,
    pub question: String,
    pub answers: Vec<String>,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

/// Content columns an exercise update may touch.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = exercises)]
pub(crate) struct ExerciseContentUpdate<'a> {
    pub title: &'a str,
    pub question: &'a str,
    pub answers: &'a [String],
    pub date_updated: DateTime<Utc>,
}
