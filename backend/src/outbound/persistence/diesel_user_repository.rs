//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Progress, User, UserChanges, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn diesel_error(
    error: diesel::result::Error,
    operation: &str,
    email: Option<&str>,
) -> UserPersistenceError {
    if let Some(email) = email
        && is_unique_violation(&error, EMAIL_CONSTRAINT)
    {
        return UserPersistenceError::duplicate_email(email);
    }
    map_diesel_error(
        error,
        operation,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn progress_columns(progress: Progress) -> Result<(i32, i64), UserPersistenceError> {
    let points = i32::try_from(progress.points())
        .map_err(|_| UserPersistenceError::query("points exceed column range"))?;
    let level = i64::try_from(progress.level())
        .map_err(|_| UserPersistenceError::query("level exceeds column range"))?;
    Ok((points, level))
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let points = u64::try_from(row.points)
        .map_err(|_| UserPersistenceError::query(format!("user {} has negative points", row.id)))?;
    let level = u64::try_from(row.level)
        .map_err(|_| UserPersistenceError::query(format!("user {} has negative level", row.id)))?;
    let progress = Progress::try_from_parts(points, level)
        .map_err(|err| UserPersistenceError::query(format!("user {}: {err}", row.id)))?;
    Ok(User::from_parts(
        UserId::from_uuid(row.id),
        row.name,
        row.email,
        progress,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "find user", None))?;
        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let (points, level) = progress_columns(user.progress())?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        diesel::insert_into(users::table)
            .values(NewUserRow {
                id: *user.id().as_uuid(),
                name: user.name(),
                email: user.email(),
                points,
                level,
            })
            .execute(&mut conn)
            .await
            .map_err(|err| diesel_error(err, "insert user", Some(user.email())))?;
        Ok(())
    }

    async fn apply_changes(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let progress = changes.progress.map(progress_columns).transpose()?;
        let changeset = UserChangeset {
            name: changes.name.as_deref(),
            email: changes.email.as_deref(),
            points: progress.map(|(points, _)| points),
            level: progress.map(|(_, level)| level),
            updated_at: Utc::now(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row = diesel::update(users::table.find(id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(err, "update user", changes.email.as_deref()))?;
        row.map(row_to_user).transpose()
    }
}
