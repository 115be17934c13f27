//! PostgreSQL-backed `UserRepository` implementation using Diesel.
//!
//! Profile reads select an explicit column subset so the password hash
//! never leaves the credential repository's queries.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{EmailAddress, User, UserId, UserProfileUpdate};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to user repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors to user repository errors.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row to a domain user.
///
/// A stored email that no longer passes validation is a data defect;
/// surfaced as a query error rather than a panic.
pub(crate) fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserRepositoryError::query(format!("stored email invalid: {err}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        first_name: row.first_name,
        last_name: row.last_name,
        birth_date: row.birth_date,
        country_id: row.country_id,
        state_id: row.state_id,
        municipality_id: row.municipality_id,
        profile_image_url: row.profile_image_url,
        biography: row.biography,
        linkedin_profile: row.linkedin_profile,
        instagram_handle: row.instagram_handle,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(&uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, UserRepositoryError> {
        if update.is_empty() {
            // Callers short-circuit empty updates; reaching here with one
            // would build an empty SET clause, so re-read instead.
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| UserRepositoryError::not_found(id.as_ref()));
        }

        let affected = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let changeset = UserProfileChangeset {
                first_name: update.first_name.as_deref(),
                last_name: update.last_name.as_deref(),
                profile_image_url: update.profile_image_url.as_deref(),
                biography: update.biography.as_deref(),
                linkedin_profile: update.linkedin_profile.as_deref(),
                instagram_handle: update.instagram_handle.as_deref(),
            };

            diesel::update(users::table.find(*id.as_uuid()))
                .set((&changeset, users::updated_at.eq(diesel::dsl::now)))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };

        if affected == 0 {
            return Err(UserRepositoryError::not_found(id.as_ref()));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| UserRepositoryError::not_found(id.as_ref()))
    }
}
