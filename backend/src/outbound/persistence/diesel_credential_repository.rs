//! PostgreSQL-backed `CredentialRepository` implementation using Diesel.
//!
//! The only two queries that ever touch the `password_hash` column live
//! here; unique-email violations surface as a typed duplicate error so
//! the auth service can report them as validation failures.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::user::{EmailAddress, NewUser, User};

use super::diesel_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_user_repository::row_to_user;
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `CredentialRepository` port.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
}

impl DieselCredentialRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to credential repository errors.
fn map_pool_error(error: PoolError) -> CredentialRepositoryError {
    map_basic_pool_error(error, CredentialRepositoryError::connection)
}

/// Map Diesel errors to credential repository errors.
fn map_diesel_error(error: diesel::result::Error) -> CredentialRepositoryError {
    map_basic_diesel_error(
        error,
        CredentialRepositoryError::query,
        CredentialRepositoryError::connection,
    )
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn password_hash_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<String>, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        users::table
            .filter(users::email.eq(email.as_str()))
            .select(users::password_hash)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn create_user(
        &self,
        profile: &NewUser,
        password_hash: &str,
    ) -> Result<User, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: Uuid::new_v4(),
            email: profile.email.as_str(),
            password_hash,
            first_name: profile.first_name.as_deref(),
            last_name: profile.last_name.as_deref(),
            birth_date: profile.birth_date,
            country_id: &profile.country_id,
            state_id: &profile.state_id,
            municipality_id: &profile.municipality_id,
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CredentialRepositoryError::duplicate_email(profile.email.as_str())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_user(stored)
            .map_err(|err| CredentialRepositoryError::query(err.to_string()))
    }
}
