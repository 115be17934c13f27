//! PostgreSQL-backed `LocationRepository` implementation using Diesel.
//!
//! Reference data is seeded by operators and read-only here, so every
//! operation is a straight ordered select.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::location::{Category, Country, Municipality, State};
use crate::domain::ports::{LocationRepository, LocationRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CategoryRow, CountryRow, MunicipalityRow, StateRow};
use super::pool::{DbPool, PoolError};
use super::schema::{categories, countries, municipalities, states};

/// Diesel-backed implementation of the `LocationRepository` port.
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LocationRepositoryError {
    map_basic_pool_error(error, LocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LocationRepositoryError {
    map_basic_diesel_error(
        error,
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn countries(&self) -> Result<Vec<Country>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CountryRow> = countries::table
            .order(countries::name.asc())
            .select(CountryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| Country {
                id: row.id,
                name: row.name,
            })
            .collect())
    }

    async fn states_by_country(
        &self,
        country_id: &str,
    ) -> Result<Vec<State>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<StateRow> = states::table
            .filter(states::country_id.eq(country_id))
            .order(states::name.asc())
            .select(StateRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| State {
                id: row.id,
                name: row.name,
                country_id: row.country_id,
            })
            .collect())
    }

    async fn municipalities_by_state(
        &self,
        state_id: &str,
    ) -> Result<Vec<Municipality>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MunicipalityRow> = municipalities::table
            .filter(municipalities::state_id.eq(state_id))
            .order(municipalities::name.asc())
            .select(MunicipalityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| Municipality {
                id: row.id,
                name: row.name,
                state_id: row.state_id,
            })
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.id,
                name: row.name,
                icon_key: row.icon_key,
            })
            .collect())
    }
}
