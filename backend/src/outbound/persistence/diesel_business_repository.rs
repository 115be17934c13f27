//! PostgreSQL-backed `BusinessRepository` implementation using Diesel.
//!
//! Read decoration (like/save counts, requester-relative flags) runs as
//! auxiliary queries after the primary fetch; feed pages batch the same
//! decoration over the page's ids. Toggles run as a single
//! delete-else-insert inside one transaction so the reported state always
//! derives from the statements' own outcomes.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{BoxableExpression, IntoSql};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::{PageRequest, Paginated};
use uuid::Uuid;

use crate::domain::business::{
    Business, BusinessId, BusinessUpdate, FeedFilters, InteractionState, NewBusiness,
};
use crate::domain::ports::{BusinessRepository, BusinessRepositoryError};
use crate::domain::user::UserId;

use super::diesel_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    BusinessChangeset, BusinessRow, NewBusinessRow, NewLikedRow, NewPartnershipRow, NewSavedRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{businesses, partnerships, user_liked_businesses, user_saved_businesses};

/// Diesel-backed implementation of the `BusinessRepository` port.
#[derive(Clone)]
pub struct DieselBusinessRepository {
    pool: DbPool,
}

impl DieselBusinessRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn interaction_counts(
        &self,
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        business: Uuid,
        requester: Option<Uuid>,
    ) -> Result<InteractionState, BusinessRepositoryError> {
        let like_count: i64 = user_liked_businesses::table
            .filter(user_liked_businesses::business_id.eq(business))
            .count()
            .get_result(conn)
            .await
            .map_err(map_diesel_error)?;
        let saved_count: i64 = user_saved_businesses::table
            .filter(user_saved_businesses::business_id.eq(business))
            .count()
            .get_result(conn)
            .await
            .map_err(map_diesel_error)?;

        let (is_liked, is_saved) = match requester {
            Some(user) => {
                let liked: i64 = user_liked_businesses::table
                    .filter(user_liked_businesses::business_id.eq(business))
                    .filter(user_liked_businesses::user_id.eq(user))
                    .count()
                    .get_result(conn)
                    .await
                    .map_err(map_diesel_error)?;
                let saved: i64 = user_saved_businesses::table
                    .filter(user_saved_businesses::business_id.eq(business))
                    .filter(user_saved_businesses::user_id.eq(user))
                    .count()
                    .get_result(conn)
                    .await
                    .map_err(map_diesel_error)?;
                (Some(liked > 0), Some(saved > 0))
            }
            None => (None, None),
        };

        Ok(InteractionState {
            is_saved,
            is_liked,
            saved_count: Some(non_negative(saved_count)),
            like_count: Some(non_negative(like_count)),
        })
    }

    /// Attach counts and requester flags to a page of rows with three
    /// batched queries instead of per-row subqueries.
    async fn decorate_page(
        &self,
        conn: &mut diesel_async::pooled_connection::bb8::PooledConnection<
            '_,
            diesel_async::AsyncPgConnection,
        >,
        rows: Vec<BusinessRow>,
        requester: Option<Uuid>,
    ) -> Result<Vec<Business>, BusinessRepositoryError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let like_counts: Vec<(Uuid, i64)> = user_liked_businesses::table
            .filter(user_liked_businesses::business_id.eq_any(&ids))
            .group_by(user_liked_businesses::business_id)
            .select((user_liked_businesses::business_id, count_star()))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        let saved_counts: Vec<(Uuid, i64)> = user_saved_businesses::table
            .filter(user_saved_businesses::business_id.eq_any(&ids))
            .group_by(user_saved_businesses::business_id)
            .select((user_saved_businesses::business_id, count_star()))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;

        let (liked_by_requester, saved_by_requester) = match requester {
            Some(user) => {
                let liked: Vec<Uuid> = user_liked_businesses::table
                    .filter(user_liked_businesses::business_id.eq_any(&ids))
                    .filter(user_liked_businesses::user_id.eq(user))
                    .select(user_liked_businesses::business_id)
                    .load(conn)
                    .await
                    .map_err(map_diesel_error)?;
                let saved: Vec<Uuid> = user_saved_businesses::table
                    .filter(user_saved_businesses::business_id.eq_any(&ids))
                    .filter(user_saved_businesses::user_id.eq(user))
                    .select(user_saved_businesses::business_id)
                    .load(conn)
                    .await
                    .map_err(map_diesel_error)?;
                (Some(liked), Some(saved))
            }
            None => (None, None),
        };

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                let interaction = InteractionState {
                    is_liked: liked_by_requester.as_ref().map(|set| set.contains(&id)),
                    is_saved: saved_by_requester.as_ref().map(|set| set.contains(&id)),
                    like_count: Some(count_for(&like_counts, id)),
                    saved_count: Some(count_for(&saved_counts, id)),
                };
                row_to_business(row, interaction)
            })
            .collect())
    }
}

/// Map pool errors to business repository errors.
fn map_pool_error(error: PoolError) -> BusinessRepositoryError {
    map_basic_pool_error(error, BusinessRepositoryError::connection)
}

/// Map Diesel errors to business repository errors.
fn map_diesel_error(error: diesel::result::Error) -> BusinessRepositoryError {
    map_basic_diesel_error(
        error,
        BusinessRepositoryError::query,
        BusinessRepositoryError::connection,
    )
}

/// Map relation-write failures, turning missing-business FK violations
/// into `NotFound`.
fn map_relation_error(error: diesel::result::Error, business: &BusinessId) -> BusinessRepositoryError {
    if is_foreign_key_violation(&error) {
        return BusinessRepositoryError::not_found(business.as_ref());
    }
    map_diesel_error(error)
}

/// Convert a database row to a domain business.
fn row_to_business(row: BusinessRow, interaction: InteractionState) -> Business {
    Business {
        id: BusinessId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name: row.name,
        description: row.description,
        investment: row.investment,
        profit_percentage: row.profit_percentage,
        category_id: row.category_id,
        municipality_id: row.municipality_id,
        business_model: row.business_model,
        monthly_income: row.monthly_income,
        image_url: row.image_url,
        interaction,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

fn count_for(counts: &[(Uuid, i64)], id: Uuid) -> u64 {
    counts
        .iter()
        .find(|(business, _)| *business == id)
        .map(|(_, count)| non_negative(*count))
        .unwrap_or_default()
}

/// Build the WHERE clause from the recognised, present filters. Absent
/// filters are omitted, not defaulted; `nearby` is reserved and ignored.
fn feed_predicate(
    filters: &FeedFilters,
) -> Box<
    dyn BoxableExpression<businesses::table, diesel::pg::Pg, SqlType = diesel::sql_types::Bool>,
> {
    let mut predicate: Box<
        dyn BoxableExpression<businesses::table, diesel::pg::Pg, SqlType = diesel::sql_types::Bool>,
    > = Box::new(true.into_sql::<diesel::sql_types::Bool>());
    if let Some(category) = filters.category_id {
        predicate = Box::new(predicate.and(businesses::category_id.eq(category)));
    }
    if let Some(max_investment) = filters.max_investment {
        predicate = Box::new(predicate.and(businesses::investment.le(max_investment)));
    }
    predicate
}

#[async_trait]
impl BusinessRepository for DieselBusinessRepository {
    async fn create(&self, data: &NewBusiness) -> Result<Business, BusinessRepositoryError> {
        let id = Uuid::new_v4();
        {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let new_row = NewBusinessRow {
                id,
                owner_id: *data.owner_id.as_uuid(),
                name: &data.name,
                description: &data.description,
                investment: data.investment,
                profit_percentage: data.profit_percentage,
                category_id: data.category_id,
                municipality_id: &data.municipality_id,
                business_model: &data.business_model,
                monthly_income: data.monthly_income,
                image_url: data.image_url.as_deref(),
            };

            diesel::insert_into(businesses::table)
                .values(&new_row)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }

        // Read the listing back through the decorated path so the owner
        // sees the same shape as any other single-business fetch.
        self.find_by_id(&BusinessId::from_uuid(id), Some(&data.owner_id))
            .await
    }

    async fn find_by_id(
        &self,
        id: &BusinessId,
        requester: Option<&UserId>,
    ) -> Result<Business, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<BusinessRow> = businesses::table
            .find(*id.as_uuid())
            .select(BusinessRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Err(BusinessRepositoryError::not_found(id.as_ref()));
        };

        let interaction = self
            .interaction_counts(&mut conn, row.id, requester.map(|user| *user.as_uuid()))
            .await?;

        Ok(row_to_business(row, interaction))
    }

    async fn update(
        &self,
        id: &BusinessId,
        owner: &UserId,
        update: &BusinessUpdate,
    ) -> Result<Business, BusinessRepositoryError> {
        // Re-fetch first: confirms existence (NotFound) and ownership
        // (NotOwner) before any SET clause is built.
        let current = self.find_by_id(id, Some(owner)).await?;
        if current.owner_id != *owner {
            return Err(BusinessRepositoryError::not_owner(
                owner.as_ref(),
                id.as_ref(),
            ));
        }

        if update.is_empty() {
            return Ok(current);
        }

        let affected = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let changeset = BusinessChangeset {
                name: update.name.as_deref(),
                description: update.description.as_deref(),
                investment: update.investment,
                profit_percentage: update.profit_percentage,
                category_id: update.category_id,
                municipality_id: update.municipality_id.as_deref(),
                business_model: update.business_model.as_deref(),
                monthly_income: update.monthly_income,
                image_url: update.image_url.as_deref(),
            };

            diesel::update(
                businesses::table
                    .filter(businesses::id.eq(id.as_uuid()))
                    .filter(businesses::owner_id.eq(owner.as_uuid())),
            )
            .set((&changeset, businesses::updated_at.eq(diesel::dsl::now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?
        };

        if affected == 0 {
            // The row existed moments ago; a zero-row update means a
            // concurrent delete or owner change won the race.
            return Err(BusinessRepositoryError::stale(id.as_ref()));
        }

        self.find_by_id(id, Some(owner)).await
    }

    async fn delete(
        &self,
        id: &BusinessId,
        owner: &UserId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            businesses::table
                .filter(businesses::id.eq(id.as_uuid()))
                .filter(businesses::owner_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BusinessRow> = businesses::table
            .filter(businesses::owner_id.eq(owner.as_uuid()))
            .order(businesses::created_at.desc())
            .select(BusinessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| row_to_business(row, InteractionState::default()))
            .collect())
    }

    async fn list_partnered(
        &self,
        user: &UserId,
    ) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BusinessRow> = businesses::table
            .inner_join(partnerships::table)
            .filter(partnerships::user_id.eq(user.as_uuid()))
            .order(partnerships::initiated_at.desc())
            .select(BusinessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| row_to_business(row, InteractionState::default()))
            .collect())
    }

    async fn list_saved(&self, user: &UserId) -> Result<Vec<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BusinessRow> = businesses::table
            .inner_join(user_saved_businesses::table)
            .filter(user_saved_businesses::user_id.eq(user.as_uuid()))
            .order(user_saved_businesses::saved_at.desc())
            .select(BusinessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // The relation is the query predicate, so is_saved is known true.
        Ok(rows
            .into_iter()
            .map(|row| row_to_business(row, InteractionState::saved()))
            .collect())
    }

    async fn initiate_partnership(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(partnerships::table)
            .values(NewPartnershipRow {
                user_id: *user.as_uuid(),
                business_id: *business.as_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_relation_error(err, business))?;

        // Zero affected rows means the interest already existed; the
        // intent is satisfied either way.
        Ok(true)
    }

    async fn toggle_save(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user.as_uuid();
        let business_uuid = *business.as_uuid();

        conn.transaction::<bool, diesel::result::Error, _>(|tx| {
            async move {
                let deleted = diesel::delete(
                    user_saved_businesses::table
                        .filter(user_saved_businesses::user_id.eq(user_uuid))
                        .filter(user_saved_businesses::business_id.eq(business_uuid)),
                )
                .execute(tx)
                .await?;
                if deleted > 0 {
                    return Ok(false);
                }
                diesel::insert_into(user_saved_businesses::table)
                    .values(NewSavedRow {
                        user_id: user_uuid,
                        business_id: business_uuid,
                    })
                    .on_conflict_do_nothing()
                    .execute(tx)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_relation_error(err, business))
    }

    async fn toggle_like(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user.as_uuid();
        let business_uuid = *business.as_uuid();

        conn.transaction::<bool, diesel::result::Error, _>(|tx| {
            async move {
                let deleted = diesel::delete(
                    user_liked_businesses::table
                        .filter(user_liked_businesses::user_id.eq(user_uuid))
                        .filter(user_liked_businesses::business_id.eq(business_uuid)),
                )
                .execute(tx)
                .await?;
                if deleted > 0 {
                    return Ok(false);
                }
                diesel::insert_into(user_liked_businesses::table)
                    .values(NewLikedRow {
                        user_id: user_uuid,
                        business_id: business_uuid,
                    })
                    .on_conflict_do_nothing()
                    .execute(tx)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_relation_error(err, business))
    }

    async fn feed(
        &self,
        filters: &FeedFilters,
        page: &PageRequest,
        requester: Option<&UserId>,
    ) -> Result<Paginated<Business>, BusinessRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Count over the same WHERE clause first; zero short-circuits to
        // an empty page without issuing the main query.
        let total: i64 = businesses::table
            .filter(feed_predicate(filters))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if total == 0 {
            return Ok(Paginated::empty(page));
        }

        let rows: Vec<BusinessRow> = businesses::table
            .filter(feed_predicate(filters))
            .order(businesses::created_at.desc())
            .limit(i64::from(page.limit()))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .select(BusinessRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = self
            .decorate_page(&mut conn, rows, requester.map(|user| *user.as_uuid()))
            .await?;

        Ok(Paginated::new(items, page, non_negative(total)))
    }
}

#[cfg(test)]
mod tests {
    //! Mapping and conversion coverage; query behaviour is exercised by
    //! the integration tests against the in-memory repository.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn sample_row() -> BusinessRow {
        BusinessRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Roastery".to_owned(),
            description: "Small-batch coffee roastery".to_owned(),
            investment: 25_000.0,
            profit_percentage: 12.5,
            category_id: 3,
            municipality_id: "014".to_owned(),
            business_model: "Wholesale supply".to_owned(),
            monthly_income: 4_000.0,
            image_url: Some("https://cdn.example.com/business_images/x".to_owned()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let mapped = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(
            mapped,
            BusinessRepositoryError::Connection { .. }
        ));
        assert!(mapped.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(mapped, BusinessRepositoryError::Query { .. }));
    }

    #[rstest]
    fn foreign_key_violation_maps_to_not_found() {
        let business = BusinessId::random();
        let err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            Box::new("missing business".to_owned()),
        );
        let mapped = map_relation_error(err, &business);
        assert_eq!(
            mapped,
            BusinessRepositoryError::not_found(business.as_ref())
        );
    }

    #[rstest]
    fn row_conversion_keeps_fields_and_decoration() {
        let row = sample_row();
        let id = row.id;
        let interaction = InteractionState {
            is_saved: Some(true),
            is_liked: Some(false),
            saved_count: Some(4),
            like_count: Some(9),
        };

        let business = row_to_business(row, interaction);

        assert_eq!(business.id.as_uuid(), &id);
        assert_eq!(business.name, "Roastery");
        assert_eq!(business.interaction.saved_count, Some(4));
        assert_eq!(business.interaction.is_liked, Some(false));
    }

    #[rstest]
    fn count_lookup_defaults_to_zero() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let counts = vec![(other, 7_i64)];

        assert_eq!(count_for(&counts, other), 7);
        assert_eq!(count_for(&counts, id), 0);
    }

    #[rstest]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(non_negative(11), 11);
    }
}
