//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and
//! must never be exposed to the domain. They exist solely to satisfy
//! Diesel's type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    businesses, categories, countries, municipalities, partnerships, states,
    user_liked_businesses, user_saved_businesses, users,
};

/// Row struct for profile reads from the users table.
///
/// Deliberately omits `password_hash`; `as_select()` derives the matching
/// column subset so the hash never leaves the credential repository.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub country_id: Option<String>,
    pub state_id: Option<String>,
    pub municipality_id: Option<String>,
    pub profile_image_url: Option<String>,
    pub biography: Option<String>,
    pub linkedin_profile: Option<String>,
    pub instagram_handle: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for registration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub birth_date: NaiveDate,
    pub country_id: &'a str,
    pub state_id: &'a str,
    pub municipality_id: &'a str,
}

/// Changeset for partial profile updates; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserProfileChangeset<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub profile_image_url: Option<&'a str>,
    pub biography: Option<&'a str>,
    pub linkedin_profile: Option<&'a str>,
    pub instagram_handle: Option<&'a str>,
}

/// Row struct for reading from the businesses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BusinessRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub investment: f64,
    pub profit_percentage: f64,
    pub category_id: i32,
    pub municipality_id: String,
    pub business_model: String,
    pub monthly_income: f64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = businesses)]
pub(crate) struct NewBusinessRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub investment: f64,
    pub profit_percentage: f64,
    pub category_id: i32,
    pub municipality_id: &'a str,
    pub business_model: &'a str,
    pub monthly_income: f64,
    pub image_url: Option<&'a str>,
}

/// Changeset for partial listing updates; `None` fields are skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = businesses)]
pub(crate) struct BusinessChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub investment: Option<f64>,
    pub profit_percentage: Option<f64>,
    pub category_id: Option<i32>,
    pub municipality_id: Option<&'a str>,
    pub business_model: Option<&'a str>,
    pub monthly_income: Option<f64>,
    pub image_url: Option<&'a str>,
}

/// Insertable struct for the saved relation.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_saved_businesses)]
pub(crate) struct NewSavedRow {
    pub user_id: Uuid,
    pub business_id: Uuid,
}

/// Insertable struct for the liked relation.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_liked_businesses)]
pub(crate) struct NewLikedRow {
    pub user_id: Uuid,
    pub business_id: Uuid,
}

/// Insertable struct for partnership interest.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = partnerships)]
pub(crate) struct NewPartnershipRow {
    pub user_id: Uuid,
    pub business_id: Uuid,
}

/// Row struct for countries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = countries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CountryRow {
    pub id: String,
    pub name: String,
}

/// Row struct for states.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StateRow {
    pub id: String,
    pub name: String,
    pub country_id: String,
}

/// Row struct for municipalities.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = municipalities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MunicipalityRow {
    pub id: String,
    pub name: String,
    pub state_id: String,
}

/// Row struct for categories.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CategoryRow {
    pub id: i32,
    pub name: String,
    pub icon_key: Option<String>,
}
