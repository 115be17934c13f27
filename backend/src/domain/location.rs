//! Static reference data: countries, states, municipalities, categories.
//!
//! These rows are seeded by operators and only ever read by the
//! application, so the types stay plain.

use serde::Serialize;
use utoipa::ToSchema;

/// A country available at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Stable country code.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// A state within a country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// Stable state code.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning country code.
    pub country_id: String,
}

/// A municipality within a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    /// Stable municipality code.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Owning state code.
    pub state_id: String,
}

/// A business category listings reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Numeric category id.
    pub id: i32,
    /// Display name.
    pub name: String,
    /// Client-side icon key.
    pub icon_key: Option<String>,
}
