//! Static reference data HTTP handlers.
//!
//! ```text
//! GET /locations/countries
//! GET /locations/states?countryId=...
//! GET /locations/municipalities?stateId=...
//! GET /locations/categories
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::error;

use crate::domain::DomainError;
use crate::domain::ports::LocationRepositoryError;

use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// `states` query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatesQuery {
    /// Country whose states to list.
    pub country_id: String,
}

/// `municipalities` query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalitiesQuery {
    /// State whose municipalities to list.
    pub state_id: String,
}

fn map_location_error(err: LocationRepositoryError) -> ApiError {
    error!(error = %err, "location repository failure");
    ApiError::from_domain(DomainError::internal("database error"))
}

/// All countries.
#[utoipa::path(
    get,
    path = "/locations/countries",
    responses(
        (status = 200, description = "Countries", body = [crate::domain::Country]),
        (status = 500, description = "Internal server error")
    ),
    tags = ["locations"],
    operation_id = "getCountries"
)]
#[get("/locations/countries")]
pub async fn countries(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let data = state
        .locations
        .countries()
        .await
        .map_err(map_location_error)?;
    Ok(HttpResponse::Ok().json(Envelope::success("Countries retrieved successfully.", data)))
}

/// States of one country.
#[utoipa::path(
    get,
    path = "/locations/states",
    params(("countryId" = String, Query, description = "Country code")),
    responses(
        (status = 200, description = "States", body = [crate::domain::State]),
        (status = 400, description = "Missing countryId"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["locations"],
    operation_id = "getStates"
)]
#[get("/locations/states")]
pub async fn states(
    state: web::Data<HttpState>,
    query: web::Query<StatesQuery>,
) -> ApiResult<HttpResponse> {
    let data = state
        .locations
        .states_by_country(&query.country_id)
        .await
        .map_err(map_location_error)?;
    Ok(HttpResponse::Ok().json(Envelope::success("States retrieved successfully.", data)))
}

/// Municipalities of one state.
#[utoipa::path(
    get,
    path = "/locations/municipalities",
    params(("stateId" = String, Query, description = "State code")),
    responses(
        (status = 200, description = "Municipalities", body = [crate::domain::Municipality]),
        (status = 400, description = "Missing stateId"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["locations"],
    operation_id = "getMunicipalities"
)]
#[get("/locations/municipalities")]
pub async fn municipalities(
    state: web::Data<HttpState>,
    query: web::Query<MunicipalitiesQuery>,
) -> ApiResult<HttpResponse> {
    let data = state
        .locations
        .municipalities_by_state(&query.state_id)
        .await
        .map_err(map_location_error)?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        "Municipalities retrieved successfully.",
        data,
    )))
}

/// All business categories.
#[utoipa::path(
    get,
    path = "/locations/categories",
    responses(
        (status = 200, description = "Categories", body = [crate::domain::Category]),
        (status = 500, description = "Internal server error")
    ),
    tags = ["locations"],
    operation_id = "getCategories"
)]
#[get("/locations/categories")]
pub async fn categories(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let data = state
        .locations
        .categories()
        .await
        .map_err(map_location_error)?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        "Categories retrieved successfully.",
        data,
    )))
}
