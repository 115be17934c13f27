//! Bearer authentication extractors and the `/auth` endpoints.
//!
//! ```text
//! POST /auth/login     credential check, token issuance
//! POST /auth/register  create user, auto-login
//! ```
//!
//! Handlers needing an authenticated caller take [`BearerUser`]; routes
//! where authentication merely personalises the response take
//! [`MaybeBearerUser`], which degrades absent or invalid tokens to an
//! anonymous request instead of rejecting them.

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, post, web};
use futures_util::future::{Ready, ready};
use serde::Deserialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::auth::{AuthTokens, Credentials, Registration};
use crate::domain::user::UserId;

use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;

/// An authenticated caller; extraction fails with 401 when the bearer
/// token is missing or invalid.
#[derive(Debug, Clone)]
pub struct BearerUser(pub UserId);

/// An optionally-authenticated caller; `None` when no valid bearer token
/// accompanied the request.
#[derive(Debug, Clone)]
pub struct MaybeBearerUser(pub Option<UserId>);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn verified_user(req: &HttpRequest) -> Result<Option<UserId>, ApiError> {
    let Some(token) = bearer_token(req) else {
        return Ok(None);
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| ApiError::from_domain(crate::domain::DomainError::internal(
            "HTTP state not configured",
        )))?;
    match state.tokens.verify(token) {
        Ok(user) => Ok(Some(user)),
        Err(err) => {
            warn!(error = %err, "bearer token rejected");
            Ok(None)
        }
    }
}

impl FromRequest for BearerUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = verified_user(req).and_then(|user| {
            user.map(BearerUser)
                .ok_or_else(|| ApiError::unauthorized("authentication required"))
        });
        ready(result)
    }
}

impl FromRequest for MaybeBearerUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(verified_user(req).map(MaybeBearerUser))
    }
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Registered email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address to register; must be unique.
    pub email: String,
    /// Plaintext password, at least eight characters.
    pub password: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// ISO-8601 date of birth.
    pub birth_date: String,
    /// Registration country reference.
    pub country_id: String,
    /// Registration state reference.
    pub state_id: String,
    /// Registration municipality reference.
    pub municipality_id: String,
}

/// Verify credentials and issue a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = AuthTokens),
        (status = 400, description = "Malformed credentials"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|err| ApiError::invalid_request(err.to_string()))?;

    let tokens = state.auth.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(Envelope::success("Login successful.", tokens)))
}

/// Register a new user and auto-login.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created, token issued", body = AuthTokens),
        (status = 400, description = "Validation failure or duplicate email"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration = Registration::try_from_parts(
        &payload.email,
        &payload.password,
        payload.first_name,
        payload.last_name,
        &payload.birth_date,
        payload.country_id,
        payload.state_id,
        payload.municipality_id,
    )
    .map_err(|err| ApiError::invalid_request(err.to_string()))?;

    let tokens = state.auth.register(&registration).await?;
    Ok(HttpResponse::Created().json(Envelope::success("Registration successful.", tokens)))
}
