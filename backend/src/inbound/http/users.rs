//! Profile HTTP handlers.
//!
//! ```text
//! GET /users/me   profile read
//! PUT /users/me   partial profile update
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::user::{User, UserProfileUpdate};
use crate::domain::user_service::UpdateProfileRequest;

use super::auth::BearerUser;
use super::envelope::Envelope;
use super::error::ApiResult;
use super::state::HttpState;
use super::validation::decode_image;

/// Profile payload returned by the `/users/me` endpoints.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User identifier.
    pub id: String,
    /// Login address.
    pub email: String,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// ISO-8601 date of birth.
    pub birth_date: Option<String>,
    /// Registration country reference.
    pub country_id: Option<String>,
    /// Registration state reference.
    pub state_id: Option<String>,
    /// Registration municipality reference.
    pub municipality_id: Option<String>,
    /// Public profile image URL.
    pub profile_image_url: Option<String>,
    /// Free-text biography.
    pub biography: Option<String>,
    /// Full LinkedIn profile URL.
    pub linkedin_profile: Option<String>,
    /// Instagram handle.
    pub instagram_handle: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp.
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.to_string(),
            first_name: value.first_name,
            last_name: value.last_name,
            birth_date: value.birth_date.map(|date| date.to_string()),
            country_id: value.country_id,
            state_id: value.state_id,
            municipality_id: value.municipality_id,
            profile_image_url: value.profile_image_url,
            biography: value.biography,
            linkedin_profile: value.linkedin_profile,
            instagram_handle: value.instagram_handle,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Profile update body; absent fields are left untouched. Location
/// references and the birth date are immutable after registration.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement biography.
    pub biography: Option<String>,
    /// Replacement LinkedIn URL.
    pub linkedin_profile: Option<String>,
    /// Replacement Instagram handle.
    pub instagram_handle: Option<String>,
    /// Replacement pre-hosted profile image URL.
    pub profile_image_url: Option<String>,
    /// Base64 replacement image bytes.
    pub image_data: Option<String>,
    /// MIME type of the attached bytes; defaults to JPEG.
    pub image_content_type: Option<String>,
}

/// The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Profile missing"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "getMyProfile"
)]
#[get("/users/me")]
pub async fn me(state: web::Data<HttpState>, user: BearerUser) -> ApiResult<HttpResponse> {
    let profile = state.users.profile(&user.0).await?;
    Ok(HttpResponse::Ok().json(Envelope::success(
        "Profile retrieved successfully.",
        UserResponse::from(profile),
    )))
}

/// Update the authenticated user's profile.
#[utoipa::path(
    put,
    path = "/users/me",
    request_body = UpdateProfileBody,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Profile missing"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "updateMyProfile"
)]
#[put("/users/me")]
pub async fn update_me(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<UpdateProfileBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let image = decode_image(payload.image_data, payload.image_content_type)?;

    let updated = state
        .users
        .update_profile(
            &user.0,
            UpdateProfileRequest {
                changes: UserProfileUpdate {
                    first_name: payload.first_name,
                    last_name: payload.last_name,
                    profile_image_url: payload.profile_image_url,
                    biography: payload.biography,
                    linkedin_profile: payload.linkedin_profile,
                    instagram_handle: payload.instagram_handle,
                },
                image,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(
        "Profile updated successfully.",
        UserResponse::from(updated),
    )))
}
