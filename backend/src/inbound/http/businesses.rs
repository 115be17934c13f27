//! Business listing HTTP handlers.
//!
//! ```text
//! GET    /businesses/feed                    paginated, filtered feed
//! POST   /businesses                         create listing
//! GET    /businesses/mine?filter=...         OWNED | PARTNERED | SAVED
//! GET    /businesses/{id}                    listing detail
//! PUT    /businesses/{id}                    update listing
//! DELETE /businesses/{id}                    delete listing
//! POST   /businesses/{businessId}/associate  partnership interest
//! POST   /businesses/{businessId}/save       toggle save
//! POST   /businesses/{businessId}/like       toggle like
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{PageInfo, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::business::{Business, BusinessUpdate, FeedFilters, MyBusinessesFilter};
use crate::domain::business_service::{AddBusinessRequest, FeedItem, UpdateBusinessRequest};
use crate::domain::user::OwnerSummary;

use super::auth::{BearerUser, MaybeBearerUser};
use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use super::validation::{decode_image, parse_business_id};

/// Listing payload returned by every business endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessResponse {
    /// Listing identifier.
    pub id: String,
    /// Owning user's identifier.
    pub owner_id: String,
    /// Listing name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Capital required to join.
    pub investment: f64,
    /// Offered profit share.
    pub profit_percentage: f64,
    /// Category reference.
    pub category_id: i32,
    /// Municipality reference.
    pub municipality_id: String,
    /// Business model text.
    pub business_model: String,
    /// Reported monthly income.
    pub monthly_income: f64,
    /// Public image URL.
    pub image_url: Option<String>,
    /// Whether the requester saved the listing; absent without context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved_by_user: Option<bool>,
    /// Whether the requester liked the listing; absent without context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_liked_by_user: Option<bool>,
    /// Save count, when the read resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_count: Option<u64>,
    /// Like count, when the read resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-modification timestamp.
    pub updated_at: String,
}

impl From<Business> for BusinessResponse {
    fn from(value: Business) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            name: value.name,
            description: value.description,
            investment: value.investment,
            profit_percentage: value.profit_percentage,
            category_id: value.category_id,
            municipality_id: value.municipality_id,
            business_model: value.business_model,
            monthly_income: value.monthly_income,
            image_url: value.image_url,
            is_saved_by_user: value.interaction.is_saved,
            is_liked_by_user: value.interaction.is_liked,
            saved_count: value.interaction.saved_count,
            like_count: value.interaction.like_count,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

/// Condensed owner details on feed items.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponse {
    /// Owner's user id.
    pub user_id: String,
    /// Owner's given name.
    pub first_name: Option<String>,
    /// Owner's family name.
    pub last_name: Option<String>,
    /// Owner's profile image URL.
    pub profile_image_url: Option<String>,
}

impl From<OwnerSummary> for OwnerResponse {
    fn from(value: OwnerSummary) -> Self {
        Self {
            user_id: value.id.to_string(),
            first_name: value.first_name,
            last_name: value.last_name,
            profile_image_url: value.profile_image_url,
        }
    }
}

/// One feed entry: the listing plus its owner.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemResponse {
    /// The listing itself.
    #[serde(flatten)]
    pub business: BusinessResponse,
    /// Owner details, absent if the owner row has vanished.
    pub owner: Option<OwnerResponse>,
}

impl From<FeedItem> for FeedItemResponse {
    fn from(value: FeedItem) -> Self {
        Self {
            business: value.business.into(),
            owner: value.owner.map(OwnerResponse::from),
        }
    }
}

/// Feed query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Page size; defaults to 15.
    pub limit: Option<u32>,
    /// Exact category filter.
    pub category_id: Option<i32>,
    /// Upper bound on required investment.
    pub max_investment: Option<f64>,
    /// Reserved geo filter; accepted but not applied.
    pub nearby: Option<bool>,
}

/// `mine` query parameters.
#[derive(Debug, Deserialize)]
pub struct MineQuery {
    /// OWNED (default), PARTNERED, or SAVED.
    pub filter: Option<String>,
}

/// Create-listing request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddBusinessBody {
    /// Listing name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Capital required to join.
    pub investment: f64,
    /// Offered profit share.
    pub profit_percentage: f64,
    /// Category reference.
    pub category_id: i32,
    /// Municipality reference.
    pub municipality_id: String,
    /// Business model text.
    pub business_model: String,
    /// Reported monthly income.
    pub monthly_income: f64,
    /// Pre-hosted image URL, used only when no bytes are attached.
    pub image_url: Option<String>,
    /// Base64 image bytes to publish.
    pub image_data: Option<String>,
    /// MIME type of the attached bytes; defaults to JPEG.
    pub image_content_type: Option<String>,
}

/// Update-listing request body; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessBody {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement investment amount.
    pub investment: Option<f64>,
    /// Replacement profit share.
    pub profit_percentage: Option<f64>,
    /// Replacement category reference.
    pub category_id: Option<i32>,
    /// Replacement municipality reference.
    pub municipality_id: Option<String>,
    /// Replacement business model text.
    pub business_model: Option<String>,
    /// Replacement monthly income.
    pub monthly_income: Option<f64>,
    /// Replacement pre-hosted image URL.
    pub image_url: Option<String>,
    /// Base64 replacement image bytes.
    pub image_data: Option<String>,
    /// MIME type of the attached bytes; defaults to JPEG.
    pub image_content_type: Option<String>,
}

/// Paginated, filtered business feed.
#[utoipa::path(
    get,
    path = "/businesses/feed",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size"),
        ("category_id" = Option<i32>, Query, description = "Exact category filter"),
        ("max_investment" = Option<f64>, Query, description = "Investment upper bound"),
        ("nearby" = Option<bool>, Query, description = "Reserved geo filter")
    ),
    responses(
        (status = 200, description = "Feed page", body = [FeedItemResponse]),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Unauthorised"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "getBusinessFeed"
)]
#[get("/businesses/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    user: BearerUser,
    query: web::Query<FeedQuery>,
) -> ApiResult<HttpResponse> {
    let query = query.into_inner();
    let page = PageRequest::from_optional(query.page, query.limit)
        .map_err(|err| ApiError::invalid_request(err.to_string()))?;
    let filters = FeedFilters {
        category_id: query.category_id,
        max_investment: query.max_investment,
        nearby: query.nearby.unwrap_or(false),
    };

    let feed_page = state
        .businesses
        .feed(&filters, &page, Some(&user.0))
        .await?;
    let info = PageInfo::from_page(&feed_page, &page);
    let items: Vec<FeedItemResponse> = feed_page
        .items
        .into_iter()
        .map(FeedItemResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(Envelope::paginated(
        "Business feed retrieved successfully.",
        items,
        info,
    )))
}

/// Create a listing.
#[utoipa::path(
    post,
    path = "/businesses",
    request_body = AddBusinessBody,
    responses(
        (status = 201, description = "Listing created", body = BusinessResponse),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthorised"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "addBusiness"
)]
#[post("/businesses")]
pub async fn add(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<AddBusinessBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let image = decode_image(payload.image_data, payload.image_content_type)?;

    let created = state
        .businesses
        .add(
            user.0,
            AddBusinessRequest {
                name: payload.name,
                description: payload.description,
                investment: payload.investment,
                profit_percentage: payload.profit_percentage,
                category_id: payload.category_id,
                municipality_id: payload.municipality_id,
                business_model: payload.business_model,
                monthly_income: payload.monthly_income,
                image_url: payload.image_url,
                image,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(Envelope::success(
        "Business created successfully.",
        BusinessResponse::from(created),
    )))
}

/// The caller's listings by relation.
#[utoipa::path(
    get,
    path = "/businesses/mine",
    params(("filter" = Option<String>, Query, description = "OWNED | PARTNERED | SAVED")),
    responses(
        (status = 200, description = "Listings", body = [BusinessResponse]),
        (status = 401, description = "Unauthorised"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "getMyBusinesses"
)]
#[get("/businesses/mine")]
pub async fn mine(
    state: web::Data<HttpState>,
    user: BearerUser,
    query: web::Query<MineQuery>,
) -> ApiResult<HttpResponse> {
    let filter = MyBusinessesFilter::from_query(query.filter.as_deref());
    let listings = state.businesses.mine(&user.0, filter).await?;
    let items: Vec<BusinessResponse> = listings.into_iter().map(BusinessResponse::from).collect();

    Ok(HttpResponse::Ok().json(Envelope::success(
        "Businesses retrieved successfully.",
        items,
    )))
}

/// Listing detail; a valid bearer token personalises the like/save flags.
#[utoipa::path(
    get,
    path = "/businesses/{id}",
    params(("id" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "Listing detail", body = BusinessResponse),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "getBusinessDetails"
)]
#[get("/businesses/{id}")]
pub async fn detail(
    state: web::Data<HttpState>,
    user: MaybeBearerUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    let business = state.businesses.detail(&id, user.0.as_ref()).await?;

    Ok(HttpResponse::Ok().json(Envelope::success(
        "Business retrieved successfully.",
        BusinessResponse::from(business),
    )))
}

/// Update a listing; owner only.
#[utoipa::path(
    put,
    path = "/businesses/{id}",
    params(("id" = String, Path, description = "Business id")),
    request_body = UpdateBusinessBody,
    responses(
        (status = 200, description = "Listing updated", body = BusinessResponse),
        (status = 400, description = "Validation or storage failure"),
        (status = 401, description = "Unauthorised"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "updateBusiness"
)]
#[put("/businesses/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
    payload: web::Json<UpdateBusinessBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    let payload = payload.into_inner();
    let image = decode_image(payload.image_data, payload.image_content_type)?;

    let updated = state
        .businesses
        .update(
            &id,
            &user.0,
            UpdateBusinessRequest {
                changes: BusinessUpdate {
                    name: payload.name,
                    description: payload.description,
                    investment: payload.investment,
                    profit_percentage: payload.profit_percentage,
                    category_id: payload.category_id,
                    municipality_id: payload.municipality_id,
                    business_model: payload.business_model,
                    monthly_income: payload.monthly_income,
                    image_url: payload.image_url,
                },
                image,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(Envelope::success(
        "Business updated successfully.",
        BusinessResponse::from(updated),
    )))
}

/// Delete a listing; owner only.
#[utoipa::path(
    delete,
    path = "/businesses/{id}",
    params(("id" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "Listing deleted"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Not found or not owned"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "deleteBusiness"
)]
#[delete("/businesses/{id}")]
pub async fn remove(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    let deleted = state.businesses.delete(&id, &user.0).await?;
    if !deleted {
        return Err(ApiError::not_found(
            "Business not found or not owned by you.",
        ));
    }

    Ok(HttpResponse::Ok().json(Envelope::message_only("Business deleted successfully.")))
}

/// Register partnership interest; repeat interest is still a success.
#[utoipa::path(
    post,
    path = "/businesses/{businessId}/associate",
    params(("businessId" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "Interest registered"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Business not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "initiatePartnership"
)]
#[post("/businesses/{businessId}/associate")]
pub async fn associate(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    state.businesses.associate(&user.0, &id).await?;

    Ok(HttpResponse::Ok().json(Envelope::message_only(
        "Partnership interest registered successfully.",
    )))
}

/// Toggle the saved state of a listing for the caller.
#[utoipa::path(
    post,
    path = "/businesses/{businessId}/save",
    params(("businessId" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "New saved state"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Business not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "toggleSaveBusiness"
)]
#[post("/businesses/{businessId}/save")]
pub async fn toggle_save(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    let saved = state.businesses.toggle_save(&user.0, &id).await?;

    let message = if saved {
        "Business saved successfully."
    } else {
        "Business removed from saved."
    };
    Ok(HttpResponse::Ok().json(Envelope::success(message, json!({ "isSaved": saved }))))
}

/// Toggle the liked state of a listing for the caller.
#[utoipa::path(
    post,
    path = "/businesses/{businessId}/like",
    params(("businessId" = String, Path, description = "Business id")),
    responses(
        (status = 200, description = "New liked state"),
        (status = 400, description = "Malformed id"),
        (status = 401, description = "Unauthorised"),
        (status = 404, description = "Business not found"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["businesses"],
    operation_id = "toggleLikeBusiness"
)]
#[post("/businesses/{businessId}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_business_id(&path)?;
    let liked = state.businesses.toggle_like(&user.0, &id).await?;

    let message = if liked {
        "Business liked successfully."
    } else {
        "Business unliked."
    };
    Ok(HttpResponse::Ok().json(Envelope::success(message, json!({ "isLiked": liked }))))
}
