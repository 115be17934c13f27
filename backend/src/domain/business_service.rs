//! Business listing use cases.
//!
//! Orchestrates the business repository, object storage, and user
//! repository behind the HTTP adapter. Image handling follows the
//! upload-then-merge pattern: attached bytes are published first and the
//! resulting URL substituted into the write; a directly supplied URL is
//! only used when no bytes are attached.

use std::collections::HashMap;
use std::sync::Arc;

use pagination::{PageRequest, Paginated};
use tracing::{error, warn};

use super::business::{
    Business, BusinessId, BusinessUpdate, FeedFilters, MyBusinessesFilter, NewBusiness,
};
use super::error::DomainError;
use super::ports::{
    BusinessRepository, BusinessRepositoryError, ImageUpload, ObjectStorage, StorageError,
    UserRepository,
};
use super::user::{OwnerSummary, UserId};

/// Folder under which listing images are published.
const BUSINESS_IMAGE_FOLDER: &str = "business_images";

/// Input for creating a listing.
#[derive(Debug, Clone)]
pub struct AddBusinessRequest {
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
    /// Attached image bytes to publish.
    pub image: Option<ImageUpload>,
}

/// Input for updating a listing.
#[derive(Debug, Clone, Default)]
pub struct UpdateBusinessRequest {
    /// Field changes; absent fields are left untouched.
    pub changes: BusinessUpdate,
    /// Attached replacement image bytes.
    pub image: Option<ImageUpload>,
}

/// A feed item: the listing plus a condensed owner summary.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    /// The listing itself, decorated with interaction state.
    pub business: Business,
    /// Owner details, absent if the owner row has vanished.
    pub owner: Option<OwnerSummary>,
}

/// Use cases around business listings.
#[derive(Clone)]
pub struct BusinessService {
    businesses: Arc<dyn BusinessRepository>,
    users: Arc<dyn UserRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl BusinessService {
    /// Wire the service to its ports.
    pub fn new(
        businesses: Arc<dyn BusinessRepository>,
        users: Arc<dyn UserRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            businesses,
            users,
            storage,
        }
    }

    /// Create a listing, publishing the attached image first.
    pub async fn add(
        &self,
        owner: UserId,
        request: AddBusinessRequest,
    ) -> Result<Business, DomainError> {
        let image_url = match &request.image {
            Some(image) => Some(self.publish_image(image).await?),
            None => request.image_url.clone(),
        };

        let data = NewBusiness {
            owner_id: owner,
            name: request.name,
            description: request.description,
            investment: request.investment,
            profit_percentage: request.profit_percentage,
            category_id: request.category_id,
            municipality_id: request.municipality_id,
            business_model: request.business_model,
            monthly_income: request.monthly_income,
            image_url,
        };
        data.validate()
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;

        self.businesses
            .create(&data)
            .await
            .map_err(map_business_repository_error)
    }

    /// Update a listing. A request with no changed fields and no new
    /// image short-circuits to re-fetching the current entity.
    pub async fn update(
        &self,
        id: &BusinessId,
        owner: &UserId,
        request: UpdateBusinessRequest,
    ) -> Result<Business, DomainError> {
        let mut changes = request.changes;
        if let Some(image) = &request.image {
            changes.image_url = Some(self.publish_image(image).await?);
        }

        if changes.is_empty() {
            warn!(business_id = %id, "update requested with no changes");
            return self.detail(id, Some(owner)).await;
        }

        changes
            .validate()
            .map_err(|err| DomainError::invalid_request(err.to_string()))?;

        self.businesses
            .update(id, owner, &changes)
            .await
            .map_err(map_business_repository_error)
    }

    /// Delete a listing; `false` means not found or not owned.
    pub async fn delete(&self, id: &BusinessId, owner: &UserId) -> Result<bool, DomainError> {
        self.businesses
            .delete(id, owner)
            .await
            .map_err(map_business_repository_error)
    }

    /// Fetch one listing, decorated for the requester when known.
    pub async fn detail(
        &self,
        id: &BusinessId,
        requester: Option<&UserId>,
    ) -> Result<Business, DomainError> {
        self.businesses
            .find_by_id(id, requester)
            .await
            .map_err(map_business_repository_error)
    }

    /// Listings related to the user through the selected relation.
    pub async fn mine(
        &self,
        user: &UserId,
        filter: MyBusinessesFilter,
    ) -> Result<Vec<Business>, DomainError> {
        let result = match filter {
            MyBusinessesFilter::Owned => self.businesses.list_by_owner(user).await,
            MyBusinessesFilter::Partnered => self.businesses.list_partnered(user).await,
            MyBusinessesFilter::Saved => self.businesses.list_saved(user).await,
        };
        result.map_err(map_business_repository_error)
    }

    /// Register partnership interest; repeated interest stays a success.
    pub async fn associate(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, DomainError> {
        self.businesses
            .initiate_partnership(user, business)
            .await
            .map_err(map_business_repository_error)
    }

    /// Flip the saved relation and report the new state.
    pub async fn toggle_save(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, DomainError> {
        self.businesses
            .toggle_save(user, business)
            .await
            .map_err(map_business_repository_error)
    }

    /// Flip the liked relation and report the new state.
    pub async fn toggle_like(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, DomainError> {
        self.businesses
            .toggle_like(user, business)
            .await
            .map_err(map_business_repository_error)
    }

    /// Paginated feed with owner summaries batched in one lookup.
    pub async fn feed(
        &self,
        filters: &FeedFilters,
        page: &PageRequest,
        requester: Option<&UserId>,
    ) -> Result<Paginated<FeedItem>, DomainError> {
        let businesses = self
            .businesses
            .feed(filters, page, requester)
            .await
            .map_err(map_business_repository_error)?;

        let mut owner_ids: Vec<UserId> = Vec::new();
        for item in &businesses.items {
            if !owner_ids.contains(&item.owner_id) {
                owner_ids.push(item.owner_id.clone());
            }
        }

        let owners: HashMap<UserId, OwnerSummary> = self
            .users
            .find_by_ids(&owner_ids)
            .await
            .map_err(|err| {
                error!(error = %err, "owner lookup for feed failed");
                DomainError::internal("failed to resolve listing owners")
            })?
            .iter()
            .map(|user| (user.id.clone(), OwnerSummary::from(user)))
            .collect();

        Ok(businesses.map(|business| {
            let owner = owners.get(&business.owner_id).cloned();
            FeedItem { business, owner }
        }))
    }

    async fn publish_image(&self, image: &ImageUpload) -> Result<String, DomainError> {
        self.storage
            .upload(BUSINESS_IMAGE_FOLDER, image)
            .await
            .map_err(map_storage_error)
    }
}

/// Map adapter failures onto the domain error taxonomy.
pub(crate) fn map_business_repository_error(error: BusinessRepositoryError) -> DomainError {
    match error {
        BusinessRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("business {id} not found"))
        }
        BusinessRepositoryError::NotOwner {
            user_id,
            business_id,
        } => DomainError::forbidden(format!(
            "user {user_id} is not authorised to modify business {business_id}"
        )),
        BusinessRepositoryError::Stale { id } => {
            DomainError::conflict(format!("update affected no rows for business {id}"))
        }
        BusinessRepositoryError::Connection { message }
        | BusinessRepositoryError::Query { message } => {
            error!(error = %message, "business repository failure");
            DomainError::internal("database error")
        }
    }
}

/// Map storage failures onto the domain error taxonomy.
pub(crate) fn map_storage_error(error: StorageError) -> DomainError {
    let StorageError::Upload { message } = error;
    error!(error = %message, "image upload failed");
    DomainError::storage("image upload failed")
}
