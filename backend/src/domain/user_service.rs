//! Profile read and update use cases.

use std::sync::Arc;

use tracing::error;

use super::business_service::map_storage_error;
use super::error::DomainError;
use super::ports::{ImageUpload, ObjectStorage, UserRepository, UserRepositoryError};
use super::user::{User, UserId, UserProfileUpdate};

/// Folder under which profile images are published.
const PROFILE_IMAGE_FOLDER: &str = "profile_images";

/// Input for updating the authenticated user's profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    /// Field changes; absent fields are left untouched.
    pub changes: UserProfileUpdate,
    /// Attached replacement profile image bytes.
    pub image: Option<ImageUpload>,
}

/// Use cases around the authenticated user's profile.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl UserService {
    /// Wire the service to its ports.
    pub fn new(users: Arc<dyn UserRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { users, storage }
    }

    /// Fetch the user's profile.
    pub async fn profile(&self, id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("user {id} not found")))
    }

    /// Apply a partial profile update, publishing any attached image
    /// first. A request with no changes short-circuits to a re-fetch.
    pub async fn update_profile(
        &self,
        id: &UserId,
        request: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let mut changes = request.changes;
        if let Some(image) = &request.image {
            let url = self
                .storage
                .upload(PROFILE_IMAGE_FOLDER, image)
                .await
                .map_err(map_storage_error)?;
            changes.profile_image_url = Some(url);
        }

        if changes.is_empty() {
            return self.profile(id).await;
        }

        self.users
            .update_profile(id, &changes)
            .await
            .map_err(map_user_repository_error)
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> DomainError {
    match error {
        UserRepositoryError::NotFound { id } => {
            DomainError::not_found(format!("user {id} not found"))
        }
        UserRepositoryError::Connection { message } | UserRepositoryError::Query { message } => {
            error!(error = %message, "user repository failure");
            DomainError::internal("database error")
        }
    }
}

#[cfg(test)]
mod tests {
    //! Profile flow coverage against stub ports.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::StorageError;
    use crate::domain::user::EmailAddress;

    fn sample_user(id: &UserId) -> User {
        User {
            id: id.clone(),
            email: EmailAddress::new("me@example.com").expect("valid email"),
            first_name: Some("Ada".to_owned()),
            last_name: None,
            birth_date: None,
            country_id: None,
            state_id: None,
            municipality_id: None,
            profile_image_url: None,
            biography: None,
            linkedin_profile: None,
            instagram_handle: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct StubUsers {
        user: Option<User>,
        recorded_update: Mutex<Option<UserProfileUpdate>>,
    }

    #[async_trait]
    impl UserRepository for StubUsers {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
            Ok(self.user.clone())
        }

        async fn find_by_email(
            &self,
            _email: &EmailAddress,
        ) -> Result<Option<User>, UserRepositoryError> {
            Ok(self.user.clone())
        }

        async fn find_by_ids(&self, _ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
            Ok(Vec::new())
        }

        async fn update_profile(
            &self,
            id: &UserId,
            update: &UserProfileUpdate,
        ) -> Result<User, UserRepositoryError> {
            *self.recorded_update.lock().expect("lock") = Some(update.clone());
            self.user
                .clone()
                .ok_or_else(|| UserRepositoryError::not_found(id.as_ref()))
        }
    }

    struct StubStorage;

    #[async_trait]
    impl ObjectStorage for StubStorage {
        async fn upload(&self, folder: &str, _image: &ImageUpload) -> Result<String, StorageError> {
            Ok(format!("https://cdn.example.com/{folder}/digest"))
        }
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let svc = UserService::new(Arc::new(StubUsers::default()), Arc::new(StubStorage));
        let err = svc
            .profile(&UserId::random())
            .await
            .expect_err("missing profile must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn empty_update_refetches_without_writing() {
        let id = UserId::random();
        let users = Arc::new(StubUsers {
            user: Some(sample_user(&id)),
            ..StubUsers::default()
        });
        let svc = UserService::new(users.clone(), Arc::new(StubStorage));

        let result = svc
            .update_profile(&id, UpdateProfileRequest::default())
            .await
            .expect("empty update succeeds");

        assert_eq!(result.first_name.as_deref(), Some("Ada"));
        assert!(users.recorded_update.lock().expect("lock").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn attached_image_lands_in_the_profile_image_field() {
        let id = UserId::random();
        let users = Arc::new(StubUsers {
            user: Some(sample_user(&id)),
            ..StubUsers::default()
        });
        let svc = UserService::new(users.clone(), Arc::new(StubStorage));

        svc.update_profile(
            &id,
            UpdateProfileRequest {
                changes: UserProfileUpdate::default(),
                image: Some(ImageUpload {
                    bytes: vec![9],
                    content_type: "image/png".to_owned(),
                }),
            },
        )
        .await
        .expect("update succeeds");

        let recorded = users
            .recorded_update
            .lock()
            .expect("lock")
            .clone()
            .expect("update ran");
        assert_eq!(
            recorded.profile_image_url.as_deref(),
            Some("https://cdn.example.com/profile_images/digest")
        );
    }
}
