//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (database repositories, object storage, token issuance, credential
//! hashing). Each trait exposes strongly typed errors so adapters map
//! their failures into predictable variants instead of returning
//! `anyhow::Result`.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use thiserror::Error;

use super::auth::AuthTokens;
use super::business::{Business, BusinessId, BusinessUpdate, FeedFilters, NewBusiness};
use super::location::{Category, Country, Municipality, State};
use super::user::{EmailAddress, NewUser, User, UserId, UserProfileUpdate};

/// Failures surfaced by [`BusinessRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessRepositoryError {
    /// Repository connection could not be established.
    #[error("business repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("business repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// No business exists with the given id.
    #[error("business {id} not found")]
    NotFound {
        /// Identifier that missed.
        id: String,
    },
    /// The acting user does not own the business.
    #[error("user {user_id} is not authorised to modify business {business_id}")]
    NotOwner {
        /// Acting user.
        user_id: String,
        /// Targeted business.
        business_id: String,
    },
    /// An update matched the row but affected nothing; treated as a lost
    /// race rather than a hard database failure.
    #[error("update affected no rows for business {id}")]
    Stale {
        /// Targeted business.
        id: String,
    },
}

impl BusinessRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for missing rows.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Helper for ownership failures.
    pub fn not_owner(user_id: impl Into<String>, business_id: impl Into<String>) -> Self {
        Self::NotOwner {
            user_id: user_id.into(),
            business_id: business_id.into(),
        }
    }

    /// Helper for zero-row updates.
    pub fn stale(id: impl Into<String>) -> Self {
        Self::Stale { id: id.into() }
    }
}

/// Failures surfaced by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// No user exists with the given id.
    #[error("user {id} not found")]
    NotFound {
        /// Identifier that missed.
        id: String,
    },
}

impl UserRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for missing rows.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

/// Failures surfaced by [`CredentialRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialRepositoryError {
    /// Repository connection could not be established.
    #[error("credential repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("credential repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
    /// Another user already registered the address.
    #[error("email {email} is already registered")]
    DuplicateEmail {
        /// Conflicting address.
        email: String,
    },
}

impl CredentialRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for unique-email violations.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Failures surfaced by [`LocationRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationRepositoryError {
    /// Repository connection could not be established.
    #[error("location repository connection failed: {message}")]
    Connection {
        /// Adapter-provided detail.
        message: String,
    },
    /// Query failed during execution.
    #[error("location repository query failed: {message}")]
    Query {
        /// Adapter-provided detail.
        message: String,
    },
}

impl LocationRepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Failures surfaced by [`ObjectStorage`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The upload did not complete.
    #[error("object upload failed: {message}")]
    Upload {
        /// Adapter-provided detail.
        message: String,
    },
}

impl StorageError {
    /// Helper for upload failures.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}

/// Failures surfaced by [`TokenIssuer`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signing the token failed.
    #[error("token issuance failed: {message}")]
    Issue {
        /// Implementation-provided detail.
        message: String,
    },
    /// The presented token is expired, malformed, or mis-signed.
    #[error("token is invalid")]
    Invalid,
}

impl TokenError {
    /// Helper for signing failures.
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }
}

/// Failures surfaced by [`CredentialHasher`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialHashError {
    /// Hashing or verification failed inside the algorithm.
    #[error("credential hashing failed: {message}")]
    Hash {
        /// Implementation-provided detail.
        message: String,
    },
}

impl CredentialHashError {
    /// Helper for hashing failures.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

/// An image attachment carried from the HTTP layer to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// MIME type reported by the client.
    pub content_type: String,
}

/// Persistence port for business listings and their interactions.
#[async_trait]
pub trait BusinessRepository: Send + Sync {
    /// Persist a new listing and return it as read back, decorated for
    /// its owner (fresh listings carry zero counts and false flags).
    async fn create(&self, data: &NewBusiness) -> Result<Business, BusinessRepositoryError>;

    /// Fetch one listing, resolving counts for everyone and
    /// requester-relative flags when a requester is known.
    async fn find_by_id(
        &self,
        id: &BusinessId,
        requester: Option<&UserId>,
    ) -> Result<Business, BusinessRepositoryError>;

    /// Apply a partial update after confirming existence and ownership.
    async fn update(
        &self,
        id: &BusinessId,
        owner: &UserId,
        update: &BusinessUpdate,
    ) -> Result<Business, BusinessRepositoryError>;

    /// Delete a listing; `false` means not found or not owned.
    async fn delete(&self, id: &BusinessId, owner: &UserId)
        -> Result<bool, BusinessRepositoryError>;

    /// Listings created by the user, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Business>, BusinessRepositoryError>;

    /// Listings the user registered partnership interest in, newest
    /// interest first.
    async fn list_partnered(&self, user: &UserId)
        -> Result<Vec<Business>, BusinessRepositoryError>;

    /// Listings the user saved, newest save first; each row hard-codes
    /// `is_saved` because the relation is the query predicate.
    async fn list_saved(&self, user: &UserId) -> Result<Vec<Business>, BusinessRepositoryError>;

    /// Record partnership interest; duplicate interest is a no-op and
    /// both outcomes report `true`.
    async fn initiate_partnership(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError>;

    /// Flip the saved relation and return the resulting membership.
    async fn toggle_save(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError>;

    /// Flip the liked relation and return the resulting membership.
    async fn toggle_like(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError>;

    /// Filtered, paginated feed ordered by creation time descending.
    async fn feed(
        &self,
        filters: &FeedFilters,
        page: &PageRequest,
        requester: Option<&UserId>,
    ) -> Result<Paginated<Business>, BusinessRepositoryError>;
}

/// Persistence port for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch several users at once, for owner decoration of feed pages.
    /// Missing ids are silently absent from the result.
    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// Apply a partial profile update and return the refreshed profile.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, UserRepositoryError>;
}

/// Persistence port for the authentication boundary. The password hash
/// never crosses this boundary except through these two operations.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch only the stored hash for an address, if the user exists.
    async fn password_hash_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<String>, CredentialRepositoryError>;

    /// Create a user row from profile data plus a separately supplied
    /// hash, returning the stored profile.
    async fn create_user(
        &self,
        profile: &NewUser,
        password_hash: &str,
    ) -> Result<User, CredentialRepositoryError>;
}

/// Read-only port for static reference data.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// All countries, sorted by name.
    async fn countries(&self) -> Result<Vec<Country>, LocationRepositoryError>;

    /// States of one country, sorted by name.
    async fn states_by_country(
        &self,
        country_id: &str,
    ) -> Result<Vec<State>, LocationRepositoryError>;

    /// Municipalities of one state, sorted by name.
    async fn municipalities_by_state(
        &self,
        state_id: &str,
    ) -> Result<Vec<Municipality>, LocationRepositoryError>;

    /// All business categories, sorted by name.
    async fn categories(&self) -> Result<Vec<Category>, LocationRepositoryError>;
}

/// Capability port for publishing uploaded images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store the object under the given folder and return its public URL.
    async fn upload(&self, folder: &str, image: &ImageUpload) -> Result<String, StorageError>;
}

/// Capability port for bearer-token issuance and verification.
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token bundle for the user.
    fn issue(&self, user: &UserId) -> Result<AuthTokens, TokenError>;

    /// Verify a presented token and extract the user it was issued to.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

/// Capability port for password hashing inside the auth boundary.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, CredentialHashError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, CredentialHashError>;
}

#[cfg(test)]
mod tests {
    //! Error helper coverage.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn business_error_helpers_carry_details() {
        let err = BusinessRepositoryError::not_owner("u1", "b1");
        assert!(err.to_string().contains("u1"));
        assert!(err.to_string().contains("b1"));

        let err = BusinessRepositoryError::stale("b2");
        assert!(matches!(err, BusinessRepositoryError::Stale { .. }));
    }

    #[rstest]
    fn credential_error_distinguishes_duplicates() {
        let err = CredentialRepositoryError::duplicate_email("a@b.com");
        assert!(matches!(
            err,
            CredentialRepositoryError::DuplicateEmail { .. }
        ));
        assert!(err.to_string().contains("a@b.com"));
    }

    #[rstest]
    fn token_error_display_is_stable() {
        assert_eq!(TokenError::Invalid.to_string(), "token is invalid");
    }
}
