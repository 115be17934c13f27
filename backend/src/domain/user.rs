//! User data model.
//!
//! The password hash is deliberately absent from [`User`]; it only exists
//! inside the authentication boundary (see `CredentialRepository`).

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors for user identifiers and payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier did not parse as a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The email address failed the shape check.
    #[error("email address must contain '@'")]
    InvalidEmail,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address with the minimal shape check applied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if !trimmed.contains('@') || trimmed.is_empty() {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user profile.
///
/// ## Invariants
/// - `email` is unique across users.
/// - Location references (`country_id`, `state_id`, `municipality_id`) and
///   `birth_date` are immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique login address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Date of birth captured at registration.
    pub birth_date: Option<NaiveDate>,
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
    /// Instagram handle without the leading `@`.
    pub instagram_handle: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Refreshed on profile mutation.
    pub updated_at: DateTime<Utc>,
}

/// Profile data captured at registration, handed to the auth boundary
/// together with a separately supplied password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// Unique login address.
    pub email: EmailAddress,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Registration country reference.
    pub country_id: String,
    /// Registration state reference.
    pub state_id: String,
    /// Registration municipality reference.
    pub municipality_id: String,
}

/// Partial profile update; only present fields reach the SET clause.
///
/// Location references and the birth date are immutable and therefore
/// absent here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfileUpdate {
    /// Replacement given name.
    pub first_name: Option<String>,
    /// Replacement family name.
    pub last_name: Option<String>,
    /// Replacement profile image URL.
    pub profile_image_url: Option<String>,
    /// Replacement biography.
    pub biography: Option<String>,
    /// Replacement LinkedIn URL.
    pub linkedin_profile: Option<String>,
    /// Replacement Instagram handle.
    pub instagram_handle: Option<String>,
}

impl UserProfileUpdate {
    /// Whether the payload carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.profile_image_url.is_none()
            && self.biography.is_none()
            && self.linkedin_profile.is_none()
            && self.instagram_handle.is_none()
    }
}

/// Condensed owner details attached to feed items.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    /// Owner's user id.
    pub id: UserId,
    /// Owner's given name.
    pub first_name: Option<String>,
    /// Owner's family name.
    pub last_name: Option<String>,
    /// Owner's profile image URL.
    pub profile_image_url: Option<String>,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}
