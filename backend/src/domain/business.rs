//! Business listing data model.
//!
//! A business is created by its owner, mutated and deleted only by its
//! owner, and interacted with (liked, saved, partnered) by any
//! authenticated user. Monetary fields are validated non-negative at the
//! domain boundary so adapters never have to re-check them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors for business identifiers and payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessValidationError {
    /// The identifier was empty.
    #[error("business id must not be empty")]
    EmptyId,
    /// The identifier did not parse as a UUID.
    #[error("business id must be a valid UUID")]
    InvalidId,
    /// The listing name was blank.
    #[error("business name must not be empty")]
    EmptyName,
    /// A monetary or percentage field was negative.
    #[error("{field} must not be negative")]
    NegativeAmount {
        /// Which field failed the check.
        field: &'static str,
    },
}

/// Stable business identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessId(Uuid, String);

impl BusinessId {
    /// Validate and construct a [`BusinessId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, BusinessValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`BusinessId`].
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

    fn from_owned(id: String) -> Result<Self, BusinessValidationError> {
        if id.is_empty() {
            return Err(BusinessValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(&id).map_err(|_| BusinessValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for BusinessId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<BusinessId> for String {
    fn from(value: BusinessId) -> Self {
        let BusinessId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for BusinessId {
    type Error = BusinessValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Requester-relative state and aggregate counts attached to read models.
///
/// All fields are optional: list operations omit them, single-business
/// reads populate the counts for everyone and the flags only when a
/// requesting user is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Whether the requesting user has saved the listing.
    pub is_saved: Option<bool>,
    /// Whether the requesting user has liked the listing.
    pub is_liked: Option<bool>,
    /// How many users have saved the listing.
    pub saved_count: Option<u64>,
    /// How many users have liked the listing.
    pub like_count: Option<u64>,
}

impl InteractionState {
    /// State for listings fetched through the "saved" relation, where the
    /// query predicate itself proves `is_saved`.
    #[must_use]
    pub const fn saved() -> Self {
        Self {
            is_saved: Some(true),
            is_liked: None,
            saved_count: None,
            like_count: None,
        }
    }
}

/// A business listing as read from persistence.
///
/// ## Invariants
/// - `owner_id` never changes after creation.
/// - `investment`, `profit_percentage` and `monthly_income` are never
///   negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Business {
    /// Listing identifier.
    pub id: BusinessId,
    /// Owning user; immutable after creation.
    pub owner_id: UserId,
    /// Listing name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Capital required to join, non-negative.
    pub investment: f64,
    /// Offered profit share, non-negative.
    pub profit_percentage: f64,
    /// Reference to a static category.
    pub category_id: i32,
    /// Reference to a static municipality code.
    pub municipality_id: String,
    /// Free-text description of the business model.
    pub business_model: String,
    /// Reported monthly income, non-negative.
    pub monthly_income: f64,
    /// Public image URL, when one was uploaded or supplied.
    pub image_url: Option<String>,
    /// Requester-relative decoration; empty for plain list reads.
    pub interaction: InteractionState,
    /// Creation timestamp, immutable once set.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a business.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBusiness {
    /// Creating user, recorded as the immutable owner.
    pub owner_id: UserId,
    /// Listing name, non-blank.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Capital required to join, non-negative.
    pub investment: f64,
    /// Offered profit share, non-negative.
    pub profit_percentage: f64,
    /// Reference to a static category.
    pub category_id: i32,
    /// Reference to a static municipality code.
    pub municipality_id: String,
    /// Free-text description of the business model.
    pub business_model: String,
    /// Reported monthly income, non-negative.
    pub monthly_income: f64,
    /// Image URL assigned after upload, when present.
    pub image_url: Option<String>,
}

impl NewBusiness {
    /// Check the payload's invariants before it reaches a repository.
    pub fn validate(&self) -> Result<(), BusinessValidationError> {
        if self.name.trim().is_empty() {
            return Err(BusinessValidationError::EmptyName);
        }
        ensure_non_negative("investment", self.investment)?;
        ensure_non_negative("profit percentage", self.profit_percentage)?;
        ensure_non_negative("monthly income", self.monthly_income)
    }
}

/// Partial update payload; only present fields reach the SET clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessUpdate {
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
    /// Replacement image URL.
    pub image_url: Option<String>,
    /// Replacement monthly income.
    pub monthly_income: Option<f64>,
}

impl BusinessUpdate {
    /// Whether the payload carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.investment.is_none()
            && self.profit_percentage.is_none()
            && self.category_id.is_none()
            && self.municipality_id.is_none()
            && self.business_model.is_none()
            && self.image_url.is_none()
            && self.monthly_income.is_none()
    }

    /// Check the invariants of whichever fields are present.
    pub fn validate(&self) -> Result<(), BusinessValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(BusinessValidationError::EmptyName);
            }
        }
        if let Some(value) = self.investment {
            ensure_non_negative("investment", value)?;
        }
        if let Some(value) = self.profit_percentage {
            ensure_non_negative("profit percentage", value)?;
        }
        if let Some(value) = self.monthly_income {
            ensure_non_negative("monthly income", value)?;
        }
        Ok(())
    }
}

/// Recognised feed filters; absent values leave the WHERE clause alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedFilters {
    /// Exact category match.
    pub category_id: Option<i32>,
    /// Upper bound on the required investment.
    pub max_investment: Option<f64>,
    /// Reserved for geo-filtering; accepted but not applied yet.
    pub nearby: bool,
}

/// Relation selecting which of "my" businesses to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyBusinessesFilter {
    /// Listings the user created.
    Owned,
    /// Listings the user registered partnership interest in.
    Partnered,
    /// Listings the user saved.
    Saved,
}

impl MyBusinessesFilter {
    /// Parse a query-string value, falling back to [`Self::Owned`] for
    /// missing or unrecognised input.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("PARTNERED") => Self::Partnered,
            Some("SAVED") => Self::Saved,
            Some("OWNED") | None => Self::Owned,
            Some(other) => {
                tracing::warn!(filter = other, "unrecognised mine filter, defaulting to OWNED");
                Self::Owned
            }
        }
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), BusinessValidationError> {
    if value < 0.0 {
        return Err(BusinessValidationError::NegativeAmount { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn new_business() -> NewBusiness {
        NewBusiness {
            owner_id: UserId::random(),
            name: "Roastery".to_owned(),
            description: "Small-batch coffee roastery".to_owned(),
            investment: 25_000.0,
            profit_percentage: 12.5,
            category_id: 3,
            municipality_id: "014".to_owned(),
            business_model: "Wholesale supply to cafés".to_owned(),
            monthly_income: 4_000.0,
            image_url: None,
        }
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("   ")]
    fn malformed_ids_are_rejected(#[case] raw: &str) {
        BusinessId::new(raw).expect_err("malformed id must fail");
    }

    #[rstest]
    fn id_round_trips_through_string() {
        let id = BusinessId::random();
        let raw = id.to_string();
        let reparsed = BusinessId::new(&raw).expect("generated ids reparse");
        assert_eq!(reparsed, id);
    }

    #[rstest]
    fn valid_creation_payload_passes() {
        new_business().validate().expect("valid payload");
    }

    #[rstest]
    fn blank_name_is_rejected() {
        let mut payload = new_business();
        payload.name = "  ".to_owned();
        assert_eq!(
            payload.validate().expect_err("blank name must fail"),
            BusinessValidationError::EmptyName
        );
    }

    #[rstest]
    fn negative_investment_is_rejected() {
        let mut payload = new_business();
        payload.investment = -1.0;
        assert_eq!(
            payload.validate().expect_err("negative amount must fail"),
            BusinessValidationError::NegativeAmount {
                field: "investment"
            }
        );
    }

    #[rstest]
    fn empty_update_reports_empty() {
        assert!(BusinessUpdate::default().is_empty());
        let update = BusinessUpdate {
            name: Some("New name".to_owned()),
            ..BusinessUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[rstest]
    fn update_validates_present_fields_only() {
        let update = BusinessUpdate {
            monthly_income: Some(-5.0),
            ..BusinessUpdate::default()
        };
        assert_eq!(
            update.validate().expect_err("negative income must fail"),
            BusinessValidationError::NegativeAmount {
                field: "monthly income"
            }
        );
        BusinessUpdate::default().validate().expect("empty update is valid");
    }

    #[rstest]
    #[case(None, MyBusinessesFilter::Owned)]
    #[case(Some("OWNED"), MyBusinessesFilter::Owned)]
    #[case(Some("PARTNERED"), MyBusinessesFilter::Partnered)]
    #[case(Some("SAVED"), MyBusinessesFilter::Saved)]
    #[case(Some("bogus"), MyBusinessesFilter::Owned)]
    fn mine_filter_parses_with_default(
        #[case] raw: Option<&str>,
        #[case] expected: MyBusinessesFilter,
    ) {
        assert_eq!(MyBusinessesFilter::from_query(raw), expected);
    }
}
