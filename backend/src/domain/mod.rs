//! Domain primitives, aggregates, ports, and use-case services.
//!
//! Types here are transport and persistence agnostic. Inbound adapters
//! parse requests into these types; outbound adapters implement the port
//! traits in [`ports`].

pub mod auth;
pub mod auth_service;
pub mod business;
pub mod business_service;
pub mod error;
pub mod location;
pub mod ports;
pub mod user;
pub mod user_service;

pub use self::auth::{AuthTokens, AuthValidationError, Credentials, Registration};
pub use self::auth_service::AuthService;
pub use self::business::{
    Business, BusinessId, BusinessUpdate, BusinessValidationError, FeedFilters, InteractionState,
    MyBusinessesFilter, NewBusiness,
};
pub use self::business_service::{
    AddBusinessRequest, BusinessService, FeedItem, UpdateBusinessRequest,
};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::location::{Category, Country, Municipality, State};
pub use self::user::{
    EmailAddress, NewUser, OwnerSummary, User, UserId, UserProfileUpdate, UserValidationError,
};
pub use self::user_service::{UpdateProfileRequest, UserService};

/// Convenient result alias for service and adapter signatures.
pub type DomainResult<T> = Result<T, DomainError>;
