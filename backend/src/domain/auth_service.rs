//! Registration and login use cases.
//!
//! Credential verification never reveals whether the email or the
//! password was wrong; both paths return the same Unauthorized error.

use std::sync::Arc;

use tracing::{error, warn};

use super::auth::{AuthTokens, Credentials, Registration};
use super::error::DomainError;
use super::ports::{
    CredentialHasher, CredentialRepository, CredentialRepositoryError, TokenError, TokenIssuer,
    UserRepository,
};

/// Use cases around authentication.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialRepository>,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    /// Wire the service to its ports.
    pub fn new(
        credentials: Arc<dyn CredentialRepository>,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            credentials,
            users,
            hasher,
            tokens,
        }
    }

    /// Verify credentials and issue a token bundle.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthTokens, DomainError> {
        let Some(hash) = self
            .credentials
            .password_hash_by_email(credentials.email())
            .await
            .map_err(map_credential_repository_error)?
        else {
            warn!(email = %credentials.email(), "login attempt for unknown email");
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &hash)
            .map_err(|err| {
                error!(error = %err, "credential verification failed");
                DomainError::internal("credential verification failed")
            })?;
        if !matches {
            return Err(invalid_credentials());
        }

        let Some(user) = self.user_by_email(credentials.email()).await? else {
            // The hash row existed moments ago; treat the vanished profile
            // as a failed login rather than an internal error.
            warn!(email = %credentials.email(), "profile missing after hash lookup");
            return Err(invalid_credentials());
        };

        self.tokens.issue(&user.id).map_err(map_token_error)
    }

    async fn user_by_email(
        &self,
        email: &super::user::EmailAddress,
    ) -> Result<Option<super::user::User>, DomainError> {
        self.users.find_by_email(email).await.map_err(|err| {
            error!(error = %err, "user lookup by email failed");
            DomainError::internal("database error")
        })
    }

    /// Register a new user and auto-login.
    pub async fn register(&self, registration: &Registration) -> Result<AuthTokens, DomainError> {
        let hash = self.hasher.hash(registration.password()).map_err(|err| {
            error!(error = %err, "password hashing failed");
            DomainError::internal("password hashing failed")
        })?;

        let user = self
            .credentials
            .create_user(registration.profile(), &hash)
            .await
            .map_err(map_credential_repository_error)?;

        self.tokens.issue(&user.id).map_err(map_token_error)
    }
}

/// The one message both wrong-email and wrong-password paths share.
fn invalid_credentials() -> DomainError {
    DomainError::unauthorized("invalid credentials")
}

fn map_credential_repository_error(error: CredentialRepositoryError) -> DomainError {
    match error {
        CredentialRepositoryError::DuplicateEmail { email } => {
            DomainError::invalid_request(format!("email {email} is already registered"))
        }
        CredentialRepositoryError::Connection { message }
        | CredentialRepositoryError::Query { message } => {
            error!(error = %message, "credential repository failure");
            DomainError::internal("database error")
        }
    }
}

fn map_token_error(error: TokenError) -> DomainError {
    error!(error = %error, "token issuance failed");
    DomainError::internal("token issuance failed")
}
