//! Composition root: builds the adapters and services the HTTP layer
//! depends on.
//!
//! Everything is constructed exactly once at process start and shared by
//! reference; handlers never reconstruct a dependency.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{AuthService, BusinessService, UserService};
use crate::inbound::http::HttpState;
use crate::outbound::persistence::{
    DbPool, DieselBusinessRepository, DieselCredentialRepository, DieselLocationRepository,
    DieselUserRepository,
};
use crate::outbound::storage::HttpObjectStorage;
use crate::outbound::{Argon2CredentialHasher, JwtTokenIssuer};

use super::config::AppConfig;

/// Wire the production adapters into the HTTP dependency bundle.
pub fn build_http_state(pool: &DbPool, config: &AppConfig) -> HttpState {
    let business_repository = Arc::new(DieselBusinessRepository::new(pool.clone()));
    let user_repository = Arc::new(DieselUserRepository::new(pool.clone()));
    let credential_repository = Arc::new(DieselCredentialRepository::new(pool.clone()));
    let location_repository = Arc::new(DieselLocationRepository::new(pool.clone()));

    let storage = Arc::new(HttpObjectStorage::new(config.storage_base_url.clone()));
    let tokens = Arc::new(JwtTokenIssuer::new(
        config.jwt_secret.as_bytes(),
        Duration::from_secs(config.jwt_ttl_secs),
    ));
    let hasher = Arc::new(Argon2CredentialHasher);

    HttpState::new(
        AuthService::new(
            credential_repository,
            user_repository.clone(),
            hasher,
            tokens.clone(),
        ),
        BusinessService::new(
            business_repository,
            user_repository.clone(),
            storage.clone(),
        ),
        UserService::new(user_repository, storage),
        location_repository,
        tokens,
    )
}
