//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they
//! only depend on domain services and the token port, and remain testable
//! without I/O. The bundle is built once by the composition root at
//! process start; nothing here is reconstructed per request.

use std::sync::Arc;

use crate::domain::ports::{LocationRepository, TokenIssuer};
use crate::domain::{AuthService, BusinessService, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration and login flows.
    pub auth: AuthService,
    /// Business listing use cases.
    pub businesses: BusinessService,
    /// Profile use cases.
    pub users: UserService,
    /// Static reference data reads.
    pub locations: Arc<dyn LocationRepository>,
    /// Bearer-token verification for the auth extractors.
    pub tokens: Arc<dyn TokenIssuer>,
}

impl HttpState {
    /// Bundle the services and ports handlers need.
    pub fn new(
        auth: AuthService,
        businesses: BusinessService,
        users: UserService,
        locations: Arc<dyn LocationRepository>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            auth,
            businesses,
            users,
            locations,
            tokens,
        }
    }
}
