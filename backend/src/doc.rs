//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! endpoint paths from the inbound layer, request/response schemas, and
//! the bearer-token security scheme. Swagger UI serves the document in
//! debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::auth::AuthTokens;
use crate::domain::{Category, Country, DomainError, ErrorCode, Municipality, State};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::businesses::{
    AddBusinessBody, BusinessResponse, FeedItemResponse, OwnerResponse, UpdateBusinessBody,
};
use crate::inbound::http::users::{UpdateProfileBody, UserResponse};

/// Enrich the generated document with the bearer security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marketplace backend API",
        description = "HTTP interface for the business marketplace mobile app."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::register,
        crate::inbound::http::businesses::feed,
        crate::inbound::http::businesses::add,
        crate::inbound::http::businesses::mine,
        crate::inbound::http::businesses::detail,
        crate::inbound::http::businesses::update,
        crate::inbound::http::businesses::remove,
        crate::inbound::http::businesses::associate,
        crate::inbound::http::businesses::toggle_save,
        crate::inbound::http::businesses::toggle_like,
        crate::inbound::http::users::me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::locations::countries,
        crate::inbound::http::locations::states,
        crate::inbound::http::locations::municipalities,
        crate::inbound::http::locations::categories,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AuthTokens,
        LoginRequest,
        RegisterRequest,
        BusinessResponse,
        OwnerResponse,
        FeedItemResponse,
        AddBusinessBody,
        UpdateBusinessBody,
        UserResponse,
        UpdateProfileBody,
        Country,
        State,
        Municipality,
        Category,
        DomainError,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "businesses", description = "Business listings and interactions"),
        (name = "users", description = "Profile operations"),
        (name = "locations", description = "Static reference data"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

/// The generated OpenAPI document.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    //! Schema registration smoke coverage.
    use super::*;

    #[test]
    fn document_registers_the_business_paths() {
        let doc = openapi();
        assert!(doc.paths.paths.contains_key("/businesses/feed"));
        assert!(doc.paths.paths.contains_key("/businesses/{id}"));
        assert!(doc.paths.paths.contains_key("/auth/login"));
    }

    #[test]
    fn document_registers_the_response_schemas() {
        let doc = openapi();
        let components = doc.components.expect("components");
        assert!(components.schemas.contains_key("BusinessResponse"));
        assert!(components.schemas.contains_key("AuthTokens"));
    }
}
