//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use crate::web::{auth, news};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        news::news_handler,
        news::cards_handler,
        news::refresh_handler,
        news::personalized_digest_handler,
        news::feed_handler,
        news::client_config_handler,
        news::status_handler,
        news::health_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::get_profile_handler,
        auth::update_profile_handler,
    ),
    components(
        schemas(
            news::NewsResponse,
            news::CardsResponse,
            news::RefreshResponse,
            news::PersonalizedResponse,
            news::FeedResponse,
            news::ClientConfigResponse,
            news::StatusResponse,
            news::HealthResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::ProfileUpdateRequest,
            auth::AuthResponse,
            auth::ProfileResponse,
            auth::MessageResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "News Digest API", description = "Categorized news digest with per-user interest filtering.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme referenced by the protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}
