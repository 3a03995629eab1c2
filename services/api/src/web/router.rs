//! services/api/src/web/router.rs
//!
//! Assembles the HTTP surface: public digest and auth routes, the bearer
//! protected routes, Swagger UI, CORS and the optional static front end.

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::web::{
    auth::{
        get_profile_handler, login_handler, logout_handler, signup_handler,
        update_profile_handler,
    },
    middleware::require_auth,
    news::{
        cards_handler, client_config_handler, feed_handler, health_handler, news_handler,
        personalized_digest_handler, refresh_handler, status_handler,
    },
    rest::ApiDoc,
    state::AppState,
};

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match &config.cors_origin {
        Some(origin) => cors.allow_origin(origin.clone()).allow_credentials(true),
        None => cors.allow_origin(Any),
    }
}

/// Builds the complete application router.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let config = app_state.config.clone();

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/news", get(news_handler))
        .route("/api/cards", get(cards_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/feed", get(feed_handler))
        .route("/api/client-config", get(client_config_handler))
        .route("/api/status", get(status_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route("/health", get(health_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/api/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route("/api/personalized-digest", get(personalized_digest_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let mut app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    match &config.static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving front end from {}", dir.display());
            app = app.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => warn!("STATIC_DIR {} is not a directory, not serving it", dir.display()),
        None => {}
    }

    app.layer(cors_layer(&config))
}
