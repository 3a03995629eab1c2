//! services/api/src/web/news.rs
//!
//! Digest endpoints: the raw digest, the card view, refresh, the personalized
//! digest, the merged feed and the service status probes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{SecondsFormat, Utc};
use news_digest_core::domain::{Digest, Session};
use news_digest_core::presentation::{feed_view, has_new_content, FeedView};
use news_digest_core::views::{
    categorized_view, personalize, CategorizedView, DigestSummary, PersonalizedDigest,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::auth::session_user;
use crate::web::middleware::current_session;
use crate::web::state::AppState;

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct NewsResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Digest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CardsResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: CategorizedView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub items_processed: usize,
    /// When the pipeline last wrote the digest.
    #[serde(rename = "digest_timestamp", skip_serializing_if = "Option::is_none")]
    pub digest_timestamp: Option<String>,
    /// When this refresh was served.
    #[serde(rename = "refresh_timestamp")]
    pub refresh_timestamp: String,
    /// Whether the digest changed since the `since` timestamp the client sent.
    pub new_content: bool,
}

#[derive(Deserialize)]
pub struct RefreshQuery {
    /// The `digest_timestamp` of the digest the client is showing.
    pub since: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PersonalizedResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: PersonalizedDigest,
}

#[derive(Serialize, ToSchema)]
pub struct FeedResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: FeedView,
}

#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    #[schema(value_type = Object)]
    pub service: Value,
    #[schema(value_type = Object)]
    pub digest: DigestSummary,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub digest_available: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ClientConfig {
    pub refresh_interval_secs: u64,
    pub suppress_while_scrolling: bool,
    pub scroll_idle_ms: u64,
}

#[derive(Serialize, ToSchema)]
pub struct ClientConfigResponse {
    pub success: bool,
    pub data: ClientConfig,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn require_digest(state: &AppState) -> Result<Digest, ApiError> {
    state
        .digests
        .load_digest()
        .await?
        .ok_or_else(ApiError::digest_not_available)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /api/news - The current digest, verbatim
#[utoipa::path(
    get,
    path = "/api/news",
    responses(
        (status = 200, description = "Current digest", body = NewsResponse),
        (status = 404, description = "No digest produced yet"),
        (status = 500, description = "Digest could not be read")
    )
)]
pub async fn news_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let digest = require_digest(&state).await?;
    info!("Loaded {} news items", digest.total_items());

    Ok(Json(NewsResponse {
        success: true,
        timestamp: digest.last_updated().map(str::to_string),
        data: digest,
    }))
}

/// GET /api/cards - The digest grouped into colored category cards
#[utoipa::path(
    get,
    path = "/api/cards",
    responses(
        (status = 200, description = "Categorized cards with stats", body = CardsResponse),
        (status = 404, description = "No digest produced yet"),
        (status = 500, description = "Digest could not be read")
    )
)]
pub async fn cards_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let digest = require_digest(&state).await?;
    let view = categorized_view(&digest);
    info!(
        "Loaded {} stories across {} categories",
        view.stats.total_stories, view.stats.total_categories
    );

    Ok(Json(CardsResponse {
        success: true,
        data: view,
        timestamp: digest.last_updated().map(str::to_string),
    }))
}

/// POST /api/refresh - Re-read the digest the pipeline last wrote
///
/// Nothing is recomputed. Clients pass the `digest_timestamp` they already
/// hold as `since` and get back whether new content arrived.
#[utoipa::path(
    post,
    path = "/api/refresh",
    params(
        ("since" = Option<String>, Query, description = "digest_timestamp the client already shows")
    ),
    responses(
        (status = 200, description = "Digest re-read", body = RefreshResponse),
        (status = 404, description = "No digest produced yet"),
        (status = 500, description = "Digest could not be read")
    )
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RefreshQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let digest = require_digest(&state).await?;
    let digest_timestamp = digest.last_updated();
    let new_content = has_new_content(query.since.as_deref(), digest_timestamp);
    info!(
        "Refresh completed, digest from {} (new content: {})",
        digest_timestamp.unwrap_or("-"),
        new_content
    );

    Ok(Json(RefreshResponse {
        success: true,
        message: "News refreshed successfully".to_string(),
        items_processed: digest.total_items(),
        digest_timestamp: digest_timestamp.map(str::to_string),
        refresh_timestamp: now_rfc3339(),
        new_content,
    }))
}

/// GET /api/personalized-digest - The digest filtered by the caller's interests
#[utoipa::path(
    get,
    path = "/api/personalized-digest",
    responses(
        (status = 200, description = "Filtered digest", body = PersonalizedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found, or no digest produced yet")
    ),
    security(("bearer" = []))
)]
pub async fn personalized_digest_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let user = session_user(&state, &session).await?;
    let digest = require_digest(&state).await?;
    let view = personalize(&digest, &user.interests);
    info!("Personalized digest for {}: {} articles", user.email, view.total_items);

    Ok(Json(PersonalizedResponse {
        success: true,
        data: view,
    }))
}

/// GET /api/feed - Every article in one list, newest first
///
/// A valid bearer token narrows the feed to the caller's interests.
#[utoipa::path(
    get,
    path = "/api/feed",
    responses(
        (status = 200, description = "Merged feed", body = FeedResponse),
        (status = 404, description = "No digest produced yet")
    )
)]
pub async fn feed_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let digest = require_digest(&state).await?;

    let interests = match current_session(&state, &headers).await? {
        Some(session) => state
            .users
            .find_by_id(&session.user_id)
            .await?
            .map(|user| user.interests)
            .unwrap_or_default(),
        None => Vec::new(),
    };
    let categories = personalize(&digest, &interests).categories;

    Ok(Json(FeedResponse {
        success: true,
        data: feed_view(&categories, digest.last_updated().unwrap_or_default()),
    }))
}

/// GET /api/client-config - Auto-refresh policy for front ends
#[utoipa::path(
    get,
    path = "/api/client-config",
    responses(
        (status = 200, description = "Refresh policy", body = ClientConfigResponse)
    )
)]
pub async fn client_config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let policy = state.config.refresh_policy;
    Json(ClientConfigResponse {
        success: true,
        data: ClientConfig {
            refresh_interval_secs: policy.interval.as_secs(),
            suppress_while_scrolling: policy.suppress_while_scrolling,
            scroll_idle_ms: policy.scroll_idle.as_millis() as u64,
        },
    })
}

/// GET /api/status - Pipeline status and digest availability
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Service status", body = StatusResponse)
    )
)]
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .digests
        .load_pipeline_status()
        .await?
        .unwrap_or_else(|| json!({"status": "unknown", "message": "Service status unavailable"}));

    let digest = state.digests.load_digest().await.unwrap_or_else(|e| {
        warn!("Reporting digest as unavailable: {}", e);
        None
    });

    Ok(Json(StatusResponse {
        service,
        digest: DigestSummary::of(digest.as_ref()),
    }))
}

/// GET /health - Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let digest_available = matches!(state.digests.load_digest().await, Ok(Some(_)));
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: now_rfc3339(),
        digest_available,
    })
}
