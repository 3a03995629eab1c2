//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for signup, login, logout and the caller's profile.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use news_digest_core::domain::{ProfileUpdate, PublicUser, Session, User};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::bearer_token;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub interests: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub interests: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    #[schema(value_type = Object)]
    pub user: PublicUser,
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub user: PublicUser,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Unwraps a JSON body, turning malformed input into a 400 envelope.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

/// Returns the field only if it is present and not blank.
fn non_blank(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

async fn hash_password(hasher: &Argon2<'static>, password: String) -> Result<String, ApiError> {
    let hasher = hasher.clone();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
    .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a password against a stored PHC hash. Unparsable hashes never match.
async fn verify_password(password: String, stored_hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || match PasswordHash::new(&stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password is not a valid hash: {}", e);
            false
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))
}

/// Opaque bearer token: 256 random bits followed by the user id.
fn generate_token(user_id: &str) -> String {
    format!(
        "{}{}_{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple(),
        user_id
    )
}

async fn issue_session(state: &AppState, user: &User) -> Result<String, ApiError> {
    let token = generate_token(&user.id);
    state
        .sessions
        .insert(Session {
            token: token.clone(),
            user_id: user.id.clone(),
            email: user.email.clone(),
            created_at: Utc::now(),
        })
        .await?;
    Ok(token)
}

/// Loads the user behind a session, which may have been deleted since login.
pub(crate) async fn session_user(state: &AppState, session: &Session) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(&session.user_id)
        .await?
        .ok_or_else(ApiError::user_not_found)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created and logged in", body = AuthResponse),
        (status = 400, description = "Email, password, and name required"),
        (status = 409, description = "User already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let (Some(email), Some(password), Some(name)) =
        (non_blank(req.email), non_blank(req.password), non_blank(req.name))
    else {
        return Err(ApiError::Validation(
            "Email, password, and name required".to_string(),
        ));
    };

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let user = User {
        id: format!("user_{}", Uuid::new_v4().simple()),
        email,
        password: hash_password(&state.hasher, password).await?,
        name,
        interests: req.interests.unwrap_or_default(),
        created_at: Utc::now(),
    };
    let user = state.users.insert(user).await?;
    let token = issue_session(&state, &user).await?;

    info!("New user created: {}", user.email);
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: PublicUser::from(&user),
    }))
}

/// POST /api/login - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Email and password required"),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let (Some(email), Some(password)) = (non_blank(req.email), non_blank(req.password)) else {
        return Err(ApiError::Validation("Email and password required".to_string()));
    };

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = state.users.find_by_email(&email).await?;
    let stored_hash = match &user {
        Some(user) => user.password.clone(),
        None => state.decoy_hash.clone(),
    };
    let verified = verify_password(password, stored_hash).await?;
    let user = match user {
        Some(user) if verified => user,
        _ => return Err(invalid()),
    };

    let token = issue_session(&state, &user).await?;

    info!("User logged in: {}", user.email);
    Ok(Json(AuthResponse {
        success: true,
        token,
        user: PublicUser::from(&user),
    }))
}

/// POST /api/logout - Invalidate the presented token. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    security(("bearer" = []))
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        if state.sessions.remove(token).await? {
            info!("User logged out");
        }
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

/// GET /api/profile - The caller's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn get_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let user = session_user(&state, &session).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}

/// PUT /api/profile - Update the caller's name and/or interests
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = []))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    payload: Result<Json<ProfileUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let update = ProfileUpdate {
        name: req.name,
        interests: req.interests,
    };

    let user = state.users.update_profile(&session.user_id, &update).await?;

    info!("Profile updated: {}", user.email);
    Ok(Json(ProfileResponse {
        success: true,
        user: PublicUser::from(&user),
    }))
}
