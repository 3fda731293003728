/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Create account, returns token pair + user
/// - `POST /api/auth/login` - Credentials → token pair + user
/// - `POST /api/auth/logout` - Revoke the refresh token (requires auth)
/// - `GET  /api/auth/profile` - Current user's profile (requires auth)
/// - `POST /api/auth/refresh` - Refresh token → new access token
///
/// Token field names (`access`, `refresh`) match what clients of the
/// platform already expect.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extractors::CurrentUser,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use quillpress_shared::{
    auth::{
        jwt::{self, TokenType},
        password,
        revocation::{self, RevocationError},
    },
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name, unique
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Email address, unique case-insensitively
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for strength, never echoed back)
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Logout request
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// The refresh token to revoke
    pub refresh: Option<String>,
}

/// Refresh request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token
    pub refresh: Option<String>,
}

/// User summary returned by auth endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,

    /// Whether the user has author privileges
    pub is_author: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl UserSummary {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_author: user.is_author,
            created_at: user.created_at,
        }
    }
}

/// Token pair + user, returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Access token
    pub access: String,

    /// Refresh token
    pub refresh: String,

    /// The authenticated user
    pub user: UserSummary,
}

/// Refresh response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token
    pub access: String,
}

/// Logout (and other detail-only) response
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    /// Human-readable confirmation
    pub detail: String,
}

/// Register a new user
///
/// Creates the account and immediately returns a token pair, so clients are
/// logged in after registration.
///
/// # Errors
///
/// - `400`: validation failed (bad email, weak password, duplicate
///   username/email)
/// - `409`: a concurrent registration won the unique-constraint race
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    // Emails are stored and compared case-insensitively
    let email = req.email.to_lowercase();

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "email".to_string(),
            message: "Email already exists.".to_string(),
        }]));
    }

    if User::username_exists(&state.db, &req.username).await? {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "username".to_string(),
            message: "Username already exists.".to_string(),
        }]));
    }

    let password_hash = password::hash_password(&req.password)?;

    // The unique constraints still guard the window between the checks
    // above and this insert; a loss there surfaces as 409.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email,
            password_hash,
        },
    )
    .await?;

    let pair = jwt::issue_token_pair(user.id, &state.token_policy(), state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access: pair.access,
            refresh: pair.refresh,
            user: UserSummary::from_user(&user),
        }),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `400`: unknown email, wrong password, or deactivated account; the
///   first two share one invalid-credentials message
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials.".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::BadRequest("Invalid credentials.".to_string()));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest("User account is disabled.".to_string()));
    }

    let pair = jwt::issue_token_pair(user.id, &state.token_policy(), state.jwt_secret())?;

    Ok(Json(AuthResponse {
        access: pair.access,
        refresh: pair.refresh,
        user: UserSummary::from_user(&user),
    }))
}

/// Logout by revoking the refresh token
///
/// Requires a valid access token; the refresh token to revoke travels in
/// the body. Every token-shaped failure (malformed, expired, already
/// revoked) comes back as the same generic 400.
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<Json<DetailResponse>> {
    let refresh = req
        .refresh
        .ok_or_else(|| ApiError::BadRequest("Refresh token is required.".to_string()))?;

    revocation::revoke_refresh_token(&state.db, &refresh, state.jwt_secret())
        .await
        .map_err(|e| match e {
            RevocationError::InvalidOrExpired => ApiError::BadRequest(e.to_string()),
            RevocationError::Database(db) => db.into(),
        })?;

    Ok(Json(DetailResponse {
        detail: "Successfully logged out.".to_string(),
    }))
}

/// Current user's profile
pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> ApiResult<Json<UserSummary>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    Ok(Json(UserSummary::from_user(&user)))
}

/// Exchange a refresh token for a new access token
///
/// The refresh token is verified structurally and against the revocation
/// ledger; it is NOT rotated, and stays usable until it expires or is
/// revoked.
///
/// # Errors
///
/// - `400`: missing refresh field
/// - `401`: invalid, expired, or revoked refresh token (one generic
///   message for all three)
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let refresh = req
        .refresh
        .ok_or_else(|| ApiError::BadRequest("Refresh token is required.".to_string()))?;

    let claims = revocation::verify_refresh_token(&state.db, &refresh, state.jwt_secret())
        .await
        .map_err(|e| match e {
            RevocationError::InvalidOrExpired => ApiError::Unauthorized(e.to_string()),
            RevocationError::Database(db) => db.into(),
        })?;

    let access_claims = jwt::Claims::new(
        claims.sub,
        TokenType::Access,
        state.token_policy().access_lifetime,
    );
    let access = jwt::create_token(&access_claims, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access }))
}
