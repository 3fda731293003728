/// Request authentication for Axum
///
/// Provides the pieces the API server's auth layers are built from:
/// bearer-token extraction, access-token validation plus user lookup, and
/// the [`AuthContext`] handlers read from request extensions.
///
/// Authentication loads the user behind the token and rejects tokens whose
/// account has been deactivated, so a token outliving its account is
/// useless even before it expires.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use quillpress_shared::auth::middleware::{authenticate, bearer_token};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, headers: HeaderMap, secret: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let token = bearer_token(&headers)?;
/// let auth = authenticate(&pool, token, secret).await?;
/// println!("request from {}", auth.username);
/// # Ok(())
/// # }
/// ```

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::User;

/// Authenticated caller, inserted into request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username, for response assembly
    pub username: String,

    /// Whether the user has author privileges
    pub is_author: bool,
}

impl AuthContext {
    /// Creates an auth context from a loaded user record
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_author: user.is_author,
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing Authorization header
    #[error("Authentication credentials were not provided")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),

    /// Token was valid but its user is gone or deactivated
    #[error("{0}")]
    InvalidUser(String),

    /// Database error during user lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidUser(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the bearer token from the Authorization header
///
/// # Errors
///
/// `MissingCredentials` when the header is absent, `InvalidFormat` when it
/// is not a Bearer token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Validates an access token and loads its user
///
/// # Errors
///
/// - `InvalidToken` when the token is malformed, expired, or not an access
///   token
/// - `InvalidUser` when the subject no longer exists or is deactivated
pub async fn authenticate(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<AuthContext, AuthError> {
    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token has expired".to_string()),
        other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
    })?;

    let user = User::find_by_id(pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AuthError::InvalidUser("User not found".to_string()))?;

    if !user.is_active {
        return Err(AuthError::InvalidUser("User account is disabled".to_string()));
    }

    Ok(AuthContext::from_user(&user))
}
