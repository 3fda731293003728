/// Refresh-token revocation flow
///
/// Revocation ("logout") permanently invalidates a refresh token by
/// recording its jti in the [`crate::models::revoked_token`] ledger.
///
/// Every token-shaped failure on the way (bad signature, expired, wrong
/// token type, jti already present in the ledger) collapses into the single
/// [`RevocationError::InvalidOrExpired`] error. Callers cannot tell a
/// garbage token from an already-revoked one, and revoking the same token
/// twice FAILS rather than succeeding idempotently. This ambiguity is a
/// deliberate choice (no oracle for token probing) and must not be refined.

use sqlx::PgPool;

use super::jwt::{self, Claims};
use crate::models::revoked_token::RevokedToken;

/// Error type for revocation and refresh-verification
#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    /// The uniform verification failure: malformed, expired, wrong type,
    /// or already revoked, indistinguishable by design
    #[error("Invalid or expired token.")]
    InvalidOrExpired,

    /// Store failure unrelated to the token itself
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Revokes a refresh token
///
/// Structurally verifies the token, then appends its jti to the ledger.
///
/// # Errors
///
/// `InvalidOrExpired` for every token-shaped failure, including a repeat
/// revocation (the jti primary key rejects the second insert).
pub async fn revoke_refresh_token(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<(), RevocationError> {
    let claims = jwt::validate_refresh_token(token, secret)
        .map_err(|_| RevocationError::InvalidOrExpired)?;

    RevokedToken::insert(pool, claims.jti, claims.sub, claims.expires_at())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RevocationError::InvalidOrExpired
            }
            other => RevocationError::Database(other),
        })?;

    Ok(())
}

/// Verifies a refresh token against signature, expiry, and the ledger
///
/// This is the full check the refresh endpoint runs before minting a new
/// access token.
///
/// # Errors
///
/// `InvalidOrExpired` when the token fails structural validation or its jti
/// has been revoked.
pub async fn verify_refresh_token(
    pool: &PgPool,
    token: &str,
    secret: &str,
) -> Result<Claims, RevocationError> {
    let claims = jwt::validate_refresh_token(token, secret)
        .map_err(|_| RevocationError::InvalidOrExpired)?;

    if RevokedToken::is_revoked(pool, claims.jti).await? {
        return Err(RevocationError::InvalidOrExpired);
    }

    Ok(claims)
}
