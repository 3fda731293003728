/// Refresh-token revocation ledger
///
/// Each row marks one refresh token (by its jti claim) as permanently
/// unusable. A refresh token is valid only while its jti is absent from this
/// table and its exp has not passed. The table is append-only from the API's
/// perspective; `purge_expired` exists because an entry whose token has
/// expired can never matter again.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE revoked_tokens (
///     jti UUID PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Revocation ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RevokedToken {
    /// jti claim of the revoked refresh token
    pub jti: Uuid,

    /// User the token was issued to
    pub user_id: Uuid,

    /// The token's natural expiry (entries past this are purgeable)
    pub expires_at: DateTime<Utc>,

    /// When the revocation was recorded
    pub revoked_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Inserts a revocation entry
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the jti is already
    /// revoked; the revocation flow folds that into its single generic
    /// error, so revoking twice does NOT succeed idempotently.
    pub async fn insert(
        pool: &PgPool,
        jti: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, RevokedToken>(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING jti, user_id, expires_at, revoked_at
            "#,
        )
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Checks whether a jti has been revoked
    ///
    /// Single-row existence probe, consulted on every refresh attempt.
    pub async fn is_revoked(pool: &PgPool, jti: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
            .bind(jti)
            .fetch_one(pool)
            .await
    }

    /// Deletes ledger entries whose token has expired anyway
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
