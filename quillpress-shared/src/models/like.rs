/// Like model and database operations
///
/// Likes are keyed (post_id, user_id), so the table itself enforces
/// at-most-one like per user per post. Both like and unlike are idempotent
/// at this layer: re-liking hits ON CONFLICT DO NOTHING, un-liking a post
/// that was never liked deletes zero rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Like record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    /// Liked post
    pub post_id: Uuid,

    /// User who liked it
    pub user_id: Uuid,

    /// When the like was recorded
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// Records a like; a duplicate is a no-op
    ///
    /// Returns true if a new like was recorded, false if it already existed.
    pub async fn like(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a like; removing a nonexistent like is a no-op
    ///
    /// Returns true if a like was removed.
    pub async fn unlike(pool: &PgPool, post_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts likes on a post
    pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }
}
