/// Comment model and database operations
///
/// Comments belong to a post and a user; deleting either cascades to the
/// comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID
    pub id: Uuid,

    /// Post this comment is on
    pub post_id: Uuid,

    /// Comment author
    pub user_id: Uuid,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// Comment row joined with its author's username, as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithUser {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    /// Username of the comment author
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

impl Comment {
    /// Creates a new comment
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(data.post_id)
        .bind(data.user_id)
        .bind(data.content)
        .fetch_one(pool)
        .await
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, user_id, content, created_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a post's comments with author usernames, newest first
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithUser>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithUser>(
            r#"
            SELECT cm.id, cm.post_id, cm.user_id, u.username, cm.content, cm.created_at
            FROM comments cm
            JOIN users u ON u.id = cm.user_id
            WHERE cm.post_id = $1
            ORDER BY cm.created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes a comment
    ///
    /// Returns true if the comment existed. Ownership is checked by the
    /// caller before this runs.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
