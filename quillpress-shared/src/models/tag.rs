/// Tag model and database operations
///
/// Tags attach to posts many-to-many through the post_tags join table.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tag record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID
    pub id: Uuid,

    /// Display name (unique)
    pub name: String,

    /// URL-friendly identifier (unique)
    pub slug: String,
}

/// Input for creating a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Creates a new tag
    ///
    /// # Errors
    ///
    /// Returns an error if the name or slug already exists.
    pub async fn create(pool: &PgPool, data: CreateTag) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .fetch_one(pool)
        .await
    }

    /// Lists all tags, alphabetically
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Lists the tags attached to a post
    pub async fn list_for_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.slug
            FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Checks whether a tag with this name or slug already exists
    pub async fn name_or_slug_exists(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tags WHERE name = $1 OR slug = $2)")
            .bind(name)
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Counts how many of the given tag IDs exist
    ///
    /// Used to validate a post's tag_ids before attaching them.
    pub async fn count_existing(pool: &PgPool, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(pool)
            .await
    }
}
