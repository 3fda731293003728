/// Category model and database operations
///
/// Categories are a flat lookup table; deleting one leaves its posts
/// uncategorized (the FK is SET NULL) rather than cascading.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Category record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID
    pub id: Uuid,

    /// Display name (unique)
    pub name: String,

    /// URL-friendly identifier (unique)
    pub slug: String,
}

/// Input for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
}

impl Category {
    /// Creates a new category
    ///
    /// # Errors
    ///
    /// Returns an error if the name or slug already exists.
    pub async fn create(pool: &PgPool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(data.name)
        .bind(data.slug)
        .fetch_one(pool)
        .await
    }

    /// Finds a category by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all categories, alphabetically
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Checks whether a category with this name or slug already exists
    pub async fn name_or_slug_exists(
        pool: &PgPool,
        name: &str,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1 OR slug = $2)",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(pool)
        .await
    }
}
