/// Post model and database operations
///
/// Posts are the central entity: owned by an author, optionally categorized,
/// tagged many-to-many, and addressed externally by their unique slug.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     slug VARCHAR(60) NOT NULL UNIQUE,
///     content TEXT NOT NULL,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     category_id UUID REFERENCES categories(id) ON DELETE SET NULL,
///     is_published BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The slug is written once at creation and never updated; the unique
/// constraint on it is the final guard against two concurrent creations
/// racing to the same slug.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID
    pub id: Uuid,

    /// Title as entered by the author
    pub title: String,

    /// URL-safe unique identifier, immutable once set
    pub slug: String,

    /// Body content
    pub content: String,

    /// Owning author
    pub author_id: Uuid,

    /// Optional category (NULL after category deletion)
    pub category_id: Option<Uuid>,

    /// Draft posts are visible only to their author
    pub is_published: bool,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Post row joined with author and counters, as served by list/detail reads
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostWithMeta {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    /// Username of the owning author
    pub author_username: String,
    pub category_id: Option<Uuid>,
    /// Category name when a category is set
    pub category_name: Option<String>,
    /// Category slug when a category is set
    pub category_slug: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Total likes on this post
    pub likes_count: i64,
    /// Total comments on this post
    pub comments_count: i64,
}

/// Input for creating a new post
///
/// The slug must already have been produced by the slug generator; posts are
/// never inserted without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
}

/// Input for updating a post
///
/// Only non-None fields are written. The slug is deliberately absent: it is
/// immutable for the life of the post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Some(None) clears the category
    pub category_id: Option<Option<Uuid>>,
    pub is_published: Option<bool>,
}

/// Filters for the published-post listing
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Only posts in the category with this slug
    pub category_slug: Option<String>,

    /// Only posts carrying the tag with this slug
    pub tag_slug: Option<String>,

    /// Case-insensitive substring match against title or content
    pub search: Option<String>,
}

const POST_WITH_META_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.content, p.author_id,
           u.username AS author_username,
           p.category_id, c.name AS category_name, c.slug AS category_slug,
           p.is_published, p.created_at, p.updated_at,
           (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
           (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comments_count
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl Post {
    /// Creates a new post
    ///
    /// # Errors
    ///
    /// Returns an error on a slug collision (unique constraint violation,
    /// the race-window backstop) or when the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (title, slug, content, author_id, category_id, is_published)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, slug, content, author_id, category_id, is_published,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.slug)
        .bind(data.content)
        .bind(data.author_id)
        .bind(data.category_id)
        .bind(data.is_published)
        .fetch_one(pool)
        .await
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, slug, content, author_id, category_id, is_published,
                   created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a post by slug
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, slug, content, author_id, category_id, is_published,
                   created_at, updated_at
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    /// Checks whether a slug is already in use
    ///
    /// Consulted by the slug generator on every attempt; the unique
    /// constraint still covers the window between check and insert.
    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Loads a single post with author/category/counter metadata
    pub async fn find_with_meta(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PostWithMeta>, sqlx::Error> {
        let query = format!("{} WHERE p.slug = $1", POST_WITH_META_SELECT);

        sqlx::query_as::<_, PostWithMeta>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Lists published posts, newest first, with optional filters
    pub async fn list_published(
        pool: &PgPool,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostWithMeta>, sqlx::Error> {
        let (clause, binds) = filter_clause(filter);
        let query = format!(
            "{} WHERE p.is_published = TRUE{} ORDER BY p.created_at DESC LIMIT ${} OFFSET ${}",
            POST_WITH_META_SELECT,
            clause,
            binds + 1,
            binds + 2,
        );

        let mut q = sqlx::query_as::<_, PostWithMeta>(&query);
        if let Some(ref category_slug) = filter.category_slug {
            q = q.bind(category_slug);
        }
        if let Some(ref tag_slug) = filter.tag_slug {
            q = q.bind(tag_slug);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Counts published posts matching the filters
    pub async fn count_published(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
        let (clause, _) = filter_clause(filter);
        let query = format!(
            "SELECT COUNT(*) FROM posts p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.is_published = TRUE{}",
            clause,
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(ref category_slug) = filter.category_slug {
            q = q.bind(category_slug);
        }
        if let Some(ref tag_slug) = filter.tag_slug {
            q = q.bind(tag_slug);
        }
        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }

        q.fetch_one(pool).await
    }

    /// Lists all posts by an author, drafts included, newest first
    pub async fn list_by_author(
        pool: &PgPool,
        author_id: Uuid,
    ) -> Result<Vec<PostWithMeta>, sqlx::Error> {
        let query = format!(
            "{} WHERE p.author_id = $1 ORDER BY p.created_at DESC",
            POST_WITH_META_SELECT,
        );

        sqlx::query_as::<_, PostWithMeta>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Updates a post; the slug is never touched
    ///
    /// Returns the updated post, or None if it no longer exists.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePost,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE posts SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.content.is_some() {
            bind_count += 1;
            query.push_str(&format!(", content = ${}", bind_count));
        }
        if data.category_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category_id = ${}", bind_count));
        }
        if data.is_published.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_published = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, slug, content, author_id, category_id, \
             is_published, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Post>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(content) = data.content {
            q = q.bind(content);
        }
        if let Some(category_id) = data.category_id {
            q = q.bind(category_id);
        }
        if let Some(is_published) = data.is_published {
            q = q.bind(is_published);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a post; comments and likes cascade
    ///
    /// Returns true if the post existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replaces the post's tag set
    pub async fn set_tags(pool: &PgPool, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }
}

/// Builds the extra WHERE clauses for a published-post listing.
///
/// Returns the clause text and the number of binds it consumes; the caller
/// appends its own binds after them.
fn filter_clause(filter: &PostFilter) -> (String, usize) {
    let mut clause = String::new();
    let mut binds = 0;

    if filter.category_slug.is_some() {
        binds += 1;
        clause.push_str(&format!(" AND c.slug = ${}", binds));
    }
    if filter.tag_slug.is_some() {
        binds += 1;
        clause.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = p.id AND t.slug = ${})",
            binds
        ));
    }
    if filter.search.is_some() {
        binds += 1;
        clause.push_str(&format!(
            " AND (p.title ILIKE ${n} OR p.content ILIKE ${n})",
            n = binds
        ));
    }

    (clause, binds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_post_default_is_empty() {
        let update = UpdatePost::default();
        assert!(update.title.is_none());
        assert!(update.content.is_none());
        assert!(update.category_id.is_none());
        assert!(update.is_published.is_none());
    }

    #[test]
    fn test_filter_clause_counts_binds() {
        let empty = PostFilter::default();
        assert_eq!(filter_clause(&empty), (String::new(), 0));

        let full = PostFilter {
            category_slug: Some("tech".to_string()),
            tag_slug: Some("rust".to_string()),
            search: Some("hello".to_string()),
        };
        let (clause, binds) = filter_clause(&full);
        assert_eq!(binds, 3);
        assert!(clause.contains("c.slug = $1"));
        assert!(clause.contains("t.slug = $2"));
        assert!(clause.contains("ILIKE $3"));
    }
}
