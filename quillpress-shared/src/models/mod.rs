/// Database models for Quillpress
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `post`: Blog posts with slugs, categories, and tags
/// - `category`: Post categories (unique name + slug)
/// - `tag`: Post tags (unique name + slug)
/// - `comment`: Per-post comments
/// - `like`: Per-user post likes, at most one per (post, user)
/// - `revoked_token`: Refresh-token revocation ledger
///
/// # Example
///
/// ```no_run
/// use quillpress_shared::models::user::{CreateUser, User};
/// use quillpress_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "jdoe".to_string(),
///     email: "jdoe@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod revoked_token;
pub mod tag;
pub mod user;
