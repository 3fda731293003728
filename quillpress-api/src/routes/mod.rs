/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout, profile, token refresh
/// - `posts`: Post CRUD with slug addressing and visibility rules
/// - `comments`: Per-post comments
/// - `likes`: Like/unlike
/// - `categories`: Category list/create
/// - `tags`: Tag list/create

pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod likes;
pub mod posts;
pub mod tags;
