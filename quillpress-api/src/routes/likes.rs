/// Like endpoints
///
/// # Endpoints
///
/// - `POST /api/posts/:slug/like` - Like a post (requires auth)
/// - `POST /api/posts/:slug/unlike` - Remove a like (requires auth)
///
/// Both are idempotent: liking twice leaves one like, unliking a post that
/// was never liked succeeds quietly. The (post, user) primary key backs the
/// at-most-one invariant.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extractors::CurrentUser,
};
use axum::{
    extract::{Path, State},
    Json,
};
use quillpress_shared::models::{like::Like, post::Post};
use serde::{Deserialize, Serialize};

/// Like/unlike confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Like a post
pub async fn like_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    Like::like(&state.db, post.id, auth.user_id).await?;

    Ok(Json(LikeResponse {
        message: "Post liked".to_string(),
    }))
}

/// Remove a like from a post
pub async fn unlike_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeResponse>> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    Like::unlike(&state.db, post.id, auth.user_id).await?;

    Ok(Json(LikeResponse {
        message: "Post unliked".to_string(),
    }))
}
