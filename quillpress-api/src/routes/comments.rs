/// Comment endpoints
///
/// # Endpoints
///
/// - `GET    /api/posts/:slug/comments` - List a post's comments
/// - `POST   /api/posts/:slug/comments` - Comment on a post (requires auth)
/// - `DELETE /api/posts/comments/:id` - Delete own comment (requires auth)
///
/// Comments hang off the post by slug; deletion is addressed by comment ID
/// and allowed to the comment's author only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extractors::CurrentUser,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use quillpress_shared::{
    auth::authorization::check_comment_owner,
    models::{
        comment::{Comment, CommentWithUser, CreateComment},
        post::Post,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create-comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
}

/// Comment as served to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    /// Comment ID
    pub id: Uuid,

    /// Username of the comment author
    pub user: String,

    /// Comment body
    pub content: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub(crate) fn from_row(row: CommentWithUser) -> Self {
        Self {
            id: row.id,
            user: row.username,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

/// List a post's comments, newest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    let comments = Comment::list_for_post(&state.db, post.id)
        .await?
        .into_iter()
        .map(CommentResponse::from_row)
        .collect();

    Ok(Json(comments))
}

/// Comment on a post
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    req.validate()?;

    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            post_id: post.id,
            user_id: auth.user_id,
            content: req.content,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            id: comment.id,
            user: auth.username,
            content: comment.content,
            created_at: comment.created_at,
        }),
    ))
}

/// Delete a comment (author only)
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    check_comment_owner(auth.user_id, &comment)?;

    Comment::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
