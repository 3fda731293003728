/// Tag endpoints
///
/// # Endpoints
///
/// - `GET  /api/tags` - List tags (requires auth)
/// - `POST /api/tags` - Create a tag (requires auth)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extractors::CurrentUser,
};
use axum::{extract::State, http::StatusCode, Json};
use quillpress_shared::models::tag::{CreateTag, Tag};
use serde::Deserialize;
use validator::Validate;

/// Create-tag request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Display name
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    /// URL-friendly identifier
    #[validate(length(min = 1, max = 50, message = "Slug must be 1-50 characters"))]
    pub slug: String,
}

/// List all tags
pub async fn list_tags(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(Tag::list(&state.db).await?))
}

/// Create a tag
pub async fn create_tag(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    req.validate()?;

    if Tag::name_or_slug_exists(&state.db, &req.name, &req.slug).await? {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "name".to_string(),
            message: "Tag with this name or slug already exists.".to_string(),
        }]));
    }

    let tag = Tag::create(
        &state.db,
        CreateTag {
            name: req.name,
            slug: req.slug,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}
