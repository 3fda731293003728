/// Category endpoints
///
/// # Endpoints
///
/// - `GET  /api/categories` - List categories (requires auth)
/// - `POST /api/categories` - Create a category (requires auth)
///
/// Clients provide both the display name and the slug; duplicates of either
/// are rejected up front, with the unique constraints as the race backstop.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extractors::CurrentUser,
};
use axum::{extract::State, http::StatusCode, Json};
use quillpress_shared::models::category::{Category, CreateCategory};
use serde::Deserialize;
use validator::Validate;

/// Create-category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// URL-friendly identifier
    #[validate(length(min = 1, max = 100, message = "Slug must be 1-100 characters"))]
    pub slug: String,
}

/// List all categories
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(Category::list(&state.db).await?))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    req.validate()?;

    if Category::name_or_slug_exists(&state.db, &req.name, &req.slug).await? {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "name".to_string(),
            message: "Category with this name or slug already exists.".to_string(),
        }]));
    }

    let category = Category::create(
        &state.db,
        CreateCategory {
            name: req.name,
            slug: req.slug,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}
