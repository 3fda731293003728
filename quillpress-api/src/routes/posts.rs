/// Post endpoints
///
/// # Endpoints
///
/// - `GET    /api/posts` - Published posts, newest first, with filters
/// - `POST   /api/posts` - Create a post (requires auth)
/// - `GET    /api/posts/my-posts` - Caller's posts, drafts included
/// - `GET    /api/posts/:slug` - Post detail with comments
/// - `PUT    /api/posts/:slug` - Update (owner only)
/// - `DELETE /api/posts/:slug` - Delete (owner only)
///
/// # Visibility
///
/// The listing serves published posts only. The detail endpoint serves
/// drafts to their author and answers 404 (not 403) to everyone else, so
/// a draft's existence never leaks. Writes by a non-owner are a plain 403.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    extractors::{CurrentUser, MaybeUser},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use quillpress_shared::{
    auth::authorization::{check_post_access, PostAction},
    models::{
        category::Category,
        comment::Comment,
        post::{CreatePost, Post, PostFilter, PostWithMeta, UpdatePost},
        tag::Tag,
    },
    slug::generate_unique_slug,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::comments::CommentResponse;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Create-post request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Post title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Body content
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    /// Optional category
    pub category_id: Option<Uuid>,

    /// Tags to attach
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,

    /// Publish immediately, or keep as draft (default)
    #[serde(default)]
    pub is_published: bool,
}

/// Update-post request
///
/// Absent fields are left unchanged. `category_id` distinguishes absent
/// (unchanged) from explicit null (clear the category). The slug is not
/// updatable.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<Uuid>>,

    pub tag_ids: Option<Vec<Uuid>>,

    pub is_published: Option<bool>,
}

/// Deserializes a present-but-possibly-null field into Some(inner)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    /// Filter by category slug
    pub category: Option<String>,

    /// Filter by tag slug
    pub tag: Option<String>,

    /// Case-insensitive search in title and content
    pub search: Option<String>,

    /// Page size (default 20, max 100)
    pub limit: Option<i64>,

    /// Pagination offset
    pub offset: Option<i64>,
}

/// Category as embedded in post responses
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryOut {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Tag as embedded in post responses
#[derive(Debug, Serialize, Deserialize)]
pub struct TagOut {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Post as served by list and detail endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Username of the post author
    pub author: String,
    pub category: Option<CategoryOut>,
    pub tags: Vec<TagOut>,
    pub is_published: bool,
    /// "published" or "draft", derived from is_published
    pub status: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Post detail: the post plus its comments, newest first
#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,

    pub comments: Vec<CommentResponse>,
}

/// Paginated post listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl PostResponse {
    fn from_meta(meta: PostWithMeta, tags: Vec<Tag>) -> Self {
        let category = match (meta.category_id, meta.category_name, meta.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategoryOut { id, name, slug }),
            _ => None,
        };

        Self {
            id: meta.id,
            title: meta.title,
            slug: meta.slug,
            content: meta.content,
            author: meta.author_username,
            category,
            tags: tags
                .into_iter()
                .map(|t| TagOut {
                    id: t.id,
                    name: t.name,
                    slug: t.slug,
                })
                .collect(),
            is_published: meta.is_published,
            status: if meta.is_published {
                "published".to_string()
            } else {
                "draft".to_string()
            },
            likes_count: meta.likes_count,
            comments_count: meta.comments_count,
            created_at: meta.created_at,
            updated_at: meta.updated_at,
        }
    }
}

/// Assembles the full response for one post
async fn load_post_response(state: &AppState, meta: PostWithMeta) -> ApiResult<PostResponse> {
    let tags = Tag::list_for_post(&state.db, meta.id).await?;
    Ok(PostResponse::from_meta(meta, tags))
}

/// List published posts
///
/// Anonymous and authenticated callers see the same thing: published posts
/// only, newest first. A present-but-invalid credential is still a 401.
pub async fn list_posts(
    State(state): State<AppState>,
    MaybeUser(_auth): MaybeUser,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<Json<ListPostsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let filter = PostFilter {
        category_slug: query.category,
        tag_slug: query.tag,
        search: query.search,
    };

    let total = Post::count_published(&state.db, &filter).await?;
    let metas = Post::list_published(&state.db, &filter, limit, offset).await?;

    let mut posts = Vec::with_capacity(metas.len());
    for meta in metas {
        posts.push(load_post_response(&state, meta).await?);
    }

    Ok(Json(ListPostsResponse {
        posts,
        total,
        limit,
        offset,
    }))
}

/// List the caller's own posts, drafts included
pub async fn my_posts(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let metas = Post::list_by_author(&state.db, auth.user_id).await?;

    let mut posts = Vec::with_capacity(metas.len());
    for meta in metas {
        posts.push(load_post_response(&state, meta).await?);
    }

    Ok(Json(posts))
}

/// Create a post
///
/// The slug is generated here, once, from the title; it never changes
/// afterwards.
pub async fn create_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    req.validate()?;

    if let Some(category_id) = req.category_id {
        if Category::find_by_id(&state.db, category_id).await?.is_none() {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "category_id".to_string(),
                message: "Category does not exist.".to_string(),
            }]));
        }
    }

    let tag_ids = dedupe_tag_ids(req.tag_ids);
    validate_tag_ids(&state, &tag_ids).await?;

    let slug = generate_unique_slug(&state.db, &req.title).await?;

    // Conflict here means another creation won the slug race between the
    // generator's check and this insert; the unique constraint reports it.
    let post = Post::create(
        &state.db,
        CreatePost {
            title: req.title,
            slug,
            content: req.content,
            author_id: auth.user_id,
            category_id: req.category_id,
            is_published: req.is_published,
        },
    )
    .await?;

    if !tag_ids.is_empty() {
        Post::set_tags(&state.db, post.id, &tag_ids).await?;
    }

    let meta = Post::find_with_meta(&state.db, &post.slug)
        .await?
        .ok_or_else(|| ApiError::InternalError("Post vanished after insert".to_string()))?;
    let response = load_post_response(&state, meta).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a post by slug, with its comments
pub async fn get_post(
    State(state): State<AppState>,
    MaybeUser(auth): MaybeUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostDetailResponse>> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    check_post_access(auth.as_ref().map(|a| a.user_id), &post, PostAction::Read)?;

    let meta = Post::find_with_meta(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;
    let response = load_post_response(&state, meta).await?;

    let comments = Comment::list_for_post(&state.db, post.id)
        .await?
        .into_iter()
        .map(CommentResponse::from_row)
        .collect();

    Ok(Json(PostDetailResponse {
        post: response,
        comments,
    }))
}

/// Update a post (owner only)
pub async fn update_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(slug): Path<String>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    req.validate()?;

    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    check_post_access(Some(auth.user_id), &post, PostAction::Modify)?;

    if let Some(Some(category_id)) = req.category_id {
        if Category::find_by_id(&state.db, category_id).await?.is_none() {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "category_id".to_string(),
                message: "Category does not exist.".to_string(),
            }]));
        }
    }

    let tag_ids = req.tag_ids.map(dedupe_tag_ids);
    if let Some(ref tag_ids) = tag_ids {
        validate_tag_ids(&state, tag_ids).await?;
    }

    Post::update(
        &state.db,
        post.id,
        UpdatePost {
            title: req.title,
            content: req.content,
            category_id: req.category_id,
            is_published: req.is_published,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    if let Some(ref tag_ids) = tag_ids {
        Post::set_tags(&state.db, post.id, tag_ids).await?;
    }

    let meta = Post::find_with_meta(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;
    let response = load_post_response(&state, meta).await?;

    Ok(Json(response))
}

/// Delete a post (owner only)
pub async fn delete_post(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    Path(slug): Path<String>,
) -> ApiResult<StatusCode> {
    let post = Post::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Not found.".to_string()))?;

    check_post_access(Some(auth.user_id), &post, PostAction::Modify)?;

    Post::delete(&state.db, post.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Drops duplicate tag IDs, preserving order
fn dedupe_tag_ids(tag_ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    tag_ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Rejects tag_ids that reference nonexistent tags
async fn validate_tag_ids(state: &AppState, tag_ids: &[Uuid]) -> ApiResult<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }

    let existing = Tag::count_existing(&state.db, tag_ids).await?;
    if existing as usize != tag_ids.len() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "tag_ids".to_string(),
            message: "One or more tags do not exist.".to_string(),
        }]));
    }

    Ok(())
}
