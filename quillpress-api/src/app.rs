/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router with
/// all routes and middleware.
///
/// # Route map
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register           # Create account + token pair
///     │   ├── POST /login              # Credentials → token pair
///     │   ├── POST /logout             # Revoke refresh token (auth)
///     │   ├── GET  /profile            # Current user (auth)
///     │   └── POST /refresh            # Refresh token → new access token
///     ├── /posts/
///     │   ├── GET  /                   # Published posts (filters, paging)
///     │   ├── POST /                   # Create post (auth)
///     │   ├── GET  /my-posts           # Caller's posts incl. drafts (auth)
///     │   ├── GET/PUT/DELETE /:slug    # Detail / update / delete
///     │   ├── GET/POST /:slug/comments # Comments on a post
///     │   ├── DELETE /comments/:id     # Delete own comment (auth)
///     │   ├── POST /:slug/like         # Like (auth, idempotent)
///     │   └── POST /:slug/unlike       # Unlike (auth, idempotent)
///     ├── /categories  GET/POST        # (auth)
///     └── /tags        GET/POST        # (auth)
/// ```
///
/// Authentication is declared per handler through the `CurrentUser` /
/// `MaybeUser` extractors rather than per-group middleware, because several
/// paths mix public reads with authenticated writes.
///
/// # Example
///
/// ```no_run
/// use quillpress_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use quillpress_shared::auth::jwt::TokenPolicy;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; Arc keeps it cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured token lifetime policy
    pub fn token_policy(&self) -> TokenPolicy {
        self.config.token_policy()
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/profile", get(routes::auth::profile))
        .route("/refresh", post(routes::auth::refresh));

    let post_routes = Router::new()
        .route("/", get(routes::posts::list_posts).post(routes::posts::create_post))
        .route("/my-posts", get(routes::posts::my_posts))
        .route(
            "/:slug",
            get(routes::posts::get_post)
                .put(routes::posts::update_post)
                .delete(routes::posts::delete_post),
        )
        .route(
            "/:slug/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .route("/:slug/like", post(routes::likes::like_post))
        .route("/:slug/unlike", post(routes::likes::unlike_post));

    let category_routes = Router::new().route(
        "/",
        get(routes::categories::list_categories).post(routes::categories::create_category),
    );

    let tag_routes = Router::new().route(
        "/",
        get(routes::tags::list_tags).post(routes::tags::create_tag),
    );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes)
        .nest("/categories", category_routes)
        .nest("/tags", tag_routes);

    // Permissive CORS when "*" is configured, explicit origins otherwise
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
