/// Integration tests for slug generation and the revocation ledger
///
/// These exercise the store-backed halves of the two stateful components:
/// slug uniqueness against real rows, and ledger insert/lookup/purge.
/// Requires DATABASE_URL; each test skips silently when it is not set.

use chrono::{Duration, Utc};
use quillpress_shared::models::post::{CreatePost, Post};
use quillpress_shared::models::revoked_token::RevokedToken;
use quillpress_shared::models::user::{CreateUser, User};
use quillpress_shared::slug::{generate_unique_slug, slugify};
use sqlx::PgPool;
use uuid::Uuid;

async fn try_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping integration test: DATABASE_URL not set");
            return None;
        }
    };

    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    Some(pool)
}

async fn test_user(pool: &PgPool) -> User {
    let marker = Uuid::new_v4().simple().to_string();
    User::create(
        pool,
        CreateUser {
            username: format!("slugtest-{}", marker),
            email: format!("slugtest-{}@example.com", marker),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$unused$unused".to_string(),
        },
    )
    .await
    .expect("create test user")
}

async fn insert_post(pool: &PgPool, author: &User, title: &str, slug: &str) -> Post {
    Post::create(
        pool,
        CreatePost {
            title: title.to_string(),
            slug: slug.to_string(),
            content: "body".to_string(),
            author_id: author.id,
            category_id: None,
            is_published: true,
        },
    )
    .await
    .expect("insert post")
}

#[tokio::test]
async fn test_generate_unique_slug_prefers_clean_base() {
    let Some(pool) = try_pool().await else { return };
    let user = test_user(&pool).await;

    let marker = Uuid::new_v4().simple().to_string();
    let title = format!("Fresh Title {}", marker);

    let slug = generate_unique_slug(&pool, &title).await.unwrap();
    assert_eq!(slug, slugify(&title));

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_unique_slug_suffixes_on_collision() {
    let Some(pool) = try_pool().await else { return };
    let user = test_user(&pool).await;

    let marker = Uuid::new_v4().simple().to_string();
    let title = format!("Taken Title {}", marker);
    let base = slugify(&title);

    insert_post(&pool, &user, &title, &base).await;

    // The base is taken, so the generator appends an 8-hex suffix and the
    // result is unique against the store at call time
    let slug = generate_unique_slug(&pool, &title).await.unwrap();
    let suffix = slug
        .strip_prefix(&format!("{}-", base))
        .expect("suffixed slug keeps the base");
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!Post::slug_exists(&pool, &slug).await.unwrap());

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_unique_slug_for_unsluggable_title() {
    let Some(pool) = try_pool().await else { return };

    // No ASCII alphanumerics at all: the slug is a bare 8-hex suffix
    let slug = generate_unique_slug(&pool, "!!!").await.unwrap();
    assert_eq!(slug.len(), 8);
    assert!(slug.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_revocation_ledger_membership_and_double_insert() {
    let Some(pool) = try_pool().await else { return };
    let user = test_user(&pool).await;

    let jti = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::days(7);

    assert!(!RevokedToken::is_revoked(&pool, jti).await.unwrap());

    RevokedToken::insert(&pool, jti, user.id, expires_at)
        .await
        .expect("first insert succeeds");
    assert!(RevokedToken::is_revoked(&pool, jti).await.unwrap());

    // The jti primary key rejects a second revocation
    let second = RevokedToken::insert(&pool, jti, user.id, expires_at).await;
    assert!(second.is_err());

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_purge_expired_removes_only_dead_entries() {
    let Some(pool) = try_pool().await else { return };
    let user = test_user(&pool).await;

    let dead = Uuid::new_v4();
    let alive = Uuid::new_v4();

    RevokedToken::insert(&pool, dead, user.id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    RevokedToken::insert(&pool, alive, user.id, Utc::now() + Duration::days(7))
        .await
        .unwrap();

    let purged = RevokedToken::purge_expired(&pool).await.unwrap();
    assert!(purged >= 1);

    assert!(!RevokedToken::is_revoked(&pool, dead).await.unwrap());
    assert!(RevokedToken::is_revoked(&pool, alive).await.unwrap());

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
}
