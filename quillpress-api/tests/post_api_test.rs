/// Integration tests for posts, comments, and likes
///
/// Exercises slug generation against the live store, the draft-visibility
/// rules (404 for hidden reads, 403 for forbidden writes), and the
/// idempotent like semantics. Requires DATABASE_URL; skips silently
/// without it.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestContext};
use serde_json::json;
use uuid::Uuid;

async fn create_post(
    ctx: &TestContext,
    token: &str,
    title: &str,
    published: bool,
) -> serde_json::Value {
    let response = ctx
        .request(
            "POST",
            "/api/posts",
            Some(json!({
                "title": title,
                "content": "Some content for the post body.",
                "is_published": published,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_slug_is_deterministic_then_random() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (access, _refresh, _user) = ctx.register_user("slugger").await;

    // A unique title gets the clean slug
    let marker = Uuid::new_v4().simple().to_string();
    let title = format!("Hello World {}", marker);
    let expected_base = format!("hello-world-{}", marker);

    let first = create_post(&ctx, &access, &title, true).await;
    assert_eq!(first["slug"].as_str().unwrap(), expected_base);

    // The same title again gets the base plus an 8-hex-char suffix
    let second = create_post(&ctx, &access, &title, true).await;
    let second_slug = second["slug"].as_str().unwrap();
    assert_ne!(second_slug, expected_base);

    let suffix = second_slug
        .strip_prefix(&format!("{}-", expected_base))
        .expect("suffixed slug keeps the base");
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_draft_visibility_asymmetry() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (owner, _r1, _u1) = ctx.register_user("draft-owner").await;
    let (other, _r2, _u2) = ctx.register_user("draft-other").await;

    let draft = create_post(&ctx, &owner, &format!("Draft {}", Uuid::new_v4().simple()), false).await;
    let slug = draft["slug"].as_str().unwrap();
    let uri = format!("/api/posts/{}", slug);

    // Owner reads their draft
    let response = ctx.request("GET", &uri, None, Some(&owner)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "draft");

    // Anonymous and non-owner reads are 404, concealing existence
    let response = ctx.request("GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = ctx.request("GET", &uri, None, Some(&other)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Writes by a non-owner are 403, never 404
    let response = ctx
        .request(
            "PUT",
            &uri,
            Some(json!({ "title": "Hijacked" })),
            Some(&other),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = ctx.request("DELETE", &uri, None, Some(&other)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unauthenticated writes are 401
    let response = ctx
        .request("PUT", &uri, Some(json!({ "title": "Nope" })), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_listing_serves_published_only() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (access, _refresh, _user) = ctx.register_user("lister").await;

    let marker = Uuid::new_v4().simple().to_string();
    create_post(&ctx, &access, &format!("Visible {}", marker), true).await;
    create_post(&ctx, &access, &format!("Hidden {}", marker), false).await;

    // Search narrows to this run's posts
    let uri = format!("/api/posts?search={}", marker);
    let response = ctx.request("GET", &uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    let titles: Vec<&str> = listing["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec![format!("Visible {}", marker).as_str()]);

    // my-posts includes the draft
    let response = ctx.request("GET", "/api/posts/my-posts", None, Some(&access)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mine = body_json(response).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_post_update_respects_slug_immutability() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (access, _refresh, _user) = ctx.register_user("updater").await;

    let post = create_post(&ctx, &access, &format!("Original {}", Uuid::new_v4().simple()), true).await;
    let slug = post["slug"].as_str().unwrap().to_string();

    let response = ctx
        .request(
            "PUT",
            &format!("/api/posts/{}", slug),
            Some(json!({ "title": "Renamed Entirely", "is_published": false })),
            Some(&access),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Renamed Entirely");
    assert_eq!(updated["status"], "draft");
    // The slug survives every update
    assert_eq!(updated["slug"].as_str().unwrap(), slug);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_likes_are_idempotent() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (access, _refresh, _user) = ctx.register_user("liker").await;

    let post = create_post(&ctx, &access, &format!("Likeable {}", Uuid::new_v4().simple()), true).await;
    let slug = post["slug"].as_str().unwrap();

    // Like twice: still one like
    for _ in 0..2 {
        let response = ctx
            .request("POST", &format!("/api/posts/{}/like", slug), None, Some(&access))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx.request("GET", &format!("/api/posts/{}", slug), None, None).await;
    assert_eq!(body_json(response).await["likes_count"], 1);

    // Unlike twice: no error, zero likes
    for _ in 0..2 {
        let response = ctx
            .request("POST", &format!("/api/posts/{}/unlike", slug), None, Some(&access))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx.request("GET", &format!("/api/posts/{}", slug), None, None).await;
    assert_eq!(body_json(response).await["likes_count"], 0);

    // Liking requires auth, and a missing post is a 404
    let response = ctx
        .request("POST", &format!("/api/posts/{}/like", slug), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = ctx
        .request("POST", "/api/posts/no-such-post/like", None, Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_comment_lifecycle_and_ownership() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (author, _r1, _u1) = ctx.register_user("commenter").await;
    let (stranger, _r2, _u2) = ctx.register_user("stranger").await;

    let post = create_post(&ctx, &author, &format!("Discussed {}", Uuid::new_v4().simple()), true).await;
    let slug = post["slug"].as_str().unwrap();
    let comments_uri = format!("/api/posts/{}/comments", slug);

    // Anonymous comment creation is rejected
    let response = ctx
        .request("POST", &comments_uri, Some(json!({ "content": "anon" })), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Empty content is rejected
    let response = ctx
        .request("POST", &comments_uri, Some(json!({ "content": "" })), Some(&author))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Create a comment and list it
    let response = ctx
        .request(
            "POST",
            &comments_uri,
            Some(json!({ "content": "Nice post!" })),
            Some(&stranger),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    let comment_id = comment["id"].as_str().unwrap();

    let response = ctx.request("GET", &comments_uri, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    // Only the comment's author may delete it; the post author can't
    let delete_uri = format!("/api/posts/comments/{}", comment_id);
    let response = ctx.request("DELETE", &delete_uri, None, Some(&author)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx.request("DELETE", &delete_uri, None, Some(&stranger)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone now
    let response = ctx.request("DELETE", &delete_uri, None, Some(&stranger)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_categories_and_tags_require_auth() {
    let Some(mut ctx) = TestContext::try_new().await else {
        return;
    };

    let (access, _refresh, _user) = ctx.register_user("organizer").await;
    let marker = Uuid::new_v4().simple().to_string();

    // Unauthenticated access is rejected, reads included
    let response = ctx.request("GET", "/api/categories", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Create a category, then a duplicate
    let body = json!({ "name": format!("Tech {}", marker), "slug": format!("tech-{}", marker) });
    let response = ctx
        .request("POST", "/api/categories", Some(body.clone()), Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .request("POST", "/api/categories", Some(body), Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Same shape for tags
    let body = json!({ "name": format!("rust {}", marker), "slug": format!("rust-{}", marker) });
    let response = ctx
        .request("POST", "/api/tags", Some(body.clone()), Some(&access))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx.request("POST", "/api/tags", Some(body), Some(&access)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx.request("GET", "/api/tags", None, Some(&access)).await;
    assert_eq!(response.status(), StatusCode::OK);

    ctx.cleanup().await;
}
