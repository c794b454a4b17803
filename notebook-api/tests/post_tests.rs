//! Integration tests for the post pages

mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestContext};
use notebook_shared::models::post::Post;
use notebook_shared::models::record::CreateRecord;

async fn seed_post(ctx: &TestContext, author_id: i64, title: &str) -> Post {
    Post::create(
        &ctx.db,
        CreateRecord {
            title: title.to_string(),
            content: format!("{} body", title),
            author_id,
        },
    )
    .await
    .expect("Failed to seed post")
}

#[tokio::test]
async fn test_post_list_requires_login() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let response = ctx.get("/posts/", None).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/login/?next=/posts/"));
}

#[tokio::test]
async fn test_post_list_shows_every_users_posts() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let alice = ctx.create_user("alice").await.unwrap();
    let (bob, cookie) = ctx.user_with_session("bob").await.unwrap();

    seed_post(&ctx, alice.id, "Hello from Alice").await;
    seed_post(&ctx, bob.id, "Hello from Bob").await;

    let response = ctx.get("/posts/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Hello from Alice"));
    assert!(html.contains("Hello from Bob"));
}

#[tokio::test]
async fn test_create_post_redirects_to_list() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let (user, cookie) = ctx.user_with_session("alice").await.unwrap();

    let response = ctx
        .post_form(
            "/posts/new/",
            "title=First+post&content=Hello+world",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/posts/"));

    let posts = Post::list_by_author(&ctx.db, user.id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "First post");
    assert_eq!(posts[0].content, "Hello world");
}

#[tokio::test]
async fn test_post_title_limit_is_100() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let (user, cookie) = ctx.user_with_session("alice").await.unwrap();

    let too_long = format!("title={}&content=body", "p".repeat(101));
    let response = ctx.post_form("/posts/new/", &too_long, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Ensure this value has at most 100 characters."));

    let exact = format!("title={}&content=body", "p".repeat(100));
    let response = ctx.post_form("/posts/new/", &exact, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    assert_eq!(Post::count_by_author(&ctx.db, user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_post_keeps_owner() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let alice = ctx.create_user("alice").await.unwrap();
    let (_bob, cookie) = ctx.user_with_session("bob").await.unwrap();
    let post = seed_post(&ctx, alice.id, "Original").await;

    let response = ctx
        .post_form(
            &format!("/posts/{}/edit/", post.id),
            "title=Edited&content=Edited+body",
            Some(&cookie),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/posts/"));

    let updated = Post::find_by_id(&ctx.db, post.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.content, "Edited body");
    assert_eq!(updated.author_id, alice.id);
}

#[tokio::test]
async fn test_post_detail_and_delete() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let (user, cookie) = ctx.user_with_session("alice").await.unwrap();
    let post = seed_post(&ctx, user.id, "Announcement").await;

    let detail = ctx.get(&format!("/posts/{}/", post.id), Some(&cookie)).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let html = body_text(detail).await;
    assert!(html.contains("Announcement"));
    assert!(html.contains(&format!("/posts/{}/edit/", post.id)));

    let confirm = ctx
        .get(&format!("/posts/{}/delete/", post.id), Some(&cookie))
        .await;
    assert_eq!(confirm.status(), StatusCode::OK);
    let html = body_text(confirm).await;
    assert!(html.contains(&format!("<dd>{}</dd>", post.id)));
    assert!(html.contains("<dd>Announcement</dd>"));
    assert!(html.contains("<dd>Announcement body</dd>"));

    let response = ctx
        .post_form(&format!("/posts/{}/delete/", post.id), "", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response).as_deref(), Some("/posts/"));

    assert!(Post::find_by_id(&ctx.db, post.id).await.unwrap().is_none());

    let detail = ctx.get(&format!("/posts/{}/", post.id), Some(&cookie)).await;
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_post_pages_are_not_found() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let (_user, cookie) = ctx.user_with_session("alice").await.unwrap();

    for uri in [
        "/posts/999/",
        "/posts/999/edit/",
        "/posts/999/delete/",
        "/posts/abc/",
    ] {
        let response = ctx.get(uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }

    let response = ctx
        .post_form("/posts/999/edit/", "title=t&content=c", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx.post_form("/posts/999/delete/", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notes_and_posts_are_separate() {
    let ctx = TestContext::new().await.expect("Failed to create test context");
    let (user, cookie) = ctx.user_with_session("alice").await.unwrap();
    let post = seed_post(&ctx, user.id, "Only a post").await;

    let html = body_text(ctx.get("/", Some(&cookie)).await).await;
    assert!(!html.contains("Only a post"));

    let response = ctx.get(&format!("/note/{}/", post.id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
