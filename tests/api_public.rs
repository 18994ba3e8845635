mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use common::{
    MemoryRepos, assert_status, get, json_body, public_router_with, published_post, draft_post,
    sample_profile, send,
};

fn contact_payload(name: &str, email: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "message": message,
    })
}

async fn post_contact(router: &axum::Router, payload: serde_json::Value) -> axum::http::Response<Body> {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri("/api/v1/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request"),
    )
    .await
}

#[tokio::test]
async fn healthz_reports_ok() {
    let router = public_router_with(Arc::new(MemoryRepos::default()), Vec::new());

    let response = get(&router, "/healthz").await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn profile_resolves_arabic_with_english_fallback() {
    let repos = Arc::new(MemoryRepos::default());
    *repos.profile.lock().await = Some(sample_profile());
    let router = public_router_with(repos, Vec::new());

    let response = get(&router, "/api/v1/profile?lang=ar").await;
    assert_status(&response, StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "عمر حداد");
    // The bio has no Arabic text, so English shows through.
    assert_eq!(body["bio"], "Builds web things.");
}

#[tokio::test]
async fn unknown_lang_falls_back_to_default() {
    let repos = Arc::new(MemoryRepos::default());
    *repos.profile.lock().await = Some(sample_profile());
    let router = public_router_with(repos, Vec::new());

    let response = get(&router, "/api/v1/profile?lang=fr").await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Omar Haddad");
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let router = public_router_with(Arc::new(MemoryRepos::default()), Vec::new());

    let response = get(&router, "/api/v1/profile").await;
    assert_status(&response, StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"]["code"], "profile_missing");
}

#[tokio::test]
async fn post_list_excludes_drafts() {
    let repos = Arc::new(MemoryRepos::default());
    repos
        .posts
        .lock()
        .await
        .extend([published_post("hello", "Hello", None), draft_post("wip")]);
    let router = public_router_with(repos, Vec::new());

    let response = get(&router, "/api/v1/posts").await;
    assert_status(&response, StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["posts"][0]["slug"], "hello");
}

#[tokio::test]
async fn draft_post_is_invisible_by_slug() {
    let repos = Arc::new(MemoryRepos::default());
    repos.posts.lock().await.push(draft_post("wip"));
    let router = public_router_with(repos, Vec::new());

    let response = get(&router, "/api/v1/posts/wip").await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_body_is_delivered_as_blocks() {
    let repos = Arc::new(MemoryRepos::default());
    repos.posts.lock().await.push(published_post(
        "structured",
        "# Title\n\nIntro text\n- point one\n![diagram](http://img/d.png)",
        None,
    ));
    let router = public_router_with(repos, Vec::new());

    let response = get(&router, "/api/v1/posts/structured").await;
    assert_status(&response, StatusCode::OK);
    let body = json_body(response).await;

    let blocks = body["blocks"].as_array().expect("blocks");
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0]["kind"], "heading");
    assert_eq!(blocks[0]["level"], 1);
    assert_eq!(blocks[1]["kind"], "paragraph");
    assert_eq!(blocks[2]["kind"], "list_item");
    assert_eq!(blocks[3]["kind"], "image");
    assert_eq!(blocks[3]["url"], "http://img/d.png");
}

#[tokio::test]
async fn arabic_post_body_falls_back_to_english_when_absent() {
    let repos = Arc::new(MemoryRepos::default());
    repos.posts.lock().await.extend([
        published_post("bilingual", "English body", Some("نص عربي")),
        published_post("english-only", "English body", None),
    ]);
    let router = public_router_with(repos, Vec::new());

    let bilingual = json_body(get(&router, "/api/v1/posts/bilingual?lang=ar").await).await;
    assert_eq!(bilingual["blocks"][0]["text"], "نص عربي");

    let fallback = json_body(get(&router, "/api/v1/posts/english-only?lang=ar").await).await;
    assert_eq!(fallback["blocks"][0]["text"], "English body");
}

#[tokio::test]
async fn contact_submission_round_trips() {
    let repos = Arc::new(MemoryRepos::default());
    let router = public_router_with(repos.clone(), Vec::new());

    let response = post_contact(
        &router,
        contact_payload("Lina", "lina@example.com", "Hello!"),
    )
    .await;
    assert_status(&response, StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);

    let stored = repos.messages.lock().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Lina");
    assert!(!stored[0].read);
}

#[tokio::test]
async fn contact_rejects_blank_required_field() {
    let repos = Arc::new(MemoryRepos::default());
    let router = public_router_with(repos.clone(), Vec::new());

    let response = post_contact(&router, contact_payload("Lina", "  ", "Hello!")).await;
    assert_status(&response, StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert!(repos.messages.lock().await.is_empty());
}

#[tokio::test]
async fn contact_persistence_failure_returns_500() {
    let repos = Arc::new(MemoryRepos {
        fail_message_insert: true,
        ..MemoryRepos::default()
    });
    let router = public_router_with(repos, Vec::new());

    let response = post_contact(
        &router,
        contact_payload("Lina", "lina@example.com", "Hello!"),
    )
    .await;
    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["success"], false);
}

#[tokio::test]
async fn projects_filter_featured() {
    use diwan::domain::entities::ProjectRecord;
    use diwan::domain::types::Localized;
    use time::macros::datetime;
    use uuid::Uuid;

    let project = |slug: &str, featured: bool| ProjectRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: Localized::plain(slug),
        summary: Localized::plain("summary"),
        description: Localized::plain("description"),
        cover_image_url: None,
        gallery_urls: Vec::new(),
        tech_stack: vec!["rust".to_string()],
        live_url: None,
        source_url: None,
        featured,
        sort_order: 0,
        created_at: datetime!(2025-06-01 12:00 UTC),
        updated_at: datetime!(2025-06-01 12:00 UTC),
    };

    let repos = Arc::new(MemoryRepos::default());
    repos
        .projects
        .lock()
        .await
        .extend([project("alpha", true), project("beta", false)]);
    let router = public_router_with(repos, Vec::new());

    let all = json_body(get(&router, "/api/v1/projects").await).await;
    assert_eq!(all.as_array().expect("array").len(), 2);

    let featured = json_body(get(&router, "/api/v1/projects?featured=true").await).await;
    let featured = featured.as_array().expect("array");
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["slug"], "alpha");
}
