//! WordPressClient against a local HTTP server.

mod common;

use common::{Reply, StubServer};
use serde_json::json;
use wordpress_client::{
    PostStatus, PostUpdate, SeoMeta, WordPressError, META_FOCUS_KEYWORD, META_SEO_DESCRIPTION,
    META_SEO_SCORE, META_SEO_TITLE,
};

const AUTH_HEADER: &str = "Basic dXNlcjpwYXNz";

fn seo_update() -> PostUpdate {
    PostUpdate::new("New title", "<p>New body</p>", PostStatus::Draft)
        .author(Some(4))
        .meta(SeoMeta {
            title: Some("SEO title".into()),
            description: Some("SEO description".into()),
            focus_keyword: Some("rust".into()),
            score: Some(88),
        })
}

fn meta_keys(body: &serde_json::Value) -> Vec<String> {
    body.get("meta")
        .and_then(|m| m.as_object())
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default()
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn list_posts_dedups_and_reads_pagination_headers() {
    let server = StubServer::start(|_| {
        Reply::json(
            200,
            json!([
                {"id": 1, "status": "draft", "title": {"rendered": "Same"}},
                {"id": 2, "status": "draft", "title": {"rendered": "Other"}},
                {"id": 3, "status": "draft", "title": {"rendered": "Same"}}
            ]),
        )
        .header("X-WP-Total", "57")
        .header("X-WP-TotalPages", "6")
    })
    .await;

    let page = server
        .client()
        .list_posts(PostStatus::Draft, 10, 2)
        .await
        .unwrap();

    let ids: Vec<u64> = page.posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(page.total, Some(57));
    assert_eq!(page.total_pages, Some(6));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].target,
        "/wp-json/wp/v2/posts?status=draft&per_page=10&page=2&_embed=true"
    );
    assert_eq!(requests[0].header("authorization"), Some(AUTH_HEADER));
}

#[tokio::test]
async fn error_body_is_truncated() {
    let body = "e".repeat(2_000);
    let server = StubServer::start(move |_| Reply::status(500).body(body.clone())).await;

    let err = server.client().get_post(9).await.unwrap_err();

    match err {
        WordPressError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body.len(), 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// Authors and taxonomy
// ============================================================================

#[tokio::test]
async fn author_lookup_queries_by_slug_and_matches_exactly() {
    let server = StubServer::start(|_| {
        Reply::json(
            200,
            json!([
                {"id": 3, "name": "Jane Doe", "slug": "jane-doe"},
                {"id": 4, "name": "Jane", "slug": "jane"}
            ]),
        )
    })
    .await;

    let id = server.client().resolve_author_id("jane").await.unwrap();

    assert_eq!(id, Some(4));
    let requests = server.requests();
    assert_eq!(requests[0].target, "/wp-json/wp/v2/users?slug=jane");
}

#[tokio::test]
async fn author_lookup_misses_when_no_slug_matches() {
    let server = StubServer::start(|_| {
        Reply::json(200, json!([{"id": 3, "name": "Jane Doe", "slug": "jane-doe"}]))
    })
    .await;

    assert_eq!(server.client().resolve_author_id("jane").await.unwrap(), None);
}

#[tokio::test]
async fn list_authors_requests_a_full_page() {
    let server = StubServer::start(|_| {
        Reply::json(200, json!([{"id": 1, "name": "Admin", "slug": "admin"}]))
    })
    .await;

    let authors = server.client().list_authors().await.unwrap();

    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].slug, "admin");
    assert_eq!(server.requests()[0].target, "/wp-json/wp/v2/users?per_page=100");
}

#[tokio::test]
async fn category_lookup_uses_slugified_name() {
    let server = StubServer::start(|_| {
        Reply::json(
            200,
            json!([
                {"id": 5, "name": "AI Robotics", "slug": "ai-robotics"},
                {"id": 9, "name": "AI & Robotics", "slug": "ai---robotics"}
            ]),
        )
    })
    .await;

    let id = server
        .client()
        .resolve_category_id("AI & Robotics")
        .await
        .unwrap();

    assert_eq!(id, Some(9));
    assert_eq!(
        server.requests()[0].target,
        "/wp-json/wp/v2/categories?slug=ai---robotics"
    );
}

#[tokio::test]
async fn tag_lookup_skips_misses_and_failures() {
    let server = StubServer::start(|request| match request.target.as_str() {
        "/wp-json/wp/v2/tags?slug=rust" => {
            Reply::json(200, json!([{"id": 11, "name": "Rust", "slug": "rust"}]))
        }
        "/wp-json/wp/v2/tags?slug=async" => Reply::status(500).body("db down"),
        _ => Reply::json(200, json!([])),
    })
    .await;

    let names = ["Rust", "Async", "rust", "Missing"].map(String::from);
    let ids = server.client().resolve_tag_ids(&names).await.unwrap();

    assert_eq!(ids, vec![11]);
    let targets: Vec<String> = server.requests().into_iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec![
            "/wp-json/wp/v2/tags?slug=rust",
            "/wp-json/wp/v2/tags?slug=async",
            "/wp-json/wp/v2/tags?slug=rust",
            "/wp-json/wp/v2/tags?slug=missing",
        ]
    );
}

// ============================================================================
// Media
// ============================================================================

#[tokio::test]
async fn upload_defaults_content_type_and_names_the_file() {
    let server = StubServer::start(|request| match request.path() {
        "/images/lake" => Reply::status(200).body(b"JPEGDATA".to_vec()),
        "/wp-json/wp/v2/media" => Reply::json(
            201,
            json!({"id": 42, "source_url": "https://cms.test/uploads/post-7-lake.jpg"}),
        ),
        _ => Reply::status(404),
    })
    .await;

    let upload = server
        .client()
        .upload_media(&server.url("/images/lake"), "post-7-lake.jpg")
        .await
        .unwrap();

    assert_eq!(upload.id, 42);
    assert_eq!(upload.url, "https://cms.test/uploads/post-7-lake.jpg");

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].header("authorization"), None);

    let media = &requests[1];
    assert_eq!(media.method, "POST");
    assert_eq!(media.path(), "/wp-json/wp/v2/media");
    assert_eq!(media.header("content-type"), Some("image/jpeg"));
    assert_eq!(
        media.header("content-disposition"),
        Some("attachment; filename=\"post-7-lake.jpg\"")
    );
    assert_eq!(media.header("authorization"), Some(AUTH_HEADER));
    assert_eq!(media.body, b"JPEGDATA");
}

#[tokio::test]
async fn upload_stops_when_source_is_missing() {
    let server = StubServer::start(|_| Reply::status(404).body("gone")).await;
    let source = server.url("/images/gone.jpg");

    let err = server
        .client()
        .upload_media(&source, "post-1.jpg")
        .await
        .unwrap_err();

    match err {
        WordPressError::MediaSource { url, status, .. } => {
            assert_eq!(url, source);
            assert_eq!(status, Some(404));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn upload_rejection_is_an_api_error() {
    let server = StubServer::start(|request| match request.path() {
        "/images/pic" => Reply::status(200)
            .header("Content-Type", "image/png")
            .body(b"PNG".to_vec()),
        _ => Reply::status(500).body("upload_error"),
    })
    .await;

    let err = server
        .client()
        .upload_media(&server.url("/images/pic"), "post-1.png")
        .await
        .unwrap_err();

    assert!(matches!(err, WordPressError::Api { status: 500, .. }));
    let requests = server.requests();
    assert_eq!(requests[1].header("content-type"), Some("image/png"));
}

// ============================================================================
// Updates
// ============================================================================

#[tokio::test]
async fn update_sends_everything_at_once_when_accepted() {
    let server = StubServer::start(|_| Reply::json(200, json!({"id": 7}))).await;

    let report = server.client().update_post(7, &seo_update()).await.unwrap();

    assert!(report.combined);
    assert_eq!(report.meta.len(), 4);
    assert!(report.meta.iter().all(|m| m.written));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].path(), "/wp-json/wp/v2/posts/7");

    let body = requests[0].json();
    assert_eq!(body["title"], "New title");
    assert_eq!(body["author"], 4);
    assert!(body.get("featured_media").is_none());
    assert_eq!(body["meta"][META_SEO_SCORE], "88");
}

#[tokio::test]
async fn rejected_meta_falls_back_to_core_then_field_writes() {
    let server = StubServer::start(|request| {
        let keys = meta_keys(&request.json());
        match keys.as_slice() {
            [] => Reply::json(200, json!({"id": 7})),
            [key] if key == META_FOCUS_KEYWORD => Reply::status(500).body("meta not registered"),
            [_] => Reply::json(200, json!({"id": 7})),
            _ => Reply::status(400).body("rest_invalid_param"),
        }
    })
    .await;

    let report = server.client().update_post(7, &seo_update()).await.unwrap();

    assert!(!report.combined);
    let written: Vec<(&str, bool)> = report
        .meta
        .iter()
        .map(|m| (m.key.as_str(), m.written))
        .collect();
    assert_eq!(
        written,
        vec![
            (META_SEO_TITLE, true),
            (META_SEO_DESCRIPTION, true),
            (META_FOCUS_KEYWORD, false),
            (META_SEO_SCORE, true),
        ]
    );

    let bodies: Vec<serde_json::Value> = server.requests().iter().map(|r| r.json()).collect();
    assert_eq!(bodies.len(), 6);
    assert_eq!(meta_keys(&bodies[0]).len(), 4);

    assert!(bodies[1].get("meta").is_none());
    assert_eq!(bodies[1]["title"], "New title");
    assert_eq!(bodies[1]["author"], 4);

    for body in &bodies[2..] {
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1, "field write carries only meta: {body}");
        assert_eq!(meta_keys(body).len(), 1);
    }
    assert_eq!(bodies[5]["meta"][META_SEO_SCORE], "88");
}

#[tokio::test]
async fn failed_core_write_fails_the_update() {
    let server = StubServer::start(|request| {
        if meta_keys(&request.json()).is_empty() {
            Reply::status(500).body("internal error")
        } else {
            Reply::status(400).body("rest_invalid_param")
        }
    })
    .await;

    let err = server
        .client()
        .update_post(7, &seo_update())
        .await
        .unwrap_err();

    assert!(matches!(err, WordPressError::Api { status: 500, .. }));
    assert_eq!(server.requests().len(), 2);
}

#[tokio::test]
async fn update_without_meta_is_not_retried() {
    let server = StubServer::start(|_| Reply::status(403).body("rest_forbidden")).await;

    let update = PostUpdate::new("T", "B", PostStatus::Publish);
    let err = server.client().update_post(7, &update).await.unwrap_err();

    assert!(matches!(err, WordPressError::Api { status: 403, .. }));
    assert_eq!(server.requests().len(), 1);
}
