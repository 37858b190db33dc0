//! Integration tests for mnemo-server API endpoints
//!
//! Each test gets a fresh in-memory database and a temporary public folder.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use mnemo_common::config::RootFolderInitializer;
use mnemo_common::db::open_in_memory;
use mnemo_server::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

const BOUNDARY: &str = "mnemo-test-boundary";

struct TestApp {
    router: Router,
    layout: RootFolderInitializer,
    _root: TempDir,
}

impl TestApp {
    async fn new(tracks: &[&str]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let layout = RootFolderInitializer::new(root.path().to_path_buf());
        layout.ensure_directory_exists().unwrap();
        for track in tracks {
            std::fs::write(layout.music_dir().join(track), b"audio").unwrap();
        }

        let db = open_in_memory().await.unwrap();
        let router = build_router(AppState::new(db, &layout));
        Self {
            router,
            layout,
            _root: root,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send_form(
        &self,
        method: &str,
        uri: &str,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields, image)))
            .unwrap();
        self.send(request).await
    }
}

fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(&[]).await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "mnemo-server");
}

#[tokio::test]
async fn test_music_files_listing() {
    let app = TestApp::new(&["b song.mp3", "A.ogg"]).await;
    std::fs::write(app.layout.music_dir().join("cover.png"), b"x").unwrap();

    let (status, body) = app.get("/api/music/files").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"files": [
            {"name": "A.ogg", "url": "/music/A.ogg"},
            {"name": "b song.mp3", "url": "/music/b%20song.mp3"},
        ]})
    );
}

#[tokio::test]
async fn test_create_memory_defaults_and_sanitizes_playlist() {
    let app = TestApp::new(&["a.mp3", "b.mp3"]).await;

    let (status, body) = app
        .send_form(
            "POST",
            "/api/memories",
            &[
                ("title", "Rain"),
                ("content", "It rained"),
                ("music_playlist", r#"["../a.mp3","gone.mp3","a.mp3"]"#),
            ],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Rain");
    assert_eq!(body["emotion"], "peaceful");
    assert_eq!(body["music_playlist"], json!(["a.mp3"]));
    assert!(body["memory_date"].as_str().unwrap().ends_with('Z'));
    assert!(body["image"].is_null());
}

#[tokio::test]
async fn test_create_memory_requires_title_and_content() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app
        .send_form("POST", "/api/memories", &[("title", "only a title")], None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_create_memory_with_image() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app
        .send_form(
            "POST",
            "/api/memories",
            &[("title", "Sky"), ("content", "blue")],
            Some(("sky.png", b"png-bytes")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let image = body["image"].as_str().unwrap();
    assert!(image.starts_with("/uploads/") && image.ends_with(".png"));
    let stored = app
        .layout
        .uploads_dir()
        .join(image.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(stored).unwrap(), b"png-bytes");
}

#[tokio::test]
async fn test_update_keeps_existing_values() {
    let app = TestApp::new(&["a.mp3", "b.mp3"]).await;
    let (_, created) = app
        .send_form(
            "POST",
            "/api/memories",
            &[
                ("title", "Old"),
                ("content", "Body"),
                ("emotion", "warm"),
                ("memory_date", "2020-02-02T00:00:00.000Z"),
                ("music_playlist", r#"["b.mp3"]"#),
            ],
            None,
        )
        .await;
    let uri = format!("/api/memories/{}", created["id"].as_str().unwrap());

    // Empty title and a malformed playlist fall back to the stored values
    let (status, updated) = app
        .send_form(
            "PUT",
            &uri,
            &[("title", ""), ("content", "New body"), ("music_playlist", "oops")],
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Old");
    assert_eq!(updated["content"], "New body");
    assert_eq!(updated["emotion"], "warm");
    assert_eq!(updated["memory_date"], "2020-02-02T00:00:00.000Z");
    assert_eq!(updated["music_playlist"], json!(["b.mp3"]));
}

#[tokio::test]
async fn test_missing_memory_is_404() {
    let app = TestApp::new(&[]).await;

    let (status, body) = app.get("/api/memories/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Memory not found");

    let (status, _) = app
        .send_form("PUT", "/api/memories/nope", &[("title", "x")], None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = Request::delete("/api/memories/nope").body(Body::empty()).unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_delete() {
    let app = TestApp::new(&[]).await;
    for (title, date) in [("older", "2001-01-01T00:00:00.000Z"), ("newer", "2020-01-01T00:00:00.000Z")] {
        app.send_form(
            "POST",
            "/api/memories",
            &[("title", title), ("content", "c"), ("memory_date", date)],
            None,
        )
        .await;
    }

    let (_, list) = app.get("/api/memories").await;
    let titles: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["newer", "older"]);

    let id = list[0]["id"].as_str().unwrap();
    let request = Request::delete(format!("/api/memories/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, list) = app.get("/api/memories").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_audio_settings_defaults_to_library() {
    let app = TestApp::new(&["a.mp3", "b.mp3"]).await;

    let (status, body) = app.get("/api/audio/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"global_playlist": ["a.mp3", "b.mp3"], "volume": 0.3}));
}

#[tokio::test]
async fn test_audio_settings_put_normalizes() {
    let app = TestApp::new(&["a.mp3", "b.mp3"]).await;

    let (status, body) = app
        .send_json(
            "PUT",
            "/api/audio/settings",
            json!({"global_playlist": ["b.mp3", "c.mp3", "b.mp3"], "volume": 1.4}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"global_playlist": ["b.mp3"], "volume": 1.0}));

    // Non-numeric volume resets to the default; playlist untouched
    let (_, body) = app
        .send_json("PUT", "/api/audio/settings", json!({"volume": "loud"}))
        .await;
    assert_eq!(body, json!({"global_playlist": ["b.mp3"], "volume": 0.3}));

    // Reload sees the persisted values
    let (_, body) = app.get("/api/audio/settings").await;
    assert_eq!(body["global_playlist"], json!(["b.mp3"]));
}

#[tokio::test]
async fn test_audio_settings_null_fields_are_stored() {
    let app = TestApp::new(&["a.mp3", "b.mp3"]).await;
    app.send_json(
        "PUT",
        "/api/audio/settings",
        json!({"global_playlist": ["b.mp3"], "volume": 0.8}),
    )
    .await;

    // Null playlist stores [] which reads back as the whole library
    let (status, body) = app
        .send_json(
            "PUT",
            "/api/audio/settings",
            json!({"global_playlist": null, "volume": null}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"global_playlist": ["a.mp3", "b.mp3"], "volume": 0.0}));

    // Absent fields still leave the stored values alone
    let (_, body) = app
        .send_json("PUT", "/api/audio/settings", json!({"global_playlist": ["a.mp3"]}))
        .await;
    assert_eq!(body, json!({"global_playlist": ["a.mp3"], "volume": 0.0}));
}

#[tokio::test]
async fn test_static_music_is_served() {
    let app = TestApp::new(&["a.mp3"]).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/music/a.mp3").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
