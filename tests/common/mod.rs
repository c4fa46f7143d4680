use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quill::router::init_router;
use quill::state::AppState;
use quill_config::{AppConfig, CorsConfig, JwtConfig};
use quill_core::QueryTranslator;
use quill_db::bson::{self, doc};
use quill_db::{DocumentStore, MemoryStore};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        expires_in: 3600,
    }
}

/// Router backed by a fresh in-memory store with the user indexes in place.
pub async fn setup_test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new("blogs-test"));
    store.ensure_unique("users", "email").await.unwrap();
    store.ensure_unique("users", "username").await.unwrap();

    let state = AppState {
        db: store.clone(),
        app_config: AppConfig::default(),
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        query: QueryTranslator::default(),
        metrics: None,
    };

    (init_router(state), store)
}

/// Sends a request and returns the status with the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

/// Inserts a blog directly into the store with a fixed creation time.
#[allow(dead_code)]
pub async fn insert_blog(
    store: &MemoryStore,
    title: &str,
    status: &str,
    tags: &[&str],
    created_at: &str,
) -> String {
    let created_at = bson::DateTime::parse_rfc3339_str(created_at).unwrap();
    let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();

    let stored = store
        .insert_one(
            "blogs",
            doc! {
                "title": title,
                "content": format!("{} has enough content", title),
                "tags": tags,
                "status": status,
                "createdAt": created_at,
                "updatedAt": created_at,
                "__v": 0,
            },
        )
        .await
        .unwrap();

    stored.get_object_id("_id").unwrap().to_hex()
}

/// Five blogs created a day apart, 2025-01-01 through 2025-01-05.
#[allow(dead_code)]
pub async fn seed_five_blogs(store: &MemoryStore) -> Vec<String> {
    let fixtures = [
        ("Alpha post", "published", vec!["rust"], "2025-01-01T10:00:00Z"),
        ("Bravo post", "draft", vec!["web"], "2025-01-02T10:00:00Z"),
        ("Charlie post", "published", vec!["rust", "web"], "2025-01-03T10:00:00Z"),
        ("Delta post", "archived", vec![], "2025-01-04T10:00:00Z"),
        ("Echo post", "published", vec!["go"], "2025-01-05T10:00:00Z"),
    ];

    let mut ids = Vec::new();
    for (title, status, tags, created_at) in fixtures {
        ids.push(insert_blog(store, title, status, &tags, created_at).await);
    }
    ids
}

#[allow(dead_code)]
pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_username() -> String {
    format!("user{}", &Uuid::new_v4().simple().to_string()[..12])
}

#[allow(dead_code)]
pub fn registration_body(email: &str, username: &str) -> Value {
    serde_json::json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "username": username,
        "email": email,
        "password": TEST_PASSWORD,
    })
}

/// Registers a user through the API and logs in, returning `(user_id, token)`.
#[allow(dead_code)]
pub async fn register_and_login(app: &Router) -> (String, String) {
    let email = generate_unique_email();
    let username = generate_unique_username();

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        Some(registration_body(&email, &username)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let user_id = body["data"]["userId"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "email": email, "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    (user_id, token)
}

#[allow(dead_code)]
pub fn titles(body: &Value) -> Vec<String> {
    body["data"]["blogs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|blog| blog["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
