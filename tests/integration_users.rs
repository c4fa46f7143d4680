mod common;

use axum::http::StatusCode;
use common::{get, register_and_login, send, setup_test_app};
use serde_json::{Value, json};

#[tokio::test]
async fn test_list_users_hides_passwords() {
    let (app, _store) = setup_test_app().await;
    register_and_login(&app).await;
    register_and_login(&app).await;

    let (status, body) = get(&app, "/api/users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["results"], 2);

    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("__v").is_none());
        assert_eq!(user["fullName"], "Ada Lovelace");
        assert_eq!(user["blogsPosted"], 0);
    }

    let usernames: Vec<&str> = users
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    let mut sorted = usernames.clone();
    sorted.sort();
    assert_eq!(usernames, sorted);
}

#[tokio::test]
async fn test_get_me() {
    let (app, _store) = setup_test_app().await;
    let (user_id, token) = register_and_login(&app).await;

    let (status, body) = send(&app, "GET", "/api/users/me", None, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user_id);
}

#[tokio::test]
async fn test_get_me_requires_token() {
    let (app, _store) = setup_test_app().await;

    let (status, body) = get(&app, "/api/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Missing authorization header");

    let (status, body) = send(&app, "GET", "/api/users/me", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_get_user_by_id() {
    let (app, _store) = setup_test_app().await;
    let (user_id, _token) = register_and_login(&app).await;

    let (status, body) = get(&app, &format!("/api/users/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], user_id);
    assert!(body["data"]["user"].get("password").is_none());

    let (status, body) = get(&app, "/api/users/65f1c0ffee0000000000beef").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No User found with that ID");
}

#[tokio::test]
async fn test_update_own_account() {
    let (app, _store) = setup_test_app().await;
    let (user_id, token) = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", user_id),
        Some(json!({ "firstName": " Grace ", "lastName": "Hopper" })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let user = &body["data"]["user"];
    assert_eq!(user["firstName"], "Grace");
    assert_eq!(user["fullName"], "Grace Hopper");
}

#[tokio::test]
async fn test_update_with_empty_body_returns_user() {
    let (app, _store) = setup_test_app().await;
    let (user_id, token) = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}", user_id),
        Some(json!({})),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["firstName"], "Ada");
}

#[tokio::test]
async fn test_update_other_account_forbidden() {
    let (app, _store) = setup_test_app().await;
    let (other_id, _) = register_and_login(&app).await;
    let (_, token) = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}", other_id),
        Some(json!({ "firstName": "Mallory" })),
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only modify your own account");

    let (_, body) = get(&app, &format!("/api/users/{}", other_id)).await;
    assert_eq!(body["data"]["user"]["firstName"], "Ada");
}

#[tokio::test]
async fn test_delete_own_account() {
    let (app, store) = setup_test_app().await;
    let (user_id, token) = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", user_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert!(store.is_empty("users"));

    let (status, _) = send(&app, "GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_other_account_forbidden() {
    let (app, store) = setup_test_app().await;
    let (other_id, _) = register_and_login(&app).await;
    let (_, token) = register_and_login(&app).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/users/{}", other_id),
        None,
        Some(&token),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(store.len("users"), 2);
}
