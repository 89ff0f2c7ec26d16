//! HTTP integration tests: the router on an ephemeral port, driven with
//! a cookie-keeping `reqwest` client.
//!
//! These tests require a `PostgreSQL` database named by
//! `SAMPLE_APP_TEST_DATABASE_URL`.
//!
//! Run with: cargo test -p sample-app-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use sample_app_integration_tests::{TestServer, unique_email};
use sample_app_web::services::UserService;

/// Sign up through the API; the client is signed in afterwards.
async fn sign_up(server: &TestServer, client: &Client, email: &str) -> Value {
    let resp = client
        .post(server.url("/users"))
        .json(&json!({
            "name": "Example User",
            "email": email,
            "password": "foobar",
            "password_confirmation": "foobar",
        }))
        .send()
        .await
        .expect("Failed to sign up");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse user")
}

// ============================================================================
// Static Pages
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_readiness() {
    let server = TestServer::start().await;
    let resp = TestServer::client()
        .get(server.url("/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_home_shows_feed_when_signed_in() {
    let server = TestServer::start().await;
    let client = TestServer::client();
    sign_up(&server, &client, &unique_email("home")).await;

    let body = client
        .get(server.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Micropost Feed"));
    assert!(body.contains("0 microposts"));
}

// ============================================================================
// Sign Up, Sign In, Sign Out
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_sign_up_signs_in() {
    let server = TestServer::start().await;
    let client = TestServer::client();
    let email = unique_email("signup");

    let user = sign_up(&server, &client, &email.to_uppercase()).await;
    assert_eq!(user["email"], email.to_lowercase());
    assert_eq!(user["admin"], false);
    assert!(user.get("password_digest").is_none());

    let resp = client.get(server.url("/feed")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_invalid_sign_up_returns_errors() {
    let server = TestServer::start().await;

    let resp = TestServer::client()
        .post(server.url("/users"))
        .json(&json!({
            "name": "",
            "email": "user@foo,com",
            "password": "foo",
            "password_confirmation": "bar",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["name"][0], "can't be blank");
    assert_eq!(body["errors"]["email"][0], "is invalid");
    assert_eq!(
        body["errors"]["password"][0],
        "is too short (minimum is 6 characters)"
    );
    assert_eq!(body["errors"]["password_confirmation"][0], "doesn't match Password");
    assert!(
        body["full_messages"]
            .as_array()
            .unwrap()
            .contains(&json!("Name can't be blank"))
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_sign_in_and_out() {
    let server = TestServer::start().await;
    let email = unique_email("session");
    sign_up(&server, &TestServer::client(), &email).await;

    let client = TestServer::client();
    let resp = client
        .post(server.url("/sessions"))
        .json(&json!({ "email": email, "password": "invalid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.text().await.unwrap(),
        "Invalid email/password combination"
    );

    let resp = client
        .post(server.url("/sessions"))
        .json(&json!({ "email": email, "password": "foobar" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        client.get(server.url("/feed")).send().await.unwrap().status(),
        StatusCode::OK
    );

    let resp = client.delete(server.url("/sessions")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        client.get(server.url("/feed")).send().await.unwrap().status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_sign_in_is_rate_limited() {
    let server = TestServer::start().await;
    let client = TestServer::client();
    let email = unique_email("limited");

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let resp = client
            .post(server.url("/sessions"))
            .json(&json!({ "email": email, "password": "invalid" }))
            .send()
            .await
            .unwrap();
        statuses.push(resp.status());
    }

    assert!(statuses.iter().take(5).all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

// ============================================================================
// Microposts
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_create_and_delete_micropost() {
    let server = TestServer::start().await;
    let client = TestServer::client();
    let user = sign_up(&server, &client, &unique_email("poster")).await;

    let resp = client
        .post(server.url("/microposts"))
        .json(&json!({ "content": "Lorem ipsum" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Value = resp.json().await.unwrap();
    assert_eq!(post["user_id"], user["id"]);

    let feed: Value = client
        .get(server.url("/feed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(feed[0]["id"], post["id"]);

    let resp = client
        .delete(server.url(&format!("/microposts/{}", post["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let posts: Value = client
        .get(server.url(&format!("/users/{}/microposts", user["id"])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(posts, json!([]));
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_micropost_too_long() {
    let server = TestServer::start().await;
    let client = TestServer::client();
    sign_up(&server, &client, &unique_email("verbose")).await;

    let resp = client
        .post(server.url("/microposts"))
        .json(&json!({ "content": "a".repeat(141) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["full_messages"][0],
        "Content is too long (maximum is 140 characters)"
    );
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_cannot_edit_other_user() {
    let server = TestServer::start().await;
    let victim = sign_up(&server, &TestServer::client(), &unique_email("victim")).await;

    let client = TestServer::client();
    sign_up(&server, &client, &unique_email("editor")).await;

    let resp = client
        .patch(server.url(&format!("/users/{}", victim["id"])))
        .json(&json!({
            "name": "Hacked",
            "email": unique_email("hacked"),
            "password": "foobar",
            "password_confirmation": "foobar",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL (SAMPLE_APP_TEST_DATABASE_URL)"]
async fn test_only_admins_destroy_users() {
    let server = TestServer::start().await;
    let target = sign_up(&server, &TestServer::client(), &unique_email("target")).await;
    let target_path = format!("/users/{}", target["id"]);

    let client = TestServer::client();
    let admin = sign_up(&server, &client, &unique_email("admin")).await;

    let resp = client.delete(server.url(&target_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin_id = admin["id"].as_i64().unwrap();
    UserService::new(&server.pool)
        .set_admin(i32::try_from(admin_id).unwrap().into(), true)
        .await
        .unwrap();

    let resp = client
        .delete(server.url(&format!("/users/{admin_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client.delete(server.url(&target_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.get(server.url(&target_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
