mod common;

use common::token_from_body;
use common::TestApp;
use common::TEST_BASE_URL;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use todo_service::domain::auth::models::AuthSettings;
use todo_service::user::models::EmailAddress;

async fn body_of(response: reqwest::Response) -> Value {
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_password_recovery_and_reset() {
    let app = TestApp::spawn().await;
    app.create_user("jane@example.com", "pw123456", false).await;

    let response = app
        .post("/api/password_recovery")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_of(response).await;
    assert_eq!(body["data"]["message"], "Password recovery email sent");

    let sent = app.mailbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jane@example.com");
    assert_eq!(sent[0].subject, "Password Recovery for user jane@example.com");
    assert!(sent[0]
        .body
        .contains(&format!("{}/password_reset?token=", TEST_BASE_URL)));

    let token = token_from_body(&sent[0].body);
    let reset = app
        .post("/api/password_reset")
        .json(&json!({ "token": token, "password": "brand-new-password" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(reset.status(), StatusCode::OK);
    let body = body_of(reset).await;
    assert_eq!(body["data"]["message"], "Password updated");

    let old_login = app
        .post("/api/login/token")
        .form(&[("username", "jane@example.com"), ("password", "pw123456")])
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(old_login.status(), StatusCode::BAD_REQUEST);

    app.login("jane@example.com", "brand-new-password").await;
}

#[tokio::test]
async fn test_password_recovery_unknown_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/password_recovery")
        .json(&json!({ "email": "ghost@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_of(response).await;
    assert_eq!(
        body["data"]["message"],
        "No user registered with that email"
    );
    assert!(app.mailbox.sent().is_empty());
}

#[tokio::test]
async fn test_password_recovery_with_emails_disabled() {
    let app = TestApp::spawn_with(AuthSettings {
        emails_enabled: false,
        verification_required: false,
        base_url: TEST_BASE_URL.to_string(),
    })
    .await;
    app.create_user("jane@example.com", "pw123456", false).await;

    let response = app
        .post("/api/password_recovery")
        .json(&json!({ "email": "jane@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_of(response).await;
    assert_eq!(body["data"]["message"], "Sending emails not supported");
}

#[tokio::test]
async fn test_password_recovery_malformed_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/password_recovery")
        .json(&json!({ "email": "nope" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_password_reset_rejects_bad_tokens() {
    let app = TestApp::spawn().await;

    let garbage = app
        .post("/api/password_reset")
        .json(&json!({ "token": "not.a.token", "password": "whatever" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(garbage.status(), StatusCode::FORBIDDEN);
    let body = body_of(garbage).await;
    assert_eq!(body["data"]["message"], "Could not validate credentials");

    let ghost = EmailAddress::new("ghost@example.com".to_string()).expect("valid email");
    let orphan_token = app
        .state
        .auth_service
        .mint_reset_token(&ghost)
        .expect("reset token");

    let orphan = app
        .post("/api/password_reset")
        .json(&json!({ "token": orphan_token, "password": "whatever" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registration_with_verification() {
    let app = TestApp::spawn_with(AuthSettings {
        emails_enabled: true,
        verification_required: true,
        base_url: TEST_BASE_URL.to_string(),
    })
    .await;

    let register = app
        .post("/api/users")
        .json(&json!({ "email": "jane@example.com", "password": "pw123456" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(register.status(), StatusCode::CREATED);
    let body = body_of(register).await;
    assert_eq!(body["data"]["is_verified"], false);

    let sent = app.mailbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Verify your account jane@example.com");
    assert!(sent[0]
        .body
        .contains(&format!("{}/verify_account?token=", TEST_BASE_URL)));

    let verify = app
        .post("/api/verify_account")
        .json(&json!({ "token": token_from_body(&sent[0].body) }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(verify.status(), StatusCode::OK);
    let body = body_of(verify).await;
    assert_eq!(body["data"]["message"], "Account verified");

    let token = app.login("jane@example.com", "pw123456").await;
    let me = body_of(
        app.get_authenticated("/api/users/me", &token)
            .send()
            .await
            .expect("Failed to execute request"),
    )
    .await;
    assert_eq!(me["data"]["is_verified"], true);
}

#[tokio::test]
async fn test_registration_without_verification_sends_no_mail() {
    let app = TestApp::spawn().await;

    let register = app
        .post("/api/users")
        .json(&json!({ "email": "jane@example.com", "password": "pw123456" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(register.status(), StatusCode::CREATED);
    assert!(app.mailbox.sent().is_empty());
}

#[tokio::test]
async fn test_verify_account_for_deleted_user() {
    let app = TestApp::spawn().await;
    let ghost = EmailAddress::new("ghost@example.com".to_string()).expect("valid email");
    let token = app
        .state
        .auth_service
        .mint_verification_token(&ghost)
        .expect("verification token");

    let response = app
        .post("/api/verify_account")
        .json(&json!({ "token": token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_of(response).await;
    assert_eq!(
        body["data"]["message"],
        "No user registered with that email"
    );
}

#[tokio::test]
async fn test_google_registration_and_login() {
    let app = TestApp::spawn().await;
    app.identity_provider
        .vouch("google-token", "jane@gmail.com", Some("Jane Doe"));

    let register = app
        .post("/api/users/google")
        .json(&json!({ "access_token": "google-token" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(register.status(), StatusCode::CREATED);
    let body = body_of(register).await;
    assert_eq!(body["data"]["email"], "jane@gmail.com");
    assert_eq!(body["data"]["full_name"], "Jane Doe");
    assert_eq!(body["data"]["is_verified"], true);

    let again = app
        .post("/api/users/google")
        .json(&json!({ "access_token": "google-token" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);
    let body = body_of(again).await;
    assert_eq!(body["data"]["message"], "Email already registered");

    let login = app
        .post("/api/login/google")
        .json(&json!({ "access_token": "google-token" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(login.status(), StatusCode::OK);
    let body = body_of(login).await;
    assert_eq!(body["data"]["token_type"], "bearer");
    let access_token = body["data"]["access_token"].as_str().expect("access token");

    let me = body_of(
        app.get_authenticated("/api/users/me", access_token)
            .send()
            .await
            .expect("Failed to execute request"),
    )
    .await;
    assert_eq!(me["data"]["email"], "jane@gmail.com");
}

#[tokio::test]
async fn test_google_login_for_unregistered_email() {
    let app = TestApp::spawn().await;
    app.identity_provider
        .vouch("google-token", "stranger@gmail.com", None);

    let response = app
        .post("/api/login/google")
        .json(&json!({ "access_token": "google-token" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_of(response).await;
    assert_eq!(body["data"]["message"], "Incorrect email or password");
}

#[tokio::test]
async fn test_google_rejected_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/login/google")
        .json(&json!({ "access_token": "unknown-token" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_of(response).await;
    assert_eq!(body["data"]["message"], "Could not validate credentials");
}
