//! Integration Tests: DigiLocker Identity Verification
//!
//! Runs the OAuth2 round-trip in mock mode: start -> redirect URL with
//! state -> callback -> user marked verified. No network traffic.

use actix_web::{test, web, App};
use std::sync::Arc;
use story_service::config::{AccessConfig, DigiLockerConfig};
use story_service::handlers;
use story_service::services::{DigiLockerProvider, LocalDiskStorage, StorageBackend};
use story_service::store::{StoryStore, UserStore};

fn mock_digilocker() -> DigiLockerProvider {
    DigiLockerProvider::from_config(&DigiLockerConfig {
        client_id: String::new(),
        client_secret: String::new(),
        redirect_uri: "http://localhost:3000/api/auth/digilocker".to_string(),
        auth_url: "https://example.invalid/authorize".to_string(),
        token_url: "https://example.invalid/token".to_string(),
        user_url: "https://example.invalid/user".to_string(),
        mock: true,
    })
    .expect("mock provider")
}

macro_rules! test_app {
    ($users:expr) => {{
        let stories = Arc::new(StoryStore::new());
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalDiskStorage::new(dir.path(), ""));
        test::init_service(
            App::new()
                .app_data(web::Data::new(stories))
                .app_data(web::Data::new($users.clone()))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(AccessConfig { download_cost: 350 }))
                .app_data(web::Data::new(mock_digilocker()))
                .configure(handlers::configure),
        )
        .await
    }};
}

#[actix_web::test]
async fn start_returns_authorization_redirect_with_state() {
    let users = Arc::new(UserStore::new());
    let app = test_app!(users);

    let req = test::TestRequest::post()
        .uri("/api/auth/digilocker")
        .set_json(serde_json::json!({ "username": "9876543210" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let redirect_url = body["redirectUrl"].as_str().unwrap();
    assert!(redirect_url.starts_with("https://example.invalid/authorize?response_type=code"));
    assert!(redirect_url.contains("state="));
}

#[actix_web::test]
async fn callback_marks_user_verified_and_redirects_home() {
    let users = Arc::new(UserStore::new());
    let app = test_app!(users);

    // Obtain a valid state token through the start endpoint
    let req = test::TestRequest::post()
        .uri("/api/auth/digilocker")
        .set_json(serde_json::json!({ "username": "9876543210" }))
        .to_request();
    let body: serde_json::Value =
        test::read_body_json(test::call_service(&app, req).await).await;
    let redirect_url = body["redirectUrl"].as_str().unwrap();
    let state = redirect_url
        .split("state=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap()
        .to_string();

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/auth/digilocker?code=auth-code&state={}",
            state
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("location").unwrap().to_str().unwrap(),
        "/?verified=true"
    );

    let user = users.get("9876543210").expect("user created by callback");
    assert!(user.digilocker_verified);
}

#[actix_web::test]
async fn callback_without_parameters_redirects_to_failure() {
    let users = Arc::new(UserStore::new());
    let app = test_app!(users);

    let req = test::TestRequest::get()
        .uri("/api/auth/digilocker")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("location").unwrap().to_str().unwrap(),
        "/?error=digilocker_verification_failed"
    );
}

#[actix_web::test]
async fn callback_with_tampered_state_redirects_to_failure() {
    let users = Arc::new(UserStore::new());
    let app = test_app!(users);

    let req = test::TestRequest::get()
        .uri("/api/auth/digilocker?code=auth-code&state=%21%21not-base64")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("location").unwrap().to_str().unwrap(),
        "/?error=digilocker_verification_failed"
    );
    assert!(users.is_empty());
}

#[actix_web::test]
async fn start_with_blank_username_is_bad_request() {
    let users = Arc::new(UserStore::new());
    let app = test_app!(users);

    let req = test::TestRequest::post()
        .uri("/api/auth/digilocker")
        .set_json(serde_json::json!({ "username": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
