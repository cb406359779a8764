//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use kyc_identity_core::bus::EventBus;
use kyc_identity_store::InMemoryUserStore;
use kyc_identity_test_support::{FixedClock, RecordingHandler};
use kyc_identity_users::domain::events::{UserEvent, UserEventType};
use kyc_identity_users::domain::repository::{UserRepository, UserStore};
use tower::ServiceExt;

use kyc_identity_api::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use kyc_identity_api::build_router;
use kyc_identity_api::kyc::AutoApproveKycVerifier;
use kyc_identity_api::state::AppState;

/// A router over an in-memory store, plus a recorder subscribed to every
/// user event kind.
pub struct TestApp {
    pub router: Router,
    pub events: Arc<RecordingHandler<UserEvent>>,
}

/// Build the full app router with an in-memory store and a fixed clock.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    let bus: Arc<EventBus<UserEvent>> = Arc::new(EventBus::new());
    let events: Arc<RecordingHandler<UserEvent>> = Arc::new(RecordingHandler::new());
    for kind in UserEventType::ALL {
        bus.subscribe(kind, events.clone());
    }

    let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
    let state = AppState::new(
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        )),
        UserRepository::new(store, bus),
        Arc::new(Argon2PasswordHasher::with_cost(8, 1).unwrap()),
        Arc::new(JwtTokenIssuer::new(b"integration-secret", 1)),
        Arc::new(AutoApproveKycVerifier),
    );

    TestApp {
        router: build_router(state),
        events,
    }
}

async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, None, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

/// Send a bearer-authenticated request and return the response.
pub async fn authed_json(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    send(app, method, uri, Some(token), body).await
}

/// Register a user over HTTP and log in, returning the bearer token.
pub async fn register_and_login(app: &Router, name: &str, email: &str) -> String {
    let (status, _) = post_json(
        app.clone(),
        "/api/v1/auth/register",
        &serde_json::json!({ "name": name, "email": email, "password": "secret-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = post_json(
        app.clone(),
        "/api/v1/auth/login",
        &serde_json::json!({ "email": email, "password": "secret-pass" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json["token"].as_str().unwrap().to_owned()
}
