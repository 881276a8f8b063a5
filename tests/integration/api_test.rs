//! Admin API scenarios, including cache coherency between the API and
//! the enforcement layers.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use pathguard_api::{AppState, build_router};

use crate::helpers::{ADMIN_TOKEN, TestEnv};

fn make_app(env: &TestEnv) -> Router {
    build_router(AppState::new(
        Arc::clone(&env.config),
        env.checker.clone(),
        Arc::clone(&env.cache),
        Arc::clone(&env.mounts),
    ))
}

fn protect_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/protections")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::from(format!(r#"{{"path": "{path}"}}"#)))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_protect_is_visible_to_the_engine() {
    let env = TestEnv::new();
    let app = make_app(&env);

    // Warm the cache with a negative answer first.
    assert!(!env.checker.is_protected("/Projects").await.unwrap());

    let response = app.clone().oneshot(protect_request("/Projects")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The mutation flushed the cache, so the engine sees the new record.
    assert!(env.checker.is_protected("/Projects").await.unwrap());
}

#[tokio::test]
async fn test_api_unprotect_is_visible_to_the_engine() {
    let env = TestEnv::new();
    let app = make_app(&env);

    let response = app.clone().oneshot(protect_request("/Temp")).await.unwrap();
    let body = body_json(response).await;
    let id = body["data"]["id"].as_i64().unwrap();

    assert!(env.checker.is_protected("/Temp").await.unwrap());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/protections/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!env.checker.is_protected("/Temp").await.unwrap());
}

#[tokio::test]
async fn test_api_cache_clear_endpoint() {
    let env = TestEnv::new();
    let app = make_app(&env);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/protections/cache/clear")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_api_list_reflects_normalized_paths() {
    let env = TestEnv::new();
    let app = make_app(&env);

    app.clone()
        .oneshot(protect_request("/Projects/Alpha/"))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/protections")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"][0]["path"], "/Projects/Alpha");
}

#[tokio::test]
async fn test_api_health() {
    let env = TestEnv::new();
    let app = make_app(&env);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"], true);
}
