//! Integration tests for API endpoints.
//!
//! These tests drive the real router with an in-memory repository and
//! real JWT verification, so the full HTTP contract (status codes,
//! envelopes, auth) is exercised without a database.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;
use uuid::Uuid;

use common::{make_review, token_for, InMemoryReviews, TEST_JWT_SECRET};
use review_api::api::create_router;
use review_api::config::Config;
use review_api::errors::AppError;
use review_api::infra::Database;
use review_api::services::{AuthService, Authenticator, ReviewManager};
use review_api::AppState;

// =============================================================================
// Test Helpers
// =============================================================================

/// Build a router over an in-memory repository, returning the repository
/// handle for seeding.
fn test_app() -> (Router, Arc<InMemoryReviews>) {
    let repo = Arc::new(InMemoryReviews::new());
    let review_service = Arc::new(ReviewManager::new(repo.clone()));
    let auth_service = Arc::new(Authenticator::new(Config::with_secret(TEST_JWT_SECRET)));
    let database = Arc::new(Database::from_connection(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    ));

    let state = AppState::new(auth_service, review_service, database);
    (create_router(state), repo)
}

fn post_review(service_id: Uuid, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/reviews/{}", service_id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn patch_review(service_id: Uuid, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(format!("/reviews/{}", service_id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: String, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn review_routes_require_a_bearer_token() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/reviews/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(get(format!("/reviews/{}", Uuid::new_v4()), "not-a-jwt"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticator_accepts_its_own_tokens() {
    let auth = Authenticator::new(Config::with_secret(TEST_JWT_SECRET));
    let user_id = Uuid::new_v4();

    let claims = auth.verify_token(&token_for(user_id)).unwrap();

    assert_eq!(claims.sub, user_id);
    assert!(claims.exp > claims.iat);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn post_creates_a_review() {
    let (app, _repo) = test_app();
    let user = Uuid::new_v4();
    let service = Uuid::new_v4();

    let response = app
        .oneshot(post_review(
            service,
            &token_for(user),
            serde_json::json!({ "rating": 4, "review": "Good" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["review"]["user"], serde_json::json!(user));
    assert_eq!(body["review"]["service"], serde_json::json!(service));
    assert_eq!(body["review"]["rating"], 4);
    assert_eq!(body["review"]["review"], "Good");
}

#[tokio::test]
async fn posting_twice_is_a_conflict() {
    let (app, repo) = test_app();
    let user = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(user, service, 4, "Good"));

    let response = app
        .oneshot(post_review(
            service,
            &token_for(user),
            serde_json::json!({ "rating": 5, "review": "Again" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn empty_review_body_fails_validation() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(post_review(
            Uuid::new_v4(),
            &token_for(Uuid::new_v4()),
            serde_json::json!({ "rating": 4, "review": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("review"));
}

#[tokio::test]
async fn missing_rating_fails_validation() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(post_review(
            Uuid::new_v4(),
            &token_for(Uuid::new_v4()),
            serde_json::json!({ "review": "Good" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_integer_rating_fails_validation() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(post_review(
            Uuid::new_v4(),
            &token_for(Uuid::new_v4()),
            serde_json::json!({ "rating": "four", "review": "Good" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn listing_a_service_without_reviews_is_not_found() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(get(
            format!("/reviews/{}", Uuid::new_v4()),
            &token_for(Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_returns_populated_reviews() {
    let (app, repo) = test_app();
    let author = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(author, service, 4, "Good"));

    let response = app
        .oneshot(get(
            format!("/reviews/{}", service),
            &token_for(Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let reviews = body["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["user"]["id"], serde_json::json!(author));
    assert!(reviews[0]["user"]["name"].is_string());
    assert_eq!(reviews[0]["service"]["id"], serde_json::json!(service));
    assert_eq!(reviews[0]["review"], "Good");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_by_non_author_is_unauthorized() {
    let (app, repo) = test_app();
    let author = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(author, service, 4, "Good"));

    let response = app
        .oneshot(patch_review(
            service,
            &token_for(stranger),
            serde_json::json!({ "rating": 5, "review": "Mine now" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn update_by_author_succeeds() {
    let (app, repo) = test_app();
    let author = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(author, service, 4, "Good"));

    let response = app
        .oneshot(patch_review(
            service,
            &token_for(author),
            serde_json::json!({ "rating": 5, "review": "Great" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["review"]["rating"], 5);
    assert_eq!(body["review"]["review"], "Great");
}

#[tokio::test]
async fn update_without_reviews_is_not_found() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(patch_review(
            Uuid::new_v4(),
            &token_for(Uuid::new_v4()),
            serde_json::json!({ "rating": 5, "review": "Great" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_empty_body_fails_validation() {
    let (app, repo) = test_app();
    let author = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(author, service, 4, "Good"));

    let response = app
        .oneshot(patch_review(
            service,
            &token_for(author),
            serde_json::json!({ "rating": 5, "review": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Get by user
// =============================================================================

#[tokio::test]
async fn get_by_user_returns_the_review() {
    let (app, repo) = test_app();
    let author = Uuid::new_v4();
    let service = Uuid::new_v4();
    repo.seed(make_review(author, service, 4, "Good"));

    let response = app
        .oneshot(get(
            format!("/reviews/{}/{}", service, author),
            &token_for(Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["review"]["user"], serde_json::json!(author));
}

#[tokio::test]
async fn get_by_user_for_missing_review_is_not_found() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(get(
            format!("/reviews/{}/{}", Uuid::new_v4(), Uuid::new_v4()),
            &token_for(Uuid::new_v4()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Full lifecycle
// =============================================================================

#[tokio::test]
async fn review_lifecycle_over_http() {
    let (app, _repo) = test_app();
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let service = Uuid::new_v4();

    // A creates a review
    let response = app
        .clone()
        .oneshot(post_review(
            service,
            &token_for(user_a),
            serde_json::json!({ "rating": 4, "review": "Good" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A cannot create a second one
    let response = app
        .clone()
        .oneshot(post_review(
            service,
            &token_for(user_a),
            serde_json::json!({ "rating": 5, "review": "Again" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // B sees exactly one review
    let response = app
        .clone()
        .oneshot(get(format!("/reviews/{}", service), &token_for(user_b)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["reviews"].as_array().unwrap().len(), 1);

    // B cannot update A's review
    let response = app
        .clone()
        .oneshot(patch_review(
            service,
            &token_for(user_b),
            serde_json::json!({ "rating": 5, "review": "Hijack" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A updates it
    let response = app
        .clone()
        .oneshot(patch_review(
            service,
            &token_for(user_a),
            serde_json::json!({ "rating": 5, "review": "Great" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The update is visible
    let response = app
        .oneshot(get(
            format!("/reviews/{}/{}", service, user_a),
            &token_for(user_b),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["review"]["rating"], 5);
    assert_eq!(body["review"]["review"], "Great");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn error_status_codes_follow_the_contract() {
    use axum::response::IntoResponse;

    // Duplicate review is a 400, not a 409
    let response = AppError::conflict("Review").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Ownership failure is a 401, not a 403
    let response = AppError::Forbidden.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = AppError::validation("review: must not be empty").into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = AppError::NotFound.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = AppError::Unauthorized.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = AppError::internal("boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn internal_errors_do_not_leak_details() {
    use axum::response::IntoResponse;

    let response = AppError::internal("connection string was postgres://...").into_response();
    let body = json_body(response).await;

    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(!body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("postgres://"));
}

// =============================================================================
// Root endpoint
// =============================================================================

#[tokio::test]
async fn root_is_public() {
    let (app, _repo) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
