//! Integration tests for API endpoints.
//!
//! These tests drive the real router with mock services, a mock token
//! verifier, and a mock database backend, so no Postgres, S3, or
//! Firebase access is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use tower::ServiceExt;
use uuid::Uuid;

use urbannest::api::{create_router, AppState};
use urbannest::domain::{
    listing::{ListingCreateRequest, ListingUpdateRequest},
    ListingFilter, ListingResponse, RegisterUserRequest, UpdateUserRequest, UserResponse,
};
use urbannest::errors::{AppError, AppResult};
use urbannest::infra::{Database, FirebaseClaims, ObjectStorage, TokenVerifier};
use urbannest::services::{ListingService, UserService};
use urbannest::types::{Paginated, PaginationParams};

const VALID_TOKEN: &str = "valid-test-token";

// =============================================================================
// Mock infrastructure
// =============================================================================

/// Token verifier accepting a single fixed token
struct StaticVerifier;

#[async_trait]
impl TokenVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> AppResult<FirebaseClaims> {
        if token == VALID_TOKEN {
            Ok(FirebaseClaims {
                sub: "test-firebase-uid".to_string(),
                name: Some("Test User".to_string()),
                email: Some("test@example.com".to_string()),
                picture: None,
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Storage stub returning deterministic presigned URLs
struct StaticStorage;

#[async_trait]
impl ObjectStorage for StaticStorage {
    async fn presign_upload(&self, key: &str, _content_type: &str) -> AppResult<String> {
        Ok(format!("https://s3.test/upload/{key}"))
    }

    async fn presign_download(&self, key: &str) -> AppResult<String> {
        Ok(format!("https://s3.test/download/{key}"))
    }

    async fn delete_object(&self, _key: &str) -> AppResult<()> {
        Ok(())
    }
}

fn test_user_response() -> UserResponse {
    UserResponse {
        user_id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        phone: None,
        nid: None,
        role_name: "user".to_string(),
        profile_picture_url: None,
        created_at: chrono::Utc::now(),
    }
}

/// User service stub with canned responses
struct StaticUserService;

#[async_trait]
impl UserService for StaticUserService {
    async fn register(
        &self,
        _claims: FirebaseClaims,
        _request: Option<RegisterUserRequest>,
    ) -> AppResult<UserResponse> {
        Ok(test_user_response())
    }

    async fn get_profile(&self, _claims: &FirebaseClaims) -> AppResult<UserResponse> {
        Ok(test_user_response())
    }

    async fn update_profile(
        &self,
        _claims: &FirebaseClaims,
        _request: UpdateUserRequest,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Listing service stub: empty search results, everything else not found
struct StaticListingService;

#[async_trait]
impl ListingService for StaticListingService {
    async fn create_listing(
        &self,
        _claims: &FirebaseClaims,
        _request: ListingCreateRequest,
    ) -> AppResult<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn get_listing(&self, listing_id: Uuid) -> AppResult<ListingResponse> {
        Err(AppError::not_found(format!(
            "Listing with id {listing_id} not found"
        )))
    }

    async fn update_listing(
        &self,
        _claims: &FirebaseClaims,
        _listing_id: Uuid,
        _request: ListingUpdateRequest,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn delete_listing(&self, _claims: &FirebaseClaims, _listing_id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn search_listings(
        &self,
        _filter: ListingFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        Ok(Paginated::new(vec![], page.page, page.limit(), 0))
    }

    async fn my_listings(
        &self,
        _claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        Ok(Paginated::new(vec![], page.page, page.limit(), 0))
    }

    async fn add_favorite(&self, _claims: &FirebaseClaims, _listing_id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn remove_favorite(&self, _claims: &FirebaseClaims, _listing_id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn my_favorites(
        &self,
        _claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        Ok(Paginated::new(vec![], page.page, page.limit(), 0))
    }

    async fn save_listing(&self, _claims: &FirebaseClaims, _listing_id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn unsave_listing(&self, _claims: &FirebaseClaims, _listing_id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn my_saved_listings(
        &self,
        _claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        Ok(Paginated::new(vec![], page.page, page.limit(), 0))
    }
}

/// Build a router over mock services and a mock database backend.
fn test_app() -> axum::Router {
    let connection = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            };
            8
        ])
        .into_connection();

    let state = AppState::new(
        Arc::new(StaticUserService),
        Arc::new(StaticListingService),
        Arc::new(StaticVerifier),
        Arc::new(StaticStorage),
        Arc::new(Database::from_connection(connection)),
    );

    create_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_reports_database_status() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn protected_route_rejects_missing_token() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn protected_route_rejects_bad_token() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header(header::AUTHORIZATION, "Bearer not-the-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_without_body_returns_created() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["email"], "test@example.com");
    assert_eq!(json["role_name"], "user");
}

#[tokio::test]
async fn register_with_invalid_body_is_rejected() {
    let body = serde_json::json!({
        "name": "John Doe",
        "email": "not-an-email",
        "nid": "1234567890"
    });

    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn listing_search_is_public() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/listings?district=Dhaka&min_bedrooms=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 0);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_listing_returns_not_found() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri(format!("/listings/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_listing_requires_token() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/listings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_request_returns_presigned_url_and_key() {
    let body = serde_json::json!({
        "file_name": "photo.jpg",
        "content_type": "image/jpeg",
        "category": "listings"
    });

    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/s3/upload-request")
                .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let key = json["key"].as_str().unwrap();
    let segments: Vec<&str> = key.split('/').collect();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0], "listings");
    assert_eq!(segments[2], "photo.jpg");

    let url = json["upload_url"].as_str().unwrap();
    assert_eq!(url, &format!("https://s3.test/upload/{key}"));
}

#[tokio::test]
async fn delete_object_returns_no_content() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/s3?key=listings/abc/photo.jpg")
                .header(header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["info"]["title"], "UrbanNest API");
    assert!(json["paths"]["/listings"].is_object());
}

#[tokio::test]
async fn metrics_endpoint_is_exposed() {
    let app = test_app();

    // Generate one request so the HTTP counters are non-empty
    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
