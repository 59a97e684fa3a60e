//! Pre-signed URL handlers for S3 uploads and downloads.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::media::object_key;
use crate::errors::AppResult;
use crate::types::NoContent;

/// Create media (S3) routes
pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-request", post(request_upload_url))
        .route("/download-url", get(request_download_url))
        .route("/", delete(delete_object))
}

/// Request body for generating a pre-signed S3 upload URL
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MediaUploadRequest {
    /// Original file name
    #[validate(length(min = 1, message = "File name is required"))]
    #[schema(example = "photo.jpg")]
    pub file_name: String,
    /// MIME type of the file
    #[validate(length(min = 1, message = "Content type is required"))]
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Upload category (used as S3 key prefix)
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "listings")]
    pub category: String,
}

/// Response containing a pre-signed S3 upload URL and the generated object key
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct MediaUploadResponse {
    /// Pre-signed S3 upload URL (PUT request)
    #[schema(example = "https://bucket.s3.amazonaws.com/...")]
    pub upload_url: String,
    /// S3 object key to reference this file later
    #[schema(example = "listings/550e8400/photo.jpg")]
    pub key: String,
}

/// Object key query parameter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ObjectKeyQuery {
    /// S3 object key
    pub key: String,
}

/// Get a pre-signed upload URL
///
/// Generates a pre-signed S3 URL for uploading a file. Returns the URL
/// and the S3 object key.
#[utoipa::path(
    post,
    path = "/s3/upload-request",
    tag = "S3 Media",
    request_body = MediaUploadRequest,
    responses(
        (status = 200, description = "Pre-signed upload URL and object key", body = MediaUploadResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_upload_url(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<MediaUploadRequest>,
) -> AppResult<Json<MediaUploadResponse>> {
    let key = object_key(&request.category, &request.file_name);
    let upload_url = state
        .storage
        .presign_upload(&key, &request.content_type)
        .await?;

    Ok(Json(MediaUploadResponse { upload_url, key }))
}

/// Get a pre-signed download URL
#[utoipa::path(
    get,
    path = "/s3/download-url",
    tag = "S3 Media",
    params(ObjectKeyQuery),
    responses(
        (status = 200, description = "Pre-signed download URL", body = String),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn request_download_url(
    State(state): State<AppState>,
    Query(query): Query<ObjectKeyQuery>,
) -> AppResult<String> {
    state.storage.presign_download(&query.key).await
}

/// Delete an S3 object
#[utoipa::path(
    delete,
    path = "/s3",
    tag = "S3 Media",
    params(ObjectKeyQuery),
    responses(
        (status = 204, description = "Object deleted"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_object(
    State(state): State<AppState>,
    Query(query): Query<ObjectKeyQuery>,
) -> AppResult<NoContent> {
    state.storage.delete_object(&query.key).await?;
    Ok(NoContent)
}
