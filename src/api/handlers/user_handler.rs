//! User registration and profile handlers.

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use validator::Validate;

use crate::api::extractors::{format_validation_errors, ValidatedJson};
use crate::api::AppState;
use crate::domain::{RegisterUserRequest, UpdateUserRequest, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::FirebaseClaims;
use crate::types::{ApiMessage, Created};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/me", get(get_current_user).patch(update_current_user))
}

/// Register a new user
///
/// The body is optional: federated sign-ups (e.g. Google) send none and
/// the profile is taken from the verified token claims instead.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body(
        content = RegisterUserRequest,
        description = "Registration payload; omit the body entirely for federated sign-ups"
    ),
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "User, phone, or national ID already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    body: Bytes,
) -> AppResult<Created<UserResponse>> {
    // An empty body marks a federated sign-up
    let request = if body.is_empty() {
        None
    } else {
        let parsed: RegisterUserRequest = serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?;
        parsed
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;
        Some(parsed)
    };

    let user = state.user_service.register(claims, request).await?;

    Ok(Created(user))
}

/// Get current user profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Authenticated user's profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_profile(&claims).await?;
    Ok(Json(user))
}

/// Update current user profile. Only provided fields are updated.
#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not registered"),
        (status = 409, description = "Phone or national ID already registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiMessage>> {
    state.user_service.update_profile(&claims, request).await?;
    Ok(Json(ApiMessage::new("Profile updated successfully")))
}
