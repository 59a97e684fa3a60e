//! Firebase authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Firebase authentication middleware.
///
/// Extracts the bearer token from the Authorization header, verifies it
/// against Google's signing keys, and injects the resulting
/// `FirebaseClaims` into the request extensions for handlers to read.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.token_verifier.verify(token).await?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
