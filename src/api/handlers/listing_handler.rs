//! Property listing handlers: CRUD, search, favorites, and saved listings.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    listing::{ListingCreateRequest, ListingUpdateRequest},
    ListingFilter, ListingResponse, PropertyType,
};
use crate::errors::AppResult;
use crate::infra::FirebaseClaims;
use crate::types::{ApiMessage, Created, Paginated, PaginatedListingResponse, PaginationParams};

/// Public listing routes (no authentication)
pub fn listing_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_listings))
        .route("/:id", get(get_listing))
}

/// Listing routes requiring a verified Firebase token
pub fn listing_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_listing))
        .route("/my", get(my_listings))
        .route("/favorites", get(my_favorites))
        .route("/saved", get(my_saved_listings))
        .route("/:id", axum::routing::patch(update_listing).delete(delete_listing))
        .route("/:id/favorite", post(add_favorite).delete(remove_favorite))
        .route("/:id/save", post(save_listing).delete(unsave_listing))
}

/// Search filters for the public listing index
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingSearchParams {
    /// Filter by property type
    pub property_type: Option<PropertyType>,
    /// Minimum price (inclusive)
    #[param(value_type = Option<String>)]
    pub price_min: Option<Decimal>,
    /// Maximum price (inclusive)
    #[param(value_type = Option<String>)]
    pub price_max: Option<Decimal>,
    /// Filter by district name
    pub district: Option<String>,
    /// Minimum number of bedrooms
    pub min_bedrooms: Option<i32>,
}

impl From<ListingSearchParams> for ListingFilter {
    fn from(params: ListingSearchParams) -> Self {
        ListingFilter {
            property_type: params.property_type,
            price_min: params.price_min,
            price_max: params.price_max,
            district: params.district,
            min_bedrooms: params.min_bedrooms,
        }
    }
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/listings",
    tag = "Listings",
    request_body = ListingCreateRequest,
    responses(
        (status = 201, description = "Listing created successfully", body = ApiMessage),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not registered")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    ValidatedJson(request): ValidatedJson<ListingCreateRequest>,
) -> AppResult<Created<ApiMessage>> {
    state.listing_service.create_listing(&claims, request).await?;
    Ok(Created(ApiMessage::new("Listing created successfully")))
}

/// Get a listing by ID
///
/// Returns full listing details including owner, property details,
/// location, counters, and media. Public endpoint.
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 200, description = "Full listing details", body = ListingResponse),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<ListingResponse>> {
    let listing = state.listing_service.get_listing(listing_id).await?;
    Ok(Json(listing))
}

/// Update a listing
///
/// Partial update; only the owner can update. Price changes are tracked
/// in the price history.
#[utoipa::path(
    patch,
    path = "/listings/{id}",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    request_body = ListingUpdateRequest,
    responses(
        (status = 200, description = "Listing updated successfully", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<ListingUpdateRequest>,
) -> AppResult<Json<ApiMessage>> {
    state
        .listing_service
        .update_listing(&claims, listing_id, request)
        .await?;
    Ok(Json(ApiMessage::new("Listing updated successfully")))
}

/// Delete a listing
///
/// Soft delete: the listing is archived. Only the owner can delete.
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 200, description = "Listing deleted successfully", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Listing not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<ApiMessage>> {
    state.listing_service.delete_listing(&claims, listing_id).await?;
    Ok(Json(ApiMessage::new("Listing deleted successfully")))
}

/// Search published listings
///
/// Public endpoint. Returns paginated published listings, newest first.
#[utoipa::path(
    get,
    path = "/listings",
    tag = "Listings",
    params(ListingSearchParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated published listings", body = PaginatedListingResponse)
    )
)]
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingSearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ListingResponse>>> {
    let listings = state
        .listing_service
        .search_listings(params.into(), page)
        .await?;
    Ok(Json(listings))
}

/// Get my listings
#[utoipa::path(
    get,
    path = "/listings/my",
    tag = "Listings",
    params(PaginationParams),
    responses(
        (status = 200, description = "The authenticated user's listings", body = PaginatedListingResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_listings(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ListingResponse>>> {
    let listings = state.listing_service.my_listings(&claims, page).await?;
    Ok(Json(listings))
}

/// Get my favorite listings
#[utoipa::path(
    get,
    path = "/listings/favorites",
    tag = "Listings",
    params(PaginationParams),
    responses(
        (status = 200, description = "Listings the user favorited", body = PaginatedListingResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ListingResponse>>> {
    let listings = state.listing_service.my_favorites(&claims, page).await?;
    Ok(Json(listings))
}

/// Get my saved listings
#[utoipa::path(
    get,
    path = "/listings/saved",
    tag = "Listings",
    params(PaginationParams),
    responses(
        (status = 200, description = "Listings the user saved for later", body = PaginatedListingResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_saved_listings(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ListingResponse>>> {
    let listings = state.listing_service.my_saved_listings(&claims, page).await?;
    Ok(Json(listings))
}

/// Favorite a listing
#[utoipa::path(
    post,
    path = "/listings/{id}/favorite",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 201, description = "Listing added to favorites", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Already favorited")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Created<ApiMessage>> {
    state.listing_service.add_favorite(&claims, listing_id).await?;
    Ok(Created(ApiMessage::new("Listing added to favorites")))
}

/// Unfavorite a listing
#[utoipa::path(
    delete,
    path = "/listings/{id}/favorite",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 200, description = "Listing removed from favorites", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Listing is not favorited")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<ApiMessage>> {
    state.listing_service.remove_favorite(&claims, listing_id).await?;
    Ok(Json(ApiMessage::new("Listing removed from favorites")))
}

/// Save a listing for later
#[utoipa::path(
    post,
    path = "/listings/{id}/save",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 201, description = "Listing saved successfully", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Already saved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Created<ApiMessage>> {
    state.listing_service.save_listing(&claims, listing_id).await?;
    Ok(Created(ApiMessage::new("Listing saved successfully")))
}

/// Remove a listing from the saved list
#[utoipa::path(
    delete,
    path = "/listings/{id}/save",
    tag = "Listings",
    params(("id" = Uuid, Path, description = "Listing UUID")),
    responses(
        (status = 200, description = "Listing unsaved successfully", body = ApiMessage),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Listing is not saved")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsave_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<FirebaseClaims>,
    Path(listing_id): Path<Uuid>,
) -> AppResult<Json<ApiMessage>> {
    state.listing_service.unsave_listing(&claims, listing_id).await?;
    Ok(Json(ApiMessage::new("Listing unsaved successfully")))
}
