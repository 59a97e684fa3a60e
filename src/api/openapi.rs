//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{listing_handler, media_handler, user_handler};
use crate::domain::listing::{
    ListingCountersResponse, ListingCreateRequest, ListingDetailsInput, ListingDetailsResponse,
    ListingDetailsUpdateInput, ListingLocationInput, ListingLocationResponse,
    ListingLocationUpdateInput, ListingMediaResponse, ListingOwnerResponse, ListingResponse,
    ListingUpdateRequest, MediaItemInput,
};
use crate::domain::{
    FacingDirection, ListingCondition, MediaContentType, PropertyStatus, PropertyType,
    RegisterUserRequest, UpdateUserRequest, UserResponse, UserRole,
};
use crate::types::{ApiMessage, PaginatedListingResponse, PaginationMeta};

/// OpenAPI documentation for the UrbanNest API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "UrbanNest API",
        version = "0.1.0",
        description = "Property listing backend with Firebase authentication and S3 media storage",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // User endpoints
        user_handler::register,
        user_handler::get_current_user,
        user_handler::update_current_user,
        // Listing endpoints
        listing_handler::create_listing,
        listing_handler::get_listing,
        listing_handler::update_listing,
        listing_handler::delete_listing,
        listing_handler::search_listings,
        listing_handler::my_listings,
        listing_handler::my_favorites,
        listing_handler::my_saved_listings,
        listing_handler::add_favorite,
        listing_handler::remove_favorite,
        listing_handler::save_listing,
        listing_handler::unsave_listing,
        // Media endpoints
        media_handler::request_upload_url,
        media_handler::request_download_url,
        media_handler::delete_object,
    ),
    components(
        schemas(
            // Shared types
            ApiMessage,
            PaginatedListingResponse,
            PaginationMeta,
            // Enumerations
            UserRole,
            PropertyType,
            PropertyStatus,
            ListingCondition,
            FacingDirection,
            MediaContentType,
            // User types
            RegisterUserRequest,
            UpdateUserRequest,
            UserResponse,
            // Listing types
            ListingCreateRequest,
            ListingUpdateRequest,
            ListingDetailsInput,
            ListingDetailsUpdateInput,
            ListingLocationInput,
            ListingLocationUpdateInput,
            MediaItemInput,
            ListingResponse,
            ListingOwnerResponse,
            ListingDetailsResponse,
            ListingLocationResponse,
            ListingCountersResponse,
            ListingMediaResponse,
            // Media types
            media_handler::MediaUploadRequest,
            media_handler::MediaUploadResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "User registration and profile management"),
        (name = "Listings", description = "Property listing CRUD, search, favorites, and saved listings"),
        (name = "S3 Media", description = "Pre-signed URL generation for S3 uploads and downloads")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Firebase Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Firebase ID token from the client SDK"))
                        .build(),
                ),
            );
        }
    }
}
