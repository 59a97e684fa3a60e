//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod listing;
pub mod media;
pub mod user;

pub use listing::{
    FacingDirection, ListingCondition, ListingCounters, ListingDetails, ListingFilter,
    ListingLocation, ListingMediaItem, ListingOwner, ListingPatch, ListingRecord, ListingResponse,
    NewListing, NewListingMedia, PriceChange, PropertyStatus, PropertyType,
};
pub use media::MediaContentType;
pub use user::{NewUser, RegisterUserRequest, UpdateUserRequest, User, UserPatch, UserResponse, UserRole};
