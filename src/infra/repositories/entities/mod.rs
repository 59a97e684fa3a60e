//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod favorite_listing;
pub mod listing;
pub mod listing_counters;
pub mod listing_details;
pub mod listing_location;
pub mod listing_media;
pub mod listing_price_history;
pub mod media_asset;
pub mod saved_listing;
pub mod user;
