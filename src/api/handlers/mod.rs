//! HTTP request handlers.

pub mod listing_handler;
pub mod media_handler;
pub mod user_handler;

pub use listing_handler::{listing_protected_routes, listing_public_routes};
pub use media_handler::media_routes;
pub use user_handler::user_routes;
