//! UrbanNest - Property listing backend.
//!
//! A PostgreSQL-backed REST service where authenticated users manage
//! property listings with structured details, locations, media, and
//! engagement counters. Identity is external (Firebase ID tokens);
//! file transfer goes through pre-signed S3 URLs.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and API DTOs
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, Firebase, S3)
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination, responses)
//! - **utils**: Hashing and encryption helpers
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use errors::{AppError, AppResult};
