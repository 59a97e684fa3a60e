//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, FirebaseAuth, ObjectStorage, S3Storage, TokenVerifier};
use crate::services::{ListingService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Listing service
    pub listing_service: Arc<dyn ListingService>,
    /// Firebase ID-token verifier
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// S3 object storage
    pub storage: Arc<dyn ObjectStorage>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    ///
    /// This is the recommended way to create AppState; it wires the
    /// storage client, token verifier, and the full service container.
    pub async fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::from_config(config).await);
        let token_verifier: Arc<dyn TokenVerifier> = Arc::new(FirebaseAuth::new(config));

        let services = Services::from_infra(database.get_connection(), storage.clone(), config)?;

        Ok(Self {
            user_service: services.users(),
            listing_service: services.listings(),
            token_verifier,
            storage,
            database,
        })
    }

    /// Create new application state with manually injected services
    /// (used by tests with mock implementations).
    pub fn new(
        user_service: Arc<dyn UserService>,
        listing_service: Arc<dyn ListingService>,
        token_verifier: Arc<dyn TokenVerifier>,
        storage: Arc<dyn ObjectStorage>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            user_service,
            listing_service,
            token_verifier,
            storage,
            database,
        }
    }
}
