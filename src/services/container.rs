//! Service Container - Centralized service construction and access.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{ListingManager, ListingService, UserManager, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{ListingStore, ObjectStorage, UserStore};
use crate::utils::Encryptor;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get listing service
    fn listings(&self) -> Arc<dyn ListingService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    user_service: Arc<dyn UserService>,
    listing_service: Arc<dyn ListingService>,
}

impl Services {
    /// Create a new service container with pre-built services
    pub fn new(
        user_service: Arc<dyn UserService>,
        listing_service: Arc<dyn ListingService>,
    ) -> Self {
        Self {
            user_service,
            listing_service,
        }
    }

    /// Wire all services from infrastructure pieces
    pub fn from_infra(
        db: Arc<DatabaseConnection>,
        storage: Arc<dyn ObjectStorage>,
        config: &Config,
    ) -> AppResult<Self> {
        let users = Arc::new(UserStore::new(db.clone()));
        let listings = Arc::new(ListingStore::new(db));
        let encryptor = Encryptor::from_base64(config.nid_encryption_key())?;

        let user_service = Arc::new(UserManager::new(
            users.clone(),
            storage.clone(),
            encryptor,
        ));
        let listing_service = Arc::new(ListingManager::new(listings, users, storage));

        Ok(Self {
            user_service,
            listing_service,
        })
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn listings(&self) -> Arc<dyn ListingService> {
        self.listing_service.clone()
    }
}
