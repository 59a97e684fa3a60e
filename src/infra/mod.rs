//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Firebase token verification
//! - S3 object storage

pub mod db;
pub mod firebase;
pub mod repositories;
pub mod s3;

pub use db::{Database, Migrator};
pub use firebase::{FirebaseAuth, FirebaseClaims, TokenVerifier};
pub use repositories::{ListingRepository, ListingStore, UserRepository, UserStore};
pub use s3::{ObjectStorage, S3Storage};

#[cfg(any(test, feature = "test-utils"))]
pub use firebase::MockTokenVerifier;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockListingRepository, MockUserRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use s3::MockObjectStorage;
