//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{ROLE_ADMIN, ROLE_USER};

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub firebase_uid: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// SHA-512 fingerprint of the national ID ("NOT_SET" for federated sign-ups)
    pub nid_hash: String,
    /// AES-GCM ciphertext of the national ID, base64-encoded
    pub nid_encrypted: Option<String>,
    pub role: UserRole,
    /// S3 object key, or an absolute URL for federated profile pictures
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data required to insert a new user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub firebase_uid: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub nid_hash: String,
    pub nid_encrypted: Option<String>,
    pub role: UserRole,
    pub profile_picture_url: Option<String>,
}

/// Partial profile update applied to an existing user
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub nid_hash: Option<String>,
    pub nid_encrypted: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.nid_hash.is_none()
            && self.nid_encrypted.is_none()
            && self.profile_picture_url.is_none()
    }
}

/// Request body for registering a new user.
///
/// The body is optional at the endpoint level: federated sign-ups send no
/// body and the profile is taken from the verified token instead.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    /// User display name
    #[validate(length(min = 1, message = "User must have a name"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
    /// Contact phone number
    #[schema(example = "+8801712345678")]
    pub phone: Option<String>,
    /// National ID number (stored hashed and encrypted)
    #[validate(length(min = 1, message = "NID cannot be blank"))]
    pub nid: String,
}

/// Request body for partially updating the user profile.
/// Only provided fields are updated.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    /// New phone number
    pub phone: Option<String>,
    /// National ID number (will be re-hashed and re-encrypted)
    pub nid: Option<String>,
    /// S3 object key for profile picture
    pub profile_picture_url: Option<String>,
}

/// User profile information returned to the client
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
    /// User email address
    #[schema(example = "john@example.com")]
    pub email: String,
    /// Contact phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Decrypted national ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nid: Option<String>,
    /// User role
    #[schema(example = "user")]
    pub role_name: String,
    /// Pre-signed URL (or federated URL) for the profile picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        assert_eq!(UserRole::User.to_string(), "user");
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        // Unknown values default to User
        assert_eq!(UserRole::from("invalid"), UserRole::User);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            name: Some("New Name".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
