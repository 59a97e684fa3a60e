//! User service - Handles registration and profile management.
//!
//! Identity is external: every operation starts from the verified
//! Firebase claims injected by the auth middleware. The national ID is
//! stored twice, as a SHA-512 fingerprint for uniqueness checks and as
//! AES-GCM ciphertext for later display.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::NID_NOT_SET;
use crate::domain::{
    NewUser, RegisterUserRequest, UpdateUserRequest, User, UserPatch, UserResponse, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{FirebaseClaims, ObjectStorage, UserRepository};
use crate::utils::{sha512_hex, Encryptor};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user account for the verified Firebase identity.
    ///
    /// A missing body marks a federated sign-up: the profile is sourced
    /// from the token claims and no national ID is recorded yet.
    async fn register(
        &self,
        claims: FirebaseClaims,
        request: Option<RegisterUserRequest>,
    ) -> AppResult<UserResponse>;

    /// Get the authenticated user's profile
    async fn get_profile(&self, claims: &FirebaseClaims) -> AppResult<UserResponse>;

    /// Partially update the authenticated user's profile
    async fn update_profile(
        &self,
        claims: &FirebaseClaims,
        request: UpdateUserRequest,
    ) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager<R: UserRepository> {
    users: Arc<R>,
    storage: Arc<dyn ObjectStorage>,
    encryptor: Encryptor,
}

impl<R: UserRepository> UserManager<R> {
    /// Create new user service instance
    pub fn new(users: Arc<R>, storage: Arc<dyn ObjectStorage>, encryptor: Encryptor) -> Self {
        Self {
            users,
            storage,
            encryptor,
        }
    }

    async fn resolve_user(&self, claims: &FirebaseClaims) -> AppResult<User> {
        self.users
            .find_by_firebase_uid(&claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Map a user to its API shape, decrypting the national ID and
    /// presigning the profile picture when it is an object key rather
    /// than a federated absolute URL.
    async fn build_response(&self, user: User) -> AppResult<UserResponse> {
        let nid = match &user.nid_encrypted {
            Some(ciphertext) => Some(self.encryptor.decrypt(ciphertext)?),
            None => None,
        };

        let profile_picture_url = match user.profile_picture_url {
            Some(value) if !value.starts_with("http") => {
                Some(self.storage.presign_download(&value).await?)
            }
            other => other,
        };

        Ok(UserResponse {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            nid,
            role_name: user.role.to_string(),
            profile_picture_url,
            created_at: user.created_at,
        })
    }
}

#[async_trait]
impl<R: UserRepository> UserService for UserManager<R> {
    async fn register(
        &self,
        claims: FirebaseClaims,
        request: Option<RegisterUserRequest>,
    ) -> AppResult<UserResponse> {
        if self.users.find_by_firebase_uid(&claims.sub).await?.is_some() {
            return Err(AppError::conflict("User already registered"));
        }

        let new_user = match request {
            Some(request) => {
                if let Some(phone) = &request.phone {
                    if self.users.phone_exists(phone).await? {
                        return Err(AppError::conflict("Phone number already in use"));
                    }
                }

                let nid_hash = sha512_hex(&request.nid);
                if self.users.nid_hash_exists(&nid_hash).await? {
                    return Err(AppError::conflict("National ID already registered"));
                }
                let nid_encrypted = self.encryptor.encrypt(&request.nid)?;

                NewUser {
                    firebase_uid: claims.sub,
                    name: request.name,
                    email: request.email,
                    phone: request.phone,
                    nid_hash,
                    nid_encrypted: Some(nid_encrypted),
                    role: UserRole::User,
                    profile_picture_url: None,
                }
            }
            None => {
                let name = claims
                    .name
                    .ok_or_else(|| AppError::validation("Token does not carry a display name"))?;
                let email = claims
                    .email
                    .ok_or_else(|| AppError::validation("Token does not carry an email"))?;

                NewUser {
                    firebase_uid: claims.sub,
                    name,
                    email,
                    phone: None,
                    nid_hash: NID_NOT_SET.to_string(),
                    nid_encrypted: None,
                    role: UserRole::User,
                    profile_picture_url: claims.picture,
                }
            }
        };

        let user = self.users.create(new_user).await?;
        tracing::info!(user_id = %user.user_id, "User registered");

        self.build_response(user).await
    }

    async fn get_profile(&self, claims: &FirebaseClaims) -> AppResult<UserResponse> {
        let user = self.resolve_user(claims).await?;
        self.build_response(user).await
    }

    async fn update_profile(
        &self,
        claims: &FirebaseClaims,
        request: UpdateUserRequest,
    ) -> AppResult<()> {
        let user = self.resolve_user(claims).await?;

        let mut patch = UserPatch {
            name: request.name,
            phone: request.phone,
            profile_picture_url: request.profile_picture_url,
            ..Default::default()
        };

        if let Some(phone) = &patch.phone {
            if user.phone.as_deref() != Some(phone) && self.users.phone_exists(phone).await? {
                return Err(AppError::conflict("Phone number already in use"));
            }
        }

        if let Some(nid) = request.nid {
            let nid_hash = sha512_hex(&nid);
            if nid_hash != user.nid_hash && self.users.nid_hash_exists(&nid_hash).await? {
                return Err(AppError::conflict("National ID already registered"));
            }
            patch.nid_encrypted = Some(self.encryptor.encrypt(&nid)?);
            patch.nid_hash = Some(nid_hash);
        }

        if patch.is_empty() {
            return Ok(());
        }

        self.users.update(user.user_id, patch).await?;
        Ok(())
    }
}
