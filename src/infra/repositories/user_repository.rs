//! User repository - persistence for user accounts.
//!
//! Query methods exclude soft-deleted users; a deleted account is
//! indistinguishable from a missing one at this layer.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{NewUser, User, UserPatch};
use crate::errors::{AppError, AppResult};

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by their Firebase UID
    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> AppResult<Option<User>>;

    /// Find an active user by primary key
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Check whether an active user already claims this phone number
    async fn phone_exists(&self, phone: &str) -> AppResult<bool>;

    /// Check whether an active user already claims this national-ID hash
    async fn nid_hash_exists(&self, nid_hash: &str) -> AppResult<bool>;

    /// Insert a new user row
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply a partial profile update to an active user
    async fn update(&self, user_id: Uuid, patch: UserPatch) -> AppResult<User>;
}

/// Concrete implementation of UserRepository backed by SeaORM.
pub struct UserStore {
    db: std::sync::Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_firebase_uid(&self, firebase_uid: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::FirebaseUid.eq(firebase_uid))
            .filter(user::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(user_id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn phone_exists(&self, phone: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::Phone.eq(phone))
            .filter(user::Column::DeletedAt.is_null())
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }

    async fn nid_hash_exists(&self, nid_hash: &str) -> AppResult<bool> {
        let count = UserEntity::find()
            .filter(user::Column::NidHash.eq(nid_hash))
            .filter(user::Column::DeletedAt.is_null())
            .count(&*self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            user_id: Set(Uuid::new_v4()),
            firebase_uid: Set(new_user.firebase_uid),
            name: Set(new_user.name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            nid_hash: Set(new_user.nid_hash),
            nid_encrypted: Set(new_user.nid_encrypted),
            role_name: Set(new_user.role.to_string()),
            profile_picture_url: Set(new_user.profile_picture_url),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&*self.db).await?;

        Ok(User::from(model))
    }

    async fn update(&self, user_id: Uuid, patch: UserPatch) -> AppResult<User> {
        let model = UserEntity::find_by_id(user_id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&*self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let mut active: user::ActiveModel = model.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(nid_hash) = patch.nid_hash {
            active.nid_hash = Set(nid_hash);
        }
        if let Some(nid_encrypted) = patch.nid_encrypted {
            active.nid_encrypted = Set(Some(nid_encrypted));
        }
        if let Some(url) = patch.profile_picture_url {
            active.profile_picture_url = Set(Some(url));
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&*self.db).await?;

        Ok(User::from(model))
    }
}
