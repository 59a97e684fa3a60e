//! User service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use urbannest::domain::{
    NewUser, RegisterUserRequest, UpdateUserRequest, User, UserRole,
};
use urbannest::errors::AppError;
use urbannest::infra::{FirebaseClaims, MockObjectStorage, MockUserRepository};
use urbannest::services::{UserManager, UserService};
use urbannest::utils::Encryptor;

// 32 'A' bytes, base64-encoded
const TEST_ENCRYPTION_KEY: &str = "QUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUE=";
const FIREBASE_UID: &str = "test-firebase-uid";

fn claims() -> FirebaseClaims {
    FirebaseClaims {
        sub: FIREBASE_UID.to_string(),
        name: None,
        email: None,
        picture: None,
    }
}

fn google_claims() -> FirebaseClaims {
    FirebaseClaims {
        sub: FIREBASE_UID.to_string(),
        name: Some("Google User".to_string()),
        email: Some("google@example.com".to_string()),
        picture: Some("https://photo.url".to_string()),
    }
}

fn user_from_new(new_user: NewUser) -> User {
    let now = chrono::Utc::now();
    User {
        user_id: Uuid::new_v4(),
        firebase_uid: new_user.firebase_uid,
        name: new_user.name,
        email: new_user.email,
        phone: new_user.phone,
        nid_hash: new_user.nid_hash,
        nid_encrypted: new_user.nid_encrypted,
        role: new_user.role,
        profile_picture_url: new_user.profile_picture_url,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn existing_user() -> User {
    user_from_new(NewUser {
        firebase_uid: FIREBASE_UID.to_string(),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: Some("+8801712345678".to_string()),
        nid_hash: "hash".to_string(),
        nid_encrypted: None,
        role: UserRole::User,
        profile_picture_url: None,
    })
}

fn service(
    users: MockUserRepository,
    storage: MockObjectStorage,
) -> UserManager<MockUserRepository> {
    UserManager::new(
        Arc::new(users),
        Arc::new(storage),
        Encryptor::from_base64(TEST_ENCRYPTION_KEY).unwrap(),
    )
}

fn registration_request() -> RegisterUserRequest {
    RegisterUserRequest {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: Some("+8801712345678".to_string()),
        nid: "1234567890".to_string(),
    }
}

#[tokio::test]
async fn register_normal_registration_succeeds() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .with(eq(FIREBASE_UID))
        .returning(|_| Ok(None));
    users
        .expect_phone_exists()
        .with(eq("+8801712345678"))
        .returning(|_| Ok(false));
    users.expect_nid_hash_exists().returning(|_| Ok(false));
    users
        .expect_create()
        .withf(|new_user| {
            new_user.firebase_uid == FIREBASE_UID
                // SHA-512 digest in hex
                && new_user.nid_hash.len() == 128
                && new_user.nid_encrypted.is_some()
                && new_user.role == UserRole::User
        })
        .returning(|new_user| Ok(user_from_new(new_user)));

    let response = service(users, MockObjectStorage::new())
        .register(claims(), Some(registration_request()))
        .await
        .unwrap();

    assert_eq!(response.name, "John Doe");
    assert_eq!(response.email, "john@example.com");
    assert_eq!(response.role_name, "user");
    // The stored ciphertext decrypts back to the submitted NID
    assert_eq!(response.nid.as_deref(), Some("1234567890"));
}

#[tokio::test]
async fn register_google_login_uses_token_claims() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|new_user| {
            new_user.name == "Google User"
                && new_user.email == "google@example.com"
                && new_user.nid_hash == "NOT_SET"
                && new_user.nid_encrypted.is_none()
                && new_user.profile_picture_url.as_deref() == Some("https://photo.url")
        })
        .returning(|new_user| Ok(user_from_new(new_user)));

    let response = service(users, MockObjectStorage::new())
        .register(google_claims(), None)
        .await
        .unwrap();

    assert_eq!(response.name, "Google User");
    assert!(response.nid.is_none());
    // Federated picture URLs are passed through untouched
    assert_eq!(
        response.profile_picture_url.as_deref(),
        Some("https://photo.url")
    );
}

#[tokio::test]
async fn register_duplicate_uid_is_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .returning(|_| Ok(Some(existing_user())));

    let result = service(users, MockObjectStorage::new())
        .register(claims(), Some(registration_request()))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn register_taken_phone_is_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_firebase_uid().returning(|_| Ok(None));
    users.expect_phone_exists().returning(|_| Ok(true));

    let result = service(users, MockObjectStorage::new())
        .register(claims(), Some(registration_request()))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn register_taken_nid_is_conflict() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_firebase_uid().returning(|_| Ok(None));
    users.expect_phone_exists().returning(|_| Ok(false));
    users.expect_nid_hash_exists().returning(|_| Ok(true));

    let result = service(users, MockObjectStorage::new())
        .register(claims(), Some(registration_request()))
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn get_profile_unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_firebase_uid().returning(|_| Ok(None));

    let result = service(users, MockObjectStorage::new())
        .get_profile(&claims())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn get_profile_presigns_stored_picture_key() {
    let mut user = existing_user();
    user.profile_picture_url = Some("profiles/abc/photo.jpg".to_string());

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .returning(move |_| Ok(Some(user.clone())));

    let mut storage = MockObjectStorage::new();
    storage
        .expect_presign_download()
        .with(eq("profiles/abc/photo.jpg"))
        .returning(|_| Ok("https://signed.example/photo.jpg".to_string()));

    let response = service(users, storage).get_profile(&claims()).await.unwrap();

    assert_eq!(
        response.profile_picture_url.as_deref(),
        Some("https://signed.example/photo.jpg")
    );
}

#[tokio::test]
async fn update_profile_rehashes_and_reencrypts_nid() {
    let user = existing_user();
    let user_id = user.user_id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .returning(move |_| Ok(Some(user.clone())));
    users.expect_nid_hash_exists().returning(|_| Ok(false));
    users
        .expect_update()
        .withf(move |id, patch| {
            *id == user_id
                && patch.nid_hash.as_ref().is_some_and(|h| h.len() == 128)
                && patch.nid_encrypted.is_some()
        })
        .returning(|_, patch| {
            let mut user = existing_user();
            if let Some(hash) = patch.nid_hash {
                user.nid_hash = hash;
            }
            user.nid_encrypted = patch.nid_encrypted;
            Ok(user)
        });

    let request = UpdateUserRequest {
        name: None,
        phone: None,
        nid: Some("9876543210".to_string()),
        profile_picture_url: None,
    };

    service(users, MockObjectStorage::new())
        .update_profile(&claims(), request)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_profile_with_empty_body_is_noop() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .returning(|_| Ok(Some(existing_user())));
    // No expect_update: the service must not touch the repository

    let request = UpdateUserRequest {
        name: None,
        phone: None,
        nid: None,
        profile_picture_url: None,
    };

    service(users, MockObjectStorage::new())
        .update_profile(&claims(), request)
        .await
        .unwrap();
}
