//! Listing service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;
use rust_decimal::Decimal;
use uuid::Uuid;

use urbannest::domain::{
    listing::{
        ListingCreateRequest, ListingDetailsInput, ListingLocationInput, ListingUpdateRequest,
        MediaItemInput,
    },
    ListingCondition, ListingCounters, ListingDetails, ListingFilter, ListingLocation,
    ListingMediaItem, ListingOwner, ListingRecord, MediaContentType, PriceChange,
    PropertyStatus, PropertyType, User, UserRole,
};
use urbannest::errors::AppError;
use urbannest::infra::{
    FirebaseClaims, MockListingRepository, MockObjectStorage, MockUserRepository,
};
use urbannest::services::{ListingManager, ListingService};
use urbannest::types::PaginationParams;

const OWNER_UID: &str = "owner-firebase-uid";

fn price(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn owner_claims() -> FirebaseClaims {
    FirebaseClaims {
        sub: OWNER_UID.to_string(),
        name: None,
        email: None,
        picture: None,
    }
}

fn stranger_claims() -> FirebaseClaims {
    FirebaseClaims {
        sub: "someone-else".to_string(),
        name: None,
        email: None,
        picture: None,
    }
}

fn owner_user() -> User {
    let now = chrono::Utc::now();
    User {
        user_id: Uuid::new_v4(),
        firebase_uid: OWNER_UID.to_string(),
        name: "Owner".to_string(),
        email: "owner@example.com".to_string(),
        phone: None,
        nid_hash: "hash".to_string(),
        nid_encrypted: None,
        role: UserRole::User,
        profile_picture_url: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

fn sample_record(listing_id: Uuid) -> ListingRecord {
    let now = chrono::Utc::now();
    ListingRecord {
        listing_id,
        title: "Modern 3BR Apartment in Gulshan".to_string(),
        description: None,
        property_type: PropertyType::Apartment,
        property_status: PropertyStatus::Published,
        pricing: price("4500000.00"),
        owner: ListingOwner {
            user_id: Uuid::new_v4(),
            firebase_uid: OWNER_UID.to_string(),
            name: "Owner".to_string(),
            profile_picture_url: None,
        },
        details: Some(ListingDetails {
            year_built: 2020,
            listing_condition: ListingCondition::New,
            facing_direction: None,
            bedrooms_count: 3,
            bathrooms_count: 2,
            balconies_count: 1,
            floor_level: Some(4),
            furnished: Some(true),
            parking_area: Some(1),
            pet_friendly: None,
            lot_area: None,
            living_area: 1450,
        }),
        location: Some(ListingLocation {
            address_line: "House 12, Road 5, Block F".to_string(),
            area: "Gulshan 2".to_string(),
            district: "Dhaka".to_string(),
            zip_code: "1212".to_string(),
            latitude: price("23.780000"),
            longitude: price("90.420000"),
        }),
        counters: Some(ListingCounters {
            view_count: 0,
            favorite_count: 2,
            save_count: 1,
        }),
        media: vec![ListingMediaItem {
            media_id: Uuid::new_v4(),
            s3_location: "listings/550e8400/photo.jpg".to_string(),
            content_type: MediaContentType::Image,
            sort_order: 0,
        }],
        created_at: now,
        published_at: Some(now),
        updated_at: now,
        deleted_at: None,
    }
}

fn create_request(is_publishing: bool) -> ListingCreateRequest {
    ListingCreateRequest {
        title: "Modern 3BR Apartment in Gulshan".to_string(),
        description: Some("Bright corner unit".to_string()),
        property_type: PropertyType::Apartment,
        pricing: price("4500000.00"),
        details: ListingDetailsInput {
            year_built: 2020,
            listing_condition: ListingCondition::New,
            facing_direction: None,
            bedrooms_count: 3,
            bathrooms_count: 2,
            balconies_count: 1,
            floor_level: Some(4),
            furnished: Some(true),
            parking_area: Some(1),
            pet_friendly: None,
            lot_area: None,
            living_area: 1450,
        },
        location: ListingLocationInput {
            address_line: "House 12, Road 5, Block F".to_string(),
            area: "Gulshan 2".to_string(),
            district: "Dhaka".to_string(),
            zip_code: "1212".to_string(),
            latitude: price("23.780000"),
            longitude: price("90.420000"),
        },
        medias: Some(vec![MediaItemInput {
            s3_location: "listings/550e8400/photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            sort_order: 0,
            byte_size: 123_456,
            caption: None,
        }]),
        is_publishing,
    }
}

fn service(
    listings: MockListingRepository,
    users: MockUserRepository,
    storage: MockObjectStorage,
) -> ListingManager<MockListingRepository, MockUserRepository> {
    ListingManager::new(Arc::new(listings), Arc::new(users), Arc::new(storage))
}

fn users_resolving_owner() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_firebase_uid()
        .with(eq(OWNER_UID))
        .returning(|_| Ok(Some(owner_user())));
    users
}

#[tokio::test]
async fn create_published_listing_maps_request() {
    let mut listings = MockListingRepository::new();
    listings
        .expect_create()
        .withf(|new_listing| {
            new_listing.property_status == PropertyStatus::Published
                && new_listing.property_type == PropertyType::Apartment
                && new_listing.media.len() == 1
                && new_listing.media[0].content_type == MediaContentType::Image
                && new_listing.details.bedrooms_count == 3
                && new_listing.location.district == "Dhaka"
        })
        .returning(|_| Ok(Uuid::new_v4()));

    service(listings, users_resolving_owner(), MockObjectStorage::new())
        .create_listing(&owner_claims(), create_request(true))
        .await
        .unwrap();
}

#[tokio::test]
async fn create_draft_listing_stays_draft() {
    let mut listings = MockListingRepository::new();
    listings
        .expect_create()
        .withf(|new_listing| new_listing.property_status == PropertyStatus::Draft)
        .returning(|_| Ok(Uuid::new_v4()));

    service(listings, users_resolving_owner(), MockObjectStorage::new())
        .create_listing(&owner_claims(), create_request(false))
        .await
        .unwrap();
}

#[tokio::test]
async fn create_rejects_unknown_media_mime() {
    let mut request = create_request(true);
    request.medias.as_mut().unwrap()[0].content_type = "application/pdf".to_string();

    let result = service(
        MockListingRepository::new(),
        users_resolving_owner(),
        MockObjectStorage::new(),
    )
    .create_listing(&owner_claims(), request)
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn get_listing_presigns_media_urls() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .with(eq(listing_id))
        .returning(move |id| Ok(Some(sample_record(id))));

    let mut storage = MockObjectStorage::new();
    storage
        .expect_presign_download()
        .with(eq("listings/550e8400/photo.jpg"))
        .returning(|_| Ok("https://signed.example/photo.jpg".to_string()));

    let response = service(listings, MockUserRepository::new(), storage)
        .get_listing(listing_id)
        .await
        .unwrap();

    assert_eq!(response.media.len(), 1);
    assert_eq!(response.media[0].url, "https://signed.example/photo.jpg");
    assert_eq!(response.counters.as_ref().unwrap().favorite_count, 2);
}

#[tokio::test]
async fn get_missing_listing_is_not_found() {
    let mut listings = MockListingRepository::new();
    listings.expect_find_by_id().returning(|_| Ok(None));

    let result = service(
        listings,
        MockUserRepository::new(),
        MockObjectStorage::new(),
    )
    .get_listing(Uuid::new_v4())
    .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn update_by_non_owner_is_forbidden() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));

    let result = service(
        listings,
        MockUserRepository::new(),
        MockObjectStorage::new(),
    )
    .update_listing(&stranger_claims(), listing_id, ListingUpdateRequest::default())
    .await;

    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn update_with_new_price_records_history() {
    let listing_id = Uuid::new_v4();
    let old_price = price("4500000.00");
    let new_price = price("4800000.00");

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings
        .expect_update()
        .withf(move |id, patch| {
            *id == listing_id
                && patch.pricing == Some(new_price)
                && patch.price_change
                    == Some(PriceChange {
                        old_price,
                        new_price,
                    })
        })
        .returning(|_, _| Ok(()));

    let request = ListingUpdateRequest {
        pricing: Some(new_price),
        ..Default::default()
    };

    service(listings, MockUserRepository::new(), MockObjectStorage::new())
        .update_listing(&owner_claims(), listing_id, request)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_with_same_price_skips_history() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings
        .expect_update()
        .withf(|_, patch| patch.price_change.is_none())
        .returning(|_, _| Ok(()));

    let request = ListingUpdateRequest {
        pricing: Some(price("4500000.00")),
        ..Default::default()
    };

    service(listings, MockUserRepository::new(), MockObjectStorage::new())
        .update_listing(&owner_claims(), listing_id, request)
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_by_owner_soft_deletes() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings
        .expect_soft_delete()
        .with(eq(listing_id))
        .returning(|_| Ok(()));

    service(listings, MockUserRepository::new(), MockObjectStorage::new())
        .delete_listing(&owner_claims(), listing_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn search_maps_records_to_page() {
    let mut listings = MockListingRepository::new();
    listings
        .expect_search()
        .withf(|filter: &ListingFilter, _| {
            filter.district.as_deref() == Some("Dhaka") && filter.min_bedrooms == Some(3)
        })
        .returning(|_, _| Ok((vec![sample_record(Uuid::new_v4())], 1)));

    let mut storage = MockObjectStorage::new();
    storage
        .expect_presign_download()
        .returning(|key| Ok(format!("https://signed.example/{key}")));

    let filter = ListingFilter {
        district: Some("Dhaka".to_string()),
        min_bedrooms: Some(3),
        ..Default::default()
    };

    let page = service(listings, MockUserRepository::new(), storage)
        .search_listings(filter, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].property_status, PropertyStatus::Published);
}

#[tokio::test]
async fn favorite_twice_is_conflict() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings.expect_favorite_exists().returning(|_, _| Ok(true));

    let result = service(listings, users_resolving_owner(), MockObjectStorage::new())
        .add_favorite(&owner_claims(), listing_id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn favorite_new_listing_succeeds() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings.expect_favorite_exists().returning(|_, _| Ok(false));
    listings
        .expect_add_favorite()
        .withf(move |_, id| *id == listing_id)
        .returning(|_, _| Ok(()));

    service(listings, users_resolving_owner(), MockObjectStorage::new())
        .add_favorite(&owner_claims(), listing_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn unfavorite_missing_is_not_found() {
    let mut listings = MockListingRepository::new();
    listings.expect_favorite_exists().returning(|_, _| Ok(false));

    let result = service(listings, users_resolving_owner(), MockObjectStorage::new())
        .remove_favorite(&owner_claims(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn save_twice_is_conflict() {
    let listing_id = Uuid::new_v4();

    let mut listings = MockListingRepository::new();
    listings
        .expect_find_by_id()
        .returning(move |id| Ok(Some(sample_record(id))));
    listings.expect_saved_exists().returning(|_, _| Ok(true));

    let result = service(listings, users_resolving_owner(), MockObjectStorage::new())
        .save_listing(&owner_claims(), listing_id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn unsave_missing_is_not_found() {
    let mut listings = MockListingRepository::new();
    listings.expect_saved_exists().returning(|_, _| Ok(false));

    let result = service(listings, users_resolving_owner(), MockObjectStorage::new())
        .unsave_listing(&owner_claims(), Uuid::new_v4())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}
