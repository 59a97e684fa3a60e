//! Listing service - Handles listing CRUD, search, favorites, and saves.
//!
//! Ownership checks compare the listing owner's Firebase UID against the
//! verified claims; only owners may update or delete. Price changes on
//! update are detected here and handed to the repository so the history
//! row lands in the same transaction.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    listing::{
        ListingCreateRequest, ListingMediaResponse, ListingOwnerResponse, ListingUpdateRequest,
        MediaItemInput,
    },
    ListingFilter, ListingPatch, ListingRecord, ListingResponse, MediaContentType, NewListing,
    NewListingMedia, PriceChange, PropertyStatus, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{FirebaseClaims, ListingRepository, ObjectStorage, UserRepository};
use crate::types::{Paginated, PaginationParams};

/// Listing service trait for dependency injection.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Create a listing as draft or published; returns the new id
    async fn create_listing(
        &self,
        claims: &FirebaseClaims,
        request: ListingCreateRequest,
    ) -> AppResult<Uuid>;

    /// Full listing response by id (public)
    async fn get_listing(&self, listing_id: Uuid) -> AppResult<ListingResponse>;

    /// Owner-only partial update with price-history tracking
    async fn update_listing(
        &self,
        claims: &FirebaseClaims,
        listing_id: Uuid,
        request: ListingUpdateRequest,
    ) -> AppResult<()>;

    /// Owner-only soft delete (archives the listing)
    async fn delete_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()>;

    /// Public search over published listings
    async fn search_listings(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    /// The authenticated user's own listings
    async fn my_listings(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    /// Add a listing to favorites (409 when already present)
    async fn add_favorite(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()>;

    /// Remove a listing from favorites (404 when absent)
    async fn remove_favorite(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()>;

    /// Listings the authenticated user favorited
    async fn my_favorites(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;

    /// Save a listing for later (409 when already present)
    async fn save_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()>;

    /// Remove a listing from the saved list (404 when absent)
    async fn unsave_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()>;

    /// Listings the authenticated user saved
    async fn my_saved_listings(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>>;
}

/// Concrete implementation of ListingService.
pub struct ListingManager<L: ListingRepository, R: UserRepository> {
    listings: Arc<L>,
    users: Arc<R>,
    storage: Arc<dyn ObjectStorage>,
}

impl<L: ListingRepository, R: UserRepository> ListingManager<L, R> {
    /// Create new listing service instance
    pub fn new(listings: Arc<L>, users: Arc<R>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            listings,
            users,
            storage,
        }
    }

    async fn resolve_user(&self, claims: &FirebaseClaims) -> AppResult<User> {
        self.users
            .find_by_firebase_uid(&claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn resolve_listing(&self, listing_id: Uuid) -> AppResult<ListingRecord> {
        self.listings
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing with id {listing_id} not found")))
    }

    fn verify_ownership(record: &ListingRecord, claims: &FirebaseClaims) -> AppResult<()> {
        if record.owner.firebase_uid == claims.sub {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn convert_media(items: Vec<MediaItemInput>) -> AppResult<Vec<NewListingMedia>> {
        items
            .into_iter()
            .map(|item| {
                let content_type = MediaContentType::from_mime(&item.content_type)
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Unsupported media content type: {}",
                            item.content_type
                        ))
                    })?;
                Ok(NewListingMedia {
                    s3_location: item.s3_location,
                    content_type,
                    sort_order: item.sort_order,
                    byte_size: item.byte_size,
                    caption: item.caption,
                })
            })
            .collect()
    }

    /// Map an aggregate to its API shape, presigning media and owner
    /// picture URLs on the way out.
    async fn to_response(&self, record: ListingRecord) -> AppResult<ListingResponse> {
        let owner_picture = match record.owner.profile_picture_url {
            Some(value) if !value.starts_with("http") => {
                Some(self.storage.presign_download(&value).await?)
            }
            other => other,
        };

        let mut media = Vec::with_capacity(record.media.len());
        for item in record.media {
            media.push(ListingMediaResponse {
                media_id: item.media_id,
                url: self.storage.presign_download(&item.s3_location).await?,
                content_type: item.content_type,
                sort_order: item.sort_order,
            });
        }

        Ok(ListingResponse {
            listing_id: record.listing_id,
            title: record.title,
            description: record.description,
            property_type: record.property_type,
            property_status: record.property_status,
            pricing: record.pricing,
            owner: ListingOwnerResponse {
                user_id: record.owner.user_id,
                name: record.owner.name,
                profile_picture_url: owner_picture,
            },
            details: record.details.map(Into::into),
            location: record.location.map(Into::into),
            counters: record.counters.map(Into::into),
            media,
            created_at: record.created_at,
            published_at: record.published_at,
            updated_at: record.updated_at,
        })
    }

    async fn to_response_page(
        &self,
        records: Vec<ListingRecord>,
        page: &PaginationParams,
        total: u64,
    ) -> AppResult<Paginated<ListingResponse>> {
        let mut data = Vec::with_capacity(records.len());
        for record in records {
            data.push(self.to_response(record).await?);
        }
        Ok(Paginated::new(data, page.page, page.limit(), total))
    }
}

#[async_trait]
impl<L: ListingRepository, R: UserRepository> ListingService for ListingManager<L, R> {
    async fn create_listing(
        &self,
        claims: &FirebaseClaims,
        request: ListingCreateRequest,
    ) -> AppResult<Uuid> {
        let user = self.resolve_user(claims).await?;

        let property_status = if request.is_publishing {
            PropertyStatus::Published
        } else {
            PropertyStatus::Draft
        };
        let media = Self::convert_media(request.medias.unwrap_or_default())?;

        let listing_id = self
            .listings
            .create(NewListing {
                owner_id: user.user_id,
                title: request.title,
                description: request.description,
                property_type: request.property_type,
                property_status,
                pricing: request.pricing,
                details: request.details.into(),
                location: request.location.into(),
                media,
            })
            .await?;

        tracing::info!(%listing_id, "Listing created");
        Ok(listing_id)
    }

    async fn get_listing(&self, listing_id: Uuid) -> AppResult<ListingResponse> {
        let record = self.resolve_listing(listing_id).await?;
        self.to_response(record).await
    }

    async fn update_listing(
        &self,
        claims: &FirebaseClaims,
        listing_id: Uuid,
        request: ListingUpdateRequest,
    ) -> AppResult<()> {
        let record = self.resolve_listing(listing_id).await?;
        Self::verify_ownership(&record, claims)?;

        let price_change = match request.pricing {
            Some(new_price) if new_price != record.pricing => Some(PriceChange {
                old_price: record.pricing,
                new_price,
            }),
            _ => None,
        };

        let media = Self::convert_media(request.media_items.unwrap_or_default())?;

        self.listings
            .update(
                listing_id,
                ListingPatch {
                    title: request.title,
                    description: request.description,
                    property_type: request.property_type,
                    property_status: request.property_status,
                    pricing: request.pricing,
                    details: request.details.map(Into::into),
                    location: request.location.map(Into::into),
                    media,
                    price_change,
                },
            )
            .await
    }

    async fn delete_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()> {
        let record = self.resolve_listing(listing_id).await?;
        Self::verify_ownership(&record, claims)?;

        self.listings.soft_delete(listing_id).await
    }

    async fn search_listings(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let (records, total) = self.listings.search(filter, page.clone()).await?;
        self.to_response_page(records, &page, total).await
    }

    async fn my_listings(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let user = self.resolve_user(claims).await?;
        let (records, total) = self
            .listings
            .list_by_owner(user.user_id, page.clone())
            .await?;
        self.to_response_page(records, &page, total).await
    }

    async fn add_favorite(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()> {
        let user = self.resolve_user(claims).await?;
        self.resolve_listing(listing_id).await?;

        if self
            .listings
            .favorite_exists(user.user_id, listing_id)
            .await?
        {
            return Err(AppError::conflict("Listing is already in favorites"));
        }

        self.listings.add_favorite(user.user_id, listing_id).await
    }

    async fn remove_favorite(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()> {
        let user = self.resolve_user(claims).await?;

        if !self
            .listings
            .favorite_exists(user.user_id, listing_id)
            .await?
        {
            return Err(AppError::not_found("Listing is not in favorites"));
        }

        self.listings
            .remove_favorite(user.user_id, listing_id)
            .await
    }

    async fn my_favorites(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let user = self.resolve_user(claims).await?;
        let (records, total) = self
            .listings
            .list_favorites(user.user_id, page.clone())
            .await?;
        self.to_response_page(records, &page, total).await
    }

    async fn save_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()> {
        let user = self.resolve_user(claims).await?;
        self.resolve_listing(listing_id).await?;

        if self.listings.saved_exists(user.user_id, listing_id).await? {
            return Err(AppError::conflict("Listing is already saved"));
        }

        self.listings.add_saved(user.user_id, listing_id).await
    }

    async fn unsave_listing(&self, claims: &FirebaseClaims, listing_id: Uuid) -> AppResult<()> {
        let user = self.resolve_user(claims).await?;

        if !self.listings.saved_exists(user.user_id, listing_id).await? {
            return Err(AppError::not_found("Listing is not saved"));
        }

        self.listings.remove_saved(user.user_id, listing_id).await
    }

    async fn my_saved_listings(
        &self,
        claims: &FirebaseClaims,
        page: PaginationParams,
    ) -> AppResult<Paginated<ListingResponse>> {
        let user = self.resolve_user(claims).await?;
        let (records, total) = self.listings.list_saved(user.user_id, page.clone()).await?;
        self.to_response_page(records, &page, total).await
    }
}
