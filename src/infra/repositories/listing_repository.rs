//! Listing repository - persistence for the listing aggregate.
//!
//! Creates and updates span several tables (listing, details, location,
//! counters, media, price history), so the write paths run inside a
//! database transaction. Read paths batch-load the satellite rows to
//! avoid per-listing queries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    favorite_listing, listing, listing_counters, listing_details, listing_location, listing_media,
    listing_price_history, media_asset, saved_listing, user,
};
use crate::domain::{
    ListingCounters, ListingDetails, ListingFilter, ListingLocation, ListingMediaItem,
    ListingOwner, ListingPatch, ListingRecord, NewListing, NewListingMedia, PropertyStatus,
};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Listing repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a listing aggregate (listing + details + location + counters + media)
    async fn create(&self, new_listing: NewListing) -> AppResult<Uuid>;

    /// Load a full listing aggregate by id (including soft-deleted rows)
    async fn find_by_id(&self, listing_id: Uuid) -> AppResult<Option<ListingRecord>>;

    /// Public search over published, non-deleted listings
    async fn search(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)>;

    /// Non-deleted listings owned by a user, newest first
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)>;

    /// Apply a partial update; writes a price-history row when requested
    async fn update(&self, listing_id: Uuid, patch: ListingPatch) -> AppResult<()>;

    /// Soft delete: archive the listing and stamp deleted_at
    async fn soft_delete(&self, listing_id: Uuid) -> AppResult<()>;

    /// Check whether the user already favorited the listing
    async fn favorite_exists(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool>;

    /// Record a favorite and bump the listing's favorite counter
    async fn add_favorite(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    /// Remove a favorite and decrement the counter (floored at zero)
    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    /// Listings the user favorited, most recently favorited first
    async fn list_favorites(
        &self,
        user_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)>;

    /// Check whether the user already saved the listing
    async fn saved_exists(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool>;

    /// Record a save and bump the listing's save counter
    async fn add_saved(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    /// Remove a save and decrement the counter (floored at zero)
    async fn remove_saved(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    /// Listings the user saved, most recently saved first
    async fn list_saved(
        &self,
        user_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)>;
}

/// Concrete implementation of ListingRepository backed by SeaORM.
pub struct ListingStore {
    db: std::sync::Arc<DatabaseConnection>,
}

impl ListingStore {
    /// Create new repository instance
    pub fn new(db: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Batch-load owners, satellite rows, and ordered media for a page of
    /// listings, preserving the input order.
    async fn hydrate(&self, models: Vec<listing::Model>) -> AppResult<Vec<ListingRecord>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let listing_ids: Vec<Uuid> = models.iter().map(|m| m.listing_id).collect();
        let owner_ids: Vec<Uuid> = models.iter().map(|m| m.user_id).collect();

        let owners: HashMap<Uuid, user::Model> = user::Entity::find()
            .filter(user::Column::UserId.is_in(owner_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| (m.user_id, m))
            .collect();

        let details: HashMap<Uuid, listing_details::Model> = listing_details::Entity::find()
            .filter(listing_details::Column::ListingId.is_in(listing_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| (m.listing_id, m))
            .collect();

        let locations: HashMap<Uuid, listing_location::Model> = listing_location::Entity::find()
            .filter(listing_location::Column::ListingId.is_in(listing_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| (m.listing_id, m))
            .collect();

        let counters: HashMap<Uuid, listing_counters::Model> = listing_counters::Entity::find()
            .filter(listing_counters::Column::ListingId.is_in(listing_ids.clone()))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|m| (m.listing_id, m))
            .collect();

        let mut media_by_listing: HashMap<Uuid, Vec<ListingMediaItem>> = HashMap::new();
        let links = listing_media::Entity::find()
            .find_also_related(media_asset::Entity)
            .filter(listing_media::Column::ListingId.is_in(listing_ids))
            .order_by_asc(listing_media::Column::SortOrder)
            .all(&*self.db)
            .await?;
        for (link, asset) in links {
            let asset =
                asset.ok_or_else(|| AppError::internal("Listing media link without asset"))?;
            media_by_listing
                .entry(link.listing_id)
                .or_default()
                .push(ListingMediaItem {
                    media_id: asset.media_id,
                    s3_location: asset.s3_location,
                    content_type: asset
                        .content_type
                        .parse()
                        .map_err(AppError::internal)?,
                    sort_order: link.sort_order,
                });
        }

        models
            .into_iter()
            .map(|model| {
                let owner = owners
                    .get(&model.user_id)
                    .ok_or_else(|| AppError::internal("Listing owner row missing"))?;

                Ok(ListingRecord {
                    listing_id: model.listing_id,
                    title: model.title,
                    description: model.description,
                    property_type: model.property_type.parse().map_err(AppError::internal)?,
                    property_status: model
                        .property_status
                        .parse()
                        .map_err(AppError::internal)?,
                    pricing: model.pricing,
                    owner: ListingOwner {
                        user_id: owner.user_id,
                        firebase_uid: owner.firebase_uid.clone(),
                        name: owner.name.clone(),
                        profile_picture_url: owner.profile_picture_url.clone(),
                    },
                    details: details
                        .get(&model.listing_id)
                        .cloned()
                        .map(ListingDetails::try_from)
                        .transpose()
                        .map_err(AppError::internal)?,
                    location: locations
                        .get(&model.listing_id)
                        .cloned()
                        .map(ListingLocation::from),
                    counters: counters
                        .get(&model.listing_id)
                        .cloned()
                        .map(ListingCounters::from),
                    media: media_by_listing.remove(&model.listing_id).unwrap_or_default(),
                    created_at: model.created_at,
                    published_at: model.published_at,
                    updated_at: model.updated_at,
                    deleted_at: model.deleted_at,
                })
            })
            .collect()
    }

    /// Fetch the listing rows for a set of ids and hydrate them in the
    /// order the ids were given (used by favorite/saved pages).
    async fn hydrate_in_order(&self, listing_ids: Vec<Uuid>) -> AppResult<Vec<ListingRecord>> {
        if listing_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = listing::Entity::find()
            .filter(listing::Column::ListingId.is_in(listing_ids.clone()))
            .all(&*self.db)
            .await?;

        let mut by_id: HashMap<Uuid, listing::Model> =
            models.into_iter().map(|m| (m.listing_id, m)).collect();
        let ordered: Vec<listing::Model> = listing_ids
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();

        self.hydrate(ordered).await
    }
}

/// Insert a batch of media assets and their listing links inside `txn`.
async fn insert_media(
    txn: &sea_orm::DatabaseTransaction,
    listing_id: Uuid,
    owner_id: Uuid,
    media: Vec<NewListingMedia>,
) -> Result<(), DbErr> {
    let now = Utc::now();
    for item in media {
        let media_id = Uuid::new_v4();
        media_asset::ActiveModel {
            media_id: Set(media_id),
            owner_user_id: Set(owner_id),
            s3_location: Set(item.s3_location),
            content_type: Set(item.content_type.as_str().to_string()),
            byte_size: Set(item.byte_size),
            caption: Set(item.caption),
            metadata: Set(None),
            created_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(txn)
        .await?;

        listing_media::ActiveModel {
            listing_id: Set(listing_id),
            media_id: Set(media_id),
            sort_order: Set(item.sort_order),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl ListingRepository for ListingStore {
    async fn create(&self, new_listing: NewListing) -> AppResult<Uuid> {
        let listing_id = Uuid::new_v4();
        let now = Utc::now();

        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let published_at =
                        (new_listing.property_status == PropertyStatus::Published).then_some(now);

                    listing::ActiveModel {
                        listing_id: Set(listing_id),
                        user_id: Set(new_listing.owner_id),
                        property_type: Set(new_listing.property_type.as_str().to_string()),
                        property_status: Set(new_listing.property_status.as_str().to_string()),
                        title: Set(new_listing.title),
                        description: Set(new_listing.description),
                        pricing: Set(new_listing.pricing),
                        created_at: Set(now),
                        published_at: Set(published_at),
                        updated_at: Set(now),
                        deleted_at: Set(None),
                    }
                    .insert(txn)
                    .await?;

                    let details = new_listing.details;
                    listing_details::ActiveModel {
                        listing_id: Set(listing_id),
                        year_built: Set(details.year_built),
                        listing_condition: Set(details.listing_condition.as_str().to_string()),
                        facing_direction: Set(details
                            .facing_direction
                            .map(|d| d.as_str().to_string())),
                        bedrooms_count: Set(details.bedrooms_count),
                        bathrooms_count: Set(details.bathrooms_count),
                        balconies_count: Set(details.balconies_count),
                        floor_level: Set(details.floor_level),
                        furnished: Set(details.furnished),
                        parking_area: Set(details.parking_area),
                        pet_friendly: Set(details.pet_friendly),
                        lot_area: Set(details.lot_area),
                        living_area: Set(details.living_area),
                    }
                    .insert(txn)
                    .await?;

                    let location = new_listing.location;
                    listing_location::ActiveModel {
                        listing_id: Set(listing_id),
                        address_line: Set(location.address_line),
                        area: Set(location.area),
                        district: Set(location.district),
                        zip_code: Set(location.zip_code),
                        latitude: Set(location.latitude),
                        longitude: Set(location.longitude),
                    }
                    .insert(txn)
                    .await?;

                    listing_counters::ActiveModel {
                        listing_id: Set(listing_id),
                        view_count: Set(0),
                        favorite_count: Set(0),
                        save_count: Set(0),
                    }
                    .insert(txn)
                    .await?;

                    insert_media(txn, listing_id, new_listing.owner_id, new_listing.media).await?;

                    Ok(())
                })
            })
            .await?;

        Ok(listing_id)
    }

    async fn find_by_id(&self, listing_id: Uuid) -> AppResult<Option<ListingRecord>> {
        let Some(model) = listing::Entity::find_by_id(listing_id).one(&*self.db).await? else {
            return Ok(None);
        };

        let mut records = self.hydrate(vec![model]).await?;
        Ok(records.pop())
    }

    async fn search(
        &self,
        filter: ListingFilter,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)> {
        let mut query = listing::Entity::find()
            .filter(listing::Column::PropertyStatus.eq(PropertyStatus::Published.as_str()))
            .filter(listing::Column::DeletedAt.is_null());

        if let Some(property_type) = filter.property_type {
            query = query.filter(listing::Column::PropertyType.eq(property_type.as_str()));
        }
        if let Some(price_min) = filter.price_min {
            query = query.filter(listing::Column::Pricing.gte(price_min));
        }
        if let Some(price_max) = filter.price_max {
            query = query.filter(listing::Column::Pricing.lte(price_max));
        }
        if let Some(district) = filter.district {
            query = query
                .join(JoinType::InnerJoin, listing::Relation::Location.def())
                .filter(listing_location::Column::District.eq(district));
        }
        if let Some(min_bedrooms) = filter.min_bedrooms {
            query = query
                .join(JoinType::InnerJoin, listing::Relation::Details.def())
                .filter(listing_details::Column::BedroomsCount.gte(min_bedrooms));
        }

        let paginator = query
            .order_by_desc(listing::Column::CreatedAt)
            .paginate(&*self.db, page.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        let records = self.hydrate(models).await?;
        Ok((records, total))
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)> {
        let paginator = listing::Entity::find()
            .filter(listing::Column::UserId.eq(owner_id))
            .filter(listing::Column::DeletedAt.is_null())
            .order_by_desc(listing::Column::CreatedAt)
            .paginate(&*self.db, page.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        let records = self.hydrate(models).await?;
        Ok((records, total))
    }

    async fn update(&self, listing_id: Uuid, patch: ListingPatch) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let model = listing::Entity::find_by_id(listing_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| {
                            DbErr::RecordNotFound(format!("Listing {listing_id} not found"))
                        })?;

                    let owner_id = model.user_id;
                    let was_published = model.published_at.is_some();
                    let mut active: listing::ActiveModel = model.into();

                    if let Some(title) = patch.title {
                        active.title = Set(title);
                    }
                    if let Some(description) = patch.description {
                        active.description = Set(Some(description));
                    }
                    if let Some(property_type) = patch.property_type {
                        active.property_type = Set(property_type.as_str().to_string());
                    }
                    if let Some(pricing) = patch.pricing {
                        active.pricing = Set(pricing);
                    }
                    if let Some(status) = patch.property_status {
                        active.property_status = Set(status.as_str().to_string());
                        if status == PropertyStatus::Published && !was_published {
                            active.published_at = Set(Some(now));
                        }
                    }
                    active.updated_at = Set(now);
                    active.update(txn).await?;

                    if let Some(change) = patch.price_change {
                        listing_price_history::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            listing_id: Set(listing_id),
                            old_price: Set(change.old_price),
                            new_price: Set(change.new_price),
                            changed_at: Set(now),
                        }
                        .insert(txn)
                        .await?;
                    }

                    if let Some(details) = patch.details {
                        if let Some(model) =
                            listing_details::Entity::find_by_id(listing_id).one(txn).await?
                        {
                            let mut active: listing_details::ActiveModel = model.into();
                            if let Some(year_built) = details.year_built {
                                active.year_built = Set(year_built);
                            }
                            if let Some(condition) = details.listing_condition {
                                active.listing_condition = Set(condition.as_str().to_string());
                            }
                            if let Some(direction) = details.facing_direction {
                                active.facing_direction =
                                    Set(Some(direction.as_str().to_string()));
                            }
                            if let Some(bedrooms) = details.bedrooms_count {
                                active.bedrooms_count = Set(bedrooms);
                            }
                            if let Some(bathrooms) = details.bathrooms_count {
                                active.bathrooms_count = Set(bathrooms);
                            }
                            if let Some(balconies) = details.balconies_count {
                                active.balconies_count = Set(balconies);
                            }
                            if let Some(floor_level) = details.floor_level {
                                active.floor_level = Set(Some(floor_level));
                            }
                            if let Some(furnished) = details.furnished {
                                active.furnished = Set(Some(furnished));
                            }
                            if let Some(parking_area) = details.parking_area {
                                active.parking_area = Set(Some(parking_area));
                            }
                            if let Some(pet_friendly) = details.pet_friendly {
                                active.pet_friendly = Set(Some(pet_friendly));
                            }
                            if let Some(lot_area) = details.lot_area {
                                active.lot_area = Set(Some(lot_area));
                            }
                            if let Some(living_area) = details.living_area {
                                active.living_area = Set(living_area);
                            }
                            active.update(txn).await?;
                        }
                    }

                    if let Some(location) = patch.location {
                        if let Some(model) =
                            listing_location::Entity::find_by_id(listing_id).one(txn).await?
                        {
                            let mut active: listing_location::ActiveModel = model.into();
                            if let Some(address_line) = location.address_line {
                                active.address_line = Set(address_line);
                            }
                            if let Some(area) = location.area {
                                active.area = Set(area);
                            }
                            if let Some(district) = location.district {
                                active.district = Set(district);
                            }
                            if let Some(zip_code) = location.zip_code {
                                active.zip_code = Set(zip_code);
                            }
                            if let Some(latitude) = location.latitude {
                                active.latitude = Set(latitude);
                            }
                            if let Some(longitude) = location.longitude {
                                active.longitude = Set(longitude);
                            }
                            active.update(txn).await?;
                        }
                    }

                    insert_media(txn, listing_id, owner_id, patch.media).await?;

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    async fn soft_delete(&self, listing_id: Uuid) -> AppResult<()> {
        let model = listing::Entity::find_by_id(listing_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Listing with id {listing_id} not found")))?;

        let now = Utc::now();
        let mut active: listing::ActiveModel = model.into();
        active.property_status = Set(PropertyStatus::Archived.as_str().to_string());
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&*self.db).await?;

        Ok(())
    }

    async fn favorite_exists(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool> {
        let found = favorite_listing::Entity::find_by_id((user_id, listing_id))
            .one(&*self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn add_favorite(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    favorite_listing::ActiveModel {
                        user_id: Set(user_id),
                        listing_id: Set(listing_id),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await?;

                    if let Some(counters) =
                        listing_counters::Entity::find_by_id(listing_id).one(txn).await?
                    {
                        let favorite_count = counters.favorite_count;
                        let mut active: listing_counters::ActiveModel = counters.into();
                        active.favorite_count = Set(favorite_count + 1);
                        active.update(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    favorite_listing::Entity::delete_by_id((user_id, listing_id))
                        .exec(txn)
                        .await?;

                    if let Some(counters) =
                        listing_counters::Entity::find_by_id(listing_id).one(txn).await?
                    {
                        let favorite_count = counters.favorite_count;
                        let mut active: listing_counters::ActiveModel = counters.into();
                        active.favorite_count = Set((favorite_count - 1).max(0));
                        active.update(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    async fn list_favorites(
        &self,
        user_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)> {
        let paginator = favorite_listing::Entity::find()
            .filter(favorite_listing::Column::UserId.eq(user_id))
            .order_by_desc(favorite_listing::Column::CreatedAt)
            .paginate(&*self.db, page.limit());
        let total = paginator.num_items().await?;
        let favorites = paginator.fetch_page(page.page_index()).await?;

        let listing_ids: Vec<Uuid> = favorites.into_iter().map(|f| f.listing_id).collect();
        let records = self.hydrate_in_order(listing_ids).await?;
        Ok((records, total))
    }

    async fn saved_exists(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool> {
        let found = saved_listing::Entity::find_by_id((user_id, listing_id))
            .one(&*self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn add_saved(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    saved_listing::ActiveModel {
                        user_id: Set(user_id),
                        listing_id: Set(listing_id),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await?;

                    if let Some(counters) =
                        listing_counters::Entity::find_by_id(listing_id).one(txn).await?
                    {
                        let save_count = counters.save_count;
                        let mut active: listing_counters::ActiveModel = counters.into();
                        active.save_count = Set(save_count + 1);
                        active.update(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    async fn remove_saved(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    saved_listing::Entity::delete_by_id((user_id, listing_id))
                        .exec(txn)
                        .await?;

                    if let Some(counters) =
                        listing_counters::Entity::find_by_id(listing_id).one(txn).await?
                    {
                        let save_count = counters.save_count;
                        let mut active: listing_counters::ActiveModel = counters.into();
                        active.save_count = Set((save_count - 1).max(0));
                        active.update(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    async fn list_saved(
        &self,
        user_id: Uuid,
        page: PaginationParams,
    ) -> AppResult<(Vec<ListingRecord>, u64)> {
        let paginator = saved_listing::Entity::find()
            .filter(saved_listing::Column::UserId.eq(user_id))
            .order_by_desc(saved_listing::Column::CreatedAt)
            .paginate(&*self.db, page.limit());
        let total = paginator.num_items().await?;
        let saved = paginator.fetch_page(page.page_index()).await?;

        let listing_ids: Vec<Uuid> = saved.into_iter().map(|s| s.listing_id).collect();
        let records = self.hydrate_in_order(listing_ids).await?;
        Ok((records, total))
    }
}
