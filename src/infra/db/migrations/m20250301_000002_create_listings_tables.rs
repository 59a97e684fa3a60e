//! Migration: Create the listing aggregate tables.
//!
//! Covers listings plus the 1:1 satellite tables (details, locations,
//! counters) and the price history log.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::ListingId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Listings::PropertyType).string().not_null())
                    .col(ColumnDef::new(Listings::PropertyStatus).string().not_null())
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::Description).text().null())
                    .col(
                        ColumnDef::new(Listings::Pricing)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_user")
                            .from(Listings::Table, Listings::UserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_user_id")
                    .table(Listings::Table)
                    .col(Listings::UserId)
                    .to_owned(),
            )
            .await?;

        // Search path: status + soft-delete filter with newest-first ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_listings_status_created_at")
                    .table(Listings::Table)
                    .col(Listings::PropertyStatus)
                    .col(Listings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingDetails::ListingId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ListingDetails::YearBuilt).integer().not_null())
                    .col(
                        ColumnDef::new(ListingDetails::ListingCondition)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingDetails::FacingDirection).string().null())
                    .col(
                        ColumnDef::new(ListingDetails::BedroomsCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingDetails::BathroomsCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingDetails::BalconiesCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingDetails::FloorLevel).integer().null())
                    .col(ColumnDef::new(ListingDetails::Furnished).boolean().null())
                    .col(ColumnDef::new(ListingDetails::ParkingArea).integer().null())
                    .col(ColumnDef::new(ListingDetails::PetFriendly).boolean().null())
                    .col(ColumnDef::new(ListingDetails::LotArea).integer().null())
                    .col(
                        ColumnDef::new(ListingDetails::LivingArea)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_details_listing")
                            .from(ListingDetails::Table, ListingDetails::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingLocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingLocations::ListingId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingLocations::AddressLine)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingLocations::Area).string().not_null())
                    .col(ColumnDef::new(ListingLocations::District).string().not_null())
                    .col(
                        ColumnDef::new(ListingLocations::ZipCode)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingLocations::Latitude)
                            .decimal_len(9, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingLocations::Longitude)
                            .decimal_len(9, 6)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_locations_listing")
                            .from(ListingLocations::Table, ListingLocations::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // District filter on the public search endpoint
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_locations_district")
                    .table(ListingLocations::Table)
                    .col(ListingLocations::District)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingCounters::ListingId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingCounters::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ListingCounters::FavoriteCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ListingCounters::SaveCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_counters_listing")
                            .from(ListingCounters::Table, ListingCounters::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingPriceHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingPriceHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ListingPriceHistory::ListingId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingPriceHistory::OldPrice)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingPriceHistory::NewPrice)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ListingPriceHistory::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_price_history_listing")
                            .from(ListingPriceHistory::Table, ListingPriceHistory::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listing_price_history_listing_id")
                    .table(ListingPriceHistory::Table)
                    .col(ListingPriceHistory::ListingId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingPriceHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ListingCounters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ListingLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ListingDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Listings {
    Table,
    ListingId,
    UserId,
    PropertyType,
    PropertyStatus,
    Title,
    Description,
    Pricing,
    CreatedAt,
    PublishedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum ListingDetails {
    Table,
    ListingId,
    YearBuilt,
    ListingCondition,
    FacingDirection,
    BedroomsCount,
    BathroomsCount,
    BalconiesCount,
    FloorLevel,
    Furnished,
    ParkingArea,
    PetFriendly,
    LotArea,
    LivingArea,
}

#[derive(Iden)]
enum ListingLocations {
    Table,
    ListingId,
    AddressLine,
    Area,
    District,
    ZipCode,
    Latitude,
    Longitude,
}

#[derive(Iden)]
enum ListingCounters {
    Table,
    ListingId,
    ViewCount,
    FavoriteCount,
    SaveCount,
}

#[derive(Iden)]
enum ListingPriceHistory {
    Table,
    Id,
    ListingId,
    OldPrice,
    NewPrice,
    ChangedAt,
}
