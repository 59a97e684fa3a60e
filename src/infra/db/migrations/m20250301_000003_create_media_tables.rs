//! Migration: Create media asset tables and the listing-media link.

use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users_table::Users;
use super::m20250301_000002_create_listings_tables::Listings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaAssets::MediaId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaAssets::OwnerUserId).uuid().not_null())
                    .col(ColumnDef::new(MediaAssets::S3Location).string().not_null())
                    .col(ColumnDef::new(MediaAssets::ContentType).string().not_null())
                    .col(
                        ColumnDef::new(MediaAssets::ByteSize)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaAssets::Caption).string().null())
                    .col(ColumnDef::new(MediaAssets::Metadata).json_binary().null())
                    .col(
                        ColumnDef::new(MediaAssets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MediaAssets::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_assets_owner")
                            .from(MediaAssets::Table, MediaAssets::OwnerUserId)
                            .to(Users::Table, Users::UserId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ListingMedia::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ListingMedia::ListingId).uuid().not_null())
                    .col(ColumnDef::new(ListingMedia::MediaId).uuid().not_null())
                    .col(ColumnDef::new(ListingMedia::SortOrder).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ListingMedia::ListingId)
                            .col(ListingMedia::MediaId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_media_listing")
                            .from(ListingMedia::Table, ListingMedia::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listing_media_asset")
                            .from(ListingMedia::Table, ListingMedia::MediaId)
                            .to(MediaAssets::Table, MediaAssets::MediaId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Ordered media lookups per listing
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_media_listing_sort")
                    .table(ListingMedia::Table)
                    .col(ListingMedia::ListingId)
                    .col(ListingMedia::SortOrder)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingMedia::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MediaAssets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MediaAssets {
    Table,
    MediaId,
    OwnerUserId,
    S3Location,
    ContentType,
    ByteSize,
    Caption,
    Metadata,
    CreatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum ListingMedia {
    Table,
    ListingId,
    MediaId,
    SortOrder,
}
