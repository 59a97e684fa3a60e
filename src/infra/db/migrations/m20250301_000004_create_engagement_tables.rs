//! Migration: Create favorite and saved listing tables.

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
                    .table(FavoriteListings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FavoriteListings::UserId).uuid().not_null())
                    .col(ColumnDef::new(FavoriteListings::ListingId).uuid().not_null())
                    .col(
                        ColumnDef::new(FavoriteListings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(FavoriteListings::UserId)
                            .col(FavoriteListings::ListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_listings_user")
                            .from(FavoriteListings::Table, FavoriteListings::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_listings_listing")
                            .from(FavoriteListings::Table, FavoriteListings::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_listings_user_id")
                    .table(FavoriteListings::Table)
                    .col(FavoriteListings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SavedListings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SavedListings::UserId).uuid().not_null())
                    .col(ColumnDef::new(SavedListings::ListingId).uuid().not_null())
                    .col(
                        ColumnDef::new(SavedListings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SavedListings::UserId)
                            .col(SavedListings::ListingId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_listings_user")
                            .from(SavedListings::Table, SavedListings::UserId)
                            .to(Users::Table, Users::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_listings_listing")
                            .from(SavedListings::Table, SavedListings::ListingId)
                            .to(Listings::Table, Listings::ListingId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_saved_listings_user_id")
                    .table(SavedListings::Table)
                    .col(SavedListings::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedListings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FavoriteListings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FavoriteListings {
    Table,
    UserId,
    ListingId,
    CreatedAt,
}

#[derive(Iden)]
enum SavedListings {
    Table,
    UserId,
    ListingId,
    CreatedAt,
}
