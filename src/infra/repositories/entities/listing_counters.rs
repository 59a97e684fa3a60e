//! Listing engagement counters entity (1:1 with listings).

use sea_orm::entity::prelude::*;

use crate::domain::ListingCounters;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_counters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub listing_id: Uuid,
    pub view_count: i32,
    pub favorite_count: i32,
    pub save_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listing::Entity",
        from = "Column::ListingId",
        to = "super::listing::Column::ListingId"
    )]
    Listing,
}

impl Related<super::listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ListingCounters {
    fn from(model: Model) -> Self {
        ListingCounters {
            view_count: model.view_count,
            favorite_count: model.favorite_count,
            save_count: model.save_count,
        }
    }
}
