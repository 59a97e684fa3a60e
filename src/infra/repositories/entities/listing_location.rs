//! Listing location entity (1:1 with listings).

use sea_orm::entity::prelude::*;

use crate::domain::ListingLocation;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub listing_id: Uuid,
    pub address_line: String,
    pub area: String,
    pub district: String,
    pub zip_code: String,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))")]
    pub latitude: Decimal,
    #[sea_orm(column_type = "Decimal(Some((9, 6)))")]
    pub longitude: Decimal,
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

impl From<Model> for ListingLocation {
    fn from(model: Model) -> Self {
        ListingLocation {
            address_line: model.address_line,
            area: model.area,
            district: model.district,
            zip_code: model.zip_code,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
