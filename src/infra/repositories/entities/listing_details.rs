//! Listing details entity (1:1 with listings).

use sea_orm::entity::prelude::*;

use crate::domain::{FacingDirection, ListingDetails};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub listing_id: Uuid,
    pub year_built: i32,
    pub listing_condition: String,
    pub facing_direction: Option<String>,
    pub bedrooms_count: i32,
    pub bathrooms_count: i32,
    pub balconies_count: i32,
    pub floor_level: Option<i32>,
    pub furnished: Option<bool>,
    pub parking_area: Option<i32>,
    pub pet_friendly: Option<bool>,
    pub lot_area: Option<i32>,
    pub living_area: i32,
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

impl TryFrom<Model> for ListingDetails {
    type Error = String;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(ListingDetails {
            year_built: model.year_built,
            listing_condition: model.listing_condition.parse()?,
            facing_direction: model
                .facing_direction
                .as_deref()
                .map(|s| s.parse::<FacingDirection>())
                .transpose()?,
            bedrooms_count: model.bedrooms_count,
            bathrooms_count: model.bathrooms_count,
            balconies_count: model.balconies_count,
            floor_level: model.floor_level,
            furnished: model.furnished,
            parking_area: model.parking_area,
            pet_friendly: model.pet_friendly,
            lot_area: model.lot_area,
            living_area: model.living_area,
        })
    }
}
