//! Listing aggregate: core entity, enumerations, and API DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::media::MediaContentType;

/// Kind of property being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Apartment,
    House,
    Duplex,
    Studio,
    Commercial,
    Land,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Duplex => "duplex",
            PropertyType::Studio => "studio",
            PropertyType::Commercial => "commercial",
            PropertyType::Land => "land",
        }
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(PropertyType::Apartment),
            "house" => Ok(PropertyType::House),
            "duplex" => Ok(PropertyType::Duplex),
            "studio" => Ok(PropertyType::Studio),
            "commercial" => Ok(PropertyType::Commercial),
            "land" => Ok(PropertyType::Land),
            other => Err(format!("Unknown property type: {other}")),
        }
    }
}

/// Lifecycle state of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    Draft,
    Published,
    Archived,
    Sold,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Draft => "draft",
            PropertyStatus::Published => "published",
            PropertyStatus::Archived => "archived",
            PropertyStatus::Sold => "sold",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PropertyStatus::Draft),
            "published" => Ok(PropertyStatus::Published),
            "archived" => Ok(PropertyStatus::Archived),
            "sold" => Ok(PropertyStatus::Sold),
            other => Err(format!("Unknown property status: {other}")),
        }
    }
}

/// Physical condition of the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListingCondition {
    New,
    Used,
    Renovated,
}

impl ListingCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingCondition::New => "new",
            ListingCondition::Used => "used",
            ListingCondition::Renovated => "renovated",
        }
    }
}

impl FromStr for ListingCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ListingCondition::New),
            "used" => Ok(ListingCondition::Used),
            "renovated" => Ok(ListingCondition::Renovated),
            other => Err(format!("Unknown listing condition: {other}")),
        }
    }
}

/// Compass orientation of the property's main face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FacingDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl FacingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingDirection::North => "north",
            FacingDirection::South => "south",
            FacingDirection::East => "east",
            FacingDirection::West => "west",
            FacingDirection::NorthEast => "north_east",
            FacingDirection::NorthWest => "north_west",
            FacingDirection::SouthEast => "south_east",
            FacingDirection::SouthWest => "south_west",
        }
    }
}

impl FromStr for FacingDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(FacingDirection::North),
            "south" => Ok(FacingDirection::South),
            "east" => Ok(FacingDirection::East),
            "west" => Ok(FacingDirection::West),
            "north_east" => Ok(FacingDirection::NorthEast),
            "north_west" => Ok(FacingDirection::NorthWest),
            "south_east" => Ok(FacingDirection::SouthEast),
            "south_west" => Ok(FacingDirection::SouthWest),
            other => Err(format!("Unknown facing direction: {other}")),
        }
    }
}

// =============================================================================
// Aggregate records (repository output)
// =============================================================================

/// Listing owner summary carried inside the aggregate
#[derive(Debug, Clone)]
pub struct ListingOwner {
    pub user_id: Uuid,
    pub firebase_uid: String,
    pub name: String,
    pub profile_picture_url: Option<String>,
}

/// Structured property details (1:1 with the listing)
#[derive(Debug, Clone)]
pub struct ListingDetails {
    pub year_built: i32,
    pub listing_condition: ListingCondition,
    pub facing_direction: Option<FacingDirection>,
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

/// Geographic location (1:1 with the listing)
#[derive(Debug, Clone)]
pub struct ListingLocation {
    pub address_line: String,
    pub area: String,
    pub district: String,
    pub zip_code: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Engagement counters (1:1 with the listing)
#[derive(Debug, Clone, Default)]
pub struct ListingCounters {
    pub view_count: i32,
    pub favorite_count: i32,
    pub save_count: i32,
}

/// Media attachment carried inside the aggregate
#[derive(Debug, Clone)]
pub struct ListingMediaItem {
    pub media_id: Uuid,
    pub s3_location: String,
    pub content_type: MediaContentType,
    pub sort_order: i32,
}

/// Full listing aggregate as loaded from persistence
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub listing_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub property_status: PropertyStatus,
    pub pricing: Decimal,
    pub owner: ListingOwner,
    pub details: Option<ListingDetails>,
    pub location: Option<ListingLocation>,
    pub counters: Option<ListingCounters>,
    pub media: Vec<ListingMediaItem>,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Repository inputs
// =============================================================================

/// New media asset to attach to a listing
#[derive(Debug, Clone)]
pub struct NewListingMedia {
    pub s3_location: String,
    pub content_type: MediaContentType,
    pub sort_order: i32,
    pub byte_size: i64,
    pub caption: Option<String>,
}

/// Data required to create a listing aggregate
#[derive(Debug, Clone)]
pub struct NewListing {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub property_status: PropertyStatus,
    pub pricing: Decimal,
    pub details: ListingDetails,
    pub location: ListingLocation,
    pub media: Vec<NewListingMedia>,
}

/// Price change recorded alongside an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    pub old_price: Decimal,
    pub new_price: Decimal,
}

/// Partial details update; only provided fields are written
#[derive(Debug, Clone, Default)]
pub struct ListingDetailsPatch {
    pub year_built: Option<i32>,
    pub listing_condition: Option<ListingCondition>,
    pub facing_direction: Option<FacingDirection>,
    pub bedrooms_count: Option<i32>,
    pub bathrooms_count: Option<i32>,
    pub balconies_count: Option<i32>,
    pub floor_level: Option<i32>,
    pub furnished: Option<bool>,
    pub parking_area: Option<i32>,
    pub pet_friendly: Option<bool>,
    pub lot_area: Option<i32>,
    pub living_area: Option<i32>,
}

/// Partial location update; only provided fields are written
#[derive(Debug, Clone, Default)]
pub struct ListingLocationPatch {
    pub address_line: Option<String>,
    pub area: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Partial listing update assembled by the service layer
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    pub property_status: Option<PropertyStatus>,
    pub pricing: Option<Decimal>,
    pub details: Option<ListingDetailsPatch>,
    pub location: Option<ListingLocationPatch>,
    pub media: Vec<NewListingMedia>,
    /// When set, a price-history row is written atomically with the update
    pub price_change: Option<PriceChange>,
}

/// Search filters for the public listing index
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub property_type: Option<PropertyType>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub district: Option<String>,
    pub min_bedrooms: Option<i32>,
}

// =============================================================================
// API DTOs
// =============================================================================

/// Property detail specifications
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ListingDetailsInput {
    /// Construction year
    #[schema(example = 2020)]
    pub year_built: i32,
    pub listing_condition: ListingCondition,
    pub facing_direction: Option<FacingDirection>,
    pub bedrooms_count: i32,
    pub bathrooms_count: i32,
    pub balconies_count: i32,
    pub floor_level: Option<i32>,
    pub furnished: Option<bool>,
    /// Number of parking spaces
    pub parking_area: Option<i32>,
    pub pet_friendly: Option<bool>,
    /// Total lot area in sqft
    pub lot_area: Option<i32>,
    /// Living area in sqft
    pub living_area: i32,
}

/// Property geographic location
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ListingLocationInput {
    #[validate(length(min = 1, message = "Address line is required"))]
    #[schema(example = "House 12, Road 5, Block F")]
    pub address_line: String,
    #[validate(length(min = 1, message = "Area is required"))]
    #[schema(example = "Gulshan 2")]
    pub area: String,
    #[validate(length(min = 1, message = "District is required"))]
    #[schema(example = "Dhaka")]
    pub district: String,
    #[validate(length(min = 1, max = 10, message = "Zip code must be 1-10 characters"))]
    #[schema(example = "1212")]
    pub zip_code: String,
    #[schema(value_type = String, example = "23.780000")]
    pub latitude: Decimal,
    #[schema(value_type = String, example = "90.420000")]
    pub longitude: Decimal,
}

/// Media attachment for a listing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct MediaItemInput {
    /// S3 object key returned from the upload endpoint
    #[validate(length(min = 1, message = "s3 location is required"))]
    #[schema(example = "listings/550e8400/photo.jpg")]
    pub s3_location: String,
    /// MIME type
    #[validate(length(min = 1, message = "Mime type is required"))]
    #[schema(example = "image/jpeg")]
    pub content_type: String,
    /// Display order (0-based)
    #[schema(example = 0)]
    pub sort_order: i32,
    /// File size in bytes
    #[serde(default)]
    pub byte_size: i64,
    /// Optional caption for the media
    pub caption: Option<String>,
}

/// Request body for creating a new property listing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ListingCreateRequest {
    /// Listing title
    #[validate(length(min = 1, message = "Property listing title is required"))]
    #[schema(example = "Modern 3BR Apartment in Gulshan")]
    pub title: String,
    /// Detailed description of the property
    pub description: Option<String>,
    pub property_type: PropertyType,
    /// Asking price in BDT
    #[schema(value_type = String, example = "4500000.00")]
    pub pricing: Decimal,
    #[validate(nested)]
    pub details: ListingDetailsInput,
    #[validate(nested)]
    pub location: ListingLocationInput,
    /// List of media attachments (images/videos)
    #[validate(nested)]
    pub medias: Option<Vec<MediaItemInput>>,
    /// If true, listing is published immediately; if false, saved as draft
    pub is_publishing: bool,
}

/// Partial update for property details
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ListingDetailsUpdateInput {
    pub year_built: Option<i32>,
    pub listing_condition: Option<ListingCondition>,
    pub facing_direction: Option<FacingDirection>,
    pub bedrooms_count: Option<i32>,
    pub bathrooms_count: Option<i32>,
    pub balconies_count: Option<i32>,
    pub floor_level: Option<i32>,
    pub furnished: Option<bool>,
    pub parking_area: Option<i32>,
    pub pet_friendly: Option<bool>,
    pub lot_area: Option<i32>,
    pub living_area: Option<i32>,
}

/// Partial update for property location
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ListingLocationUpdateInput {
    pub address_line: Option<String>,
    pub area: Option<String>,
    pub district: Option<String>,
    pub zip_code: Option<String>,
    #[schema(value_type = Option<String>)]
    pub latitude: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub longitude: Option<Decimal>,
}

/// Request body for partially updating a listing. Only provided fields are updated.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ListingUpdateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
    /// New asking price in BDT. Triggers price history tracking if changed.
    #[schema(value_type = Option<String>)]
    pub pricing: Option<Decimal>,
    /// Change listing status (e.g. draft to published)
    pub property_status: Option<PropertyStatus>,
    #[validate(nested)]
    pub details: Option<ListingDetailsUpdateInput>,
    #[validate(nested)]
    pub location: Option<ListingLocationUpdateInput>,
    /// New or additional media attachments
    #[validate(nested)]
    pub media_items: Option<Vec<MediaItemInput>>,
}

/// Listing owner information
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingOwnerResponse {
    pub user_id: Uuid,
    pub name: String,
    /// S3 pre-signed URL for profile picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
}

/// Property details and specifications
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingDetailsResponse {
    #[schema(example = 2020)]
    pub year_built: i32,
    pub listing_condition: ListingCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facing_direction: Option<FacingDirection>,
    pub bedrooms_count: i32,
    pub bathrooms_count: i32,
    pub balconies_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furnished: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_area: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_area: Option<i32>,
    /// Living area in sqft
    pub living_area: i32,
}

/// Property geographic location
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingLocationResponse {
    #[schema(example = "House 12, Road 5, Block F")]
    pub address_line: String,
    #[schema(example = "Gulshan 2")]
    pub area: String,
    #[schema(example = "Dhaka")]
    pub district: String,
    #[schema(example = "1212")]
    pub zip_code: String,
    #[schema(value_type = String, example = "23.780000")]
    pub latitude: Decimal,
    #[schema(value_type = String, example = "90.420000")]
    pub longitude: Decimal,
}

/// Listing engagement counters
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingCountersResponse {
    pub view_count: i32,
    pub favorite_count: i32,
    pub save_count: i32,
}

/// Listing media attachment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingMediaResponse {
    pub media_id: Uuid,
    /// S3 pre-signed download URL
    pub url: String,
    pub content_type: MediaContentType,
    /// Display order (0-based)
    pub sort_order: i32,
}

/// Full listing response with owner, property details, location, counters, and media
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingResponse {
    /// Unique listing identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub listing_id: Uuid,
    #[schema(example = "Modern 3BR Apartment in Gulshan")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub property_status: PropertyStatus,
    /// Asking price in BDT
    #[schema(value_type = String, example = "4500000.00")]
    pub pricing: Decimal,
    pub owner: ListingOwnerResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ListingDetailsResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ListingLocationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<ListingCountersResponse>,
    pub media: Vec<ListingMediaResponse>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<ListingDetails> for ListingDetailsResponse {
    fn from(details: ListingDetails) -> Self {
        Self {
            year_built: details.year_built,
            listing_condition: details.listing_condition,
            facing_direction: details.facing_direction,
            bedrooms_count: details.bedrooms_count,
            bathrooms_count: details.bathrooms_count,
            balconies_count: details.balconies_count,
            floor_level: details.floor_level,
            furnished: details.furnished,
            parking_area: details.parking_area,
            pet_friendly: details.pet_friendly,
            lot_area: details.lot_area,
            living_area: details.living_area,
        }
    }
}

impl From<ListingLocation> for ListingLocationResponse {
    fn from(location: ListingLocation) -> Self {
        Self {
            address_line: location.address_line,
            area: location.area,
            district: location.district,
            zip_code: location.zip_code,
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

impl From<ListingCounters> for ListingCountersResponse {
    fn from(counters: ListingCounters) -> Self {
        Self {
            view_count: counters.view_count,
            favorite_count: counters.favorite_count,
            save_count: counters.save_count,
        }
    }
}

impl From<ListingDetailsUpdateInput> for ListingDetailsPatch {
    fn from(input: ListingDetailsUpdateInput) -> Self {
        Self {
            year_built: input.year_built,
            listing_condition: input.listing_condition,
            facing_direction: input.facing_direction,
            bedrooms_count: input.bedrooms_count,
            bathrooms_count: input.bathrooms_count,
            balconies_count: input.balconies_count,
            floor_level: input.floor_level,
            furnished: input.furnished,
            parking_area: input.parking_area,
            pet_friendly: input.pet_friendly,
            lot_area: input.lot_area,
            living_area: input.living_area,
        }
    }
}

impl From<ListingLocationUpdateInput> for ListingLocationPatch {
    fn from(input: ListingLocationUpdateInput) -> Self {
        Self {
            address_line: input.address_line,
            area: input.area,
            district: input.district,
            zip_code: input.zip_code,
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

impl From<ListingDetailsInput> for ListingDetails {
    fn from(input: ListingDetailsInput) -> Self {
        Self {
            year_built: input.year_built,
            listing_condition: input.listing_condition,
            facing_direction: input.facing_direction,
            bedrooms_count: input.bedrooms_count,
            bathrooms_count: input.bathrooms_count,
            balconies_count: input.balconies_count,
            floor_level: input.floor_level,
            furnished: input.furnished,
            parking_area: input.parking_area,
            pet_friendly: input.pet_friendly,
            lot_area: input.lot_area,
            living_area: input.living_area,
        }
    }
}

impl From<ListingLocationInput> for ListingLocation {
    fn from(input: ListingLocationInput) -> Self {
        Self {
            address_line: input.address_line,
            area: input.area,
            district: input.district,
            zip_code: input.zip_code,
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_status_roundtrip() {
        for status in [
            PropertyStatus::Draft,
            PropertyStatus::Published,
            PropertyStatus::Archived,
            PropertyStatus::Sold,
        ] {
            assert_eq!(status.as_str().parse::<PropertyStatus>().unwrap(), status);
        }
        assert!("flying".parse::<PropertyStatus>().is_err());
    }

    #[test]
    fn facing_direction_uses_snake_case() {
        assert_eq!(FacingDirection::NorthEast.as_str(), "north_east");
        assert_eq!(
            "south_west".parse::<FacingDirection>().unwrap(),
            FacingDirection::SouthWest
        );
    }
}
