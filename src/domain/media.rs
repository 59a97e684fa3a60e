//! Media asset types shared between listings and object storage.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Broad media category stored for each asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaContentType {
    Image,
    Video,
}

impl MediaContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaContentType::Image => "image",
            MediaContentType::Video => "video",
        }
    }

    /// Derive the category from a MIME type string.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(MediaContentType::Image)
        } else if mime.starts_with("video/") {
            Some(MediaContentType::Video)
        } else {
            None
        }
    }
}

impl FromStr for MediaContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaContentType::Image),
            "video" => Ok(MediaContentType::Video),
            other => Err(format!("Unknown media content type: {other}")),
        }
    }
}

/// Generate the object key for an upload: `<category>/<uuid>/<file_name>`.
///
/// The random segment keeps concurrent uploads of identically named files
/// from colliding.
pub fn object_key(category: &str, file_name: &str) -> String {
    format!("{}/{}/{}", category, Uuid::new_v4(), file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_maps_to_category() {
        assert_eq!(
            MediaContentType::from_mime("image/jpeg"),
            Some(MediaContentType::Image)
        );
        assert_eq!(
            MediaContentType::from_mime("video/mp4"),
            Some(MediaContentType::Video)
        );
        assert_eq!(MediaContentType::from_mime("application/pdf"), None);
    }

    #[test]
    fn object_key_has_three_segments() {
        let key = object_key("listings", "photo.jpg");
        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "listings");
        assert_eq!(parts[2], "photo.jpg");
    }
}
