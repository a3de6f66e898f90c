//! Digital reproduction products derived from an original artwork.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::digital_art::{PrintFeatures, PrintSize};
use galeria_core::types::{DbId, Timestamp};

/// A row from the `digital_art` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DigitalArt {
    pub id: DbId,
    pub title: String,
    pub original_artwork_id: DbId,
    pub original_title: Option<String>,
    pub artist: String,
    pub version: String,
    pub description: Option<String>,
    pub digital_technique: String,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub mockup_url: Option<String>,
    pub product_type: String,
    pub sizes: Json<Vec<PrintSize>>,
    pub features: Json<PrintFeatures>,
    pub category: String,
    pub tags: Vec<String>,
    pub available: bool,
    pub featured: bool,
    pub views: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A digital-art row joined with a summary of its original artwork.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DigitalArtWithOriginal {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub art: DigitalArt,
    pub original_code: Option<String>,
    pub original_artwork_title: Option<String>,
    pub original_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDigitalArt {
    pub title: String,
    pub original_artwork_id: DbId,
    pub original_title: Option<String>,
    pub artist: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub digital_technique: Option<String>,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub mockup_url: Option<String>,
    pub product_type: Option<String>,
    #[serde(default)]
    pub sizes: Vec<PrintSize>,
    pub features: Option<PrintFeatures>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDigitalArt {
    pub title: Option<String>,
    pub original_artwork_id: Option<DbId>,
    pub original_title: Option<String>,
    pub artist: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub digital_technique: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub mockup_url: Option<String>,
    pub product_type: Option<String>,
    pub sizes: Option<Vec<PrintSize>>,
    pub features: Option<PrintFeatures>,
    pub tags: Option<Vec<String>>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct DigitalArtFilter {
    pub available: Option<bool>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}
