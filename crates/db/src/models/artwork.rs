//! Artwork entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// One extra image shown in an artwork's gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub public_id: Option<String>,
    #[serde(default)]
    pub order: i32,
}

/// A row from the `artworks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artwork {
    pub id: DbId,
    pub code: String,
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub technique: Option<String>,
    pub dimensions: Option<String>,
    pub category: String,
    pub main_image_url: Option<String>,
    pub main_image_public_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub gallery: Json<Vec<GalleryImage>>,
    pub base_price: f64,
    pub currency: String,
    pub has_discount: bool,
    pub discount: f64,
    pub discount_type: String,
    pub final_price: f64,
    pub is_available: bool,
    pub is_sold: bool,
    pub is_reserved: bool,
    pub reserved_by: Option<DbId>,
    pub reserved_until: Option<Timestamp>,
    pub sold_date: Option<Timestamp>,
    pub sold_to: Option<DbId>,
    pub tags: Vec<String>,
    pub featured: bool,
    pub views: i32,
    /// Ids of the users who liked this artwork.
    pub likes: Vec<DbId>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload. Code, slug and final price are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateArtwork {
    pub code: String,
    pub title: String,
    pub artist: String,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub technique: Option<String>,
    pub dimensions: Option<String>,
    pub category: String,
    pub main_image_url: Option<String>,
    pub main_image_public_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub gallery: Vec<GalleryImage>,
    pub base_price: f64,
    pub currency: String,
    pub has_discount: bool,
    pub discount: f64,
    pub discount_type: String,
    pub final_price: f64,
    pub is_available: bool,
    pub tags: Vec<String>,
    pub featured: bool,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub slug: String,
}

/// Patch payload. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateArtwork {
    pub code: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub technique: Option<String>,
    pub dimensions: Option<String>,
    pub category: Option<String>,
    pub main_image_url: Option<String>,
    pub main_image_public_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub gallery: Option<Vec<GalleryImage>>,
    pub base_price: Option<f64>,
    pub currency: Option<String>,
    pub has_discount: Option<bool>,
    pub discount: Option<f64>,
    pub discount_type: Option<String>,
    pub final_price: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub slug: Option<String>,
}

/// Flags accepted by the status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArtworkStatus {
    pub is_available: Option<bool>,
    pub is_sold: Option<bool>,
    pub is_reserved: Option<bool>,
}

/// Public catalog filters.
#[derive(Debug, Clone, Default)]
pub struct ArtworkFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub available: Option<bool>,
    pub sort: Option<String>,
}
