//! Helpers for images hosted on the media CDN.

use std::sync::LazyLock;

use regex::Regex;

/// Folder that catalog images are uploaded into.
pub const ARTWORKS_FOLDER: &str = "artworks";

/// Folder for site content images (profile photo).
pub const SITE_FOLDER: &str = "site";

/// Folder for back-office note attachments.
pub const NOTES_FOLDER: &str = "notes";

/// Image extensions accepted by the upload endpoints.
pub const ALLOWED_IMAGE_FORMATS: &[&str] = &["jpg", "jpeg", "png", "webp"];

const UPLOAD_SEGMENT: &str = "/upload/";
const THUMBNAIL_SEGMENT: &str = "/upload/c_thumb,w_300,h_300/";

static PUBLIC_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v\d+/(.+)\.").expect("valid public id regex"));

/// Derive the 300x300 thumbnail URL from a hosted image URL.
pub fn thumbnail_url(url: &str) -> String {
    url.replacen(UPLOAD_SEGMENT, THUMBNAIL_SEGMENT, 1)
}

/// Extract the public id (folder/name without extension) from a hosted URL.
pub fn extract_public_id(url: &str) -> Option<String> {
    PUBLIC_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Validate an upload's file name against [`ALLOWED_IMAGE_FORMATS`].
pub fn validate_image_filename(filename: &str) -> Result<(), String> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if ALLOWED_IMAGE_FORMATS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(format!(
            "Unsupported image format '{ext}'. Must be one of: {}",
            ALLOWED_IMAGE_FORMATS.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str =
        "https://res.cloudinary.com/demo/image/upload/v1699999999/artworks/atardecer_x1.jpg";

    #[test]
    fn thumbnail_inserts_transformation() {
        assert_eq!(
            thumbnail_url(URL),
            "https://res.cloudinary.com/demo/image/upload/c_thumb,w_300,h_300/v1699999999/artworks/atardecer_x1.jpg"
        );
    }

    #[test]
    fn thumbnail_leaves_foreign_urls_alone() {
        assert_eq!(thumbnail_url("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn public_id_extracted() {
        assert_eq!(extract_public_id(URL).as_deref(), Some("artworks/atardecer_x1"));
        assert_eq!(extract_public_id("https://example.com/a.png"), None);
    }

    #[test]
    fn image_extensions() {
        assert!(validate_image_filename("foto.JPG").is_ok());
        assert!(validate_image_filename("foto.webp").is_ok());
        assert!(validate_image_filename("foto.gif").is_err());
        assert!(validate_image_filename("foto").is_err());
    }
}
