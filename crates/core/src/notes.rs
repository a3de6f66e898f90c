//! Back-office notes and their attachments.

pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum attachment size in bytes (10 MB).
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Number of notes returned by the urgent widget.
pub const URGENT_LIMIT: i64 = 5;

pub const VALID_CATEGORIES: &[&str] = &[
    "general",
    "artwork",
    "client",
    "supplier",
    "exhibition",
    "sales",
    "other",
];

pub const VALID_RELATED_TYPES: &[&str] = &["artwork", "contact", "event", "order"];

pub const SORT_NEWEST: &str = "newest";
pub const SORT_OLDEST: &str = "oldest";
pub const SORT_PRIORITY: &str = "priority";
pub const SORT_TITLE: &str = "title";

pub const VALID_SORTS: &[&str] = &[SORT_NEWEST, SORT_OLDEST, SORT_PRIORITY, SORT_TITLE];

/// MIME types accepted as note attachments.
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

pub fn validate_category(category: &str) -> Result<(), String> {
    crate::validation::validate_choice("note category", category, VALID_CATEGORIES)
}

pub fn validate_related_type(related_type: &str) -> Result<(), String> {
    crate::validation::validate_choice("related type", related_type, VALID_RELATED_TYPES)
}

/// Validate an attachment's MIME type and size.
pub fn validate_attachment(mime_type: &str, size: usize) -> Result<(), String> {
    if !ALLOWED_ATTACHMENT_TYPES.contains(&mime_type) {
        return Err(format!("File type '{mime_type}' is not allowed"));
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err("File exceeds the 10 MB limit".to_string());
    }
    Ok(())
}

/// Whether the attachment can be stored as an image on the media host.
pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_rules() {
        assert!(validate_attachment("application/pdf", 1024).is_ok());
        assert!(validate_attachment("image/webp", MAX_ATTACHMENT_BYTES).is_ok());
        assert!(validate_attachment("application/zip", 10).is_err());
        assert!(validate_attachment("image/png", MAX_ATTACHMENT_BYTES + 1).is_err());
    }

    #[test]
    fn categories_and_related_types() {
        assert!(validate_category("sales").is_ok());
        assert!(validate_category("misc").is_err());
        assert!(validate_related_type("order").is_ok());
        assert!(validate_related_type("task").is_err());
    }

    #[test]
    fn image_mime_detection() {
        assert!(is_image_mime("image/gif"));
        assert!(!is_image_mime("application/pdf"));
    }
}
