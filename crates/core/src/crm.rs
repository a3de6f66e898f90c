//! Back-office contact book (clients and suppliers).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TYPE_CLIENT: &str = "client";
pub const TYPE_SUPPLIER: &str = "supplier";
pub const TYPE_BOTH: &str = "both";

pub const VALID_TYPES: &[&str] = &[TYPE_CLIENT, TYPE_SUPPLIER, TYPE_BOTH];

pub const DEFAULT_CATEGORY: &str = "other";

pub const VALID_CATEGORIES: &[&str] = &[
    "collector",
    "gallery",
    "museum",
    "corporate",
    "individual",
    "art_dealer",
    "materials",
    "services",
    "framing",
    "printing",
    "shipping",
    "other",
];

pub const VALID_CONTACT_METHODS: &[&str] = &["email", "phone", "whatsapp", "in-person"];

pub const SORT_NAME: &str = "name";
pub const SORT_NEWEST: &str = "newest";
pub const SORT_OLDEST: &str = "oldest";
pub const SORT_COMPANY: &str = "company";

pub const VALID_SORTS: &[&str] = &[SORT_NAME, SORT_NEWEST, SORT_OLDEST, SORT_COMPANY];

/// Number of clients reported in the top-clients ranking.
pub const TOP_CLIENTS_LIMIT: i64 = 5;

/// Minimum and maximum supplier rating.
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Which ledger a history entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Purchase,
    Supply,
}

impl HistoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryKind::Purchase => "purchase",
            HistoryKind::Supply => "supply",
        }
    }
}

/// Clients accumulate purchases; suppliers (and mixed contacts) accumulate
/// supplies.
pub fn history_kind_for(contact_type: &str) -> HistoryKind {
    if contact_type == TYPE_CLIENT {
        HistoryKind::Purchase
    } else {
        HistoryKind::Supply
    }
}

/// Parse the `active` list filter (`true` by default, `false`, or `all`).
pub fn parse_active_filter(value: Option<&str>) -> Option<bool> {
    match value {
        Some("all") => None,
        Some("false") => Some(false),
        _ => Some(true),
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

pub fn validate_type(contact_type: &str) -> Result<(), String> {
    crate::validation::validate_choice("contact type", contact_type, VALID_TYPES)
}

pub fn validate_category(category: &str) -> Result<(), String> {
    crate::validation::validate_choice("category", category, VALID_CATEGORIES)
}

pub fn validate_contact_method(method: &str) -> Result<(), String> {
    crate::validation::validate_choice("contact method", method, VALID_CONTACT_METHODS)
}

pub fn validate_rating(rating: i32) -> Result<(), String> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(format!("Rating must be between {MIN_RATING} and {MAX_RATING}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_kind_follows_contact_type() {
        assert_eq!(history_kind_for("client"), HistoryKind::Purchase);
        assert_eq!(history_kind_for("supplier"), HistoryKind::Supply);
        assert_eq!(history_kind_for("both"), HistoryKind::Supply);
    }

    #[test]
    fn active_filter() {
        assert_eq!(parse_active_filter(None), Some(true));
        assert_eq!(parse_active_filter(Some("false")), Some(false));
        assert_eq!(parse_active_filter(Some("all")), None);
    }

    #[test]
    fn validators() {
        assert!(validate_type("both").is_ok());
        assert!(validate_type("partner").is_err());
        assert!(validate_category("art_dealer").is_ok());
        assert!(validate_category("dealer").is_err());
        assert!(validate_contact_method("in-person").is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
    }
}
