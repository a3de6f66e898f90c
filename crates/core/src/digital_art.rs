//! Digital reproduction products derived from original artworks.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ARTIST: &str = "Mirta Susana Aguilar";
pub const DEFAULT_VERSION: &str = "01";
pub const DEFAULT_TECHNIQUE: &str = "Reinterpretación digital";
pub const DEFAULT_CATEGORY: &str = "digital";

pub const PRODUCT_LAMINA: &str = "lamina";
pub const PRODUCT_POSTER: &str = "poster";
pub const PRODUCT_CANVAS: &str = "canvas";

/// All valid print product types.
pub const VALID_PRODUCT_TYPES: &[&str] = &[PRODUCT_LAMINA, PRODUCT_POSTER, PRODUCT_CANVAS];

/// Availability filter value that disables filtering.
pub const AVAILABILITY_ALL: &str = "all";

/// One purchasable print size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintSize {
    pub size: String,
    #[serde(default)]
    pub dimensions: Option<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// Physical characteristics of the printed product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintFeatures {
    #[serde(default = "default_paper_type")]
    pub paper_type: String,
    #[serde(default = "default_printing")]
    pub printing: String,
    #[serde(default = "default_edition")]
    pub edition: String,
    #[serde(default = "default_true")]
    pub signed_available: bool,
}

impl Default for PrintFeatures {
    fn default() -> Self {
        Self {
            paper_type: default_paper_type(),
            printing: default_printing(),
            edition: default_edition(),
            signed_available: true,
        }
    }
}

fn default_currency() -> String {
    crate::artwork::DEFAULT_CURRENCY.to_string()
}

fn default_true() -> bool {
    true
}

fn default_paper_type() -> String {
    "Papel fotográfico premium 250g".to_string()
}

fn default_printing() -> String {
    "Impresión giclée de alta calidad".to_string()
}

fn default_edition() -> String {
    "Edición abierta".to_string()
}

/// Validate the product type.
pub fn validate_product_type(product_type: &str) -> Result<(), String> {
    crate::validation::validate_choice("product type", product_type, VALID_PRODUCT_TYPES)
}

/// Validate the list of print sizes: non-empty labels and non-negative prices.
pub fn validate_sizes(sizes: &[PrintSize]) -> Result<(), String> {
    for (i, size) in sizes.iter().enumerate() {
        if size.size.trim().is_empty() {
            return Err(format!("Size #{i} must have a label"));
        }
        if !size.price.is_finite() || size.price < 0.0 {
            return Err(format!("Size '{}' must have a non-negative price", size.size));
        }
    }
    Ok(())
}

/// Parse the `available` listing filter (`true`, `false` or `all`).
///
/// Anything other than `false`/`all` is treated as `true`.
pub fn parse_availability_filter(value: Option<&str>) -> Option<bool> {
    match value {
        Some(AVAILABILITY_ALL) => None,
        Some("false") => Some(false),
        _ => Some(true),
    }
}

/// Set the availability of the size at `index`; returns `false` when the
/// index is out of range.
pub fn set_size_availability(sizes: &mut [PrintSize], index: usize, available: bool) -> bool {
    match sizes.get_mut(index) {
        Some(size) => {
            size.available = available;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(label: &str, price: f64) -> PrintSize {
        PrintSize {
            size: label.to_string(),
            dimensions: None,
            price,
            currency: "ARS".to_string(),
            available: true,
        }
    }

    #[test]
    fn size_defaults_from_json() {
        let parsed: PrintSize = serde_json::from_str(r#"{"size":"A3","price":15000}"#).unwrap();
        assert_eq!(parsed.currency, "ARS");
        assert!(parsed.available);
    }

    #[test]
    fn features_default() {
        let f: PrintFeatures = serde_json::from_str("{}").unwrap();
        assert_eq!(f, PrintFeatures::default());
        assert_eq!(f.edition, "Edición abierta");
    }

    #[test]
    fn sizes_validation() {
        assert!(validate_sizes(&[size("A4", 1.0)]).is_ok());
        assert!(validate_sizes(&[size(" ", 1.0)]).is_err());
        assert!(validate_sizes(&[size("A4", -1.0)]).is_err());
    }

    #[test]
    fn availability_filter() {
        assert_eq!(parse_availability_filter(None), Some(true));
        assert_eq!(parse_availability_filter(Some("false")), Some(false));
        assert_eq!(parse_availability_filter(Some("all")), None);
    }

    #[test]
    fn toggling_size_availability() {
        let mut sizes = vec![size("A4", 1.0), size("A3", 2.0)];
        assert!(set_size_availability(&mut sizes, 1, false));
        assert!(!sizes[1].available);
        assert!(!set_size_availability(&mut sizes, 5, false));
    }
}
