//! Artwork catalog constants, pricing and validation.

use chrono::Datelike;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Artist credited when none is supplied.
pub const DEFAULT_ARTIST: &str = "Mirta Aguilar";

/// Default currency for every price in the catalog.
pub const DEFAULT_CURRENCY: &str = "ARS";

/// Earliest accepted creation year.
pub const MIN_YEAR: i32 = 1900;

pub const CATEGORY_ABSTRACTO: &str = "abstracto";
pub const CATEGORY_PAISAJE: &str = "paisaje";
pub const CATEGORY_RETRATO: &str = "retrato";
pub const CATEGORY_NATURALEZA: &str = "naturaleza";
pub const CATEGORY_OTROS: &str = "otros";

/// All valid artwork categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_ABSTRACTO,
    CATEGORY_PAISAJE,
    CATEGORY_RETRATO,
    CATEGORY_NATURALEZA,
    CATEGORY_OTROS,
];

pub const DISCOUNT_PERCENTAGE: &str = "percentage";
pub const DISCOUNT_FIXED: &str = "fixed";

/// All valid discount types.
pub const VALID_DISCOUNT_TYPES: &[&str] = &[DISCOUNT_PERCENTAGE, DISCOUNT_FIXED];

pub const SORT_NEWEST: &str = "newest";
pub const SORT_OLDEST: &str = "oldest";
pub const SORT_PRICE_ASC: &str = "price_asc";
pub const SORT_PRICE_DESC: &str = "price_desc";

/// All valid catalog sort keys.
pub const VALID_SORTS: &[&str] = &[SORT_NEWEST, SORT_OLDEST, SORT_PRICE_ASC, SORT_PRICE_DESC];

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Compute the price a buyer pays after any discount.
///
/// A discount applies only when `has_discount` is set and `discount > 0`.
/// Percentage discounts scale the base price; fixed discounts subtract from
/// it. The result never goes below zero.
pub fn compute_final_price(
    base_price: f64,
    has_discount: bool,
    discount: f64,
    discount_type: &str,
) -> f64 {
    if !has_discount || discount <= 0.0 {
        return base_price;
    }
    let price = match discount_type {
        DISCOUNT_FIXED => base_price - discount,
        _ => base_price * (1.0 - discount / 100.0),
    };
    price.max(0.0)
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that the category is one of the allowed values.
pub fn validate_category(category: &str) -> Result<(), String> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(format!(
            "Invalid category '{category}'. Must be one of: {}",
            VALID_CATEGORIES.join(", ")
        ))
    }
}

/// Validate the creation year against `1900..=current year`.
pub fn validate_year(year: i32) -> Result<(), String> {
    let current = chrono::Utc::now().year();
    if (MIN_YEAR..=current).contains(&year) {
        Ok(())
    } else {
        Err(format!("Year must be between {MIN_YEAR} and {current}"))
    }
}

/// Validate the pricing block.
pub fn validate_pricing(base_price: f64, discount: f64, discount_type: &str) -> Result<(), String> {
    if !base_price.is_finite() || base_price < 0.0 {
        return Err("Base price must be a non-negative number".to_string());
    }
    if !(0.0..=100.0).contains(&discount) {
        return Err("Discount must be between 0 and 100".to_string());
    }
    if !VALID_DISCOUNT_TYPES.contains(&discount_type) {
        return Err(format!(
            "Invalid discount type '{discount_type}'. Must be one of: {}",
            VALID_DISCOUNT_TYPES.join(", ")
        ));
    }
    Ok(())
}

/// Validate the sort key for catalog listings.
pub fn validate_sort(sort: &str) -> Result<(), String> {
    if VALID_SORTS.contains(&sort) {
        Ok(())
    } else {
        Err(format!(
            "Invalid sort '{sort}'. Must be one of: {}",
            VALID_SORTS.join(", ")
        ))
    }
}

/// An artwork can be ordered when it is marked available and not sold.
pub fn is_purchasable(is_available: bool, is_sold: bool) -> bool {
    is_available && !is_sold
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- compute_final_price -------------------------------------------------

    #[test]
    fn no_discount_keeps_base() {
        assert_eq!(compute_final_price(1000.0, false, 20.0, DISCOUNT_PERCENTAGE), 1000.0);
        assert_eq!(compute_final_price(1000.0, true, 0.0, DISCOUNT_PERCENTAGE), 1000.0);
    }

    #[test]
    fn percentage_discount() {
        assert_eq!(compute_final_price(1000.0, true, 25.0, DISCOUNT_PERCENTAGE), 750.0);
    }

    #[test]
    fn fixed_discount() {
        assert_eq!(compute_final_price(1000.0, true, 80.0, DISCOUNT_FIXED), 920.0);
    }

    #[test]
    fn fixed_discount_floors_at_zero() {
        assert_eq!(compute_final_price(50.0, true, 80.0, DISCOUNT_FIXED), 0.0);
    }

    // -- validators ----------------------------------------------------------

    #[test]
    fn categories() {
        assert!(validate_category("paisaje").is_ok());
        assert!(validate_category("Paisaje").is_err());
    }

    #[test]
    fn year_bounds() {
        assert!(validate_year(1900).is_ok());
        assert!(validate_year(chrono::Utc::now().year()).is_ok());
        assert!(validate_year(1899).is_err());
        assert!(validate_year(chrono::Utc::now().year() + 1).is_err());
    }

    #[test]
    fn pricing_rules() {
        assert!(validate_pricing(100.0, 10.0, DISCOUNT_FIXED).is_ok());
        assert!(validate_pricing(-1.0, 0.0, DISCOUNT_FIXED).is_err());
        assert!(validate_pricing(100.0, 101.0, DISCOUNT_PERCENTAGE).is_err());
        assert!(validate_pricing(100.0, 5.0, "bogus").is_err());
    }

    #[test]
    fn purchasable_only_when_available_and_unsold() {
        assert!(is_purchasable(true, false));
        assert!(!is_purchasable(false, false));
        assert!(!is_purchasable(true, true));
    }
}
