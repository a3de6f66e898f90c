//! Order lifecycle constants, totals and status side effects.

use chrono::Datelike;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hours an artwork stays reserved after an order is placed.
pub const RESERVATION_HOURS: i64 = 24;

/// Default shipping country.
pub const DEFAULT_COUNTRY: &str = "Argentina";

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_PAID: &str = "paid";
pub const STATUS_PREPARING: &str = "preparing";
pub const STATUS_SHIPPED: &str = "shipped";
pub const STATUS_DELIVERED: &str = "delivered";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_REFUNDED: &str = "refunded";

/// All valid order statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_CONFIRMED,
    STATUS_PAID,
    STATUS_PREPARING,
    STATUS_SHIPPED,
    STATUS_DELIVERED,
    STATUS_CANCELLED,
    STATUS_REFUNDED,
];

/// Statuses that count as completed sales for revenue reporting.
pub const REVENUE_STATUSES: &[&str] = &[STATUS_PAID, STATUS_DELIVERED];

pub const SHIPPING_PICKUP: &str = "pickup";
pub const SHIPPING_DELIVERY: &str = "delivery";
pub const SHIPPING_SHIPPING: &str = "shipping";

pub const VALID_SHIPPING_METHODS: &[&str] =
    &[SHIPPING_PICKUP, SHIPPING_DELIVERY, SHIPPING_SHIPPING];

pub const BILLING_CONSUMER: &str = "consumer";
pub const BILLING_BUSINESS: &str = "business";

pub const VALID_BILLING_TYPES: &[&str] = &[BILLING_CONSUMER, BILLING_BUSINESS];

pub const PAYMENT_STRIPE: &str = "stripe";
pub const PAYMENT_TRANSFER: &str = "transfer";
pub const PAYMENT_CASH: &str = "cash";
pub const PAYMENT_MERCADOPAGO: &str = "mercadopago";

pub const VALID_PAYMENT_METHODS: &[&str] =
    &[PAYMENT_STRIPE, PAYMENT_TRANSFER, PAYMENT_CASH, PAYMENT_MERCADOPAGO];

pub const PAYMENT_STATUS_PENDING: &str = "pending";
pub const PAYMENT_STATUS_PROCESSING: &str = "processing";
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";
pub const PAYMENT_STATUS_FAILED: &str = "failed";
pub const PAYMENT_STATUS_REFUNDED: &str = "refunded";

pub const VALID_PAYMENT_STATUSES: &[&str] = &[
    PAYMENT_STATUS_PENDING,
    PAYMENT_STATUS_PROCESSING,
    PAYMENT_STATUS_COMPLETED,
    PAYMENT_STATUS_FAILED,
    PAYMENT_STATUS_REFUNDED,
];

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Price pair for one line item: catalog base price and discounted price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrice {
    pub base: f64,
    pub final_price: f64,
}

/// Aggregated order amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub discount_total: f64,
    pub total: f64,
}

/// Compute subtotal, discount total and grand total for an order.
///
/// `subtotal` sums base prices, `discount_total` sums the per-item discount
/// and `total = subtotal - discount_total + shipping_cost`.
pub fn compute_totals(lines: &[LinePrice], shipping_cost: f64) -> OrderTotals {
    let subtotal: f64 = lines.iter().map(|l| l.base).sum();
    let discount_total: f64 = lines.iter().map(|l| l.base - l.final_price).sum();
    OrderTotals {
        subtotal,
        discount_total,
        total: subtotal - discount_total + shipping_cost,
    }
}

// ---------------------------------------------------------------------------
// Order numbers
// ---------------------------------------------------------------------------

/// Format an order number `ORD-YYYYMM-NNNN` where `sequence` is 1-based.
pub fn format_order_number(at: Timestamp, sequence: i64) -> String {
    format!("ORD-{}{:02}-{sequence:04}", at.year(), at.month())
}

/// First instant of the month containing `at`, and of the following month.
pub fn month_bounds(at: Timestamp) -> (Timestamp, Timestamp) {
    crate::finance::month_range(at.year(), at.month())
        .unwrap_or((at, at))
}

// ---------------------------------------------------------------------------
// Status side effects
// ---------------------------------------------------------------------------

/// What a status transition does to the artworks in the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkEffect {
    /// Mark artworks sold, unavailable and unreserved.
    MarkSold,
    /// Clear the reservation so artworks can be bought again.
    ReleaseReservation,
    /// Leave artworks unchanged.
    None,
}

/// Map a new order status to its effect on the ordered artworks.
pub fn artwork_effect(status: &str) -> ArtworkEffect {
    match status {
        STATUS_PAID => ArtworkEffect::MarkSold,
        STATUS_CANCELLED | STATUS_REFUNDED => ArtworkEffect::ReleaseReservation,
        _ => ArtworkEffect::None,
    }
}

/// Validate an order status value.
pub fn validate_status(status: &str) -> Result<(), String> {
    crate::validation::validate_choice("order status", status, VALID_STATUSES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    // -- compute_totals ------------------------------------------------------

    #[test]
    fn totals_with_discount_and_shipping() {
        let lines = [
            LinePrice { base: 1000.0, final_price: 800.0 },
            LinePrice { base: 500.0, final_price: 500.0 },
        ];
        let totals = compute_totals(&lines, 150.0);
        assert_eq!(totals.subtotal, 1500.0);
        assert_eq!(totals.discount_total, 200.0);
        assert_eq!(totals.total, 1450.0);
    }

    #[test]
    fn totals_of_empty_order_is_shipping() {
        let totals = compute_totals(&[], 30.0);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 30.0);
    }

    // -- format_order_number -------------------------------------------------

    #[test]
    fn order_number_is_zero_padded() {
        let at = chrono::Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap();
        assert_eq!(format_order_number(at, 7), "ORD-202503-0007");
        assert_eq!(format_order_number(at, 12345), "ORD-202503-12345");
    }

    #[test]
    fn month_bounds_span_the_month() {
        let at = chrono::Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let (start, end) = month_bounds(at);
        assert_eq!(start, chrono::Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    // -- artwork_effect ------------------------------------------------------

    #[test]
    fn status_effects() {
        assert_eq!(artwork_effect(STATUS_PAID), ArtworkEffect::MarkSold);
        assert_eq!(artwork_effect(STATUS_CANCELLED), ArtworkEffect::ReleaseReservation);
        assert_eq!(artwork_effect(STATUS_REFUNDED), ArtworkEffect::ReleaseReservation);
        assert_eq!(artwork_effect(STATUS_SHIPPED), ArtworkEffect::None);
    }

    #[test]
    fn status_validation() {
        assert!(validate_status("preparing").is_ok());
        assert!(validate_status("lost").is_err());
    }
}
