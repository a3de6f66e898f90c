//! Limit/offset clamping shared by every paginated listing.

/// Default page size for public catalog listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Default page size for back-office listings.
pub const DEFAULT_ADMIN_LIMIT: i64 = 50;

/// Hard upper bound for any page size.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a requested page size into `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
