//! Dashboard statistics parameters.

pub const PERIOD_7_DAYS: &str = "7days";
pub const PERIOD_30_DAYS: &str = "30days";
pub const PERIOD_90_DAYS: &str = "90days";
pub const PERIOD_YEAR: &str = "year";

pub const VALID_PERIODS: &[&str] = &[PERIOD_7_DAYS, PERIOD_30_DAYS, PERIOD_90_DAYS, PERIOD_YEAR];

/// Number of entries in the "most viewed" and "most liked" rankings.
pub const RANKING_LIMIT: i64 = 10;

/// Number of categories in the top-categories ranking.
pub const TOP_CATEGORIES_LIMIT: i64 = 5;

pub const DEFAULT_PERIOD: &str = PERIOD_30_DAYS;

/// Resolve a sales period name to the name itself and the days it covers.
/// `None` selects [`DEFAULT_PERIOD`].
pub fn resolve_period(period: Option<&str>) -> Result<(&'static str, i64), String> {
    match period.unwrap_or(DEFAULT_PERIOD) {
        PERIOD_7_DAYS => Ok((PERIOD_7_DAYS, 7)),
        PERIOD_30_DAYS => Ok((PERIOD_30_DAYS, 30)),
        PERIOD_90_DAYS => Ok((PERIOD_90_DAYS, 90)),
        PERIOD_YEAR => Ok((PERIOD_YEAR, 365)),
        other => Err(format!(
            "Invalid period '{other}'. Must be one of: {}",
            VALID_PERIODS.join(", ")
        )),
    }
}
