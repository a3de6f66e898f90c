//! Query parameter types shared by several handler modules.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use galeria_core::types::Timestamp;

use crate::error::{AppError, AppResult};

/// `?limit=&offset=`. Clamped by the handler via `galeria_core::pagination`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?limit=` for short widget listings.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Which end of a bare calendar date a filter bound refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parse a date filter given either as RFC 3339 or as `YYYY-MM-DD`.
///
/// A bare date expands to the first or last instant of that UTC day.
pub fn parse_date_param(
    field: &str,
    value: Option<&str>,
    bound: DateBound,
) -> AppResult<Option<Timestamp>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a date (YYYY-MM-DD)")))?;
    let time = match bound {
        DateBound::Start => date.and_hms_opt(0, 0, 0),
        DateBound::End => date.and_hms_milli_opt(23, 59, 59, 999),
    };
    time.map(|t| Some(t.and_utc()))
        .ok_or_else(|| AppError::validation(format!("{field} is out of range")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn bare_dates_expand_to_day_bounds() {
        let start = parse_date_param("start_date", Some("2024-03-10"), DateBound::Start)
            .unwrap()
            .unwrap();
        assert_eq!((start.day(), start.hour(), start.minute()), (10, 0, 0));

        let end = parse_date_param("end_date", Some("2024-03-10"), DateBound::End)
            .unwrap()
            .unwrap();
        assert_eq!((end.day(), end.hour(), end.minute()), (10, 23, 59));
    }

    #[test]
    fn rfc3339_is_kept_as_is() {
        let at = parse_date_param("start_date", Some("2024-03-10T15:30:00-03:00"), DateBound::End)
            .unwrap()
            .unwrap();
        assert_eq!(at.hour(), 18);
    }

    #[test]
    fn empty_and_invalid_values() {
        assert_matches!(parse_date_param("d", None, DateBound::Start), Ok(None));
        assert_matches!(parse_date_param("d", Some("  "), DateBound::Start), Ok(None));
        assert_matches!(parse_date_param("d", Some("10/03/2024"), DateBound::Start), Err(_));
    }
}
