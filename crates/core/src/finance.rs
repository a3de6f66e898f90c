//! Finance ledger constants and reporting arithmetic.

use chrono::{Datelike, TimeZone, Utc};
use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const TYPE_INCOME: &str = "income";
pub const TYPE_EXPENSE: &str = "expense";

pub const VALID_TYPES: &[&str] = &[TYPE_INCOME, TYPE_EXPENSE];

pub const VALID_CURRENCIES: &[&str] = &["ARS", "USD", "EUR"];

pub const VALID_PAYMENT_METHODS: &[&str] =
    &["cash", "transfer", "card", "mercadopago", "check", "other"];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_REFUNDED: &str = "refunded";

pub const VALID_PAYMENT_STATUSES: &[&str] =
    &[STATUS_PENDING, STATUS_COMPLETED, STATUS_CANCELLED, STATUS_REFUNDED];

pub const VALID_FREQUENCIES: &[&str] = &["weekly", "monthly", "quarterly", "yearly"];

pub const SORT_NEWEST: &str = "newest";
pub const SORT_OLDEST: &str = "oldest";
pub const SORT_AMOUNT_ASC: &str = "amount_asc";
pub const SORT_AMOUNT_DESC: &str = "amount_desc";

pub const VALID_SORTS: &[&str] = &[SORT_NEWEST, SORT_OLDEST, SORT_AMOUNT_ASC, SORT_AMOUNT_DESC];

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// `[start, end)` of a calendar month in UTC. `None` for an invalid month.
pub fn month_range(year: i32, month: u32) -> Option<(Timestamp, Timestamp)> {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).single()?;
    Some((start, end))
}

/// Earliest and latest years accepted by the ledger reports.
pub const MIN_REPORT_YEAR: i32 = 1970;
pub const MAX_REPORT_YEAR: i32 = 9999;

/// Validate a report `(year, month)`.
pub fn validate_report_period(year: i32, month: u32) -> Result<(), String> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return Err(format!(
            "Year must be between {MIN_REPORT_YEAR} and {MAX_REPORT_YEAR}"
        ));
    }
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12".to_string());
    }
    Ok(())
}

/// The month before `(year, month)`; January wraps to December.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// `(year, month)` of a timestamp.
pub fn year_month(at: Timestamp) -> (i32, u32) {
    (at.year(), at.month())
}

/// Percentage change from `previous` to `current`, rounded to one decimal.
///
/// Zero when there is no previous value to compare against.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (((current - previous) / previous) * 1000.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Income and expense totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyBalance {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub income_count: i64,
    pub expense_count: i64,
    pub period: Period,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl MonthlyBalance {
    /// Build from `(type, total, count)` rows grouped by transaction type.
    pub fn from_rows(year: i32, month: u32, rows: &[(String, f64, i64)]) -> Self {
        let mut balance = MonthlyBalance {
            period: Period { year, month },
            ..Default::default()
        };
        for (kind, total, count) in rows {
            match kind.as_str() {
                TYPE_INCOME => {
                    balance.income += total;
                    balance.income_count += count;
                }
                TYPE_EXPENSE => {
                    balance.expense += total;
                    balance.expense_count += count;
                }
                _ => {}
            }
        }
        balance.balance = balance.income - balance.expense;
        balance
    }
}

/// Month-over-month change of each summary figure, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceChanges {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

pub fn balance_changes(current: &MonthlyBalance, previous: &MonthlyBalance) -> BalanceChanges {
    BalanceChanges {
        income: percent_change(current.income, previous.income),
        expense: percent_change(current.expense, previous.expense),
        balance: percent_change(current.balance, previous.balance),
    }
}

/// Income and expense for one month of a yearly comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotals {
    pub month: u32,
    pub income: f64,
    pub expense: f64,
}

/// Expand `(month, type, total)` rows into exactly twelve months.
pub fn fill_year(rows: &[(i32, String, f64)]) -> Vec<MonthTotals> {
    let mut months: Vec<MonthTotals> = (1..=12)
        .map(|month| MonthTotals {
            month,
            income: 0.0,
            expense: 0.0,
        })
        .collect();
    for (month, kind, total) in rows {
        let Some(slot) = usize::try_from(*month - 1).ok().and_then(|i| months.get_mut(i)) else {
            continue;
        };
        match kind.as_str() {
            TYPE_INCOME => slot.income += total,
            TYPE_EXPENSE => slot.expense += total,
            _ => {}
        }
    }
    months
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

pub fn validate_type(kind: &str) -> Result<(), String> {
    crate::validation::validate_choice("transaction type", kind, VALID_TYPES)
}

pub fn validate_amount(amount: f64) -> Result<(), String> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err("Amount must be a non-negative number".to_string())
    }
}

pub fn validate_currency(currency: &str) -> Result<(), String> {
    crate::validation::validate_choice("currency", currency, VALID_CURRENCIES)
}

pub fn validate_payment_method(method: &str) -> Result<(), String> {
    crate::validation::validate_choice("payment method", method, VALID_PAYMENT_METHODS)
}

pub fn validate_payment_status(status: &str) -> Result<(), String> {
    crate::validation::validate_choice("payment status", status, VALID_PAYMENT_STATUSES)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- month_range ---------------------------------------------------------

    #[test]
    fn month_range_regular_and_december() {
        let (start, end) = month_range(2025, 2).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());

        let (_, end) = month_range(2025, 12).unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn month_range_rejects_invalid_month() {
        assert!(month_range(2025, 13).is_none());
        assert!(month_range(2025, 0).is_none());
        assert!(month_range(i32::MAX, 12).is_none());
        assert!(month_range(i32::MIN, 1).is_none());
    }

    #[test]
    fn report_period_bounds() {
        assert!(validate_report_period(2025, 6).is_ok());
        assert!(validate_report_period(MIN_REPORT_YEAR, 1).is_ok());
        assert!(validate_report_period(i32::MIN, 1).is_err());
        assert!(validate_report_period(i32::MAX, 12).is_err());
        assert!(validate_report_period(2025, 13).is_err());
    }

    // -- previous_month ------------------------------------------------------

    #[test]
    fn january_wraps_to_previous_december() {
        assert_eq!(previous_month(2025, 1), (2024, 12));
        assert_eq!(previous_month(2025, 7), (2025, 6));
    }

    // -- percent_change ------------------------------------------------------

    #[test]
    fn percent_change_rounds_to_one_decimal() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(100.0, 300.0), -66.7);
        assert_eq!(percent_change(10.0, 0.0), 0.0);
    }

    // -- MonthlyBalance ------------------------------------------------------

    #[test]
    fn balance_from_grouped_rows() {
        let rows = vec![
            ("income".to_string(), 1000.0, 3),
            ("expense".to_string(), 400.0, 2),
        ];
        let b = MonthlyBalance::from_rows(2025, 5, &rows);
        assert_eq!(b.income, 1000.0);
        assert_eq!(b.expense, 400.0);
        assert_eq!(b.balance, 600.0);
        assert_eq!(b.income_count, 3);
        assert_eq!(b.expense_count, 2);
        assert_eq!(b.period, Period { year: 2025, month: 5 });
    }

    #[test]
    fn changes_between_months() {
        let cur = MonthlyBalance::from_rows(2025, 2, &[("income".to_string(), 200.0, 1)]);
        let prev = MonthlyBalance::from_rows(2025, 1, &[("income".to_string(), 100.0, 1)]);
        let changes = balance_changes(&cur, &prev);
        assert_eq!(changes.income, 100.0);
        assert_eq!(changes.expense, 0.0);
    }

    // -- fill_year -----------------------------------------------------------

    #[test]
    fn fill_year_has_twelve_months() {
        let rows = vec![
            (3, "income".to_string(), 50.0),
            (3, "expense".to_string(), 20.0),
            (12, "income".to_string(), 5.0),
            (13, "income".to_string(), 999.0),
        ];
        let months = fill_year(&rows);
        assert_eq!(months.len(), 12);
        assert_eq!(months[2].income, 50.0);
        assert_eq!(months[2].expense, 20.0);
        assert_eq!(months[11].income, 5.0);
        assert_eq!(months[0].income, 0.0);
    }

    #[test]
    fn amount_validation() {
        assert!(validate_amount(0.0).is_ok());
        assert!(validate_amount(-0.01).is_err());
        assert!(validate_amount(f64::NAN).is_err());
    }
}
