//! Monthly budgets and their reconciliation against the finance ledger.
//!
//! A budget holds one line per `(category, type)`. Reconciliation overwrites
//! every line's `actual_amount` with the sum of completed transactions for
//! that pair in the budget's month, so re-running it with the same ledger
//! always yields the same figures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::finance::{TYPE_EXPENSE, TYPE_INCOME};

pub const MIN_YEAR: i32 = 2020;
pub const MAX_YEAR: i32 = 2100;

pub const DEFAULT_INCOME_CATEGORIES: &[&str] =
    &["artwork_sale", "digital_sale", "commission", "other_income"];

pub const DEFAULT_EXPENSE_CATEGORIES: &[&str] = &[
    "materials",
    "framing",
    "shipping",
    "marketing",
    "rent",
    "utilities",
    "other_expense",
];

/// One planned-vs-actual line of a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub budgeted_amount: f64,
    #[serde(default)]
    pub actual_amount: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BudgetCategory {
    fn new(category: &str, kind: &str) -> Self {
        Self {
            category: category.to_string(),
            kind: kind.to_string(),
            budgeted_amount: 0.0,
            actual_amount: 0.0,
            notes: None,
        }
    }
}

/// Aggregated budget figures, stored alongside the lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub budgeted_income: f64,
    pub budgeted_expense: f64,
    pub actual_income: f64,
    pub actual_expense: f64,
}

impl BudgetTotals {
    pub fn budgeted_balance(&self) -> f64 {
        self.budgeted_income - self.budgeted_expense
    }

    pub fn actual_balance(&self) -> f64 {
        self.actual_income - self.actual_expense
    }

    /// Actual balance minus budgeted balance.
    pub fn variance(&self) -> f64 {
        self.actual_balance() - self.budgeted_balance()
    }
}

/// The zeroed lines a freshly created budget starts with.
pub fn default_categories() -> Vec<BudgetCategory> {
    DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|c| BudgetCategory::new(c, TYPE_INCOME))
        .chain(
            DEFAULT_EXPENSE_CATEGORIES
                .iter()
                .map(|c| BudgetCategory::new(c, TYPE_EXPENSE)),
        )
        .collect()
}

/// Sum budgeted and actual amounts by type.
pub fn compute_totals(categories: &[BudgetCategory]) -> BudgetTotals {
    categories.iter().fold(BudgetTotals::default(), |mut t, c| {
        match c.kind.as_str() {
            TYPE_INCOME => {
                t.budgeted_income += c.budgeted_amount;
                t.actual_income += c.actual_amount;
            }
            TYPE_EXPENSE => {
                t.budgeted_expense += c.budgeted_amount;
                t.actual_expense += c.actual_amount;
            }
            _ => {}
        }
        t
    })
}

/// Overwrite each line's actual amount from `(category, type, total)` sums.
///
/// Lines with no matching transactions are reset to zero.
pub fn reconcile(categories: &mut [BudgetCategory], actuals: &[(String, String, f64)]) {
    let sums: HashMap<(&str, &str), f64> = actuals
        .iter()
        .map(|(category, kind, total)| ((category.as_str(), kind.as_str()), *total))
        .collect();
    for line in categories.iter_mut() {
        line.actual_amount = sums
            .get(&(line.category.as_str(), line.kind.as_str()))
            .copied()
            .unwrap_or(0.0);
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate the budget period.
pub fn validate_period(year: i32, month: u32) -> Result<(), String> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(format!("Year must be between {MIN_YEAR} and {MAX_YEAR}"));
    }
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12".to_string());
    }
    Ok(())
}

/// Validate budget lines: known type, non-blank category, non-negative plan.
pub fn validate_categories(categories: &[BudgetCategory]) -> Result<(), String> {
    for line in categories {
        crate::finance::validate_type(&line.kind)?;
        if line.category.trim().is_empty() {
            return Err("Budget category name is required".to_string());
        }
        if !line.budgeted_amount.is_finite() || line.budgeted_amount < 0.0 {
            return Err(format!(
                "Budgeted amount for '{}' must be non-negative",
                line.category
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn actual(category: &str, kind: &str, total: f64) -> (String, String, f64) {
        (category.to_string(), kind.to_string(), total)
    }

    // -- default_categories --------------------------------------------------

    #[test]
    fn defaults_cover_income_and_expense() {
        let cats = default_categories();
        assert_eq!(cats.len(), 11);
        assert_eq!(cats.iter().filter(|c| c.kind == "income").count(), 4);
        assert!(cats.iter().all(|c| c.actual_amount == 0.0 && c.budgeted_amount == 0.0));
    }

    // -- reconcile -----------------------------------------------------------

    #[test]
    fn reconcile_overwrites_actuals() {
        let mut cats = default_categories();
        cats[0].actual_amount = 999.0;
        reconcile(
            &mut cats,
            &[actual("artwork_sale", "income", 1500.0), actual("rent", "expense", 300.0)],
        );
        let sale = cats.iter().find(|c| c.category == "artwork_sale").unwrap();
        let rent = cats.iter().find(|c| c.category == "rent").unwrap();
        assert_eq!(sale.actual_amount, 1500.0);
        assert_eq!(rent.actual_amount, 300.0);
        assert!(cats
            .iter()
            .filter(|c| c.category != "artwork_sale" && c.category != "rent")
            .all(|c| c.actual_amount == 0.0));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let ledger = [actual("commission", "income", 80.0)];
        let mut once = default_categories();
        reconcile(&mut once, &ledger);
        let mut twice = once.clone();
        reconcile(&mut twice, &ledger);
        assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_matches_on_type_too() {
        let mut cats = vec![BudgetCategory::new("shipping", "expense")];
        reconcile(&mut cats, &[actual("shipping", "income", 50.0)]);
        assert_eq!(cats[0].actual_amount, 0.0);
    }

    // -- compute_totals ------------------------------------------------------

    #[test]
    fn totals_and_variance() {
        let mut cats = default_categories();
        cats[0].budgeted_amount = 1000.0;
        cats[0].actual_amount = 1200.0;
        cats[4].budgeted_amount = 300.0;
        cats[4].actual_amount = 250.0;
        let t = compute_totals(&cats);
        assert_eq!(t.budgeted_income, 1000.0);
        assert_eq!(t.actual_expense, 250.0);
        assert_eq!(t.budgeted_balance(), 700.0);
        assert_eq!(t.actual_balance(), 950.0);
        assert_eq!(t.variance(), 250.0);
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn period_bounds() {
        assert!(validate_period(2020, 1).is_ok());
        assert!(validate_period(2100, 12).is_ok());
        assert!(validate_period(2019, 5).is_err());
        assert!(validate_period(2025, 13).is_err());
        assert!(validate_period(2025, 0).is_err());
    }

    #[test]
    fn categories_validated() {
        let mut cats = default_categories();
        assert!(validate_categories(&cats).is_ok());
        cats[0].budgeted_amount = -1.0;
        assert!(validate_categories(&cats).is_err());
        let bad = vec![BudgetCategory::new("x", "gift")];
        assert!(validate_categories(&bad).is_err());
    }
}
