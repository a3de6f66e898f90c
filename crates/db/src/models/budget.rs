//! Monthly budgets.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::budget::{BudgetCategory, BudgetTotals};
use galeria_core::types::{DbId, Timestamp};

/// A row from the `budgets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Budget {
    pub id: DbId,
    pub year: i32,
    pub month: i32,
    pub categories: Json<Vec<BudgetCategory>>,
    pub budgeted_income: f64,
    pub budgeted_expense: f64,
    pub actual_income: f64,
    pub actual_expense: f64,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Budget {
    pub fn totals(&self) -> BudgetTotals {
        BudgetTotals {
            budgeted_income: self.budgeted_income,
            budgeted_expense: self.budgeted_expense,
            actual_income: self.actual_income,
            actual_expense: self.actual_expense,
        }
    }
}

/// A budget with its derived balances, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetView {
    #[serde(flatten)]
    pub budget: Budget,
    pub budgeted_balance: f64,
    pub actual_balance: f64,
    pub variance: f64,
}

impl From<Budget> for BudgetView {
    fn from(budget: Budget) -> Self {
        let totals = budget.totals();
        Self {
            budgeted_balance: totals.budgeted_balance(),
            actual_balance: totals.actual_balance(),
            variance: totals.variance(),
            budget,
        }
    }
}
