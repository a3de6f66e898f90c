//! Repository for the `budgets` table, including actuals reconciliation.

use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::budget::{self, BudgetCategory};
use galeria_core::types::DbId;

use crate::models::budget::Budget;
use crate::repositories::FinanceRepo;

const COLUMNS: &str = "id, year, month, categories, budgeted_income, budgeted_expense, \
                        actual_income, actual_expense, notes, created_by, created_at, updated_at";

pub struct BudgetRepo;

impl BudgetRepo {
    pub async fn find(pool: &PgPool, year: i32, month: i32) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budgets WHERE year = $1 AND month = $2");
        sqlx::query_as::<_, Budget>(&query)
            .bind(year)
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// Budgets for one year (or all years), most recent period first.
    pub async fn list(pool: &PgPool, year: Option<i32>) -> Result<Vec<Budget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM budgets
             WHERE ($1::INT IS NULL OR year = $1)
             ORDER BY year DESC, month DESC"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(year)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace the budget for a period. Totals are recomputed from
    /// the lines before saving.
    pub async fn upsert(
        pool: &PgPool,
        year: i32,
        month: i32,
        categories: &[BudgetCategory],
        notes: Option<&str>,
        created_by: Option<DbId>,
    ) -> Result<Budget, sqlx::Error> {
        let totals = budget::compute_totals(categories);
        let query = format!(
            "INSERT INTO budgets (year, month, categories, budgeted_income, budgeted_expense,
                actual_income, actual_expense, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_budgets_year_month DO UPDATE SET
                categories = EXCLUDED.categories,
                budgeted_income = EXCLUDED.budgeted_income,
                budgeted_expense = EXCLUDED.budgeted_expense,
                actual_income = EXCLUDED.actual_income,
                actual_expense = EXCLUDED.actual_expense,
                notes = COALESCE(EXCLUDED.notes, budgets.notes)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(year)
            .bind(month)
            .bind(Json(categories))
            .bind(totals.budgeted_income)
            .bind(totals.budgeted_expense)
            .bind(totals.actual_income)
            .bind(totals.actual_expense)
            .bind(notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Return the period's budget, creating it with the default lines if absent.
    pub async fn find_or_create(
        pool: &PgPool,
        year: i32,
        month: i32,
        created_by: Option<DbId>,
    ) -> Result<Budget, sqlx::Error> {
        if let Some(existing) = Self::find(pool, year, month).await? {
            return Ok(existing);
        }
        Self::upsert(
            pool,
            year,
            month,
            &budget::default_categories(),
            None,
            created_by,
        )
        .await
    }

    /// Recompute every line's actual amount from completed transactions in
    /// the period. Returns `None` when no budget exists for it.
    pub async fn sync(pool: &PgPool, year: i32, month: i32) -> Result<Option<Budget>, sqlx::Error> {
        let Some(existing) = Self::find(pool, year, month).await? else {
            return Ok(None);
        };
        let Some((from, to)) = u32::try_from(month)
            .ok()
            .and_then(|m| galeria_core::finance::month_range(year, m))
        else {
            tracing::warn!(year, month, "Budget period has no calendar range, actuals left as is");
            return Ok(Some(existing));
        };

        let actuals = FinanceRepo::actuals_by_category(pool, from, to).await?;
        let mut categories = existing.categories.0;
        budget::reconcile(&mut categories, &actuals);
        let totals = budget::compute_totals(&categories);
        tracing::debug!(
            budget_id = existing.id,
            actual_income = totals.actual_income,
            actual_expense = totals.actual_expense,
            "Budget actuals reconciled",
        );

        let query = format!(
            "UPDATE budgets SET
                categories = $2,
                budgeted_income = $3,
                budgeted_expense = $4,
                actual_income = $5,
                actual_expense = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(existing.id)
            .bind(Json(&categories))
            .bind(totals.budgeted_income)
            .bind(totals.budgeted_expense)
            .bind(totals.actual_income)
            .bind(totals.actual_expense)
            .fetch_optional(pool)
            .await
    }
}
