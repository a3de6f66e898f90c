//! Handlers for `/admin/finances`: the income and expense ledger and its
//! monthly reports.
//!
//! Every write re-syncs the budget of each calendar month it touches so
//! budget actuals always mirror completed transactions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use galeria_core::finance::{
    balance_changes, fill_year, month_range, previous_month, validate_amount, validate_currency,
    validate_payment_method, validate_payment_status, validate_report_period, validate_type,
    year_month, BalanceChanges,
    MonthTotals, MonthlyBalance, Period, STATUS_COMPLETED, STATUS_PENDING, TYPE_EXPENSE,
    VALID_FREQUENCIES, VALID_SORTS,
};
use galeria_core::pagination::{clamp_limit, clamp_offset, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::types::{DbId, Timestamp};
use galeria_core::validation::{validate_choice, validate_required_text};
use galeria_db::models::finance::{
    CategoryTotal, CreateTransaction, FinanceTransaction, TransactionFilter, UpdateTransaction,
};
use galeria_db::repositories::{BudgetRepo, FinanceRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{parse_date_param, DateBound};
use crate::response::{DataResponse, Page};
use crate::state::AppState;

const MAX_DESCRIPTION_LENGTH: usize = 500;

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MonthSummary {
    pub completed: MonthlyBalance,
    pub pending: MonthlyBalance,
}

#[derive(Debug, Serialize)]
pub struct FinanceSummary {
    pub current_month: MonthSummary,
    pub previous_month: MonthSummary,
    /// Month-over-month change of the completed figures.
    pub changes: BalanceChanges,
}

#[derive(Debug, Serialize)]
pub struct CategoryBreakdown {
    pub period: Period,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub total: f64,
    pub categories: Vec<CategoryTotal>,
}

#[derive(Debug, Serialize)]
pub struct YearlyComparison {
    pub year: i32,
    pub months: Vec<MonthTotals>,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

// ----- Handlers -----

/// GET /api/v1/admin/finances/transactions
pub async fn list_transactions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<Json<DataResponse<Page<FinanceTransaction>>>> {
    if let Some(t) = params.transaction_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(s) = params.payment_status.as_deref() {
        validate_payment_status(s).map_err(AppError::validation)?;
    }
    if let Some(m) = params.payment_method.as_deref() {
        validate_payment_method(m).map_err(AppError::validation)?;
    }
    if let Some(s) = params.sort.as_deref() {
        validate_choice("sort", s, VALID_SORTS).map_err(AppError::validation)?;
    }

    let filter = TransactionFilter {
        start_date: parse_date_param("start_date", params.start_date.as_deref(), DateBound::Start)?,
        end_date: parse_date_param("end_date", params.end_date.as_deref(), DateBound::End)?,
        transaction_type: params.transaction_type,
        category: params.category,
        payment_status: params.payment_status,
        payment_method: params.payment_method,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params.sort,
    };
    let limit = clamp_limit(params.limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = FinanceRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = FinanceRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse::new(Page {
        items,
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/admin/finances/transactions/contact/{contact_id}
pub async fn contact_transactions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(contact_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FinanceTransaction>>>> {
    let items = FinanceRepo::list_for_contact(&state.pool, contact_id).await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /api/v1/admin/finances/transactions/{id}
pub async fn get_transaction(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FinanceTransaction>>> {
    let tx = FinanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("FinanceTransaction", id))?;
    Ok(Json(DataResponse::new(tx)))
}

/// POST /api/v1/admin/finances/transactions
pub async fn create_transaction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTransaction>,
) -> AppResult<(StatusCode, Json<DataResponse<FinanceTransaction>>)> {
    validate_type(&input.transaction_type).map_err(AppError::validation)?;
    validate_amount(input.amount).map_err(AppError::validation)?;
    validate_required_text("category", &input.category, 100).map_err(AppError::validation)?;
    validate_required_text("description", &input.description, MAX_DESCRIPTION_LENGTH)
        .map_err(AppError::validation)?;
    validate_optional_fields(
        input.currency.as_deref(),
        input.payment_method.as_deref(),
        input.payment_status.as_deref(),
        input.recurrence_frequency.as_deref(),
    )?;

    let tx = FinanceRepo::create(&state.pool, &input, admin.user_id).await?;
    resync_budgets(&state, &[tx.date]).await?;

    tracing::info!(
        transaction_id = tx.id,
        transaction_type = %tx.transaction_type,
        amount = tx.amount,
        "Finance transaction created",
    );
    state.publish(
        "finance.created",
        "finance_transaction",
        tx.id,
        Some(admin.user_id),
        serde_json::json!({ "type": tx.transaction_type, "amount": tx.amount }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(tx))))
}

/// PUT /api/v1/admin/finances/transactions/{id}
pub async fn update_transaction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTransaction>,
) -> AppResult<Json<DataResponse<FinanceTransaction>>> {
    if let Some(t) = input.transaction_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(amount) = input.amount {
        validate_amount(amount).map_err(AppError::validation)?;
    }
    if let Some(category) = input.category.as_deref() {
        validate_required_text("category", category, 100).map_err(AppError::validation)?;
    }
    if let Some(description) = input.description.as_deref() {
        validate_required_text("description", description, MAX_DESCRIPTION_LENGTH)
            .map_err(AppError::validation)?;
    }
    validate_optional_fields(
        input.currency.as_deref(),
        input.payment_method.as_deref(),
        input.payment_status.as_deref(),
        input.recurrence_frequency.as_deref(),
    )?;

    let before = FinanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("FinanceTransaction", id))?;
    let tx = FinanceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("FinanceTransaction", id))?;
    resync_budgets(&state, &[before.date, tx.date]).await?;

    tracing::info!(transaction_id = id, "Finance transaction updated");
    state.publish(
        "finance.updated",
        "finance_transaction",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(Json(DataResponse::new(tx)))
}

/// DELETE /api/v1/admin/finances/transactions/{id}
pub async fn delete_transaction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let tx = FinanceRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("FinanceTransaction", id))?;
    resync_budgets(&state, &[tx.date]).await?;

    tracing::info!(transaction_id = id, "Finance transaction deleted");
    state.publish(
        "finance.deleted",
        "finance_transaction",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/finances/summary?year&month
pub async fn summary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<FinanceSummary>>> {
    let (year, month) = resolve_period(&params)?;
    let (prev_year, prev_month) = previous_month(year, month);

    let (current_month, previous_month) = tokio::try_join!(
        month_summary(&state, year, month),
        month_summary(&state, prev_year, prev_month),
    )?;
    let changes = balance_changes(&current_month.completed, &previous_month.completed);

    Ok(Json(DataResponse::new(FinanceSummary {
        current_month,
        previous_month,
        changes,
    })))
}

/// GET /api/v1/admin/finances/category-breakdown?year&month&type
pub async fn category_breakdown(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<CategoryBreakdown>>> {
    let (year, month) = resolve_period(&params)?;
    let transaction_type = params
        .transaction_type
        .clone()
        .unwrap_or_else(|| TYPE_EXPENSE.to_string());
    validate_type(&transaction_type).map_err(AppError::validation)?;

    let (from, to) = period_range(year, month)?;
    let categories = FinanceRepo::category_breakdown(&state.pool, from, to, &transaction_type).await?;
    let total = categories.iter().map(|c| c.total).sum();

    Ok(Json(DataResponse::new(CategoryBreakdown {
        period: Period { year, month },
        transaction_type,
        total,
        categories,
    })))
}

/// GET /api/v1/admin/finances/yearly-comparison?year
pub async fn yearly_comparison(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<DataResponse<YearlyComparison>>> {
    let year = params.year.unwrap_or_else(|| year_month(chrono::Utc::now()).0);
    validate_report_period(year, 1).map_err(AppError::validation)?;
    let (from, _) = period_range(year, 1)?;
    let (_, to) = period_range(year, 12)?;

    let rows = FinanceRepo::monthly_totals(&state.pool, from, to).await?;
    let months = fill_year(&rows);
    let total_income: f64 = months.iter().map(|m| m.income).sum();
    let total_expense: f64 = months.iter().map(|m| m.expense).sum();

    Ok(Json(DataResponse::new(YearlyComparison {
        year,
        months,
        total_income,
        total_expense,
        balance: total_income - total_expense,
    })))
}

// ----- Helpers -----

fn validate_optional_fields(
    currency: Option<&str>,
    payment_method: Option<&str>,
    payment_status: Option<&str>,
    frequency: Option<&str>,
) -> AppResult<()> {
    if let Some(c) = currency {
        validate_currency(c).map_err(AppError::validation)?;
    }
    if let Some(m) = payment_method {
        validate_payment_method(m).map_err(AppError::validation)?;
    }
    if let Some(s) = payment_status {
        validate_payment_status(s).map_err(AppError::validation)?;
    }
    if let Some(f) = frequency {
        validate_choice("recurrence frequency", f, VALID_FREQUENCIES)
            .map_err(AppError::validation)?;
    }
    Ok(())
}

/// Requested `(year, month)`, defaulting to the current month.
fn resolve_period(params: &PeriodParams) -> AppResult<(i32, u32)> {
    let (now_year, now_month) = year_month(chrono::Utc::now());
    let year = params.year.unwrap_or(now_year);
    let month = params.month.unwrap_or(now_month);
    validate_report_period(year, month).map_err(AppError::validation)?;
    Ok((year, month))
}

fn period_range(year: i32, month: u32) -> AppResult<(Timestamp, Timestamp)> {
    month_range(year, month).ok_or_else(|| AppError::validation("Invalid period"))
}

async fn month_summary(state: &AppState, year: i32, month: u32) -> AppResult<MonthSummary> {
    let (from, to) = period_range(year, month)?;
    let (completed, pending) = tokio::try_join!(
        FinanceRepo::totals_by_type(&state.pool, from, to, STATUS_COMPLETED),
        FinanceRepo::totals_by_type(&state.pool, from, to, STATUS_PENDING),
    )?;
    Ok(MonthSummary {
        completed: MonthlyBalance::from_rows(year, month, &completed),
        pending: MonthlyBalance::from_rows(year, month, &pending),
    })
}

/// Re-sync the budget of every distinct month among `dates`.
async fn resync_budgets(state: &AppState, dates: &[Timestamp]) -> AppResult<()> {
    let mut periods: Vec<(i32, u32)> = dates.iter().map(|d| year_month(*d)).collect();
    periods.sort_unstable();
    periods.dedup();

    for (year, month) in periods {
        let month = i32::try_from(month).unwrap_or(1);
        if BudgetRepo::sync(&state.pool, year, month).await?.is_some() {
            tracing::debug!(year, month, "Budget re-synced");
        }
    }
    Ok(())
}
