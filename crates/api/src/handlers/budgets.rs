//! Handlers for `/admin/finances/budgets`.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use galeria_core::budget::{default_categories, validate_categories, validate_period, BudgetCategory};
use galeria_db::models::budget::BudgetView;
use galeria_db::repositories::BudgetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BudgetListParams {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertBudgetRequest {
    pub year: i32,
    pub month: u32,
    /// Omitted means the default category lines.
    pub categories: Option<Vec<BudgetCategory>>,
    pub notes: Option<String>,
}

/// GET /api/v1/admin/finances/budgets?year
pub async fn list_budgets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<BudgetListParams>,
) -> AppResult<Json<DataResponse<Vec<BudgetView>>>> {
    let budgets = BudgetRepo::list(&state.pool, params.year).await?;
    Ok(Json(DataResponse::new(
        budgets.into_iter().map(BudgetView::from).collect(),
    )))
}

/// GET /api/v1/admin/finances/budgets/{year}/{month}
///
/// Creates the period with the default lines on first access, then
/// reconciles it against the ledger.
pub async fn get_budget(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<DataResponse<BudgetView>>> {
    validate_period(year, month).map_err(AppError::validation)?;
    let month = month as i32;

    let budget = BudgetRepo::find_or_create(&state.pool, year, month, Some(admin.user_id)).await?;
    let budget = BudgetRepo::sync(&state.pool, year, month)
        .await?
        .unwrap_or(budget);

    Ok(Json(DataResponse::new(BudgetView::from(budget))))
}

/// POST /api/v1/admin/finances/budgets
pub async fn upsert_budget(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertBudgetRequest>,
) -> AppResult<Json<DataResponse<BudgetView>>> {
    validate_period(input.year, input.month).map_err(AppError::validation)?;
    let categories = input.categories.unwrap_or_else(default_categories);
    validate_categories(&categories).map_err(AppError::validation)?;
    let month = input.month as i32;

    let budget = BudgetRepo::upsert(
        &state.pool,
        input.year,
        month,
        &categories,
        input.notes.as_deref(),
        Some(admin.user_id),
    )
    .await?;
    let budget = BudgetRepo::sync(&state.pool, input.year, month)
        .await?
        .unwrap_or(budget);

    tracing::info!(budget_id = budget.id, year = input.year, month, "Budget saved");
    state.publish(
        "budget.updated",
        "budget",
        budget.id,
        Some(admin.user_id),
        serde_json::json!({ "year": input.year, "month": month }),
    );

    Ok(Json(DataResponse::new(BudgetView::from(budget))))
}

/// PATCH /api/v1/admin/finances/budgets/{year}/{month}/sync
pub async fn sync_budget(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<DataResponse<BudgetView>>> {
    validate_period(year, month).map_err(AppError::validation)?;
    let budget = BudgetRepo::sync(&state.pool, year, month as i32)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Budget {year}-{month:02} not found")))?;
    tracing::info!(budget_id = budget.id, year, month, "Budget synced");
    Ok(Json(DataResponse::new(BudgetView::from(budget))))
}
