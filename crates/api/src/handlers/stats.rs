//! Handlers for `/stats`: admin dashboard aggregates.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use galeria_core::stats::{resolve_period, RANKING_LIMIT, TOP_CATEGORIES_LIMIT};
use galeria_db::models::stats::{ArtworkStats, DashboardStats, SalesStats};
use galeria_db::repositories::StatsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SalesParams {
    pub period: Option<String>,
}

/// GET /api/v1/stats/dashboard
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let (artworks, orders, customers, revenue) = tokio::try_join!(
        StatsRepo::artwork_counts(&state.pool),
        StatsRepo::order_counts(&state.pool),
        StatsRepo::customer_count(&state.pool),
        StatsRepo::total_revenue(&state.pool),
    )?;

    Ok(Json(DataResponse::new(DashboardStats {
        artworks,
        orders,
        customers,
        revenue,
    })))
}

/// GET /api/v1/stats/sales?period=7days|30days|90days|year
pub async fn sales(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SalesParams>,
) -> AppResult<Json<DataResponse<SalesStats>>> {
    let (period, days) =
        resolve_period(params.period.as_deref()).map_err(AppError::validation)?;
    let since = chrono::Utc::now() - chrono::Duration::days(days);

    let (sales_by_day, top_categories) = tokio::try_join!(
        StatsRepo::sales_by_day(&state.pool, since),
        StatsRepo::top_categories(&state.pool, since, TOP_CATEGORIES_LIMIT),
    )?;

    Ok(Json(DataResponse::new(SalesStats {
        period: period.to_string(),
        sales_by_day,
        top_categories,
    })))
}

/// GET /api/v1/stats/artworks
pub async fn artworks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ArtworkStats>>> {
    let (most_viewed, most_liked, by_category) = tokio::try_join!(
        StatsRepo::most_viewed(&state.pool, RANKING_LIMIT),
        StatsRepo::most_liked(&state.pool, RANKING_LIMIT),
        StatsRepo::category_distribution(&state.pool),
    )?;

    Ok(Json(DataResponse::new(ArtworkStats {
        most_viewed,
        most_liked,
        by_category,
    })))
}
