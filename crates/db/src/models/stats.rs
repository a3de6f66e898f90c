//! Read-only aggregate rows for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;
use galeria_core::types::DbId;

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ArtworkCounts {
    pub total: i64,
    pub available: i64,
    pub sold: i64,
}

#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct OrderCounts {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub artworks: ArtworkCounts,
    pub orders: OrderCounts,
    pub customers: i64,
    pub revenue: f64,
}

/// Revenue and order count for one calendar day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailySales {
    pub day: chrono::NaiveDate,
    pub total: f64,
    pub orders: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub total: f64,
    pub items: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesStats {
    pub period: String,
    pub sales_by_day: Vec<DailySales>,
    pub top_categories: Vec<CategorySales>,
}

/// Ranking row for the most viewed / most liked lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArtworkRanking {
    pub id: DbId,
    pub title: String,
    pub code: String,
    pub views: i32,
    pub likes: i64,
    pub main_image_url: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtworkStats {
    pub most_viewed: Vec<ArtworkRanking>,
    pub most_liked: Vec<ArtworkRanking>,
    pub by_category: Vec<CategoryCount>,
}
