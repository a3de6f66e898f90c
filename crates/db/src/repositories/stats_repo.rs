//! Read-only aggregates for the admin dashboard.

use sqlx::PgPool;
use galeria_core::roles::ROLE_CUSTOMER;
use galeria_core::types::Timestamp;

use crate::models::stats::{
    ArtworkCounts, ArtworkRanking, CategoryCount, CategorySales, DailySales, OrderCounts,
};

/// Statuses counted as revenue. Mirrors `galeria_core::order::REVENUE_STATUSES`.
const REVENUE_FILTER: &str = "status IN ('paid', 'delivered')";

pub struct StatsRepo;

impl StatsRepo {
    pub async fn artwork_counts(pool: &PgPool) -> Result<ArtworkCounts, sqlx::Error> {
        sqlx::query_as::<_, ArtworkCounts>(
            "SELECT COUNT(*)::BIGINT AS total,
                    COUNT(*) FILTER (WHERE is_available AND NOT is_sold)::BIGINT AS available,
                    COUNT(*) FILTER (WHERE is_sold)::BIGINT AS sold
             FROM artworks",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn order_counts(pool: &PgPool) -> Result<OrderCounts, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT AS total,
                    COUNT(*) FILTER (WHERE status = 'pending')::BIGINT AS pending,
                    COUNT(*) FILTER (WHERE {REVENUE_FILTER})::BIGINT AS completed
             FROM orders"
        );
        sqlx::query_as::<_, OrderCounts>(&query).fetch_one(pool).await
    }

    pub async fn customer_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users WHERE role = $1")
            .bind(ROLE_CUSTOMER)
            .fetch_one(pool)
            .await
    }

    pub async fn total_revenue(pool: &PgPool) -> Result<f64, sqlx::Error> {
        let query =
            format!("SELECT COALESCE(SUM(total), 0)::FLOAT8 FROM orders WHERE {REVENUE_FILTER}");
        sqlx::query_scalar(&query).fetch_one(pool).await
    }

    /// Revenue per UTC day since `since`.
    pub async fn sales_by_day(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<DailySales>, sqlx::Error> {
        let query = format!(
            "SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day,
                    COALESCE(SUM(total), 0)::FLOAT8 AS total,
                    COUNT(*)::BIGINT AS orders
             FROM orders
             WHERE created_at >= $1 AND {REVENUE_FILTER}
             GROUP BY day
             ORDER BY day"
        );
        sqlx::query_as::<_, DailySales>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Item revenue by artwork category since `since`.
    pub async fn top_categories(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<CategorySales>, sqlx::Error> {
        sqlx::query_as::<_, CategorySales>(
            "SELECT a.category,
                    COALESCE(SUM(i.final_price), 0)::FLOAT8 AS total,
                    COUNT(*)::BIGINT AS items
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             JOIN artworks a ON a.id = i.artwork_id
             WHERE o.created_at >= $1 AND o.status IN ('paid', 'delivered')
             GROUP BY a.category
             ORDER BY total DESC
             LIMIT $2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn most_viewed(pool: &PgPool, limit: i64) -> Result<Vec<ArtworkRanking>, sqlx::Error> {
        sqlx::query_as::<_, ArtworkRanking>(
            "SELECT id, title, code, views, COALESCE(cardinality(likes), 0)::BIGINT AS likes,
                    main_image_url
             FROM artworks
             ORDER BY views DESC, id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn most_liked(pool: &PgPool, limit: i64) -> Result<Vec<ArtworkRanking>, sqlx::Error> {
        sqlx::query_as::<_, ArtworkRanking>(
            "SELECT id, title, code, views, COALESCE(cardinality(likes), 0)::BIGINT AS likes,
                    main_image_url
             FROM artworks
             ORDER BY likes DESC, id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn category_distribution(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*)::BIGINT AS count
             FROM artworks
             GROUP BY category
             ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await
    }
}
