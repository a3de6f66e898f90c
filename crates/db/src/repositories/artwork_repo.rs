//! Repository for the `artworks` table.

use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::artwork::{SORT_OLDEST, SORT_PRICE_ASC, SORT_PRICE_DESC};
use galeria_core::types::{DbId, Timestamp};

use crate::models::artwork::{
    Artwork, ArtworkFilter, CreateArtwork, UpdateArtwork, UpdateArtworkStatus,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, title, artist, description, year, technique, dimensions, \
                        category, main_image_url, main_image_public_id, thumbnail_url, gallery, \
                        base_price, currency, has_discount, discount, discount_type, final_price, \
                        is_available, is_sold, is_reserved, reserved_by, reserved_until, \
                        sold_date, sold_to, tags, featured, views, likes, meta_title, \
                        meta_description, slug, created_at, updated_at";

/// Shared WHERE clause for catalog listing and counting ($1..$3).
const FILTER: &str = "($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL
                    OR title ILIKE '%' || $2 || '%'
                    OR description ILIKE '%' || $2 || '%'
                    OR artist ILIKE '%' || $2 || '%'
                    OR $2 = ANY(tags))
               AND ($3::BOOL IS NULL OR (is_available AND NOT is_sold) = $3)";

fn order_clause(sort: Option<&str>) -> &'static str {
    match sort {
        Some(SORT_OLDEST) => "created_at ASC, id ASC",
        Some(SORT_PRICE_ASC) => "final_price ASC, id ASC",
        Some(SORT_PRICE_DESC) => "final_price DESC, id DESC",
        _ => "created_at DESC, id DESC",
    }
}

/// Catalog storage plus the reservation and sale transitions driven by orders.
pub struct ArtworkRepo;

impl ArtworkRepo {
    /// Insert a new artwork, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateArtwork) -> Result<Artwork, sqlx::Error> {
        let query = format!(
            "INSERT INTO artworks (code, title, artist, description, year, technique, dimensions,
                category, main_image_url, main_image_public_id, thumbnail_url, gallery,
                base_price, currency, has_discount, discount, discount_type, final_price,
                is_available, tags, featured, meta_title, meta_description, slug)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(&input.code)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.description)
            .bind(input.year)
            .bind(&input.technique)
            .bind(&input.dimensions)
            .bind(&input.category)
            .bind(&input.main_image_url)
            .bind(&input.main_image_public_id)
            .bind(&input.thumbnail_url)
            .bind(Json(&input.gallery))
            .bind(input.base_price)
            .bind(&input.currency)
            .bind(input.has_discount)
            .bind(input.discount)
            .bind(&input.discount_type)
            .bind(input.final_price)
            .bind(input.is_available)
            .bind(&input.tags)
            .bind(input.featured)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artworks WHERE id = $1");
        sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artworks WHERE slug = $1");
        sqlx::query_as::<_, Artwork>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several artworks at once, in no particular order.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Artwork>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artworks WHERE id = ANY($1)");
        sqlx::query_as::<_, Artwork>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// One page of the public catalog.
    pub async fn list(
        pool: &PgPool,
        filter: &ArtworkFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Artwork>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM artworks
             WHERE {FILTER}
             ORDER BY {order}
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(&filter.category)
            .bind(&filter.search)
            .bind(filter.available)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &ArtworkFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*)::BIGINT FROM artworks WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.category)
            .bind(&filter.search)
            .bind(filter.available)
            .fetch_one(pool)
            .await
    }

    /// Featured artworks that can still be bought, newest first.
    pub async fn list_featured(pool: &PgPool, limit: i64) -> Result<Vec<Artwork>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artworks
             WHERE featured = true AND is_available = true AND is_sold = false
             ORDER BY created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every code currently in use, for the code generator.
    pub async fn all_codes(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT code FROM artworks")
            .fetch_all(pool)
            .await
    }

    /// Slugs equal to `base` or starting with `base-`, ignoring `exclude_id`.
    pub async fn slugs_with_prefix(
        pool: &PgPool,
        base: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT slug FROM artworks
             WHERE (slug = $1 OR slug LIKE $1 || '-%')
               AND ($2::BIGINT IS NULL OR id <> $2)",
        )
        .bind(base)
        .bind(exclude_id)
        .fetch_all(pool)
        .await
    }

    /// Apply a patch. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtwork,
    ) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!(
            "UPDATE artworks SET
                code = COALESCE($2, code),
                title = COALESCE($3, title),
                artist = COALESCE($4, artist),
                description = COALESCE($5, description),
                year = COALESCE($6, year),
                technique = COALESCE($7, technique),
                dimensions = COALESCE($8, dimensions),
                category = COALESCE($9, category),
                main_image_url = COALESCE($10, main_image_url),
                main_image_public_id = COALESCE($11, main_image_public_id),
                thumbnail_url = COALESCE($12, thumbnail_url),
                gallery = COALESCE($13, gallery),
                base_price = COALESCE($14, base_price),
                currency = COALESCE($15, currency),
                has_discount = COALESCE($16, has_discount),
                discount = COALESCE($17, discount),
                discount_type = COALESCE($18, discount_type),
                final_price = COALESCE($19, final_price),
                tags = COALESCE($20, tags),
                featured = COALESCE($21, featured),
                meta_title = COALESCE($22, meta_title),
                meta_description = COALESCE($23, meta_description),
                slug = COALESCE($24, slug)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .bind(&input.code)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.description)
            .bind(input.year)
            .bind(&input.technique)
            .bind(&input.dimensions)
            .bind(&input.category)
            .bind(&input.main_image_url)
            .bind(&input.main_image_public_id)
            .bind(&input.thumbnail_url)
            .bind(input.gallery.as_ref().map(Json))
            .bind(input.base_price)
            .bind(&input.currency)
            .bind(input.has_discount)
            .bind(input.discount)
            .bind(&input.discount_type)
            .bind(input.final_price)
            .bind(&input.tags)
            .bind(input.featured)
            .bind(&input.meta_title)
            .bind(&input.meta_description)
            .bind(&input.slug)
            .fetch_optional(pool)
            .await
    }

    /// Set availability flags directly.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtworkStatus,
    ) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!(
            "UPDATE artworks SET
                is_available = COALESCE($2, is_available),
                is_sold = COALESCE($3, is_sold),
                is_reserved = COALESCE($4, is_reserved),
                sold_date = CASE WHEN $3 = true AND sold_date IS NULL THEN NOW()
                                 WHEN $3 = false THEN NULL
                                 ELSE sold_date END,
                reserved_until = CASE WHEN $4 = false THEN NULL ELSE reserved_until END,
                reserved_by = CASE WHEN $4 = false THEN NULL ELSE reserved_by END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .bind(input.is_available)
            .bind(input.is_sold)
            .bind(input.is_reserved)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE artworks SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Add the user's like if absent, remove it otherwise.
    pub async fn toggle_like(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Artwork>, sqlx::Error> {
        let query = format!(
            "UPDATE artworks SET likes = CASE
                WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                ELSE array_append(likes, $2) END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artwork>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Reserve artworks for an order until `until`.
    pub async fn reserve(
        pool: &PgPool,
        ids: &[DbId],
        reserved_by: Option<DbId>,
        until: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artworks SET is_reserved = true, reserved_by = $2, reserved_until = $3
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(reserved_by)
        .bind(until)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark artworks sold, clearing any reservation.
    pub async fn mark_sold(
        pool: &PgPool,
        ids: &[DbId],
        sold_to: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artworks SET
                is_sold = true, is_available = false, is_reserved = false,
                reserved_by = NULL, reserved_until = NULL,
                sold_date = NOW(), sold_to = $2
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(sold_to)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the reservation on artworks that have not been sold.
    pub async fn release_reservations(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artworks SET is_reserved = false, reserved_by = NULL, reserved_until = NULL
             WHERE id = ANY($1) AND is_sold = false",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        tracing::debug!(artwork_ids = ?ids, released = result.rows_affected(), "Reservations released");
        Ok(result.rows_affected())
    }

    /// Clear every reservation whose hold has lapsed.
    pub async fn release_expired_reservations(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artworks SET is_reserved = false, reserved_by = NULL, reserved_until = NULL
             WHERE is_reserved = true AND is_sold = false AND reserved_until < NOW()",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
