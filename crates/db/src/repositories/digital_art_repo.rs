//! Repository for the `digital_art` table.

use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::artwork::{SORT_OLDEST, SORT_PRICE_ASC, SORT_PRICE_DESC};
use galeria_core::digital_art::PrintSize;
use galeria_core::types::DbId;

use crate::models::digital_art::{
    CreateDigitalArt, DigitalArt, DigitalArtFilter, DigitalArtWithOriginal, UpdateDigitalArt,
};

const COLUMNS: &str = "id, title, original_artwork_id, original_title, artist, version, \
                        description, digital_technique, image_url, thumbnail_url, mockup_url, \
                        product_type, sizes, features, category, tags, available, featured, \
                        views, created_at, updated_at";

/// Same columns qualified with the `d` alias, plus the joined original.
const JOINED_COLUMNS: &str = "d.id, d.title, d.original_artwork_id, d.original_title, d.artist, \
                        d.version, d.description, d.digital_technique, d.image_url, \
                        d.thumbnail_url, d.mockup_url, d.product_type, d.sizes, d.features, \
                        d.category, d.tags, d.available, d.featured, d.views, d.created_at, \
                        d.updated_at, a.code AS original_code, a.title AS original_artwork_title, \
                        a.main_image_url AS original_image_url";

const FROM_JOINED: &str = "digital_art d LEFT JOIN artworks a ON a.id = d.original_artwork_id";

fn order_clause(sort: Option<&str>) -> &'static str {
    match sort {
        Some(SORT_PRICE_ASC) => "(d.sizes->0->>'price')::FLOAT8 ASC NULLS LAST, d.id ASC",
        Some(SORT_PRICE_DESC) => "(d.sizes->0->>'price')::FLOAT8 DESC NULLS LAST, d.id DESC",
        Some(SORT_OLDEST) => "d.created_at ASC, d.id ASC",
        _ => "d.featured DESC, d.created_at DESC, d.id DESC",
    }
}

pub struct DigitalArtRepo;

impl DigitalArtRepo {
    pub async fn create(pool: &PgPool, input: &CreateDigitalArt) -> Result<DigitalArt, sqlx::Error> {
        use galeria_core::digital_art as defaults;

        let query = format!(
            "INSERT INTO digital_art (title, original_artwork_id, original_title, artist, version,
                description, digital_technique, image_url, thumbnail_url, mockup_url,
                product_type, sizes, features, tags, available, featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(&input.title)
            .bind(input.original_artwork_id)
            .bind(&input.original_title)
            .bind(input.artist.as_deref().unwrap_or(defaults::DEFAULT_ARTIST))
            .bind(input.version.as_deref().unwrap_or(defaults::DEFAULT_VERSION))
            .bind(&input.description)
            .bind(
                input
                    .digital_technique
                    .as_deref()
                    .unwrap_or(defaults::DEFAULT_TECHNIQUE),
            )
            .bind(&input.image_url)
            .bind(&input.thumbnail_url)
            .bind(&input.mockup_url)
            .bind(input.product_type.as_deref().unwrap_or(defaults::PRODUCT_LAMINA))
            .bind(Json(&input.sizes))
            .bind(Json(input.features.clone().unwrap_or_default()))
            .bind(&input.tags)
            .bind(input.available.unwrap_or(true))
            .bind(input.featured.unwrap_or(false))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DigitalArt>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM digital_art WHERE id = $1");
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find one product with its original artwork summary.
    pub async fn find_with_original(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DigitalArtWithOriginal>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {FROM_JOINED} WHERE d.id = $1");
        sqlx::query_as::<_, DigitalArtWithOriginal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &DigitalArtFilter,
    ) -> Result<Vec<DigitalArtWithOriginal>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {FROM_JOINED}
             WHERE ($1::BOOL IS NULL OR d.available = $1)
               AND ($2::BOOL IS NULL OR d.featured = $2)
               AND ($3::TEXT IS NULL
                    OR d.title ILIKE '%' || $3 || '%'
                    OR d.description ILIKE '%' || $3 || '%'
                    OR d.original_title ILIKE '%' || $3 || '%'
                    OR $3 = ANY(d.tags))
             ORDER BY {order}"
        );
        sqlx::query_as::<_, DigitalArtWithOriginal>(&query)
            .bind(filter.available)
            .bind(filter.featured)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Available reproductions of one original, by version.
    pub async fn list_by_original(
        pool: &PgPool,
        artwork_id: DbId,
    ) -> Result<Vec<DigitalArt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM digital_art
             WHERE original_artwork_id = $1 AND available = true
             ORDER BY version ASC"
        );
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(artwork_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDigitalArt,
    ) -> Result<Option<DigitalArt>, sqlx::Error> {
        let query = format!(
            "UPDATE digital_art SET
                title = COALESCE($2, title),
                original_artwork_id = COALESCE($3, original_artwork_id),
                original_title = COALESCE($4, original_title),
                artist = COALESCE($5, artist),
                version = COALESCE($6, version),
                description = COALESCE($7, description),
                digital_technique = COALESCE($8, digital_technique),
                image_url = COALESCE($9, image_url),
                thumbnail_url = COALESCE($10, thumbnail_url),
                mockup_url = COALESCE($11, mockup_url),
                product_type = COALESCE($12, product_type),
                sizes = COALESCE($13, sizes),
                features = COALESCE($14, features),
                tags = COALESCE($15, tags),
                available = COALESCE($16, available),
                featured = COALESCE($17, featured)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.original_artwork_id)
            .bind(&input.original_title)
            .bind(&input.artist)
            .bind(&input.version)
            .bind(&input.description)
            .bind(&input.digital_technique)
            .bind(&input.image_url)
            .bind(&input.thumbnail_url)
            .bind(&input.mockup_url)
            .bind(&input.product_type)
            .bind(input.sizes.as_ref().map(Json))
            .bind(input.features.as_ref().map(Json))
            .bind(&input.tags)
            .bind(input.available)
            .bind(input.featured)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM digital_art WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn increment_views(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE digital_art SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_availability(
        pool: &PgPool,
        id: DbId,
        available: bool,
    ) -> Result<Option<DigitalArt>, sqlx::Error> {
        let query =
            format!("UPDATE digital_art SET available = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(id)
            .bind(available)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole sizes array.
    pub async fn set_sizes(
        pool: &PgPool,
        id: DbId,
        sizes: &[PrintSize],
    ) -> Result<Option<DigitalArt>, sqlx::Error> {
        let query = format!("UPDATE digital_art SET sizes = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, DigitalArt>(&query)
            .bind(id)
            .bind(Json(sizes))
            .fetch_optional(pool)
            .await
    }
}

