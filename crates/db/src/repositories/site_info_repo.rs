//! Repository for the singleton `site_info` row.

use sqlx::PgPool;

use crate::models::site_info::SiteInfoRow;

const COLUMNS: &str =
    "id, biography, contact, legal_pages, updated_by, last_updated, created_at, updated_at";

pub struct SiteInfoRepo;

impl SiteInfoRepo {
    /// Return the row, inserting it with the given section defaults first if absent.
    pub async fn get_or_create(
        pool: &PgPool,
        biography: &serde_json::Value,
        contact: &serde_json::Value,
        legal_pages: &serde_json::Value,
    ) -> Result<SiteInfoRow, sqlx::Error> {
        sqlx::query(
            "INSERT INTO site_info (id, biography, contact, legal_pages)
             VALUES (1, $1, $2, $3)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(biography)
        .bind(contact)
        .bind(legal_pages)
        .execute(pool)
        .await?;

        let query = format!("SELECT {COLUMNS} FROM site_info WHERE id = 1");
        sqlx::query_as::<_, SiteInfoRow>(&query)
            .fetch_one(pool)
            .await
    }

    /// Overwrite all sections and stamp the updater.
    pub async fn save(
        pool: &PgPool,
        biography: &serde_json::Value,
        contact: &serde_json::Value,
        legal_pages: &serde_json::Value,
        updated_by: &str,
    ) -> Result<SiteInfoRow, sqlx::Error> {
        let query = format!(
            "UPDATE site_info SET
                biography = $1,
                contact = $2,
                legal_pages = $3,
                updated_by = $4,
                last_updated = NOW()
             WHERE id = 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteInfoRow>(&query)
            .bind(biography)
            .bind(contact)
            .bind(legal_pages)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }
}
