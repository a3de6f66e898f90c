//! Repository for the `newsletter_subscribers` table.

use sqlx::PgPool;
use galeria_core::newsletter::{STATUS_ACTIVE, STATUS_UNSUBSCRIBED};

use crate::models::newsletter::NewsletterSubscriber;

const COLUMNS: &str = "id, email, name, status, source, preferences, subscribed_at, \
                        unsubscribed_at, created_at, updated_at";

pub struct NewsletterRepo;

impl NewsletterRepo {
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM newsletter_subscribers WHERE email = $1");
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        email: &str,
        name: Option<&str>,
        source: &str,
    ) -> Result<NewsletterSubscriber, sqlx::Error> {
        let query = format!(
            "INSERT INTO newsletter_subscribers (email, name, source)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .bind(name)
            .bind(source)
            .fetch_one(pool)
            .await
    }

    /// Bring an unsubscribed or bounced address back to `active`.
    pub async fn reactivate(
        pool: &PgPool,
        email: &str,
        name: Option<&str>,
    ) -> Result<Option<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "UPDATE newsletter_subscribers SET
                status = $3,
                name = COALESCE($2, name),
                subscribed_at = NOW(),
                unsubscribed_at = NULL
             WHERE email = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(email)
            .bind(name)
            .bind(STATUS_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Returns `false` when the address is unknown.
    pub async fn unsubscribe(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE newsletter_subscribers SET status = $2, unsubscribed_at = NOW()
             WHERE email = $1",
        )
        .bind(email)
        .bind(STATUS_UNSUBSCRIBED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Subscribers in one status, most recent subscription first.
    pub async fn list(
        pool: &PgPool,
        status: &str,
        limit: i64,
    ) -> Result<Vec<NewsletterSubscriber>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM newsletter_subscribers
             WHERE status = $1
             ORDER BY subscribed_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, NewsletterSubscriber>(&query)
            .bind(status)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM newsletter_subscribers WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await
    }
}
