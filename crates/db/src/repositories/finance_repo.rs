//! Repository for the `finance_transactions` table.

use sqlx::PgPool;
use galeria_core::finance::{SORT_AMOUNT_ASC, SORT_AMOUNT_DESC, SORT_OLDEST, STATUS_COMPLETED};
use galeria_core::types::{DbId, Timestamp};

use crate::models::finance::{
    CategoryTotal, CreateTransaction, FinanceTransaction, TransactionFilter, UpdateTransaction,
};

const COLUMNS: &str = "id, transaction_type, amount, currency, category, description, date, \
                        payment_method, payment_status, related_order_id, related_contact_id, \
                        related_artwork_id, invoice_number, receipt_url, receipt_public_id, \
                        notes, tags, is_recurring, recurrence_frequency, created_by, \
                        created_at, updated_at";

/// Shared WHERE clause for listing and counting ($1..$7).
const FILTER: &str = "($1::TEXT IS NULL OR transaction_type = $1)
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::TEXT IS NULL OR payment_status = $3)
               AND ($4::TEXT IS NULL OR payment_method = $4)
               AND ($5::TIMESTAMPTZ IS NULL OR date >= $5)
               AND ($6::TIMESTAMPTZ IS NULL OR date <= $6)
               AND ($7::TEXT IS NULL
                    OR description ILIKE '%' || $7 || '%'
                    OR notes ILIKE '%' || $7 || '%'
                    OR invoice_number ILIKE '%' || $7 || '%')";

fn order_clause(sort: Option<&str>) -> &'static str {
    match sort {
        Some(SORT_OLDEST) => "date ASC, id ASC",
        Some(SORT_AMOUNT_ASC) => "amount ASC, id ASC",
        Some(SORT_AMOUNT_DESC) => "amount DESC, id DESC",
        _ => "date DESC, id DESC",
    }
}

pub struct FinanceRepo;

impl FinanceRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTransaction,
        created_by: DbId,
    ) -> Result<FinanceTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO finance_transactions (transaction_type, amount, currency, category,
                description, date, payment_method, payment_status, related_order_id,
                related_contact_id, related_artwork_id, invoice_number, receipt_url,
                receipt_public_id, notes, tags, is_recurring, recurrence_frequency, created_by)
             VALUES ($1, $2, COALESCE($3, 'ARS'), $4, $5, COALESCE($6, NOW()),
                     COALESCE($7, 'cash'), COALESCE($8, 'completed'), $9, $10, $11, $12, $13,
                     $14, $15, $16, $17, $18, $19)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(&input.transaction_type)
            .bind(input.amount)
            .bind(&input.currency)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.payment_method)
            .bind(&input.payment_status)
            .bind(input.related_order_id)
            .bind(input.related_contact_id)
            .bind(input.related_artwork_id)
            .bind(&input.invoice_number)
            .bind(&input.receipt_url)
            .bind(&input.receipt_public_id)
            .bind(&input.notes)
            .bind(&input.tags)
            .bind(input.is_recurring)
            .bind(&input.recurrence_frequency)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FinanceTransaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM finance_transactions WHERE id = $1");
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FinanceTransaction>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM finance_transactions
             WHERE {FILTER}
             ORDER BY {order}
             LIMIT $8 OFFSET $9"
        );
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(&filter.transaction_type)
            .bind(&filter.category)
            .bind(&filter.payment_status)
            .bind(&filter.payment_method)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &TransactionFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*)::BIGINT FROM finance_transactions WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(&filter.transaction_type)
            .bind(&filter.category)
            .bind(&filter.payment_status)
            .bind(&filter.payment_method)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Every transaction linked to one CRM contact, newest first.
    pub async fn list_for_contact(
        pool: &PgPool,
        contact_id: DbId,
    ) -> Result<Vec<FinanceTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM finance_transactions
             WHERE related_contact_id = $1
             ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(contact_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTransaction,
    ) -> Result<Option<FinanceTransaction>, sqlx::Error> {
        let query = format!(
            "UPDATE finance_transactions SET
                transaction_type = COALESCE($2, transaction_type),
                amount = COALESCE($3, amount),
                currency = COALESCE($4, currency),
                category = COALESCE($5, category),
                description = COALESCE($6, description),
                date = COALESCE($7, date),
                payment_method = COALESCE($8, payment_method),
                payment_status = COALESCE($9, payment_status),
                related_order_id = COALESCE($10, related_order_id),
                related_contact_id = COALESCE($11, related_contact_id),
                related_artwork_id = COALESCE($12, related_artwork_id),
                invoice_number = COALESCE($13, invoice_number),
                receipt_url = COALESCE($14, receipt_url),
                receipt_public_id = COALESCE($15, receipt_public_id),
                notes = COALESCE($16, notes),
                tags = COALESCE($17, tags),
                is_recurring = COALESCE($18, is_recurring),
                recurrence_frequency = COALESCE($19, recurrence_frequency)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(id)
            .bind(&input.transaction_type)
            .bind(input.amount)
            .bind(&input.currency)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.date)
            .bind(&input.payment_method)
            .bind(&input.payment_status)
            .bind(input.related_order_id)
            .bind(input.related_contact_id)
            .bind(input.related_artwork_id)
            .bind(&input.invoice_number)
            .bind(&input.receipt_url)
            .bind(&input.receipt_public_id)
            .bind(&input.notes)
            .bind(&input.tags)
            .bind(input.is_recurring)
            .bind(&input.recurrence_frequency)
            .fetch_optional(pool)
            .await
    }

    /// Delete a transaction, returning the removed row.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<FinanceTransaction>, sqlx::Error> {
        let query = format!("DELETE FROM finance_transactions WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, FinanceTransaction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -- reporting ------------------------------------------------------------

    /// `(type, total, count)` per transaction type in `[from, to)` for one payment status.
    pub async fn totals_by_type(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        payment_status: &str,
    ) -> Result<Vec<(String, f64, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT transaction_type, COALESCE(SUM(amount), 0)::FLOAT8, COUNT(*)::BIGINT
             FROM finance_transactions
             WHERE date >= $1 AND date < $2 AND payment_status = $3
             GROUP BY transaction_type",
        )
        .bind(from)
        .bind(to)
        .bind(payment_status)
        .fetch_all(pool)
        .await
    }

    /// Completed totals per category for one transaction type in `[from, to)`.
    pub async fn category_breakdown(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        transaction_type: &str,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        sqlx::query_as::<_, CategoryTotal>(
            "SELECT category, COALESCE(SUM(amount), 0)::FLOAT8 AS total, COUNT(*)::BIGINT AS count
             FROM finance_transactions
             WHERE date >= $1 AND date < $2
               AND transaction_type = $3
               AND payment_status = $4
             GROUP BY category
             ORDER BY total DESC",
        )
        .bind(from)
        .bind(to)
        .bind(transaction_type)
        .bind(STATUS_COMPLETED)
        .fetch_all(pool)
        .await
    }

    /// Completed `(month, type, total)` rows for one calendar year.
    pub async fn monthly_totals(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<(i32, String, f64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT EXTRACT(MONTH FROM date AT TIME ZONE 'UTC')::INT, transaction_type,
                    COALESCE(SUM(amount), 0)::FLOAT8
             FROM finance_transactions
             WHERE date >= $1 AND date < $2 AND payment_status = $3
             GROUP BY 1, 2
             ORDER BY 1",
        )
        .bind(from)
        .bind(to)
        .bind(STATUS_COMPLETED)
        .fetch_all(pool)
        .await
    }

    /// Completed `(category, type, total)` rows in `[from, to)`, the input
    /// to budget reconciliation.
    pub async fn actuals_by_category(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<(String, String, f64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT category, transaction_type, COALESCE(SUM(amount), 0)::FLOAT8
             FROM finance_transactions
             WHERE date >= $1 AND date < $2 AND payment_status = $3
             GROUP BY category, transaction_type",
        )
        .bind(from)
        .bind(to)
        .bind(STATUS_COMPLETED)
        .fetch_all(pool)
        .await
    }
}
