//! Repository for `admin_contacts` and `admin_contact_history`.

use sqlx::PgPool;
use galeria_core::crm::{HistoryKind, SORT_COMPANY, SORT_NEWEST, SORT_OLDEST};
use galeria_core::types::DbId;

use crate::models::admin_contact::{
    AdminContact, AdminContactFilter, AdminContactSummary, ContactHistoryEntry,
    CreateAdminContact, CreateHistoryEntry, GroupCount, TopClient, UpdateAdminContact,
};

const COLUMNS: &str = "id, contact_type, name, company, email, phone, mobile, whatsapp, address, \
                        category, tags, supplier_info, client_info, last_contact_date, \
                        next_follow_up, preferred_contact_method, notes, is_active, is_favorite, \
                        created_by, created_at, updated_at";

/// Contact columns under the `c` alias plus the derived totals.
const SUMMARY_SELECT: &str = "SELECT c.id, c.contact_type, c.name, c.company, c.email, c.phone, \
        c.mobile, c.whatsapp, c.address, c.category, c.tags, c.supplier_info, c.client_info, \
        c.last_contact_date, c.next_follow_up, c.preferred_contact_method, c.notes, c.is_active, \
        c.is_favorite, c.created_by, c.created_at, c.updated_at,
        COALESCE(h.total_purchases, 0)::FLOAT8 AS total_purchases,
        COALESCE(h.total_supplies, 0)::FLOAT8 AS total_supplies,
        COALESCE(h.purchase_count, 0)::BIGINT AS purchase_count,
        COALESCE(f.income, 0)::FLOAT8 AS transaction_income,
        COALESCE(f.expense, 0)::FLOAT8 AS transaction_expense,
        COALESCE(f.transaction_count, 0)::BIGINT AS transaction_count
     FROM admin_contacts c
     LEFT JOIN LATERAL (
        SELECT SUM(amount) FILTER (WHERE kind = 'purchase') AS total_purchases,
               SUM(amount) FILTER (WHERE kind = 'supply') AS total_supplies,
               COUNT(*) FILTER (WHERE kind = 'purchase') AS purchase_count
        FROM admin_contact_history WHERE contact_id = c.id
     ) h ON true
     LEFT JOIN LATERAL (
        SELECT SUM(amount) FILTER (WHERE transaction_type = 'income') AS income,
               SUM(amount) FILTER (WHERE transaction_type = 'expense') AS expense,
               COUNT(*) AS transaction_count
        FROM finance_transactions
        WHERE related_contact_id = c.id AND payment_status = 'completed'
     ) f ON true";

const HISTORY_COLUMNS: &str = "id, contact_id, kind, date, description, amount, artwork_id, \
                                notes, created_at, updated_at";

fn order_clause(sort: Option<&str>) -> &'static str {
    match sort {
        Some(SORT_NEWEST) => "c.created_at DESC, c.id DESC",
        Some(SORT_OLDEST) => "c.created_at ASC, c.id ASC",
        Some(SORT_COMPANY) => "c.company ASC NULLS LAST, c.name ASC",
        _ => "c.name ASC, c.id ASC",
    }
}

pub struct AdminContactRepo;

impl AdminContactRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAdminContact,
        created_by: DbId,
    ) -> Result<AdminContact, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_contacts (contact_type, name, company, email, phone, mobile,
                whatsapp, address, category, tags, supplier_info, client_info,
                last_contact_date, next_follow_up, preferred_contact_method, notes,
                is_favorite, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'other'), $10, $11, $12,
                     $13, $14, $15, $16, COALESCE($17, false), $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminContact>(&query)
            .bind(&input.contact_type)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.mobile)
            .bind(&input.whatsapp)
            .bind(&input.address)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(&input.supplier_info)
            .bind(&input.client_info)
            .bind(input.last_contact_date)
            .bind(input.next_follow_up)
            .bind(&input.preferred_contact_method)
            .bind(&input.notes)
            .bind(input.is_favorite)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminContact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_contacts WHERE id = $1");
        sqlx::query_as::<_, AdminContact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_summary(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdminContactSummary>, sqlx::Error> {
        let query = format!("{SUMMARY_SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, AdminContactSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered listing, each row enriched with history and finance totals.
    pub async fn list(
        pool: &PgPool,
        filter: &AdminContactFilter,
    ) -> Result<Vec<AdminContactSummary>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "{SUMMARY_SELECT}
             WHERE ($1::BOOL IS NULL OR c.is_active = $1)
               AND ($2::TEXT IS NULL OR c.contact_type = $2)
               AND ($3::TEXT IS NULL OR c.category = $3)
               AND ($4::BOOL IS NULL OR c.is_favorite = $4)
               AND ($5::TEXT IS NULL
                    OR c.name ILIKE '%' || $5 || '%'
                    OR c.company ILIKE '%' || $5 || '%'
                    OR c.email ILIKE '%' || $5 || '%'
                    OR c.phone ILIKE '%' || $5 || '%'
                    OR $5 = ANY(c.tags))
             ORDER BY {order}"
        );
        sqlx::query_as::<_, AdminContactSummary>(&query)
            .bind(filter.active)
            .bind(&filter.contact_type)
            .bind(&filter.category)
            .bind(filter.favorite)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAdminContact,
    ) -> Result<Option<AdminContact>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_contacts SET
                contact_type = COALESCE($2, contact_type),
                name = COALESCE($3, name),
                company = COALESCE($4, company),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                mobile = COALESCE($7, mobile),
                whatsapp = COALESCE($8, whatsapp),
                address = COALESCE($9, address),
                category = COALESCE($10, category),
                tags = COALESCE($11, tags),
                supplier_info = COALESCE($12, supplier_info),
                client_info = COALESCE($13, client_info),
                last_contact_date = COALESCE($14, last_contact_date),
                next_follow_up = COALESCE($15, next_follow_up),
                preferred_contact_method = COALESCE($16, preferred_contact_method),
                notes = COALESCE($17, notes),
                is_active = COALESCE($18, is_active),
                is_favorite = COALESCE($19, is_favorite)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminContact>(&query)
            .bind(id)
            .bind(&input.contact_type)
            .bind(&input.name)
            .bind(&input.company)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.mobile)
            .bind(&input.whatsapp)
            .bind(&input.address)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(&input.supplier_info)
            .bind(&input.client_info)
            .bind(input.last_contact_date)
            .bind(input.next_follow_up)
            .bind(&input.preferred_contact_method)
            .bind(&input.notes)
            .bind(input.is_active)
            .bind(input.is_favorite)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM admin_contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn toggle_favorite(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdminContact>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_contacts SET is_favorite = NOT is_favorite WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminContact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AdminContact>, sqlx::Error> {
        let query = format!(
            "UPDATE admin_contacts SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminContact>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -- history --------------------------------------------------------------

    pub async fn add_history(
        pool: &PgPool,
        contact_id: DbId,
        kind: HistoryKind,
        input: &CreateHistoryEntry,
    ) -> Result<ContactHistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_contact_history (contact_id, kind, date, description, amount,
                artwork_id, notes)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, $5, $6, $7)
             RETURNING {HISTORY_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ContactHistoryEntry>(&query)
            .bind(contact_id)
            .bind(kind.as_str())
            .bind(input.date)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.artwork_id)
            .bind(&input.notes)
            .fetch_one(pool)
            .await?;

        sqlx::query("UPDATE admin_contacts SET last_contact_date = $2 WHERE id = $1")
            .bind(contact_id)
            .bind(entry.date)
            .execute(pool)
            .await?;
        Ok(entry)
    }

    pub async fn history_for(
        pool: &PgPool,
        contact_id: DbId,
    ) -> Result<Vec<ContactHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM admin_contact_history
             WHERE contact_id = $1
             ORDER BY date DESC, id DESC"
        );
        sqlx::query_as::<_, ContactHistoryEntry>(&query)
            .bind(contact_id)
            .fetch_all(pool)
            .await
    }

    /// Delete one history entry belonging to `contact_id`.
    pub async fn delete_history(
        pool: &PgPool,
        contact_id: DbId,
        history_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM admin_contact_history WHERE id = $1 AND contact_id = $2")
                .bind(history_id)
                .bind(contact_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    // -- stats ----------------------------------------------------------------

    pub async fn count_by_type(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT contact_type AS key, COUNT(*)::BIGINT AS count
             FROM admin_contacts WHERE is_active = true
             GROUP BY contact_type ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_category(pool: &PgPool) -> Result<Vec<GroupCount>, sqlx::Error> {
        sqlx::query_as::<_, GroupCount>(
            "SELECT category AS key, COUNT(*)::BIGINT AS count
             FROM admin_contacts WHERE is_active = true
             GROUP BY category ORDER BY count DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// `(total, active, favorites)` contact counts.
    pub async fn totals(pool: &PgPool) -> Result<(i64, i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*)::BIGINT,
                    COUNT(*) FILTER (WHERE is_active)::BIGINT,
                    COUNT(*) FILTER (WHERE is_favorite)::BIGINT
             FROM admin_contacts",
        )
        .fetch_one(pool)
        .await
    }

    /// Clients with the largest purchase volume.
    pub async fn top_clients(pool: &PgPool, limit: i64) -> Result<Vec<TopClient>, sqlx::Error> {
        sqlx::query_as::<_, TopClient>(
            "SELECT c.id, c.name, c.company,
                    COALESCE(SUM(h.amount), 0)::FLOAT8 AS total_purchases,
                    COUNT(h.id)::BIGINT AS purchase_count
             FROM admin_contacts c
             JOIN admin_contact_history h ON h.contact_id = c.id AND h.kind = 'purchase'
             WHERE c.contact_type IN ('client', 'both')
             GROUP BY c.id
             ORDER BY total_purchases DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
