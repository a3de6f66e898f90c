//! Repository for `orders`, `order_items` and `order_status_history`.

use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::types::{DbId, Timestamp};

use crate::models::order::{
    CreateOrder, Order, OrderDetail, OrderItem, OrderStatusEntry, UpdatePayment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, order_number, user_id, customer_name, customer_email, customer_phone, \
                        customer_dni, subtotal, discount_total, total, shipping, billing, status, \
                        payment_method, payment_status, payment_transaction_id, payment_intent_id, \
                        payment_preference_id, payment_id, payment_details, paid_at, \
                        payment_amount, payment_currency, customer_notes, internal_notes, \
                        invoice, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, artwork_id, title, artist, price, discount, \
                             final_price, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, order_id, status, notes, changed_by, created_at, updated_at";

pub struct OrderRepo;

impl OrderRepo {
    /// Insert an order with its items and the initial `pending` history entry
    /// in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO orders (order_number, user_id, customer_name, customer_email,
                customer_phone, customer_dni, subtotal, discount_total, total, shipping,
                billing, payment_method, payment_preference_id, payment_amount, customer_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $9, $14)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(&input.order_number)
            .bind(input.user_id)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.customer_phone)
            .bind(&input.customer_dni)
            .bind(input.subtotal)
            .bind(input.discount_total)
            .bind(input.total)
            .bind(Json(&input.shipping))
            .bind(Json(&input.billing))
            .bind(&input.payment_method)
            .bind(&input.payment_preference_id)
            .bind(&input.customer_notes)
            .fetch_one(&mut *tx)
            .await?;

        for item in &input.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, artwork_id, title, artist, price, discount, final_price)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(order.id)
            .bind(item.artwork_id)
            .bind(&item.title)
            .bind(&item.artist)
            .bind(item.price)
            .bind(item.discount)
            .bind(item.final_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO order_status_history (order_id, status, notes) VALUES ($1, $2, $3)")
            .bind(order.id)
            .bind(&order.status)
            .bind(&input.initial_note)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Orders created in `[from, to)`, used to derive the next order number.
    pub async fn count_created_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM orders WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_payment_intent(
        pool: &PgPool,
        payment_intent_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE payment_intent_id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(payment_intent_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the order a checkout notification refers to, by preference or payment id.
    pub async fn find_by_checkout_reference(
        pool: &PgPool,
        preference_id: Option<&str>,
        payment_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::TEXT IS NOT NULL AND payment_preference_id = $1)
                OR payment_id = $2
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(preference_id)
            .bind(payment_id)
            .fetch_optional(pool)
            .await
    }

    /// Load an order with items and history.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<OrderDetail>, sqlx::Error> {
        let Some(order) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Some(Self::load_detail(pool, order).await?))
    }

    /// Attach items and history to an already loaded order.
    pub async fn load_detail(pool: &PgPool, order: Order) -> Result<OrderDetail, sqlx::Error> {
        let items = Self::items_for(pool, order.id).await?;
        let status_history = Self::history_for(pool, order.id).await?;
        Ok(OrderDetail {
            order,
            items,
            status_history,
        })
    }

    pub async fn items_for(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    pub async fn history_for(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderStatusEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM order_status_history
             WHERE order_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, OrderStatusEntry>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of the artworks referenced by an order's lines.
    pub async fn artwork_ids(pool: &PgPool, order_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT artwork_id FROM order_items WHERE order_id = $1 AND artwork_id IS NOT NULL",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    /// Admin listing, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, status: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM orders WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// A customer's own orders, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Set the order status and append a history entry in one transaction.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
        changed_by: Option<DbId>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let Some(order) = sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO order_status_history (order_id, status, notes, changed_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .bind(changed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    /// Update provider-side payment fields. Only non-`None` fields are applied.
    pub async fn update_payment(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePayment,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                payment_status = COALESCE($2, payment_status),
                payment_transaction_id = COALESCE($3, payment_transaction_id),
                payment_intent_id = COALESCE($4, payment_intent_id),
                payment_id = COALESCE($5, payment_id),
                payment_details = COALESCE($6, payment_details),
                paid_at = COALESCE($7, paid_at),
                payment_amount = COALESCE($8, payment_amount),
                payment_preference_id = COALESCE($9, payment_preference_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&input.payment_status)
            .bind(&input.payment_transaction_id)
            .bind(&input.payment_intent_id)
            .bind(&input.payment_id)
            .bind(&input.payment_details)
            .bind(input.paid_at)
            .bind(input.payment_amount)
            .bind(&input.payment_preference_id)
            .fetch_optional(pool)
            .await
    }
}
