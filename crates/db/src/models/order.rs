//! Order, line item and status history models.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Embedded documents
// ---------------------------------------------------------------------------

/// Delivery details stored in `orders.shipping`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub method: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub carrier: Option<String>,
}

/// Invoicing details stored in `orders.billing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(rename = "type", default = "default_billing_type")]
    pub billing_type: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub cuit: Option<String>,
}

fn default_billing_type() -> String {
    galeria_core::order::BILLING_CONSUMER.to_string()
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    pub user_id: Option<DbId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_dni: Option<String>,
    pub subtotal: f64,
    pub discount_total: f64,
    pub total: f64,
    pub shipping: Json<ShippingInfo>,
    pub billing: Json<BillingInfo>,
    pub status: String,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub payment_preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub payment_details: Option<serde_json::Value>,
    pub paid_at: Option<Timestamp>,
    pub payment_amount: Option<f64>,
    pub payment_currency: String,
    pub customer_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub invoice: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub artwork_id: Option<DbId>,
    pub title: String,
    pub artist: Option<String>,
    pub price: f64,
    /// The artwork's catalog discount at purchase time (a percentage or an
    /// amount, per its `discount_type`); 0 when it had none.
    pub discount: f64,
    pub final_price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderStatusEntry {
    pub id: DbId,
    pub order_id: DbId,
    pub status: String,
    pub notes: Option<String>,
    pub changed_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An order with its lines and status history, as returned by detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub status_history: Vec<OrderStatusEntry>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub artwork_id: DbId,
    pub title: String,
    pub artist: Option<String>,
    pub price: f64,
    pub discount: f64,
    pub final_price: f64,
}

/// Insert payload. Number and totals are resolved by the caller.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_number: String,
    pub user_id: Option<DbId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_dni: Option<String>,
    pub subtotal: f64,
    pub discount_total: f64,
    pub total: f64,
    pub shipping: ShippingInfo,
    pub billing: BillingInfo,
    pub payment_method: String,
    pub payment_preference_id: Option<String>,
    pub customer_notes: Option<String>,
    pub items: Vec<CreateOrderItem>,
    /// Note attached to the initial `pending` history entry.
    pub initial_note: Option<String>,
}

/// Provider-side payment fields. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePayment {
    pub payment_status: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub payment_preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub payment_details: Option<serde_json::Value>,
    pub paid_at: Option<Timestamp>,
    pub payment_amount: Option<f64>,
}
