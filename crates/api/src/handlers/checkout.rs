//! Handlers for MercadoPago Checkout Pro: preference creation, the payment
//! notification webhook and payment status lookups.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use galeria_core::order::{
    PAYMENT_MERCADOPAGO, PAYMENT_STATUS_COMPLETED, PAYMENT_STATUS_FAILED, PAYMENT_STATUS_PENDING,
    SHIPPING_PICKUP, STATUS_CANCELLED, STATUS_PAID,
};
use galeria_core::payments::{
    checkout_note, checkout_outcome, CheckoutOutcome, NOTE_CHECKOUT_CREATED, STATEMENT_DESCRIPTOR,
};
use galeria_core::types::{DbId, Timestamp};
use galeria_db::models::order::{BillingInfo, Order, ShippingInfo, UpdatePayment};
use galeria_db::repositories::OrderRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::orders::{place_order, transition_order, CustomerInput, OrderDraft};
use crate::integrations::mercadopago::{
    BackUrls, Identification, Payer, PayerPhone, Payment, Preference, PreferenceItem,
    ReceiverAddress, Shipments,
};
use crate::middleware::auth::OptionalAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const AUTO_RETURN_APPROVED: &str = "approved";
const NOTIFICATION_TYPE_PAYMENT: &str = "payment";
const NOTE_PREFERENCE_FAILED: &str = "No se pudo crear la preferencia de pago";

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    /// Artwork id.
    pub id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub dni: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePreferenceRequest {
    pub items: Option<Vec<CheckoutItem>>,
    pub customer: Option<CheckoutCustomer>,
    pub shipping: Option<ShippingInfo>,
    pub billing: Option<BillingInfo>,
    /// Total shown to the buyer. The order is priced from the catalog; a
    /// mismatch is only logged.
    pub total: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreatePreferenceResponse {
    pub id: String,
    pub init_point: Option<String>,
    pub sandbox_init_point: Option<String>,
    pub order_id: DbId,
    pub order_number: String,
}

/// Query-string form of a notification (`?type=payment&data.id=..` or the
/// legacy `?topic=payment&id=..`).
#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub topic: Option<String>,
    pub id: Option<String>,
    #[serde(rename = "data.id")]
    pub data_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NotificationBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    data: Option<NotificationData>,
}

#[derive(Debug, Deserialize)]
struct NotificationData {
    /// Sent as a string or a number depending on the API version.
    id: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub status: String,
    pub status_detail: Option<String>,
    pub payment_method: Option<String>,
    pub amount: Option<f64>,
    pub date_approved: Option<Timestamp>,
}

// ----- Handlers -----

/// POST /api/v1/checkout/create-preference
pub async fn create_preference(
    OptionalAuth(auth): OptionalAuth,
    State(state): State<AppState>,
    Json(input): Json<CreatePreferenceRequest>,
) -> AppResult<Json<DataResponse<CreatePreferenceResponse>>> {
    let mercadopago = state.mercadopago()?.clone();

    let (Some(items), Some(customer), Some(shipping), Some(total)) =
        (input.items, input.customer, input.shipping, input.total)
    else {
        return Err(AppError::BadRequest(
            "items, customer, shipping and total are required".into(),
        ));
    };
    if items.is_empty() {
        return Err(AppError::BadRequest("items cannot be empty".into()));
    }

    let billing = input.billing.unwrap_or_default();
    let draft = OrderDraft {
        user_id: auth.map(|a| a.user_id),
        customer: CustomerInput {
            name: format!("{} {}", customer.first_name.trim(), customer.last_name.trim()),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            dni: customer.dni.clone(),
        },
        artwork_ids: items.iter().map(|i| i.id).collect(),
        shipping: shipping.clone(),
        billing: billing.clone(),
        payment_method: PAYMENT_MERCADOPAGO.to_string(),
        customer_notes: shipping.notes.clone(),
        initial_note: Some(NOTE_CHECKOUT_CREATED.to_string()),
    };
    let order = place_order(&state, draft).await?;
    if (order.total - total).abs() > 0.005 {
        tracing::warn!(
            order_id = order.id,
            requested_total = total,
            catalog_total = order.total,
            "Checkout total differs from catalog prices",
        );
    }

    let order_items = OrderRepo::items_for(&state.pool, order.id).await?;
    let preference = Preference {
        items: order_items
            .iter()
            .map(|item| PreferenceItem {
                id: item.artwork_id.map(|id| id.to_string()).unwrap_or_default(),
                title: item.title.clone(),
                quantity: 1,
                unit_price: item.final_price,
                currency_id: order.payment_currency.clone(),
                description: item.artist.clone().unwrap_or_else(|| item.title.clone()),
            })
            .collect(),
        payer: Payer {
            name: customer.first_name,
            surname: customer.last_name,
            email: order.customer_email.clone(),
            phone: PayerPhone {
                number: customer.phone,
            },
            identification: customer.dni.map(|number| Identification {
                kind: "DNI".to_string(),
                number,
            }),
        },
        back_urls: BackUrls::for_frontend(&state.config.frontend_url),
        auto_return: AUTO_RETURN_APPROVED.to_string(),
        shipments: shipments_for(&shipping),
        statement_descriptor: STATEMENT_DESCRIPTOR.to_string(),
        notification_url: format!("{}/api/v1/webhook/mercadopago", state.config.backend_url),
        external_reference: order.order_number.clone(),
        metadata: serde_json::json!({
            "order_id": order.id,
            "customer_email": order.customer_email,
            "shipping_method": shipping.method,
            "billing_type": billing.billing_type,
        }),
    };

    let created = match mercadopago.create_preference(&preference).await {
        Ok(created) => created,
        Err(e) => {
            // Free the reserved artworks; the order can never be paid.
            transition_order(
                &state,
                order.id,
                STATUS_CANCELLED,
                Some(NOTE_PREFERENCE_FAILED),
                None,
            )
            .await?;
            return Err(e.into());
        }
    };

    OrderRepo::update_payment(
        &state.pool,
        order.id,
        &UpdatePayment {
            payment_preference_id: Some(created.id.clone()),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        preference_id = %created.id,
        "MercadoPago preference created",
    );

    Ok(Json(DataResponse::new(CreatePreferenceResponse {
        id: created.id,
        init_point: created.init_point,
        sandbox_init_point: created.sandbox_init_point,
        order_id: order.id,
        order_number: order.order_number,
    })))
}

/// POST /api/v1/webhook/mercadopago
///
/// Always answers 200 so MercadoPago stops retrying; failures are logged.
pub async fn mercadopago_webhook(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    match payment_notification_id(&query, &body) {
        Some(payment_id) => {
            if let Err(e) = process_payment_notification(&state, &payment_id).await {
                tracing::error!(payment_id = %payment_id, error = %e, "MercadoPago webhook failed");
            }
        }
        None => tracing::debug!("Ignoring non-payment MercadoPago notification"),
    }
    (StatusCode::OK, "OK")
}

/// GET /api/v1/checkout/payment-status/{payment_id}
pub async fn payment_status(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> AppResult<Json<DataResponse<PaymentStatusResponse>>> {
    let payment = state
        .mercadopago()?
        .get_payment(&payment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {payment_id} not found")))?;

    Ok(Json(DataResponse::new(PaymentStatusResponse {
        status: payment.status,
        status_detail: payment.status_detail,
        payment_method: payment.payment_method_id,
        amount: payment.transaction_amount,
        date_approved: payment.date_approved,
    })))
}

// ----- Helpers -----

fn shipments_for(shipping: &ShippingInfo) -> Option<Shipments> {
    if shipping.method == SHIPPING_PICKUP {
        return None;
    }
    Some(Shipments {
        mode: "not_specified".to_string(),
        receiver_address: ReceiverAddress {
            street_name: shipping.address.clone().unwrap_or_default(),
            city_name: shipping.city.clone().unwrap_or_default(),
            state_name: shipping.province.clone().unwrap_or_default(),
            zip_code: shipping.postal_code.clone().unwrap_or_default(),
        },
    })
}

/// Payment id of a `payment` notification, from the body or the query string.
pub(crate) fn payment_notification_id(query: &NotificationQuery, body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<NotificationBody>(body) {
        if parsed.kind.as_deref() == Some(NOTIFICATION_TYPE_PAYMENT) {
            let id = parsed.data.map(|d| match d.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            });
            if let Some(id) = id.filter(|id| !id.is_empty() && id != "null") {
                return Some(id);
            }
        }
    }

    let kind = query.kind.as_deref().or(query.topic.as_deref());
    if kind == Some(NOTIFICATION_TYPE_PAYMENT) {
        return query.data_id.clone().or_else(|| query.id.clone());
    }
    None
}

/// Fetch the payment and apply its status to the matching order.
async fn process_payment_notification(state: &AppState, payment_id: &str) -> AppResult<()> {
    let Some(payment) = state.mercadopago()?.get_payment(payment_id).await? else {
        tracing::warn!(payment_id, "MercadoPago payment not found");
        return Ok(());
    };

    let Some(order) = OrderRepo::find_by_checkout_reference(
        &state.pool,
        payment.preference_id.as_deref(),
        payment_id,
    )
    .await?
    else {
        tracing::warn!(
            payment_id,
            preference_id = ?payment.preference_id,
            "No order matches MercadoPago payment",
        );
        return Ok(());
    };

    apply_payment(state, &order, &payment).await
}

async fn apply_payment(state: &AppState, order: &Order, payment: &Payment) -> AppResult<()> {
    let payment_id = payment.id.to_string();
    let outcome = checkout_outcome(&payment.status);

    let mut update = UpdatePayment {
        payment_id: Some(payment_id.clone()),
        payment_details: serde_json::to_value(payment).ok(),
        payment_amount: payment.transaction_amount,
        ..Default::default()
    };
    match outcome {
        CheckoutOutcome::Approved => {
            update.payment_status = Some(PAYMENT_STATUS_COMPLETED.to_string());
            update.payment_transaction_id = Some(payment_id.clone());
            update.paid_at = Some(payment.date_approved.unwrap_or_else(chrono::Utc::now));
        }
        CheckoutOutcome::Pending => {
            update.payment_status = Some(PAYMENT_STATUS_PENDING.to_string());
        }
        CheckoutOutcome::Failed => {
            update.payment_status = Some(PAYMENT_STATUS_FAILED.to_string());
        }
        CheckoutOutcome::Unchanged => {}
    }
    OrderRepo::update_payment(&state.pool, order.id, &update).await?;

    let note = checkout_note(
        outcome,
        &payment_id,
        payment.status_detail.as_deref().unwrap_or(&payment.status),
    );
    match outcome {
        CheckoutOutcome::Approved if order.status != STATUS_PAID => {
            transition_order(state, order.id, STATUS_PAID, Some(&note), None).await?;
        }
        CheckoutOutcome::Failed if order.status != STATUS_CANCELLED => {
            transition_order(state, order.id, STATUS_CANCELLED, Some(&note), None).await?;
        }
        _ => {}
    }

    tracing::info!(
        order_id = order.id,
        payment_id = %payment_id,
        status = %payment.status,
        "MercadoPago payment applied",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_id_from_json_body() {
        let body = br#"{"type":"payment","data":{"id":"12345"}}"#;
        let id = payment_notification_id(&NotificationQuery::default(), body);
        assert_eq!(id.as_deref(), Some("12345"));

        let numeric = br#"{"type":"payment","data":{"id":987}}"#;
        let id = payment_notification_id(&NotificationQuery::default(), numeric);
        assert_eq!(id.as_deref(), Some("987"));
    }

    #[test]
    fn notification_id_from_query_string() {
        let query = NotificationQuery {
            topic: Some("payment".into()),
            id: Some("555".into()),
            ..Default::default()
        };
        assert_eq!(payment_notification_id(&query, b"").as_deref(), Some("555"));
    }

    #[test]
    fn non_payment_notifications_are_ignored() {
        let body = br#"{"type":"merchant_order","data":{"id":"1"}}"#;
        assert_eq!(payment_notification_id(&NotificationQuery::default(), body), None);
    }

    #[test]
    fn pickup_orders_have_no_shipments() {
        let pickup = ShippingInfo {
            method: "pickup".into(),
            ..Default::default()
        };
        assert!(shipments_for(&pickup).is_none());

        let delivery = ShippingInfo {
            method: "delivery".into(),
            city: Some("Córdoba".into()),
            ..Default::default()
        };
        let shipments = shipments_for(&delivery).unwrap();
        assert_eq!(shipments.receiver_address.city_name, "Córdoba");
    }
}
