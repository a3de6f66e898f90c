//! Handlers for `/payments`: Stripe PaymentIntents and their webhook.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use galeria_core::error::CoreError;
use galeria_core::order::{PAYMENT_STATUS_COMPLETED, PAYMENT_STRIPE, STATUS_PAID};
use galeria_core::payments::{
    to_minor_units, verify_webhook_signature, NOTE_PAYMENT_CONFIRMED, NOTE_STRIPE_WEBHOOK,
    STRIPE_PAYMENT_SUCCEEDED,
};
use galeria_core::types::{DbId, Timestamp};
use galeria_db::models::order::{Order, UpdatePayment};
use galeria_db::repositories::OrderRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::orders::transition_order;
use crate::integrations::stripe::{NewPaymentIntent, WebhookEvent};
use crate::middleware::auth::{AuthUser, OptionalAuth};
use crate::response::DataResponse;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "stripe-signature";

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub order_id: DbId,
    pub payment_method: String,
}

#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    pub client_secret: Option<String>,
    pub payment_intent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub order_id: DbId,
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrderPaymentResponse {
    pub order_id: DbId,
    pub order_number: String,
    pub total: f64,
    pub payment: PaymentSummary,
}

#[derive(Debug, Serialize)]
pub struct PaymentSummary {
    pub method: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub preference_id: Option<String>,
    pub payment_id: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub amount: Option<f64>,
    pub currency: String,
}

impl From<&Order> for PaymentSummary {
    fn from(order: &Order) -> Self {
        Self {
            method: order.payment_method.clone(),
            status: order.payment_status.clone(),
            transaction_id: order.payment_transaction_id.clone(),
            payment_intent_id: order.payment_intent_id.clone(),
            preference_id: order.payment_preference_id.clone(),
            payment_id: order.payment_id.clone(),
            paid_at: order.paid_at,
            amount: order.payment_amount,
            currency: order.payment_currency.clone(),
        }
    }
}

// ----- Handlers -----

/// POST /api/v1/payments/create-intent
///
/// Orders placed by a signed-in user can only be paid by that user or an admin.
pub async fn create_intent(
    OptionalAuth(auth): OptionalAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateIntentRequest>,
) -> AppResult<Json<DataResponse<CreateIntentResponse>>> {
    if input.payment_method != PAYMENT_STRIPE {
        return Err(AppError::BadRequest(format!(
            "Unsupported payment method '{}'",
            input.payment_method
        )));
    }
    let stripe = state.stripe()?;

    let order = find_order(&state, input.order_id).await?;
    if order.user_id.is_some() {
        match auth {
            Some(auth) => auth.ensure_self_or_admin(order.user_id)?,
            None => {
                return Err(CoreError::Unauthorized("Sign in to pay for this order".into()).into())
            }
        }
    }
    if order.status == STATUS_PAID || order.payment_status == PAYMENT_STATUS_COMPLETED {
        return Err(AppError::BadRequest("Order is already paid".into()));
    }

    let intent = stripe
        .create_payment_intent(&NewPaymentIntent {
            amount: to_minor_units(order.total),
            currency: order.payment_currency.to_lowercase(),
            order_id: order.id,
            order_number: order.order_number.clone(),
        })
        .await?;

    OrderRepo::update_payment(
        &state.pool,
        order.id,
        &UpdatePayment {
            payment_intent_id: Some(intent.id.clone()),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        payment_intent_id = %intent.id,
        "Payment intent created",
    );

    Ok(Json(DataResponse::new(CreateIntentResponse {
        client_secret: intent.client_secret,
        payment_intent_id: intent.id,
    })))
}

/// POST /api/v1/payments/confirm
pub async fn confirm_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<DataResponse<PaymentSummary>>> {
    if input.transaction_id.trim().is_empty() {
        return Err(AppError::validation("transaction_id is required"));
    }
    let order = find_order(&state, input.order_id).await?;
    auth.ensure_self_or_admin(order.user_id)?;

    let order = mark_paid(
        &state,
        order.id,
        &input.transaction_id,
        NOTE_PAYMENT_CONFIRMED,
        Some(auth.user_id),
    )
    .await?;

    Ok(Json(DataResponse::new(PaymentSummary::from(&order))))
}

/// POST /api/v1/payments/webhook (also mounted at /api/v1/webhook/stripe)
///
/// The raw body is needed for signature verification.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let secret = state
        .config
        .stripe
        .as_ref()
        .and_then(|c| c.webhook_secret.as_deref())
        .ok_or_else(|| AppError::ServiceUnavailable("Stripe webhook is not configured".into()))?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing stripe-signature header".into()))?;
    verify_webhook_signature(signature, &body, secret, chrono::Utc::now().timestamp())
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected Stripe webhook");
            AppError::BadRequest(format!("Webhook signature verification failed: {e}"))
        })?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    if event.event_type == STRIPE_PAYMENT_SUCCEEDED {
        let intent = &event.data.object;
        let order = match intent.order_id() {
            Some(order_id) => OrderRepo::find_by_id(&state.pool, order_id).await?,
            None => OrderRepo::find_by_payment_intent(&state.pool, &intent.id).await?,
        };
        match order {
            Some(order) if order.status == STATUS_PAID => {
                tracing::debug!(order_id = order.id, "Stripe webhook for an already paid order");
            }
            Some(order) => {
                mark_paid(&state, order.id, &intent.id, NOTE_STRIPE_WEBHOOK, None).await?;
            }
            None => {
                tracing::warn!(payment_intent_id = %intent.id, "Stripe webhook for unknown order");
            }
        }
    } else {
        tracing::debug!(event_type = %event.event_type, "Ignoring Stripe webhook event");
    }

    Ok(Json(serde_json::json!({ "received": true })))
}

/// GET /api/v1/payments/order/{order_id}
pub async fn order_payment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderPaymentResponse>>> {
    let order = find_order(&state, order_id).await?;
    auth.ensure_self_or_admin(order.user_id)?;

    Ok(Json(DataResponse::new(OrderPaymentResponse {
        order_id: order.id,
        order_number: order.order_number.clone(),
        total: order.total,
        payment: PaymentSummary::from(&order),
    })))
}

// ----- Helpers -----

async fn find_order(state: &AppState, id: DbId) -> AppResult<Order> {
    OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))
}

/// Complete the payment and move the order to `paid`, selling its artworks.
async fn mark_paid(
    state: &AppState,
    order_id: DbId,
    transaction_id: &str,
    note: &str,
    actor: Option<DbId>,
) -> AppResult<Order> {
    OrderRepo::update_payment(
        &state.pool,
        order_id,
        &UpdatePayment {
            payment_status: Some(PAYMENT_STATUS_COMPLETED.to_string()),
            payment_transaction_id: Some(transaction_id.to_string()),
            paid_at: Some(chrono::Utc::now()),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("Order", order_id))?;

    tracing::info!(order_id, transaction_id, "Payment completed");
    transition_order(state, order_id, STATUS_PAID, Some(note), actor).await
}
