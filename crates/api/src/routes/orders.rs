//! Route definitions for orders and the two payment providers.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{checkout, orders, payments};
use crate::state::AppState;

/// Order routes mounted at `/orders`.
///
/// ```text
/// GET   /              -> list_orders (admin)
/// POST  /              -> create_order (optional auth)
/// GET   /my            -> my_orders (auth)
/// GET   /{id}          -> get_order (owner or admin)
/// PATCH /{id}/status   -> update_order_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/my", get(orders::my_orders))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/status", patch(orders::update_order_status))
}

/// Stripe payment routes mounted at `/payments`.
///
/// ```text
/// POST /create-intent       -> create_intent
/// POST /confirm             -> confirm_payment (auth)
/// POST /webhook             -> stripe_webhook (signed)
/// GET  /order/{order_id}    -> order_payment (owner or admin)
/// ```
pub fn payments_router() -> Router<AppState> {
    Router::new()
        .route("/create-intent", post(payments::create_intent))
        .route("/confirm", post(payments::confirm_payment))
        .route("/webhook", post(payments::stripe_webhook))
        .route("/order/{order_id}", get(payments::order_payment))
}

/// MercadoPago checkout routes mounted at `/checkout`.
///
/// ```text
/// POST /create-preference              -> create_preference
/// GET  /payment-status/{payment_id}    -> payment_status
/// ```
pub fn checkout_router() -> Router<AppState> {
    Router::new()
        .route("/create-preference", post(checkout::create_preference))
        .route(
            "/payment-status/{payment_id}",
            get(checkout::payment_status),
        )
}

/// Provider webhooks mounted at `/webhook`.
///
/// ```text
/// POST /stripe        -> stripe_webhook
/// POST /mercadopago   -> mercadopago_webhook
/// ```
pub fn webhook_router() -> Router<AppState> {
    Router::new()
        .route("/stripe", post(payments::stripe_webhook))
        .route("/mercadopago", post(checkout::mercadopago_webhook))
}
