//! Handlers for `/orders`, plus the order placement and status transition
//! helpers shared with the payment and checkout flows.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use galeria_core::artwork::is_purchasable;
use galeria_core::order::{
    artwork_effect, compute_totals, format_order_number, month_bounds, validate_status,
    ArtworkEffect, LinePrice, RESERVATION_HOURS, STATUS_PAID, VALID_BILLING_TYPES,
    VALID_PAYMENT_METHODS, VALID_SHIPPING_METHODS,
};
use galeria_core::pagination::{clamp_limit, clamp_offset, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::types::DbId;
use galeria_core::validation::{validate_choice, validate_email, validate_required_text};
use galeria_db::models::order::{
    BillingInfo, CreateOrder, CreateOrderItem, Order, OrderDetail, ShippingInfo,
};
use galeria_db::repositories::{ArtworkRepo, OrderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuth};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Attempts at allocating a free order number before giving up.
const ORDER_NUMBER_ATTEMPTS: i64 = 5;

// ----- Request / response types -----

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dni: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub artwork_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: CustomerInput,
    pub items: Vec<OrderItemInput>,
    pub shipping: ShippingInfo,
    pub billing: Option<BillingInfo>,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Everything needed to place an order, whichever flow it comes from.
pub(crate) struct OrderDraft {
    pub user_id: Option<DbId>,
    pub customer: CustomerInput,
    pub artwork_ids: Vec<DbId>,
    pub shipping: ShippingInfo,
    pub billing: BillingInfo,
    pub payment_method: String,
    pub customer_notes: Option<String>,
    pub initial_note: Option<String>,
}

// ----- Handlers -----

/// POST /api/v1/orders
///
/// Anonymous checkout is allowed; a valid token links the order to the user.
pub async fn create_order(
    OptionalAuth(auth): OptionalAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<OrderDetail>>)> {
    validate_choice("payment method", &input.payment_method, VALID_PAYMENT_METHODS)
        .map_err(AppError::validation)?;

    let draft = OrderDraft {
        user_id: auth.map(|a| a.user_id),
        customer: input.customer,
        artwork_ids: input.items.iter().map(|i| i.artwork_id).collect(),
        shipping: input.shipping,
        billing: input.billing.unwrap_or_default(),
        payment_method: input.payment_method,
        customer_notes: input.notes,
        initial_note: None,
    };
    let order = place_order(&state, draft).await?;
    let detail = OrderRepo::load_detail(&state.pool, order).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(detail))))
}

/// GET /api/v1/orders
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<DataResponse<Page<Order>>>> {
    let status = params.status.as_deref();
    if let Some(status) = status {
        validate_status(status).map_err(AppError::validation)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = OrderRepo::list(&state.pool, status, limit, offset).await?;
    let total = OrderRepo::count(&state.pool, status).await?;

    Ok(Json(DataResponse::new(Page {
        items,
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/orders/my
pub async fn my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let orders = OrderRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(orders)))
}

/// GET /api/v1/orders/{id}
pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    let detail = OrderRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;
    auth.ensure_self_or_admin(detail.order.user_id)?;
    Ok(Json(DataResponse::new(detail)))
}

/// PATCH /api/v1/orders/{id}/status
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<DataResponse<OrderDetail>>> {
    validate_status(&input.status).map_err(AppError::validation)?;

    let order = transition_order(
        &state,
        id,
        &input.status,
        input.notes.as_deref(),
        Some(admin.user_id),
    )
    .await?;
    let detail = OrderRepo::load_detail(&state.pool, order).await?;

    Ok(Json(DataResponse::new(detail)))
}

// ----- Helpers -----

/// Validate a draft, price it from the catalog, insert it under a fresh
/// order number and reserve its artworks.
pub(crate) async fn place_order(state: &AppState, draft: OrderDraft) -> AppResult<Order> {
    validate_draft(&draft)?;

    let artworks = ArtworkRepo::find_many(&state.pool, &draft.artwork_ids).await?;
    let mut items = Vec::with_capacity(draft.artwork_ids.len());
    let mut lines = Vec::with_capacity(draft.artwork_ids.len());
    for artwork_id in &draft.artwork_ids {
        let artwork = artworks
            .iter()
            .find(|a| a.id == *artwork_id)
            .ok_or_else(|| AppError::validation(format!("Artwork {artwork_id} does not exist")))?;
        if !is_purchasable(artwork.is_available, artwork.is_sold) {
            return Err(AppError::validation(format!(
                "Artwork '{}' is not available",
                artwork.title
            )));
        }
        lines.push(LinePrice {
            base: artwork.base_price,
            final_price: artwork.final_price,
        });
        items.push(CreateOrderItem {
            artwork_id: artwork.id,
            title: artwork.title.clone(),
            artist: Some(artwork.artist.clone()),
            price: artwork.base_price,
            discount: if artwork.has_discount { artwork.discount } else { 0.0 },
            final_price: artwork.final_price,
        });
    }

    let totals = compute_totals(&lines, draft.shipping.cost);
    let now = chrono::Utc::now();
    let (month_start, month_end) = month_bounds(now);
    let created_this_month = OrderRepo::count_created_between(&state.pool, month_start, month_end)
        .await?;

    let mut input = CreateOrder {
        order_number: String::new(),
        user_id: draft.user_id,
        customer_name: draft.customer.name.trim().to_string(),
        customer_email: draft.customer.email.trim().to_lowercase(),
        customer_phone: draft.customer.phone.trim().to_string(),
        customer_dni: draft.customer.dni,
        subtotal: totals.subtotal,
        discount_total: totals.discount_total,
        total: totals.total,
        shipping: draft.shipping,
        billing: draft.billing,
        payment_method: draft.payment_method,
        payment_preference_id: None,
        customer_notes: draft.customer_notes,
        items,
        initial_note: draft.initial_note,
    };

    let mut attempt = 0;
    let order = loop {
        input.order_number = format_order_number(now, created_this_month + 1 + attempt);
        match OrderRepo::create(&state.pool, &input).await {
            Ok(order) => break order,
            Err(e) if is_order_number_collision(&e) && attempt + 1 < ORDER_NUMBER_ATTEMPTS => {
                tracing::debug!(order_number = %input.order_number, "Order number taken, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    };

    let reserved_until = now + chrono::Duration::hours(RESERVATION_HOURS);
    ArtworkRepo::reserve(&state.pool, &draft.artwork_ids, order.user_id, reserved_until).await?;

    tracing::info!(
        order_id = order.id,
        order_number = %order.order_number,
        total = order.total,
        items = draft.artwork_ids.len(),
        "Order created",
    );
    state.publish(
        "order.created",
        "order",
        order.id,
        order.user_id,
        serde_json::json!({
            "order_number": order.order_number,
            "total": order.total,
            "payment_method": order.payment_method,
        }),
    );

    Ok(order)
}

/// Change an order's status, record the history entry and apply the
/// status's effect on the ordered artworks.
pub(crate) async fn transition_order(
    state: &AppState,
    order_id: DbId,
    status: &str,
    notes: Option<&str>,
    actor: Option<DbId>,
) -> AppResult<Order> {
    let order = OrderRepo::change_status(&state.pool, order_id, status, notes, actor)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))?;

    let artwork_ids = OrderRepo::artwork_ids(&state.pool, order_id).await?;
    match artwork_effect(status) {
        ArtworkEffect::MarkSold => {
            let sold = ArtworkRepo::mark_sold(&state.pool, &artwork_ids, order.user_id).await?;
            tracing::info!(order_id, artworks = sold, "Artworks marked sold");
        }
        ArtworkEffect::ReleaseReservation => {
            let released = ArtworkRepo::release_reservations(&state.pool, &artwork_ids).await?;
            tracing::info!(order_id, artworks = released, "Reservations released");
        }
        ArtworkEffect::None => {}
    }

    tracing::info!(order_id, status, "Order status changed");
    let event_type = if status == STATUS_PAID {
        "order.paid"
    } else {
        "order.status_changed"
    };
    state.publish(
        event_type,
        "order",
        order_id,
        actor,
        serde_json::json!({ "status": status, "notes": notes }),
    );

    Ok(order)
}

fn validate_draft(draft: &OrderDraft) -> AppResult<()> {
    if draft.artwork_ids.is_empty() {
        return Err(AppError::validation("Order must contain at least one item"));
    }
    let mut unique = draft.artwork_ids.clone();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != draft.artwork_ids.len() {
        return Err(AppError::validation("Each artwork can only be ordered once"));
    }

    validate_required_text("customer name", &draft.customer.name, 200)
        .map_err(AppError::validation)?;
    validate_email(draft.customer.email.trim()).map_err(AppError::validation)?;
    validate_required_text("customer phone", &draft.customer.phone, 50)
        .map_err(AppError::validation)?;

    validate_choice("shipping method", &draft.shipping.method, VALID_SHIPPING_METHODS)
        .map_err(AppError::validation)?;
    if !draft.shipping.cost.is_finite() || draft.shipping.cost < 0.0 {
        return Err(AppError::validation("Shipping cost must be non-negative"));
    }
    validate_choice("billing type", &draft.billing.billing_type, VALID_BILLING_TYPES)
        .map_err(AppError::validation)?;
    Ok(())
}

fn is_order_number_collision(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some("uq_orders_order_number"),
        _ => false,
    }
}
