//! Handlers for `/newsletter`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use galeria_core::newsletter::{
    normalize_email, subscribe_outcome, SubscribeOutcome, SOURCE_WEBSITE, STATUS_ACTIVE,
    VALID_SOURCES, VALID_STATUSES,
};
use galeria_core::pagination::{clamp_limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::validation::validate_choice;
use galeria_db::models::newsletter::NewsletterSubscriber;
use galeria_db::repositories::NewsletterRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 100, message = "cannot exceed 100 characters"))]
    pub name: Option<String>,
    /// `website` (default), `admin` or `import`.
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub outcome: SubscribeOutcome,
    pub subscriber: NewsletterSubscriber,
}

#[derive(Debug, Deserialize)]
pub struct SubscriberListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SubscriberList {
    pub items: Vec<NewsletterSubscriber>,
    pub total: i64,
}

/// POST /api/v1/newsletter/subscribe
///
/// Idempotent: an active address is reported as `already_subscribed`.
pub async fn subscribe(
    State(state): State<AppState>,
    Json(input): Json<SubscribeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SubscribeResponse>>)> {
    let email = normalize_email(&input.email);
    let input = SubscribeRequest { email, ..input };
    input.validate()?;
    let source = input.source.as_deref().unwrap_or(SOURCE_WEBSITE);
    validate_choice("source", source, VALID_SOURCES).map_err(AppError::validation)?;
    let name = input.name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let existing = NewsletterRepo::find_by_email(&state.pool, &input.email).await?;
    let outcome = subscribe_outcome(existing.as_ref().map(|s| s.status.as_str()));

    let (status, subscriber) = match (outcome, existing) {
        (SubscribeOutcome::AlreadySubscribed, Some(subscriber)) => (StatusCode::OK, subscriber),
        (SubscribeOutcome::Reactivated, _) => {
            let subscriber = NewsletterRepo::reactivate(&state.pool, &input.email, name)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Subscriber {} not found", input.email)))?;
            (StatusCode::OK, subscriber)
        }
        _ => {
            let subscriber =
                NewsletterRepo::create(&state.pool, &input.email, name, source).await?;
            (StatusCode::CREATED, subscriber)
        }
    };

    if outcome != SubscribeOutcome::AlreadySubscribed {
        state.mailer.send_newsletter_welcome(&subscriber.email, name);
        tracing::info!(subscriber_id = subscriber.id, outcome = ?outcome, "Newsletter subscription");
        state.publish(
            "newsletter.subscribed",
            "newsletter_subscriber",
            subscriber.id,
            None,
            serde_json::json!({ "outcome": outcome }),
        );
    }

    Ok((
        status,
        Json(DataResponse::new(SubscribeResponse {
            outcome,
            subscriber,
        })),
    ))
}

/// DELETE /api/v1/newsletter/unsubscribe/{email}
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<StatusCode> {
    let email = normalize_email(&email);
    if !NewsletterRepo::unsubscribe(&state.pool, &email).await? {
        return Err(AppError::NotFound(format!("Subscriber {email} not found")));
    }
    tracing::info!(email = %email, "Newsletter unsubscription");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/newsletter/subscribers
pub async fn list_subscribers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubscriberListParams>,
) -> AppResult<Json<DataResponse<SubscriberList>>> {
    let status = params.status.as_deref().unwrap_or(STATUS_ACTIVE);
    validate_choice("status", status, VALID_STATUSES).map_err(AppError::validation)?;
    let limit = clamp_limit(params.limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT);

    let items = NewsletterRepo::list(&state.pool, status, limit).await?;
    let total = NewsletterRepo::count(&state.pool, status).await?;

    Ok(Json(DataResponse::new(SubscriberList { items, total })))
}
