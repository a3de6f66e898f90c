//! Route definitions for the back-office tools under `/admin`.
//!
//! Every handler here requires the admin role.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{activity, admin_contacts, agenda, budgets, finances, notes, tasks};
use crate::multipart::MAX_UPLOAD_BODY_BYTES;
use crate::state::AppState;

/// Back-office routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/contacts", contacts_router())
        .nest("/finances", finances_router())
        .nest("/agenda", agenda_router())
        .nest("/notes", notes_router())
        .route("/activity", get(activity::recent_activity))
}

/// ```text
/// GET    /                              -> list_contacts
/// POST   /                              -> create_contact
/// GET    /stats                         -> contact_stats
/// GET    /{id}                          -> get_contact
/// PUT    /{id}                          -> update_contact
/// DELETE /{id}                          -> delete_contact
/// PATCH  /{id}/favorite                 -> toggle_favorite
/// PATCH  /{id}/active                   -> toggle_active
/// POST   /{id}/history                  -> add_history
/// DELETE /{id}/history/{history_id}     -> delete_history
/// ```
fn contacts_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(admin_contacts::list_contacts).post(admin_contacts::create_contact),
        )
        .route("/stats", get(admin_contacts::contact_stats))
        .route(
            "/{id}",
            get(admin_contacts::get_contact)
                .put(admin_contacts::update_contact)
                .delete(admin_contacts::delete_contact),
        )
        .route("/{id}/favorite", patch(admin_contacts::toggle_favorite))
        .route("/{id}/active", patch(admin_contacts::toggle_active))
        .route("/{id}/history", post(admin_contacts::add_history))
        .route(
            "/{id}/history/{history_id}",
            delete(admin_contacts::delete_history),
        )
}

/// ```text
/// GET    /transactions                          -> list_transactions
/// POST   /transactions                          -> create_transaction
/// GET    /transactions/contact/{contact_id}     -> contact_transactions
/// GET    /transactions/{id}                     -> get_transaction
/// PUT    /transactions/{id}                     -> update_transaction
/// DELETE /transactions/{id}                     -> delete_transaction
/// GET    /summary                               -> summary
/// GET    /category-breakdown                    -> category_breakdown
/// GET    /yearly-comparison                     -> yearly_comparison
/// GET    /budgets                               -> list_budgets
/// POST   /budgets                               -> upsert_budget
/// GET    /budgets/{year}/{month}                -> get_budget
/// PATCH  /budgets/{year}/{month}/sync           -> sync_budget
/// ```
fn finances_router() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(finances::list_transactions).post(finances::create_transaction),
        )
        .route(
            "/transactions/contact/{contact_id}",
            get(finances::contact_transactions),
        )
        .route(
            "/transactions/{id}",
            get(finances::get_transaction)
                .put(finances::update_transaction)
                .delete(finances::delete_transaction),
        )
        .route("/summary", get(finances::summary))
        .route("/category-breakdown", get(finances::category_breakdown))
        .route("/yearly-comparison", get(finances::yearly_comparison))
        .route(
            "/budgets",
            get(budgets::list_budgets).post(budgets::upsert_budget),
        )
        .route("/budgets/{year}/{month}", get(budgets::get_budget))
        .route("/budgets/{year}/{month}/sync", patch(budgets::sync_budget))
}

/// ```text
/// GET    /events                       -> list_events
/// POST   /events                       -> create_event
/// GET    /events/upcoming              -> upcoming_events
/// GET    /events/today                 -> today_events
/// GET    /events/{id}                  -> get_event
/// PUT    /events/{id}                  -> update_event
/// DELETE /events/{id}                  -> delete_event
/// PATCH  /events/{id}/status           -> update_event_status
/// GET    /calendar/{year}/{month}      -> calendar_month
///
/// GET    /tasks                        -> list_tasks
/// POST   /tasks                        -> create_task
/// GET    /tasks/stats                  -> task_stats
/// GET    /tasks/pending                -> pending_tasks
/// GET    /tasks/{id}                   -> get_task
/// PUT    /tasks/{id}                   -> update_task
/// DELETE /tasks/{id}                   -> delete_task
/// PATCH  /tasks/{id}/status            -> update_task_status
/// PATCH  /tasks/{id}/checklist/{index} -> toggle_checklist
/// ```
fn agenda_router() -> Router<AppState> {
    Router::new()
        .route("/events", get(agenda::list_events).post(agenda::create_event))
        .route("/events/upcoming", get(agenda::upcoming_events))
        .route("/events/today", get(agenda::today_events))
        .route(
            "/events/{id}",
            get(agenda::get_event)
                .put(agenda::update_event)
                .delete(agenda::delete_event),
        )
        .route("/events/{id}/status", patch(agenda::update_event_status))
        .route("/calendar/{year}/{month}", get(agenda::calendar_month))
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/stats", get(tasks::task_stats))
        .route("/tasks/pending", get(tasks::pending_tasks))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/{id}/status", patch(tasks::update_task_status))
        .route(
            "/tasks/{id}/checklist/{index}",
            patch(tasks::toggle_checklist),
        )
}

/// ```text
/// GET    /                                  -> list_notes
/// POST   /                                  -> create_note
/// GET    /urgent                            -> urgent_notes
/// GET    /{id}                              -> get_note
/// PUT    /{id}                              -> update_note
/// DELETE /{id}                              -> delete_note
/// PATCH  /{id}/pin                          -> toggle_pin
/// PATCH  /{id}/archive                      -> toggle_archive
/// POST   /{id}/attachments                  -> add_attachment (multipart)
/// DELETE /{id}/attachments/{attachment_id}  -> delete_attachment
/// ```
fn notes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route("/urgent", get(notes::urgent_notes))
        .route(
            "/{id}",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route("/{id}/pin", patch(notes::toggle_pin))
        .route("/{id}/archive", patch(notes::toggle_archive))
        .route("/{id}/attachments", post(notes::add_attachment))
        .route(
            "/{id}/attachments/{attachment_id}",
            delete(notes::delete_attachment),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}
