//! Activity log persistence.
//!
//! [`ActivityPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every [`PlatformEvent`] to `activity_logs`. It exits when the
//! bus is dropped.

use tokio::sync::broadcast;
use galeria_core::types::DbId;
use galeria_db::models::activity_log::CreateActivityLog;
use galeria_db::repositories::ActivityLogRepo;
use galeria_db::DbPool;

use crate::bus::PlatformEvent;

pub const ACTION_CREATE: &str = "create";
pub const ACTION_UPDATE: &str = "update";
pub const ACTION_DELETE: &str = "delete";
pub const ACTION_LOGIN: &str = "login";
pub const ACTION_LOGOUT: &str = "logout";
pub const ACTION_VIEW: &str = "view";

/// Map an event name to its activity action using the last dotted segment.
///
/// Unknown verbs (`status_changed`, `paid`, `liked`, ...) count as updates.
pub fn action_for(event_type: &str) -> &'static str {
    let verb = event_type.rsplit('.').next().unwrap_or(event_type);
    match verb {
        "created" | "subscribed" | "registered" => ACTION_CREATE,
        "deleted" | "unsubscribed" => ACTION_DELETE,
        "login" => ACTION_LOGIN,
        "logout" => ACTION_LOGOUT,
        "viewed" => ACTION_VIEW,
        _ => ACTION_UPDATE,
    }
}

/// Background service that persists domain events as activity log rows.
pub struct ActivityPersistence;

impl ActivityPersistence {
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist activity log entry"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity log lagged, some events were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity log shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        let entry = CreateActivityLog {
            user_id: event.actor_user_id,
            action: action_for(&event.event_type).to_string(),
            event_type: event.event_type.clone(),
            entity_type: event.source_entity_type.clone(),
            entity_id: event.source_entity_id,
            details: event.payload.clone(),
        };
        ActivityLogRepo::insert(pool, &entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_from_event_names() {
        assert_eq!(action_for("artwork.created"), "create");
        assert_eq!(action_for("order.status_changed"), "update");
        assert_eq!(action_for("order.paid"), "update");
        assert_eq!(action_for("note.deleted"), "delete");
        assert_eq!(action_for("user.login"), "login");
        assert_eq!(action_for("user.logout"), "logout");
        assert_eq!(action_for("artwork.viewed"), "view");
        assert_eq!(action_for("newsletter.subscribed"), "create");
        assert_eq!(action_for("plain"), "update");
    }
}
