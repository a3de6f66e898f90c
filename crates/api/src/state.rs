use std::sync::Arc;

use galeria_core::types::DbId;
use galeria_events::{EventBus, Mailer, PlatformEvent};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::integrations::cloudinary::MediaStore;
use crate::integrations::mercadopago::MercadoPagoGateway;
use crate::integrations::stripe::StripeGateway;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone; everything heavy sits behind an `Arc`. Provider clients
/// are `None` when their credentials are not configured.
#[derive(Clone)]
pub struct AppState {
    pub pool: galeria_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Domain events, persisted to `activity_logs` by a background task.
    pub event_bus: Arc<EventBus>,
    pub mailer: Mailer,
    pub stripe: Option<Arc<dyn StripeGateway>>,
    pub mercadopago: Option<Arc<dyn MercadoPagoGateway>>,
    pub media: Option<Arc<dyn MediaStore>>,
}

impl AppState {
    /// Publish a domain event about one entity.
    pub fn publish(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: DbId,
        actor: Option<DbId>,
        payload: serde_json::Value,
    ) {
        self.event_bus.publish(
            PlatformEvent::new(event_type)
                .with_source(entity_type, entity_id)
                .with_actor(actor)
                .with_payload(payload),
        );
    }

    pub fn stripe(&self) -> AppResult<&Arc<dyn StripeGateway>> {
        self.stripe
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Stripe is not configured".into()))
    }

    pub fn mercadopago(&self) -> AppResult<&Arc<dyn MercadoPagoGateway>> {
        self.mercadopago
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("MercadoPago is not configured".into()))
    }

    pub fn media(&self) -> AppResult<&Arc<dyn MediaStore>> {
        self.media
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable("Image hosting is not configured".into()))
    }
}
