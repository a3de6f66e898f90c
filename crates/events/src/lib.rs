//! Galeria event bus, activity log and outbound e-mail.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope (`artwork.created`,
//!   `order.paid`, ...).
//! - [`ActivityPersistence`]: background service that writes every event to
//!   `activity_logs`.
//! - [`delivery`]: SMTP transport and the [`Mailer`] used for contact and
//!   newsletter notifications.

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use delivery::mailer::Mailer;
pub use persistence::ActivityPersistence;
