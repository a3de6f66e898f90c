//! Newsletter subscriptions.

use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_UNSUBSCRIBED: &str = "unsubscribed";
pub const STATUS_BOUNCED: &str = "bounced";

pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_UNSUBSCRIBED, STATUS_BOUNCED];

pub const SOURCE_WEBSITE: &str = "website";
pub const SOURCE_ADMIN: &str = "admin";
pub const SOURCE_IMPORT: &str = "import";

pub const VALID_SOURCES: &[&str] = &[SOURCE_WEBSITE, SOURCE_ADMIN, SOURCE_IMPORT];

/// Outcome of a subscribe request, serialized into the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
    Reactivated,
}

/// Decide what a subscribe request does given the existing row's status.
pub fn subscribe_outcome(existing_status: Option<&str>) -> SubscribeOutcome {
    match existing_status {
        None => SubscribeOutcome::Subscribed,
        Some(STATUS_ACTIVE) => SubscribeOutcome::AlreadySubscribed,
        Some(_) => SubscribeOutcome::Reactivated,
    }
}

/// Per-subscriber content preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "enabled")]
    pub new_artworks: bool,
    #[serde(default = "enabled")]
    pub exhibitions: bool,
    #[serde(default = "enabled")]
    pub promotions: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            new_artworks: true,
            exhibitions: true,
            promotions: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// Normalize an e-mail for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Subject and body of the welcome e-mail.
pub fn welcome_message(name: Option<&str>) -> (String, String) {
    let greeting = match name {
        Some(n) if !n.trim().is_empty() => format!("Hola {},", n.trim()),
        _ => "Hola,".to_string(),
    };
    (
        "Bienvenido/a al newsletter de la galería".to_string(),
        format!(
            "{greeting}\n\nGracias por suscribirte. Te avisaremos sobre nuevas obras, \
             exposiciones y novedades de la galería."
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_by_existing_status() {
        assert_eq!(subscribe_outcome(None), SubscribeOutcome::Subscribed);
        assert_eq!(subscribe_outcome(Some("active")), SubscribeOutcome::AlreadySubscribed);
        assert_eq!(subscribe_outcome(Some("unsubscribed")), SubscribeOutcome::Reactivated);
        assert_eq!(subscribe_outcome(Some("bounced")), SubscribeOutcome::Reactivated);
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&SubscribeOutcome::AlreadySubscribed).unwrap();
        assert_eq!(json, "\"already_subscribed\"");
    }

    #[test]
    fn email_normalized() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn welcome_greets_by_name() {
        let (_, body) = welcome_message(Some("Lucía"));
        assert!(body.starts_with("Hola Lucía,"));
        let (_, body) = welcome_message(None);
        assert!(body.starts_with("Hola,"));
    }
}
