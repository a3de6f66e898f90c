//! Stripe PaymentIntents client.

use async_trait::async_trait;
use serde::Deserialize;

use galeria_core::types::DbId;

const API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Stripe returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// Signing secret for `stripe-signature` verification.
    pub webhook_secret: Option<String>,
}

impl StripeConfig {
    /// `STRIPE_SECRET_KEY` (required for `Some`) and `STRIPE_WEBHOOK_SECRET`.
    pub fn from_env() -> Option<Self> {
        let secret_key = super::env_opt("STRIPE_SECRET_KEY")?;
        Some(Self {
            secret_key,
            webhook_secret: super::env_opt("STRIPE_WEBHOOK_SECRET"),
        })
    }
}

/// Parameters for a new PaymentIntent.
#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    /// Amount in minor units.
    pub amount: i64,
    /// Lowercase ISO currency, e.g. `"ars"`.
    pub currency: String,
    pub order_id: DbId,
    pub order_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[async_trait]
pub trait StripeGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> Result<PaymentIntent, StripeError>;
}

pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        Ok(Self {
            client: super::http_client()?,
            secret_key: config.secret_key.clone(),
        })
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[async_trait]
impl StripeGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> Result<PaymentIntent, StripeError> {
        let form = [
            ("amount", intent.amount.to_string()),
            ("currency", intent.currency.clone()),
            ("metadata[order_id]", intent.order_id.to_string()),
            ("metadata[order_number]", intent.order_number.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .client
            .post(format!("{API_BASE}/payment_intents"))
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<PaymentIntent>().await?)
    }
}

// ---------------------------------------------------------------------------
// Webhook payloads
// ---------------------------------------------------------------------------

/// The subset of a Stripe event the webhook handler reads.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookObject,
}

#[derive(Debug, Deserialize)]
pub struct WebhookObject {
    pub id: String,
    #[serde(default)]
    pub metadata: std::collections::HashMap<String, String>,
}

impl WebhookObject {
    /// Order id stored in the intent metadata on creation.
    pub fn order_id(&self) -> Option<DbId> {
        self.metadata.get("order_id").and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_event_parses_order_id() {
        let raw = r#"{
            "type": "payment_intent.succeeded",
            "data": {"object": {"id": "pi_1", "metadata": {"order_id": "17"}}}
        }"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.data.object.order_id(), Some(17));
    }

    #[test]
    fn missing_metadata_yields_no_order() {
        let raw = r#"{"type":"charge.refunded","data":{"object":{"id":"ch_1"}}}"#;
        let event: WebhookEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.data.object.order_id(), None);
    }

    #[test]
    fn api_error_display() {
        let err = StripeError::Api {
            status: 402,
            message: "card declined".into(),
        };
        assert_eq!(err.to_string(), "Stripe returned HTTP 402: card declined");
    }
}
