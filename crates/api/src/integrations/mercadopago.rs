//! MercadoPago Checkout Pro client: preferences and payment lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://api.mercadopago.com";

#[derive(Debug, thiserror::Error)]
pub enum MercadoPagoError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MercadoPago returned HTTP {0}")]
    HttpStatus(u16),
}

#[derive(Debug, Clone)]
pub struct MercadoPagoConfig {
    pub access_token: String,
}

impl MercadoPagoConfig {
    /// `MERCADOPAGO_ACCESS_TOKEN`.
    pub fn from_env() -> Option<Self> {
        super::env_opt("MERCADOPAGO_ACCESS_TOKEN").map(|access_token| Self { access_token })
    }
}

// ---------------------------------------------------------------------------
// Preference request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Preference {
    pub items: Vec<PreferenceItem>,
    pub payer: Payer,
    pub back_urls: BackUrls,
    pub auto_return: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipments: Option<Shipments>,
    pub statement_descriptor: String,
    pub notification_url: String,
    pub external_reference: String,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payer {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: PayerPhone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayerPhone {
    pub number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

impl BackUrls {
    pub fn for_frontend(frontend_url: &str) -> Self {
        Self {
            success: format!("{frontend_url}/payment-success"),
            failure: format!("{frontend_url}/payment-failure"),
            pending: format!("{frontend_url}/payment-success"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Shipments {
    pub mode: String,
    pub receiver_address: ReceiverAddress,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiverAddress {
    pub street_name: String,
    pub city_name: String,
    pub state_name: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPreference {
    pub id: String,
    pub init_point: Option<String>,
    pub sandbox_init_point: Option<String>,
}

// ---------------------------------------------------------------------------
// Payment lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub status: String,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub payment_type_id: Option<String>,
    #[serde(default)]
    pub date_approved: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub preference_id: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub transaction_details: Option<TransactionDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    #[serde(default)]
    pub net_received_amount: Option<f64>,
}

#[async_trait]
pub trait MercadoPagoGateway: Send + Sync {
    async fn create_preference(
        &self,
        preference: &Preference,
    ) -> Result<CreatedPreference, MercadoPagoError>;

    /// `Ok(None)` when the payment id is unknown to MercadoPago.
    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, MercadoPagoError>;
}

pub struct MercadoPagoClient {
    client: reqwest::Client,
    access_token: String,
}

impl MercadoPagoClient {
    pub fn new(config: &MercadoPagoConfig) -> Result<Self, MercadoPagoError> {
        Ok(Self {
            client: super::http_client()?,
            access_token: config.access_token.clone(),
        })
    }
}

#[async_trait]
impl MercadoPagoGateway for MercadoPagoClient {
    async fn create_preference(
        &self,
        preference: &Preference,
    ) -> Result<CreatedPreference, MercadoPagoError> {
        let response = self
            .client
            .post(format!("{API_BASE}/checkout/preferences"))
            .bearer_auth(&self.access_token)
            .json(preference)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MercadoPagoError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, MercadoPagoError> {
        let response = self
            .client
            .get(format!("{API_BASE}/v1/payments/{payment_id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        match response.status() {
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.json().await?)),
            s => Err(MercadoPagoError::HttpStatus(s.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_urls_point_at_frontend() {
        let urls = BackUrls::for_frontend("https://galeria.example");
        assert_eq!(urls.success, "https://galeria.example/payment-success");
        assert_eq!(urls.failure, "https://galeria.example/payment-failure");
        assert_eq!(urls.pending, urls.success);
    }

    #[test]
    fn payment_parses_with_sparse_fields() {
        let p: Payment =
            serde_json::from_str(r#"{"id": 991, "status": "approved", "preference_id": "pref-1"}"#)
                .unwrap();
        assert_eq!(p.id, 991);
        assert_eq!(p.preference_id.as_deref(), Some("pref-1"));
        assert!(p.date_approved.is_none());
    }

    #[test]
    fn shipments_omitted_when_absent() {
        let pref = Preference {
            items: vec![],
            payer: Payer {
                name: "Ana".into(),
                surname: "Paz".into(),
                email: "ana@example.com".into(),
                phone: PayerPhone { number: String::new() },
                identification: None,
            },
            back_urls: BackUrls::for_frontend("http://localhost"),
            auto_return: "approved".into(),
            shipments: None,
            statement_descriptor: "x".into(),
            notification_url: "http://localhost/hook".into(),
            external_reference: "ORD-202501-0001".into(),
            metadata: serde_json::json!({}),
        };
        let json = serde_json::to_value(&pref).unwrap();
        assert!(json.get("shipments").is_none());
        assert!(json["payer"].get("identification").is_none());
    }
}
