#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use galeria_api::integrations::cloudinary::{MediaError, MediaStore, ResourceKind, UploadedAsset};
use galeria_api::integrations::mercadopago::{
    CreatedPreference, MercadoPagoError, MercadoPagoGateway, Payment, Preference,
};
use galeria_api::integrations::stripe::{
    NewPaymentIntent, PaymentIntent, StripeConfig, StripeError, StripeGateway,
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use galeria_api::auth::jwt::JwtConfig;
use galeria_api::auth::password::hash_password;
use galeria_api::config::ServerConfig;
use galeria_api::router::build_app_router;
use galeria_api::state::AppState;
use galeria_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use galeria_db::models::user::{CreateUser, User};
use galeria_db::repositories::UserRepo;
use galeria_events::{EventBus, Mailer};

pub const TEST_PASSWORD: &str = "test_password_123";
pub const STRIPE_WEBHOOK_SECRET: &str = "whsec_galeria_test";

/// Build a test `ServerConfig` with safe defaults and no external providers.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        frontend_url: "http://localhost:5173".to_string(),
        backend_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-for-galeria-integration-tests".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        stripe: None,
        mercadopago: None,
        cloudinary: None,
        admin_notify_email: None,
    }
}

/// Build the full application router on top of the given pool.
///
/// Mail is disabled and the payment and image providers are left
/// unconfigured, so their endpoints answer 503.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestProviders::default())
}

/// In-memory stand-ins for the external providers.
#[derive(Default, Clone)]
pub struct TestProviders {
    /// Enables the Stripe webhook with [`STRIPE_WEBHOOK_SECRET`].
    pub stripe_webhook: bool,
    pub stripe: Option<Arc<FakeStripe>>,
    pub mercadopago: Option<Arc<FakeMercadoPago>>,
    pub media: Option<Arc<FakeMedia>>,
}

pub fn build_test_app_with(pool: PgPool, providers: TestProviders) -> Router {
    let mut config = test_config();
    if providers.stripe_webhook || providers.stripe.is_some() {
        config.stripe = Some(StripeConfig {
            secret_key: "sk_test_galeria".to_string(),
            webhook_secret: providers
                .stripe_webhook
                .then(|| STRIPE_WEBHOOK_SECRET.to_string()),
        });
    }
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        mailer: Mailer::disabled(),
        stripe: providers
            .stripe
            .map(|s| s as Arc<dyn StripeGateway>),
        mercadopago: providers
            .mercadopago
            .map(|m| m as Arc<dyn MercadoPagoGateway>),
        media: providers.media.map(|m| m as Arc<dyn MediaStore>),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Provider fakes
// ---------------------------------------------------------------------------

/// Creates PaymentIntents named `pi_test_<order_id>`.
#[derive(Default)]
pub struct FakeStripe;

#[async_trait::async_trait]
impl StripeGateway for FakeStripe {
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> Result<PaymentIntent, StripeError> {
        Ok(PaymentIntent {
            id: format!("pi_test_{}", intent.order_id),
            client_secret: Some(format!("pi_test_{}_secret", intent.order_id)),
            status: Some("requires_payment_method".to_string()),
        })
    }
}

/// Preferences are named `pref-<order number>`; payments are whatever the
/// test registered with [`FakeMercadoPago::add_payment`].
#[derive(Default)]
pub struct FakeMercadoPago {
    pub fail_preferences: bool,
    payments: Mutex<HashMap<String, Payment>>,
}

impl FakeMercadoPago {
    pub fn failing() -> Self {
        Self {
            fail_preferences: true,
            ..Default::default()
        }
    }

    pub fn add_payment(&self, id: i64, status: &str, preference_id: &str, amount: f64) {
        let payment = Payment {
            id,
            status: status.to_string(),
            status_detail: Some(format!("{status}_detail")),
            payment_method_id: Some("visa".to_string()),
            payment_type_id: Some("credit_card".to_string()),
            date_approved: (status == "approved").then(chrono::Utc::now),
            transaction_amount: Some(amount),
            preference_id: Some(preference_id.to_string()),
            external_reference: None,
            transaction_details: None,
        };
        self.payments
            .lock()
            .unwrap()
            .insert(id.to_string(), payment);
    }
}

#[async_trait::async_trait]
impl MercadoPagoGateway for FakeMercadoPago {
    async fn create_preference(
        &self,
        preference: &Preference,
    ) -> Result<CreatedPreference, MercadoPagoError> {
        if self.fail_preferences {
            return Err(MercadoPagoError::HttpStatus(502));
        }
        let id = format!("pref-{}", preference.external_reference);
        Ok(CreatedPreference {
            init_point: Some(format!("https://mp.test/checkout/{id}")),
            sandbox_init_point: None,
            id,
        })
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, MercadoPagoError> {
        Ok(self.payments.lock().unwrap().get(payment_id).cloned())
    }
}

/// Stores nothing; remembers which public ids were destroyed.
#[derive(Default)]
pub struct FakeMedia {
    destroyed: Mutex<Vec<String>>,
}

impl FakeMedia {
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaStore for FakeMedia {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
        _kind: ResourceKind,
    ) -> Result<UploadedAsset, MediaError> {
        Ok(UploadedAsset {
            secure_url: format!("https://media.test/{folder}/{filename}"),
            public_id: format!("{folder}/{filename}"),
            bytes: Some(bytes.len() as i64),
        })
    }

    async fn destroy(&self, public_id: &str, _kind: ResourceKind) -> Result<(), MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        name: "Test User".to_string(),
        phone: None,
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["access_token"]
        .as_str()
        .expect("login must return an access token")
        .to_string()
}

/// Create an admin account and return an access token for it.
pub async fn admin_token(pool: &PgPool) -> String {
    create_user(pool, "admin@galeria.test", ROLE_ADMIN).await;
    login(build_test_app(pool.clone()), "admin@galeria.test").await
}

/// Create a customer account and return the user plus an access token.
pub async fn customer_token(pool: &PgPool, email: &str) -> (User, String) {
    let user = create_user(pool, email, ROLE_CUSTOMER).await;
    let token = login(build_test_app(pool.clone()), email).await;
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None, None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a raw body with extra headers, e.g. a signed webhook payload.
pub async fn post_raw(
    app: Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// POST a multipart form holding a single file part.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    token: &str,
) -> Response {
    let boundary = "galeria-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
