use crate::auth::jwt::JwtConfig;
use crate::integrations::cloudinary::CloudinaryConfig;
use crate::integrations::mercadopago::MercadoPagoConfig;
use crate::integrations::stripe::StripeConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. Provider
/// sections are `None` when their credentials are not set, which turns the
/// matching endpoints into 503 responses.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Upper bound on draining background services after shutdown.
    pub shutdown_timeout_secs: u64,
    /// Storefront base URL, used for checkout return links.
    pub frontend_url: String,
    /// Public base URL of this API, used for provider notification URLs.
    pub backend_url: String,
    pub jwt: JwtConfig,
    pub stripe: Option<StripeConfig>,
    pub mercadopago: Option<MercadoPagoConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
    /// Recipient of contact-form notifications.
    pub admin_notify_email: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `FRONTEND_URL`          | `http://localhost:5173` |
    /// | `BACKEND_URL`           | `http://localhost:3000` |
    /// | `ADMIN_NOTIFY_EMAIL`    | unset                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();
        let backend_url = std::env::var("BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            frontend_url,
            backend_url,
            jwt: JwtConfig::from_env(),
            stripe: StripeConfig::from_env(),
            mercadopago: MercadoPagoConfig::from_env(),
            cloudinary: CloudinaryConfig::from_env(),
            admin_notify_email: std::env::var("ADMIN_NOTIFY_EMAIL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}
