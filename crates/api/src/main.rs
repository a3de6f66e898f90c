use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use galeria_api::auth::bootstrap::{ensure_admin, AdminSeed};
use galeria_api::background;
use galeria_api::config::ServerConfig;
use galeria_api::integrations::cloudinary::{CloudinaryClient, MediaStore};
use galeria_api::integrations::mercadopago::{MercadoPagoClient, MercadoPagoGateway};
use galeria_api::integrations::stripe::{StripeClient, StripeGateway};
use galeria_api::router::build_app_router;
use galeria_api::state::AppState;
use galeria_events::{ActivityPersistence, EmailConfig, EmailDelivery, EventBus, Mailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "galeria_api=debug,galeria_events=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = galeria_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    galeria_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    galeria_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Admin account ---
    match AdminSeed::from_env() {
        Some(seed) => match ensure_admin(&pool, &seed).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Admin account already present"),
            Err(e) => tracing::error!(error = %format!("{e:#}"), "Admin bootstrap failed"),
        },
        None => tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap"),
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let persistence_handle = tokio::spawn(ActivityPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Event bus and activity persistence started");

    // --- Mail ---
    let mailer = match EmailConfig::from_env() {
        Some(email_config) => Mailer::new(
            Some(EmailDelivery::new(email_config)),
            config.admin_notify_email.clone(),
        ),
        None => {
            tracing::warn!("SMTP not configured, outgoing mail disabled");
            Mailer::disabled()
        }
    };

    // --- External providers ---
    let stripe: Option<Arc<dyn StripeGateway>> = config.stripe.as_ref().and_then(|c| {
        StripeClient::new(c)
            .map(|client| Arc::new(client) as Arc<dyn StripeGateway>)
            .map_err(|e| tracing::warn!(error = %e, "Stripe client unavailable"))
            .ok()
    });
    let mercadopago: Option<Arc<dyn MercadoPagoGateway>> =
        config.mercadopago.as_ref().and_then(|c| {
            MercadoPagoClient::new(c)
                .map(|client| Arc::new(client) as Arc<dyn MercadoPagoGateway>)
                .map_err(|e| tracing::warn!(error = %e, "MercadoPago client unavailable"))
                .ok()
        });
    let media: Option<Arc<dyn MediaStore>> = config.cloudinary.clone().and_then(|c| {
        CloudinaryClient::new(c)
            .map(|client| Arc::new(client) as Arc<dyn MediaStore>)
            .map_err(|e| tracing::warn!(error = %e, "Cloudinary client unavailable"))
            .ok()
    });
    tracing::info!(
        stripe = stripe.is_some(),
        mercadopago = mercadopago.is_some(),
        media = media.is_some(),
        "External providers configured",
    );

    // --- Background jobs ---
    let jobs_cancel = CancellationToken::new();
    let reservations_handle = tokio::spawn(background::reservations::run(
        pool.clone(),
        jobs_cancel.clone(),
    ));
    let sessions_handle = tokio::spawn(background::sessions::run(
        pool.clone(),
        jobs_cancel.clone(),
    ));
    tracing::info!("Background jobs started (reservation release, session cleanup)");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        mailer,
        stripe,
        mercadopago,
        media,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    jobs_cancel.cancel();
    let _ = tokio::time::timeout(drain, reservations_handle).await;
    let _ = tokio::time::timeout(drain, sessions_handle).await;
    tracing::info!("Background jobs stopped");

    // The router owned the other clones of the bus; dropping this one closes
    // the channel and lets persistence drain what is left.
    drop(event_bus);
    let _ = tokio::time::timeout(drain, persistence_handle).await;
    tracing::info!("Activity persistence shut down");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM (on Unix) to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
