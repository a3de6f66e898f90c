//! Periodic release of lapsed artwork reservations.
//!
//! Orders reserve their artworks for 24 hours. Reservations whose
//! `reserved_until` has passed are cleared so the artwork is purchasable
//! again.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use galeria_db::repositories::ArtworkRepo;

/// How often expired reservations are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Reservation release job started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reservation release job stopping");
                break;
            }
            _ = interval.tick() => {
                match ArtworkRepo::release_expired_reservations(&pool).await {
                    Ok(released) if released > 0 => {
                        tracing::info!(released, "Released expired artwork reservations");
                    }
                    Ok(_) => tracing::debug!("No expired reservations"),
                    Err(e) => {
                        tracing::error!(error = %e, "Reservation release failed");
                    }
                }
            }
        }
    }
}
