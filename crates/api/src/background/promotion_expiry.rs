//! Periodic deactivation of promotions whose end date has passed.
//!
//! The first sweep runs immediately on start, then once per interval.
//! A failed sweep is logged and retried on the next tick.

use std::time::Duration;

use chrono::Utc;
use storehub_core::types::Timestamp;
use storehub_db::repositories::PromotionRepo;
use storehub_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Deactivate every promotion that ended before `now`. Returns the number of
/// promotions changed.
pub async fn sweep_once(pool: &DbPool, now: Timestamp) -> Result<u64, sqlx::Error> {
    PromotionRepo::deactivate_expired(pool, now).await
}

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: DbPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Promotion expiry sweep started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Promotion expiry sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep_once(&pool, Utc::now()).await {
                    Ok(0) => tracing::debug!("Promotion expiry sweep: nothing expired"),
                    Ok(deactivated) => {
                        tracing::info!(deactivated, "Promotion expiry sweep: deactivated promotions");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Promotion expiry sweep failed");
                    }
                }
            }
        }
    }
}
