//! Tests for the promotion expiry background job.

mod common;

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use storehub_api::background::promotion_expiry::{run, sweep_once};
use storehub_core::types::{DbId, Timestamp};
use storehub_db::models::promotion::CreatePromotion;
use storehub_db::models::store::CreateStore;
use storehub_db::repositories::{PromotionRepo, StoreRepo};
use tokio_util::sync::CancellationToken;

async fn seed_store(pool: &PgPool) -> DbId {
    let owner = common::create_user(pool, "owner@example.com", "admin").await;
    let input = CreateStore {
        name: "Shop".into(),
        slug: None,
        description: None,
    };
    StoreRepo::create(pool, owner.id, &input, "shop").await.unwrap().id
}

async fn seed_promotion(pool: &PgPool, store_id: DbId, name: &str, start: Timestamp, end: Timestamp) -> DbId {
    let input = CreatePromotion {
        store_id,
        name: name.into(),
        description: None,
        start_date: start,
        end_date: end,
        is_active: Some(true),
        products: Vec::new(),
    };
    PromotionRepo::create(pool, &input).await.unwrap().promotion.id
}

async fn is_active(pool: &PgPool, id: DbId) -> bool {
    PromotionRepo::find_by_id(pool, id).await.unwrap().unwrap().is_active
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sweep_deactivates_only_ended_promotions(pool: PgPool) {
    let store_id = seed_store(&pool).await;
    let now = Utc::now();
    let ended = seed_promotion(
        &pool,
        store_id,
        "Ended",
        now - chrono::Duration::days(10),
        now - chrono::Duration::days(1),
    )
    .await;
    let running = seed_promotion(
        &pool,
        store_id,
        "Running",
        now - chrono::Duration::days(1),
        now + chrono::Duration::days(1),
    )
    .await;
    let upcoming = seed_promotion(
        &pool,
        store_id,
        "Upcoming",
        now + chrono::Duration::days(1),
        now + chrono::Duration::days(2),
    )
    .await;

    assert_eq!(sweep_once(&pool, now).await.unwrap(), 1);
    assert!(!is_active(&pool, ended).await);
    assert!(is_active(&pool, running).await);
    assert!(is_active(&pool, upcoming).await);

    // Nothing left to do on a second pass.
    assert_eq!(sweep_once(&pool, now).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_run_sweeps_immediately_and_stops_on_cancel(pool: PgPool) {
    let store_id = seed_store(&pool).await;
    let now = Utc::now();
    let ended = seed_promotion(
        &pool,
        store_id,
        "Ended",
        now - chrono::Duration::days(3),
        now - chrono::Duration::hours(1),
    )
    .await;

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run(pool.clone(), Duration::from_secs(3600), cancel.clone()));

    let mut deactivated = false;
    for _ in 0..50 {
        if !is_active(&pool, ended).await {
            deactivated = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(deactivated, "first tick should run without waiting a full interval");

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sweep should stop after cancel")
        .unwrap();
}
