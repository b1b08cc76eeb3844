//! Per-line quantity limit on cart merges.

mod common;

use sqlx::PgPool;
use storehub_core::order::MAX_LINE_QUANTITY;
use storehub_db::repositories::CartRepo;

async fn setup(pool: &PgPool) -> (i64, i64) {
    let owner = common::seed_admin(pool).await;
    let buyer = common::seed_customer(pool).await;
    let store = common::seed_store(pool, owner, "shop").await;
    let product = common::seed_product(pool, store, "tea", 1, 5000).await;
    (buyer, product)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_merge_stops_at_line_limit(pool: PgPool) {
    let (buyer, product) = setup(&pool).await;

    let line = CartRepo::add(&pool, buyer, product, 900).await.unwrap().unwrap();
    assert_eq!(line.quantity, 900);

    assert!(CartRepo::add(&pool, buyer, product, 200).await.unwrap().is_none());

    let filled = CartRepo::add(&pool, buyer, product, MAX_LINE_QUANTITY - 900)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(filled.id, line.id);
    assert_eq!(filled.quantity, MAX_LINE_QUANTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_adds_cannot_pass_line_limit(pool: PgPool) {
    let (buyer, product) = setup(&pool).await;

    let (first, second) = tokio::join!(
        CartRepo::add(&pool, buyer, product, 600),
        CartRepo::add(&pool, buyer, product, 600),
    );
    let accepted = [first.unwrap(), second.unwrap()]
        .into_iter()
        .flatten()
        .count();
    assert_eq!(accepted, 1);

    let lines = CartRepo::list(&pool, buyer).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 600);
}
