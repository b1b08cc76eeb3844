//! Fixture builders shared by the repository integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use storehub_core::roles::{ROLE_ADMIN, ROLE_CUSTOMER};
use storehub_db::models::product::CreateProduct;
use storehub_db::models::store::CreateStore;
use storehub_db::models::user::CreateUser;
use storehub_db::repositories::{ProductRepo, StoreRepo, UserRepo};

pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    let input = CreateUser {
        email: email.to_string(),
        name: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

pub async fn seed_admin(pool: &PgPool) -> i64 {
    seed_user(pool, "owner@example.com", ROLE_ADMIN).await
}

pub async fn seed_customer(pool: &PgPool) -> i64 {
    seed_user(pool, "buyer@example.com", ROLE_CUSTOMER).await
}

pub async fn seed_store(pool: &PgPool, owner_id: i64, slug: &str) -> i64 {
    let input = CreateStore {
        name: slug.to_string(),
        slug: None,
        description: None,
    };
    StoreRepo::create(pool, owner_id, &input, slug).await.unwrap().id
}

pub fn new_product(store_id: i64, slug: &str, price: i64, stock: i32) -> CreateProduct {
    CreateProduct {
        store_id,
        category_id: None,
        brand_id: None,
        name: slug.to_string(),
        slug: None,
        description: None,
        price: Decimal::from(price),
        stock,
        is_active: None,
        images: Vec::new(),
        colors: Vec::new(),
        sizes: Vec::new(),
    }
}

pub async fn seed_product(pool: &PgPool, store_id: i64, slug: &str, price: i64, stock: i32) -> i64 {
    let input = new_product(store_id, slug, price, stock);
    ProductRepo::create(pool, &input, slug).await.unwrap().id
}

pub async fn stock_of(pool: &PgPool, product_id: i64) -> i32 {
    let (stock,): (i32,) = sqlx::query_as("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap();
    stock
}
