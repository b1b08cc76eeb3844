//! HTTP-level tests for stores, categories, brands, banners, products and
//! promotions: ownership rules, dense position ordering and effective prices.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_product, create_store, delete_auth, expect_data, get, get_auth,
    patch_json_auth, post_json_auth,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;

/// `(id, position)` pairs of a list response, in response order.
fn positions(list: &Value) -> Vec<(i64, i64)> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|row| (row["id"].as_i64().unwrap(), row["position"].as_i64().unwrap()))
        .collect()
}

async fn create_category(app: axum::Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/categories", token, body).await;
    expect_data(response, StatusCode::CREATED).await
}

async fn root_categories(app: axum::Router, store_id: i64) -> Value {
    let response = get(app, &format!("/api/categories?store_id={store_id}&roots_only=true")).await;
    expect_data(response, StatusCode::OK).await
}

// ---------------------------------------------------------------------------
// Stores and ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_store_crud_and_owner_filter(pool: PgPool) {
    let (owner, token) = common::admin(&pool, "owner@example.com").await;
    let (_, other_token) = common::admin(&pool, "other@example.com").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/stores",
        &token,
        json!({ "name": "Corner Shop", "description": "Everything" }),
    )
    .await;
    let store = expect_data(response, StatusCode::CREATED).await;
    assert_eq!(store["user_id"], owner.id);
    assert_eq!(store["slug"], "corner-shop");
    let store_id = store["id"].as_i64().unwrap();
    create_store(app.clone(), &other_token, "Other Shop").await;

    let response = get(app.clone(), &format!("/api/stores?owner_id={}", owner.id)).await;
    let mine = expect_data(response, StatusCode::OK).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], store_id);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/stores/{store_id}"),
        &token,
        json!({ "name": "Corner Shop 2" }),
    )
    .await;
    let updated = expect_data(response, StatusCode::OK).await;
    assert_eq!(updated["name"], "Corner Shop 2");

    let response = delete_auth(app.clone(), &format!("/api/stores/{store_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app, &format!("/api/stores/{store_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_admin_cannot_modify_store_data(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let (_, intruder) = common::admin(&pool, "intruder@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Mine").await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/stores/{store_id}"),
        &intruder,
        json!({ "name": "Stolen" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app.clone(),
        "/api/brands",
        &intruder,
        json!({ "store_id": store_id, "name": "Fake" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        app,
        "/api/brands",
        &intruder,
        json!({ "store_id": 999_999, "name": "Nowhere" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_customer_cannot_create_store(pool: PgPool) {
    let (_, token) = common::customer(&pool, "buyer@example.com").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/stores", &token, json!({ "name": "Nope" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Category positions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_insert_shifts_siblings(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;

    let a = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "A" })).await;
    let b = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "B" })).await;
    assert_eq!(a["position"], 0);
    assert_eq!(b["position"], 1);

    let c = create_category(
        app.clone(),
        &token,
        json!({ "store_id": store_id, "name": "C", "position": 0 }),
    )
    .await;
    assert_eq!(c["position"], 0);

    // Out-of-range requests are clamped to the end.
    let d = create_category(
        app.clone(),
        &token,
        json!({ "store_id": store_id, "name": "D", "position": 50 }),
    )
    .await;
    assert_eq!(d["position"], 3);

    let list = root_categories(app, store_id).await;
    let ids: Vec<i64> = positions(&list).into_iter().map(|(id, _)| id).collect();
    assert_eq!(
        ids,
        vec![
            c["id"].as_i64().unwrap(),
            a["id"].as_i64().unwrap(),
            b["id"].as_i64().unwrap(),
            d["id"].as_i64().unwrap(),
        ]
    );
    let pos: Vec<i64> = positions(&list).into_iter().map(|(_, p)| p).collect();
    assert_eq!(pos, vec![0, 1, 2, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_move_and_delete_keep_positions_dense(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;

    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D"] {
        let cat = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": name })).await;
        ids.push(cat["id"].as_i64().unwrap());
    }

    // Move A (0) to 2: B, C shift up.
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/categories/{}", ids[0]),
        &token,
        json!({ "position": 2 }),
    )
    .await;
    assert_eq!(expect_data(response, StatusCode::OK).await["position"], 2);

    let list = root_categories(app.clone(), store_id).await;
    assert_eq!(
        positions(&list),
        vec![(ids[1], 0), (ids[2], 1), (ids[0], 2), (ids[3], 3)]
    );

    // Delete C (1): A and D close the gap.
    let response = delete_auth(app.clone(), &format!("/api/categories/{}", ids[2]), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = root_categories(app, store_id).await;
    assert_eq!(positions(&list), vec![(ids[1], 0), (ids[0], 1), (ids[3], 2)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_reparent_reindexes_both_sibling_lists(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;

    let parent = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "Parent" })).await;
    let parent_id = parent["id"].as_i64().unwrap();
    let x = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "X" })).await;
    let y = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "Y" })).await;
    let child = create_category(
        app.clone(),
        &token,
        json!({ "store_id": store_id, "name": "Child", "parent_id": parent_id }),
    )
    .await;
    assert_eq!(child["position"], 0);

    // X leaves the root list and goes first under Parent.
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/categories/{}", x["id"]),
        &token,
        json!({ "parent_id": parent_id, "position": 0 }),
    )
    .await;
    let moved = expect_data(response, StatusCode::OK).await;
    assert_eq!(moved["parent_id"], parent_id);
    assert_eq!(moved["position"], 0);

    let roots = root_categories(app.clone(), store_id).await;
    assert_eq!(
        positions(&roots),
        vec![(parent_id, 0), (y["id"].as_i64().unwrap(), 1)]
    );

    let response = get(app.clone(), &format!("/api/categories?store_id={store_id}&parent_id={parent_id}")).await;
    let children = expect_data(response, StatusCode::OK).await;
    assert_eq!(
        positions(&children),
        vec![(x["id"].as_i64().unwrap(), 0), (child["id"].as_i64().unwrap(), 1)]
    );

    // Back to the root with an explicit null parent.
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/categories/{}", child["id"]),
        &token,
        json!({ "parent_id": null }),
    )
    .await;
    let back = expect_data(response, StatusCode::OK).await;
    assert!(back["parent_id"].is_null());
    assert_eq!(back["position"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_cycles_and_children_rejected(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    let other_store = create_store(app.clone(), &token, "Other").await;

    let top = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "Top" })).await;
    let top_id = top["id"].as_i64().unwrap();
    let sub = create_category(
        app.clone(),
        &token,
        json!({ "store_id": store_id, "name": "Sub", "parent_id": top_id }),
    )
    .await;

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/categories/{top_id}"),
        &token,
        json!({ "parent_id": sub["id"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/categories/{top_id}"),
        &token,
        json!({ "parent_id": top_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/categories",
        &token,
        json!({ "store_id": other_store, "name": "Cross", "parent_id": top_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(app, &format!("/api/categories/{top_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_rename_rederives_slug(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    let category = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "Shoes" })).await;
    assert_eq!(category["slug"], "shoes");
    let uri = format!("/api/categories/{}", category["id"]);

    let response = patch_json_auth(app.clone(), &uri, &token, json!({ "name": "Running Shoes" })).await;
    let renamed = expect_data(response, StatusCode::OK).await;
    assert_eq!(renamed["slug"], "running-shoes");

    let response = patch_json_auth(app.clone(), &uri, &token, json!({ "slug": "Trail Runners" })).await;
    let reslugged = expect_data(response, StatusCode::OK).await;
    assert_eq!(reslugged["slug"], "trail-runners");
    assert_eq!(reslugged["name"], "Running Shoes");

    let response = patch_json_auth(app, &uri, &token, json!({ "image_url": "https://cdn.example.com/c.webp" })).await;
    assert_eq!(expect_data(response, StatusCode::OK).await["slug"], "trail-runners");
}

// ---------------------------------------------------------------------------
// Brands and banners
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_brand_positions_scoped_per_store(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let first = create_store(app.clone(), &token, "First").await;
    let second = create_store(app.clone(), &token, "Second").await;

    for (store_id, name) in [(first, "A"), (first, "B"), (second, "Z")] {
        let response = post_json_auth(
            app.clone(),
            "/api/brands",
            &token,
            json!({ "store_id": store_id, "name": name }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app.clone(), &format!("/api/brands?store_id={second}")).await;
    let brands = expect_data(response, StatusCode::OK).await;
    assert_eq!(brands.as_array().unwrap().len(), 1);
    assert_eq!(brands[0]["position"], 0);

    let response = get(app.clone(), &format!("/api/brands?store_id={first}")).await;
    let brands = expect_data(response, StatusCode::OK).await;
    let last = brands[1]["id"].as_i64().unwrap();

    let response = patch_json_auth(
        app.clone(),
        &format!("/api/brands/{last}"),
        &token,
        json!({ "position": -5 }),
    )
    .await;
    assert_eq!(expect_data(response, StatusCode::OK).await["position"], 0);

    let response = get(app, &format!("/api/brands?store_id={first}")).await;
    let brands = expect_data(response, StatusCode::OK).await;
    assert_eq!(brands[0]["id"], last);
    assert_eq!(brands[1]["position"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_banner_list_hides_inactive(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let (_, intruder) = common::admin(&pool, "intruder@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;

    for (title, active) in [("Live", true), ("Draft", false)] {
        let response = post_json_auth(
            app.clone(),
            "/api/banners",
            &token,
            json!({
                "store_id": store_id,
                "title": title,
                "image_url": "https://cdn.example.com/banner.webp",
                "is_active": active,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app.clone(), &format!("/api/banners?store_id={store_id}")).await;
    let visible = expect_data(response, StatusCode::OK).await;
    assert_eq!(visible.as_array().unwrap().len(), 1);
    assert_eq!(visible[0]["title"], "Live");

    let uri = format!("/api/banners?store_id={store_id}&include_inactive=true");
    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = get_auth(app.clone(), &uri, &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, &uri, &token).await;
    let all = expect_data(response, StatusCode::OK).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_products_only_listed_for_owner(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let (_, buyer) = common::customer(&pool, "buyer@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    create_product(app.clone(), &token, store_id, "Live", "1.00", 1).await;
    let hidden = create_product(app.clone(), &token, store_id, "Hidden", "1.00", 1).await;
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/products/{hidden}"),
        &token,
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.clone(), &format!("/api/products?store_id={store_id}")).await;
    let visible = expect_data(response, StatusCode::OK).await;
    assert_eq!(visible.as_array().unwrap().len(), 1);

    let uri = format!("/api/products?store_id={store_id}&include_inactive=true");
    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = get_auth(app.clone(), &uri, &buyer).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.clone(), "/api/products?include_inactive=true", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app, &uri, &token).await;
    let all = expect_data(response, StatusCode::OK).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Products and promotions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_detail_and_references(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    let other_store = create_store(app.clone(), &token, "Other").await;

    let category = create_category(app.clone(), &token, json!({ "store_id": store_id, "name": "Shoes" })).await;
    let foreign = create_category(app.clone(), &token, json!({ "store_id": other_store, "name": "Hats" })).await;

    let response = post_json_auth(
        app.clone(),
        "/api/products",
        &token,
        json!({
            "store_id": store_id,
            "category_id": category["id"],
            "name": "Trail Runner",
            "price": "120.00",
            "stock": 5,
            "images": ["https://cdn.example.com/a.webp", "https://cdn.example.com/b.webp"],
            "colors": [{ "name": "Red", "hex_code": "#ff0000" }],
            "sizes": ["42", "43"],
        }),
    )
    .await;
    let product = expect_data(response, StatusCode::CREATED).await;
    assert_eq!(product["slug"], "trail-runner");
    assert_eq!(common::money(&product["effective_price"]), Decimal::new(12000, 2));
    assert!(product["promotion"].is_null());
    assert_eq!(product["images"].as_array().unwrap().len(), 2);
    assert_eq!(product["images"][1]["position"], 1);
    assert_eq!(product["colors"][0]["name"], "Red");
    assert_eq!(product["sizes"].as_array().unwrap().len(), 2);

    let response = post_json_auth(
        app.clone(),
        "/api/products",
        &token,
        json!({
            "store_id": store_id,
            "category_id": foreign["id"],
            "name": "Wrong",
            "price": "1.00",
            "stock": 1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/products",
        &token,
        json!({ "store_id": store_id, "name": "Negative", "price": "-1.00", "stock": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promotion_sets_effective_price(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    let percent = create_product(app.clone(), &token, store_id, "Percent", "80.00", 10).await;
    let fixed = create_product(app.clone(), &token, store_id, "Fixed", "10.00", 10).await;
    let plain = create_product(app.clone(), &token, store_id, "Plain", "5.00", 10).await;

    let now = chrono::Utc::now();
    let response = post_json_auth(
        app.clone(),
        "/api/promotion",
        &token,
        json!({
            "store_id": store_id,
            "name": "Spring",
            "start_date": now - chrono::Duration::days(1),
            "end_date": now + chrono::Duration::days(7),
            "products": [
                { "product_id": percent, "discount": "25", "discount_type": "PERCENT" },
                { "product_id": fixed, "discount": "12.50", "discount_type": "FIXED" },
            ],
        }),
    )
    .await;
    let promotion = expect_data(response, StatusCode::CREATED).await;
    assert_eq!(promotion["products"].as_array().unwrap().len(), 2);

    let response = get(app.clone(), &format!("/api/products/{percent}")).await;
    let product = expect_data(response, StatusCode::OK).await;
    assert_eq!(common::money(&product["effective_price"]), Decimal::new(6000, 2));
    assert_eq!(product["promotion"]["discount_type"], "PERCENT");

    // Fixed discounts larger than the price go negative.
    let response = get(app.clone(), &format!("/api/products/{fixed}")).await;
    let product = expect_data(response, StatusCode::OK).await;
    assert_eq!(common::money(&product["effective_price"]), Decimal::new(-250, 2));

    let response = get(app.clone(), &format!("/api/products?store_id={store_id}")).await;
    let list = expect_data(response, StatusCode::OK).await;
    let plain_row = list
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == plain)
        .unwrap();
    assert_eq!(common::money(&plain_row["effective_price"]), Decimal::new(500, 2));

    // Deactivating the promotion restores list prices.
    let response = patch_json_auth(
        app.clone(),
        &format!("/api/promotion/{}", promotion["id"]),
        &token,
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app, &format!("/api/products/{percent}")).await;
    let product = expect_data(response, StatusCode::OK).await;
    assert_eq!(common::money(&product["effective_price"]), Decimal::new(8000, 2));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_promotion_validation(pool: PgPool) {
    let (_, token) = common::admin(&pool, "owner@example.com").await;
    let app = common::build_test_app(pool);
    let store_id = create_store(app.clone(), &token, "Shop").await;
    let other_store = create_store(app.clone(), &token, "Other").await;
    let product = create_product(app.clone(), &token, store_id, "Item", "10.00", 1).await;
    let foreign = create_product(app.clone(), &token, other_store, "Foreign", "10.00", 1).await;
    let now = chrono::Utc::now();

    let cases = [
        // End before start.
        json!({
            "store_id": store_id, "name": "Backwards",
            "start_date": now, "end_date": now - chrono::Duration::days(1),
            "products": [],
        }),
        // Percentage over 100.
        json!({
            "store_id": store_id, "name": "Too much",
            "start_date": now, "end_date": now + chrono::Duration::days(1),
            "products": [{ "product_id": product, "discount": "150", "discount_type": "PERCENT" }],
        }),
        // Product from another store.
        json!({
            "store_id": store_id, "name": "Foreign",
            "start_date": now, "end_date": now + chrono::Duration::days(1),
            "products": [{ "product_id": foreign, "discount": "5", "discount_type": "FIXED" }],
        }),
        // Same product twice.
        json!({
            "store_id": store_id, "name": "Twice",
            "start_date": now, "end_date": now + chrono::Duration::days(1),
            "products": [
                { "product_id": product, "discount": "5", "discount_type": "FIXED" },
                { "product_id": product, "discount": "10", "discount_type": "PERCENT" },
            ],
        }),
    ];

    for body in cases {
        let name = body["name"].clone();
        let response = post_json_auth(app.clone(), "/api/promotion", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "case {name}");
    }
}
