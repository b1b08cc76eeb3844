pub mod auth;
pub mod banner;
pub mod brand;
pub mod cart;
pub mod category;
pub mod health;
pub mod order;
pub mod product;
pub mod promotion;
pub mod store;
pub mod upload;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/me                             current user (requires auth)
///
/// /stores                              list, create
/// /stores/{id}                         get, update, delete
/// /categories                          list, create
/// /categories/{id}                     get, update, delete
/// /brands                              list, create
/// /brands/{id}                         get, update, delete
/// /banners                             list, create
/// /banners/{id}                        get, update, delete
/// /products                            list, create
/// /products/{id}                       get, update, delete
/// /promotion                           list, create
/// /promotion/{id}                      get, update, delete
///
/// /cart                                view, clear
/// /cart/items                          add
/// /cart/items/{id}                     update quantity, remove
///
/// /orders                              list (store owner), place
/// /orders/mine                         buyer's orders
/// /orders/track/{tracking_code}        public lookup
/// /orders/{id}                         get, update status, delete
///
/// /upload                              upload images, delete by URL
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        // Catalog. Writes require the admin who owns the store.
        .nest("/stores", store::router())
        .nest("/categories", category::router())
        .nest("/brands", brand::router())
        .nest("/banners", banner::router())
        .nest("/products", product::router())
        .nest("/promotion", promotion::router())
        // Shopping.
        .nest("/cart", cart::router())
        .nest("/orders", order::router())
        .nest("/upload", upload::router())
}
