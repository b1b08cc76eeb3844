//! Route definitions for the `/cart` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`. All require auth.
///
/// ```text
/// GET    /            -> view
/// DELETE /            -> clear
/// POST   /items       -> add_item
/// PATCH  /items/{id}  -> update_item
/// DELETE /items/{id}  -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::view).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route("/items/{id}", patch(cart::update_item).delete(cart::remove_item))
}
