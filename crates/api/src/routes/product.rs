//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::product;
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create (admin, store owner)
/// GET    /{id}  -> get_by_id
/// PATCH  /{id}  -> update (admin, store owner)
/// DELETE /{id}  -> delete (admin, store owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(product::list).post(product::create))
        .route(
            "/{id}",
            get(product::get_by_id)
                .patch(product::update)
                .delete(product::delete),
        )
}
