//! Route definitions for the `/stores` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::store;
use crate::state::AppState;

/// Routes mounted at `/stores`.
///
/// ```text
/// GET    /      -> list
/// POST   /      -> create (admin; caller becomes owner)
/// GET    /{id}  -> get_by_id
/// PATCH  /{id}  -> update (admin, store owner)
/// DELETE /{id}  -> delete (admin, store owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(store::list).post(store::create))
        .route(
            "/{id}",
            get(store::get_by_id)
                .patch(store::update)
                .delete(store::delete),
        )
}
