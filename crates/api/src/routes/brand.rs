//! Route definitions for the `/brands` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::brand;
use crate::state::AppState;

/// Routes mounted at `/brands`.
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
        .route("/", get(brand::list).post(brand::create))
        .route(
            "/{id}",
            get(brand::get_by_id)
                .patch(brand::update)
                .delete(brand::delete),
        )
}
