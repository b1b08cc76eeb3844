//! Route definitions for the `/banners` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::banner;
use crate::state::AppState;

/// Routes mounted at `/banners`.
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
        .route("/", get(banner::list).post(banner::create))
        .route(
            "/{id}",
            get(banner::get_by_id)
                .patch(banner::update)
                .delete(banner::delete),
        )
}
