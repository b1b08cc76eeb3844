//! Route definitions for the `/promotion` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::promotion;
use crate::state::AppState;

/// Routes mounted at `/promotion`.
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
        .route("/", get(promotion::list).post(promotion::create))
        .route(
            "/{id}",
            get(promotion::get_by_id)
                .patch(promotion::update)
                .delete(promotion::delete),
        )
}
