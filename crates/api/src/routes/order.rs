//! Route definitions for the `/orders` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::order;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// GET    /                        -> list (admin, store owner)
/// POST   /                        -> create (requires auth)
/// GET    /mine                    -> list_mine (requires auth)
/// GET    /track/{tracking_code}   -> track (public)
/// GET    /{id}                    -> get_by_id (buyer or store owner)
/// PATCH  /{id}                    -> update (admin, store owner)
/// DELETE /{id}                    -> delete (admin, store owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(order::list).post(order::create))
        .route("/mine", get(order::list_mine))
        .route("/track/{tracking_code}", get(order::track))
        .route(
            "/{id}",
            get(order::get_by_id)
                .patch(order::update)
                .delete(order::delete),
        )
}
