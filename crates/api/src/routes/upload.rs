//! Route definitions for the `/upload` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes mounted at `/upload`. Admin only.
///
/// ```text
/// POST   /?store_id=  -> upload (multipart `files`)
/// DELETE /            -> delete (JSON `{ "urls": [...] }`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload::upload).delete(upload::delete))
        .layer(DefaultBodyLimit::max(upload::UPLOAD_BODY_LIMIT))
}
