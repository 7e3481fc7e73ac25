//! Route definitions for collection points.

use axum::routing::get;
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

/// Point routes mounted at `/points`.
///
/// ```text
/// GET    /                  -> list_points
/// POST   /                  -> create_point
/// GET    /{id}              -> get_point
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(points::list_points).post(points::create_point))
        .route("/{id}", get(points::get_point))
}
