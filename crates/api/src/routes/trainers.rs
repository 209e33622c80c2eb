//! Route definitions for the `/formateurs` (trainers) resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::trainer;
use crate::state::AppState;

/// Routes mounted at `/formateurs`.
///
/// ```text
/// GET    /        -> list       (?search, limit, offset)
/// POST   /        -> create     (multipart, optional `photo`)
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update     (multipart, optional `photo`)
/// DELETE /{id}    -> delete     (409 while courses reference it)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trainer::list).post(trainer::create))
        .route(
            "/{id}",
            get(trainer::get_by_id)
                .put(trainer::update)
                .delete(trainer::delete),
        )
}
