//! Route definitions for the `/formations` (courses) resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::course;
use crate::state::AppState;

/// Routes mounted at `/formations`.
///
/// ```text
/// GET    /                   -> list       (?search, category, level, trainer_id, limit, offset)
/// POST   /                   -> create     (multipart, optional `image`)
/// GET    /stats/summary      -> stats
/// GET    /{id}               -> get_by_id
/// PUT    /{id}               -> update     (multipart, optional `image`)
/// DELETE /{id}               -> delete
/// GET    /{id}/inscriptions  -> list_enrollments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(course::list).post(course::create))
        .route("/stats/summary", get(course::stats))
        .route(
            "/{id}",
            get(course::get_by_id)
                .put(course::update)
                .delete(course::delete),
        )
        .route("/{id}/inscriptions", get(course::list_enrollments))
}
