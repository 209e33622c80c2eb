//! Route definitions for the `/apprenants` (trainees) resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trainee;
use crate::state::AppState;

/// Routes mounted at `/apprenants`.
///
/// ```text
/// GET    /                   -> list              (?search, status, limit, offset)
/// POST   /                   -> create            (multipart, optional `photo`)
/// GET    /stats/summary      -> stats
/// GET    /{id}               -> get_by_id         (with enrollments)
/// PUT    /{id}               -> update            (multipart, optional `photo`)
/// DELETE /{id}               -> delete            (soft: status -> inactive)
/// POST   /{id}/inscrire      -> enroll_in_course  ({course_id, payment_status?})
/// GET    /{id}/inscriptions  -> list_enrollments
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trainee::list).post(trainee::create))
        .route("/stats/summary", get(trainee::stats))
        .route(
            "/{id}",
            get(trainee::get_by_id)
                .put(trainee::update)
                .delete(trainee::delete),
        )
        .route("/{id}/inscrire", post(trainee::enroll_in_course))
        .route("/{id}/inscriptions", get(trainee::list_enrollments))
}
