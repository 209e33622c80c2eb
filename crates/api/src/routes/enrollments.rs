//! Route definitions for the `/inscriptions` (enrollments) resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::enrollment;
use crate::state::AppState;

/// Routes mounted at `/inscriptions`.
///
/// ```text
/// GET    /                         -> list             (?status, payment_status, course_id, trainee_id, limit, offset)
/// POST   /                         -> create           ({trainee_id, course_id, payment_status?})
/// GET    /stats/summary            -> stats
/// GET    /formation/{course_id}    -> list_by_course
/// GET    /apprenant/{trainee_id}   -> list_by_trainee
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update           ({status?, payment_status?})
/// DELETE /{id}                     -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(enrollment::list).post(enrollment::create))
        .route("/stats/summary", get(enrollment::stats))
        .route("/formation/{course_id}", get(enrollment::list_by_course))
        .route("/apprenant/{trainee_id}", get(enrollment::list_by_trainee))
        .route(
            "/{id}",
            get(enrollment::get_by_id)
                .put(enrollment::update)
                .delete(enrollment::delete),
        )
}
