pub mod courses;
pub mod enrollments;
pub mod health;
pub mod trainees;
pub mod trainers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          database + upload dir health
///
/// /formateurs                                      list, create (multipart)
/// /formateurs/{id}                                 get, update (multipart), delete
///
/// /formations                                      list, create (multipart)
/// /formations/stats/summary                        catalog statistics
/// /formations/{id}                                 get, update (multipart), delete
/// /formations/{id}/inscriptions                    enrollments of a course
///
/// /apprenants                                      list, create (multipart)
/// /apprenants/stats/summary                        trainee statistics
/// /apprenants/{id}                                 get, update (multipart), soft delete
/// /apprenants/{id}/inscrire                        enroll in a course (POST)
/// /apprenants/{id}/inscriptions                    enrollments of a trainee
///
/// /inscriptions                                    list, create
/// /inscriptions/stats/summary                      enrollment statistics
/// /inscriptions/formation/{course_id}              by course
/// /inscriptions/apprenant/{trainee_id}             by trainee
/// /inscriptions/{id}                               get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/formateurs", trainers::router())
        .nest("/formations", courses::router())
        .nest("/apprenants", trainees::router())
        .nest("/inscriptions", enrollments::router())
}
