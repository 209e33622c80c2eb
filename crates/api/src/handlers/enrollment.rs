//! Handlers for the `/inscriptions` (enrollments) resource, plus the
//! transactional enrollment routine shared with `/apprenants/{id}/inscrire`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::enrollment::{ensure_capacity, takes_new_seat, EnrollmentStatus, PaymentStatus};
use campus_core::error::CoreError;
use campus_core::trainee::STATUS_INACTIVE;
use campus_core::types::DbId;
use campus_core::validation::FieldErrors;
use campus_db::models::enrollment::{
    EnrollmentDetail, EnrollmentQuery, EnrollmentStats, UpdateEnrollment,
};
use campus_db::models::page::Page;
use campus_db::repositories::{CourseRepo, EnrollmentRepo, TraineeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::form::parse_enum;
use crate::handlers::course::ensure_course_exists;
use crate::handlers::trainee::ensure_trainee_exists;
use crate::query::{non_blank, EnrollmentListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /api/inscriptions`.
#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub trainee_id: Option<DbId>,
    pub course_id: Option<DbId>,
    pub payment_status: Option<String>,
}

/// Body of `PUT /api/inscriptions/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateEnrollmentRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
}

/// Enroll a trainee in a course.
///
/// Runs in one transaction: the course row is locked first so concurrent
/// enrollments into the same course serialize, then the trainee must be
/// active, must not already hold a live enrollment in the course, and a seat
/// must be free. A missing trainee or course is reported as a field error.
pub(crate) async fn enroll(
    state: &AppState,
    trainee_id: DbId,
    course_id: DbId,
    payment: PaymentStatus,
) -> AppResult<EnrollmentDetail> {
    let mut tx = state.pool.begin().await?;

    let capacity = CourseRepo::lock_capacity(&mut *tx, course_id).await?;
    let trainee_status = TraineeRepo::find_status(&mut *tx, trainee_id).await?;

    let mut errors = FieldErrors::new();
    if trainee_status.is_none() {
        errors.add("trainee_id", format!("Trainee {trainee_id} does not exist"));
    }
    if capacity.is_none() {
        errors.add("course_id", format!("Course {course_id} does not exist"));
    }
    errors.into_result()?;
    let (Some(trainee_status), Some(capacity)) = (trainee_status, capacity) else {
        return Err(AppError::InternalError(
            "enrollment references passed validation while missing".to_string(),
        ));
    };

    if trainee_status == STATUS_INACTIVE {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Trainee {trainee_id} is inactive and cannot enroll"
        ))));
    }

    if EnrollmentRepo::find_live(&mut *tx, trainee_id, course_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "Trainee is already enrolled in this course".to_string(),
        )));
    }

    let active = EnrollmentRepo::count_active_for_course(&mut *tx, course_id).await?;
    ensure_capacity(active, capacity)?;

    let enrollment =
        EnrollmentRepo::insert(&mut *tx, trainee_id, course_id, payment.as_str()).await?;
    tx.commit().await?;

    tracing::info!(
        enrollment_id = enrollment.id,
        trainee_id,
        course_id,
        seats_taken = active + 1,
        capacity,
        "Trainee enrolled",
    );

    EnrollmentRepo::find_detail(&state.pool, enrollment.id)
        .await?
        .ok_or(AppError::not_found("Enrollment", enrollment.id))
}

/// Parse an optional payment status, defaulting to unpaid.
pub(crate) fn payment_or_default(
    errors: &mut FieldErrors,
    value: Option<&str>,
) -> PaymentStatus {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    parse_enum::<PaymentStatus>(errors, "payment_status", value).unwrap_or(PaymentStatus::Unpaid)
}

/// GET /api/inscriptions
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<EnrollmentListParams>,
) -> AppResult<Json<Page<EnrollmentDetail>>> {
    let status = non_blank(&params.status)
        .map(|s| s.parse::<EnrollmentStatus>())
        .transpose()?;
    let payment_status = non_blank(&params.payment_status)
        .map(|s| s.parse::<PaymentStatus>())
        .transpose()?;
    let query = EnrollmentQuery {
        status: status.map(|s| s.as_str().to_string()),
        payment_status: payment_status.map(|p| p.as_str().to_string()),
        course_id: params.course_id,
        trainee_id: params.trainee_id,
        limit: params.limit,
        offset: params.offset,
    };
    let page = EnrollmentRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}

/// POST /api/inscriptions
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateEnrollmentRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentDetail>)> {
    let mut errors = FieldErrors::new();
    errors.check(
        "trainee_id",
        input.trainee_id.is_some(),
        "trainee_id is required",
    );
    errors.check(
        "course_id",
        input.course_id.is_some(),
        "course_id is required",
    );
    let payment = payment_or_default(&mut errors, input.payment_status.as_deref());
    errors.into_result()?;

    let (Some(trainee_id), Some(course_id)) = (input.trainee_id, input.course_id) else {
        return Err(AppError::InternalError(
            "enrollment request passed validation while missing ids".to_string(),
        ));
    };

    let enrollment = enroll(&state, trainee_id, course_id, payment).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /api/inscriptions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<EnrollmentDetail>> {
    let enrollment = EnrollmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;
    Ok(Json(enrollment))
}

/// PUT /api/inscriptions/{id}
///
/// Changes status and/or payment status. Moving a cancelled or completed
/// enrollment back to an active status needs an active trainee and a free
/// seat.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<UpdateEnrollmentRequest>,
) -> AppResult<Json<EnrollmentDetail>> {
    let mut errors = FieldErrors::new();
    let status = parse_enum::<EnrollmentStatus>(
        &mut errors,
        "status",
        input.status.as_deref().map(str::trim).filter(|v| !v.is_empty()),
    );
    let payment = parse_enum::<PaymentStatus>(
        &mut errors,
        "payment_status",
        input
            .payment_status
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty()),
    );
    errors.into_result()?;

    let mut tx = state.pool.begin().await?;
    let current = EnrollmentRepo::find_for_update(&mut *tx, id)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;

    if let Some(next) = status {
        let from: EnrollmentStatus = current.status.parse()?;
        if takes_new_seat(from, next) {
            let trainee_status = TraineeRepo::find_status(&mut *tx, current.trainee_id).await?;
            if trainee_status.as_deref() == Some(STATUS_INACTIVE) {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Trainee {} is inactive and cannot be re-enrolled",
                    current.trainee_id
                ))));
            }
            let capacity = CourseRepo::lock_capacity(&mut *tx, current.course_id)
                .await?
                .ok_or(AppError::not_found("Course", current.course_id))?;
            let active =
                EnrollmentRepo::count_active_for_course(&mut *tx, current.course_id).await?;
            ensure_capacity(active, capacity)?;
        }
    }

    let changes = UpdateEnrollment {
        status: status.map(|s| s.as_str().to_string()),
        payment_status: payment.map(|p| p.as_str().to_string()),
    };
    EnrollmentRepo::update(&mut *tx, id, &changes)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;
    tx.commit().await?;

    let enrollment = EnrollmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Enrollment", id))?;
    Ok(Json(enrollment))
}

/// DELETE /api/inscriptions/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    if EnrollmentRepo::delete(&state.pool, id).await? {
        tracing::info!(enrollment_id = id, "Enrollment deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Enrollment", id))
    }
}

/// GET /api/inscriptions/formation/{course_id}
pub async fn list_by_course(
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    ensure_course_exists(&state, course_id).await?;
    let enrollments = EnrollmentRepo::list_by_course(&state.pool, course_id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/inscriptions/apprenant/{trainee_id}
pub async fn list_by_trainee(
    State(state): State<AppState>,
    ApiPath(trainee_id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    ensure_trainee_exists(&state, trainee_id).await?;
    let enrollments = EnrollmentRepo::list_by_trainee(&state.pool, trainee_id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/inscriptions/stats/summary
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<EnrollmentStats>> {
    let stats = EnrollmentRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}
