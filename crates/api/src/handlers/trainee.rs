//! Handlers for the `/apprenants` (trainees) resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::trainee::{validate_birth_date, TraineeStatus};
use campus_core::types::{Date, DbId};
use campus_core::validation::{normalize_email, FieldErrors, MAX_NAME_LEN, MAX_TEXT_LEN};
use campus_db::models::enrollment::EnrollmentDetail;
use campus_db::models::page::Page;
use campus_db::models::trainee::{
    CreateTrainee, Trainee, TraineeDetail, TraineeQuery, TraineeStats, UpdateTrainee,
};
use campus_db::repositories::{EnrollmentRepo, TraineeRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery};
use crate::form::{parse_date, parse_enum, FormData};
use crate::handlers::enrollment::{enroll, payment_or_default};
use crate::query::{non_blank, TraineeListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the trainee's photo.
const PHOTO_FIELD: &str = "photo";

/// Body of `POST /api/apprenants/{id}/inscrire`.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: Option<DbId>,
    pub payment_status: Option<String>,
}

/// Validate a trainee form and return the parsed birth date.
fn check_fields(errors: &mut FieldErrors, form: &FormData, require_all: bool) -> Option<Date> {
    for field in ["first_name", "last_name"] {
        let value = if require_all {
            errors.require(field, form.text(field))
        } else {
            form.text(field)
        };
        if let Some(v) = value {
            errors.max_len(field, v, MAX_NAME_LEN);
        }
    }

    let raw = if require_all {
        errors.require("birth_date", form.text("birth_date"))
    } else {
        form.text("birth_date")
    };
    let birth_date = parse_date(errors, "birth_date", raw);
    if let Some(date) = birth_date {
        let today = chrono::Utc::now().date_naive();
        errors.merge("birth_date", validate_birth_date(date, today).map(|_| ()));
    }

    let email = if require_all {
        errors.require("email", form.text("email"))
    } else {
        form.text("email")
    };
    if let Some(email) = email {
        errors.email("email", email);
    }

    if let Some(phone) = form.text("phone") {
        errors.phone("phone", phone);
    }
    if let Some(address) = form.text("address") {
        errors.max_len("address", address, MAX_TEXT_LEN);
    }
    if let Some(level) = form.text("education_level") {
        errors.max_len("education_level", level, MAX_NAME_LEN);
    }

    birth_date
}

/// 409 when another trainee already uses `email`.
async fn ensure_email_free(state: &AppState, email: &str, except: Option<DbId>) -> AppResult<()> {
    if let Some(other) = TraineeRepo::find_by_email(&state.pool, email).await? {
        if Some(other.id) != except {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A trainee with email {email} already exists"
            ))));
        }
    }
    Ok(())
}

/// 404 unless the trainee exists (active or not).
pub(crate) async fn ensure_trainee_exists(state: &AppState, id: DbId) -> AppResult<Trainee> {
    TraineeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Trainee", id))
}

/// GET /api/apprenants
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TraineeListParams>,
) -> AppResult<Json<Page<Trainee>>> {
    let status = non_blank(&params.status)
        .map(|s| s.parse::<TraineeStatus>())
        .transpose()?;
    let query = TraineeQuery {
        search: non_blank(&params.search).map(str::to_string),
        status: status.map(|s| s.as_str().to_string()),
        limit: params.limit,
        offset: params.offset,
    };
    let page = TraineeRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}

/// POST /api/apprenants
///
/// Multipart form; the optional `photo` part is stored on disk. Emails are
/// unique regardless of case.
pub async fn create(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<Trainee>)> {
    let form = FormData::from_multipart(multipart, PHOTO_FIELD).await?;

    let mut errors = FieldErrors::new();
    let birth_date = check_fields(&mut errors, &form, true);
    if let Some(file) = form.file() {
        errors.merge(PHOTO_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    let Some(birth_date) = birth_date else {
        return Err(AppError::InternalError(
            "trainee form passed validation without a birth date".to_string(),
        ));
    };
    let email = form.text("email").map(normalize_email).unwrap_or_default();
    ensure_email_free(&state, &email, None).await?;

    let photo = state.uploads.save_opt(PHOTO_FIELD, form.file()).await?;
    let input = CreateTrainee {
        first_name: form.string("first_name").unwrap_or_default(),
        last_name: form.string("last_name").unwrap_or_default(),
        birth_date,
        email,
        phone: form.string("phone"),
        address: form.string("address"),
        education_level: form.string("education_level"),
        photo: photo.clone(),
    };

    match TraineeRepo::create(&state.pool, &input).await {
        Ok(trainee) => {
            tracing::info!(trainee_id = trainee.id, "Trainee created");
            Ok((StatusCode::CREATED, Json(trainee)))
        }
        Err(e) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            Err(e.into())
        }
    }
}

/// GET /api/apprenants/{id}
///
/// Includes the trainee's enrollments with course details.
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<TraineeDetail>> {
    let trainee = ensure_trainee_exists(&state, id).await?;
    let enrollments = EnrollmentRepo::list_by_trainee(&state.pool, id).await?;
    Ok(Json(TraineeDetail {
        trainee,
        enrollments,
    }))
}

/// PUT /api/apprenants/{id}
///
/// Partial multipart update. Setting `status=active` reactivates a
/// soft-deleted trainee.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<Trainee>> {
    let form = FormData::from_multipart(multipart, PHOTO_FIELD).await?;
    let existing = ensure_trainee_exists(&state, id).await?;

    let mut errors = FieldErrors::new();
    let birth_date = check_fields(&mut errors, &form, false);
    let status = parse_enum::<TraineeStatus>(&mut errors, "status", form.text("status"));
    if let Some(file) = form.file() {
        errors.merge(PHOTO_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    let email = form.text("email").map(normalize_email);
    if let Some(email) = &email {
        ensure_email_free(&state, email, Some(id)).await?;
    }

    let photo = state.uploads.save_opt(PHOTO_FIELD, form.file()).await?;
    let input = UpdateTrainee {
        first_name: form.string("first_name"),
        last_name: form.string("last_name"),
        birth_date,
        email,
        phone: form.string("phone"),
        address: form.string("address"),
        education_level: form.string("education_level"),
        status: status.map(|s| s.as_str().to_string()),
        photo: photo.clone(),
    };

    let trainee = match TraineeRepo::update(&state.pool, id, &input).await {
        Ok(Some(trainee)) => trainee,
        Ok(None) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            return Err(AppError::not_found("Trainee", id));
        }
        Err(e) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            return Err(e.into());
        }
    };

    if photo.is_some() {
        state.uploads.remove_opt(existing.photo.as_deref()).await;
    }
    Ok(Json(trainee))
}

/// DELETE /api/apprenants/{id}
///
/// Soft delete: the trainee is marked `inactive` and kept, along with its
/// enrollment history. Returns the updated trainee.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Trainee>> {
    let trainee = TraineeRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Trainee", id))?;
    tracing::info!(trainee_id = id, "Trainee deactivated");
    Ok(Json(trainee))
}

/// POST /api/apprenants/{id}/inscrire
pub async fn enroll_in_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(input): ApiJson<EnrollRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentDetail>)> {
    ensure_trainee_exists(&state, id).await?;

    let mut errors = FieldErrors::new();
    errors.check("course_id", input.course_id.is_some(), "course_id is required");
    let payment = payment_or_default(&mut errors, input.payment_status.as_deref());
    errors.into_result()?;
    let Some(course_id) = input.course_id else {
        return Err(AppError::InternalError(
            "enroll request passed validation without a course".to_string(),
        ));
    };

    let enrollment = enroll(&state, id, course_id, payment).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET /api/apprenants/{id}/inscriptions
pub async fn list_enrollments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    ensure_trainee_exists(&state, id).await?;
    let enrollments = EnrollmentRepo::list_by_trainee(&state.pool, id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/apprenants/stats/summary
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<TraineeStats>> {
    let stats = TraineeRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}
