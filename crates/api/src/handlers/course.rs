//! Handlers for the `/formations` (courses) resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::course::{
    validate_capacity, validate_capacity_change, validate_duration, validate_schedule,
    CourseLevel,
};
use campus_core::types::{Date, DbId};
use campus_core::validation::{FieldErrors, MAX_NAME_LEN, MAX_TEXT_LEN};
use campus_db::models::course::{
    Course, CourseDetail, CourseQuery, CourseStats, CreateCourse, UpdateCourse,
};
use campus_db::models::enrollment::EnrollmentDetail;
use campus_db::models::page::Page;
use campus_db::repositories::{CourseRepo, EnrollmentRepo, TrainerRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiMultipart, ApiPath, ApiQuery};
use crate::form::{parse_date, parse_enum, parse_number, FormData};
use crate::query::{non_blank, CourseListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the course illustration.
const IMAGE_FIELD: &str = "image";

/// Typed values parsed out of a course form. Absent fields stay `None`.
#[derive(Debug, Default)]
struct CourseFields {
    duration_hours: Option<i32>,
    start_date: Option<Date>,
    end_date: Option<Date>,
    capacity: Option<i32>,
    level: Option<CourseLevel>,
    trainer_id: Option<DbId>,
}

/// Parse and validate a course form. With `require_all` every mandatory
/// field must be present (create); otherwise only supplied fields are
/// checked (update).
fn parse_fields(errors: &mut FieldErrors, form: &FormData, require_all: bool) -> CourseFields {
    let pick = |errors: &mut FieldErrors, field: &str| {
        if require_all {
            errors.require(field, form.text(field))
        } else {
            form.text(field)
        }
    };

    for field in ["title", "category"] {
        if let Some(v) = pick(errors, field) {
            errors.max_len(field, v, MAX_NAME_LEN);
        }
    }
    if let Some(v) = pick(errors, "description") {
        errors.max_len("description", v, MAX_TEXT_LEN);
    }

    let raw = pick(errors, "duration_hours");
    let duration_hours = parse_number::<i32>(errors, "duration_hours", raw);
    if let Some(hours) = duration_hours {
        errors.merge("duration_hours", validate_duration(hours));
    }

    let raw = pick(errors, "start_date");
    let start_date = parse_date(errors, "start_date", raw);
    let raw = pick(errors, "end_date");
    let end_date = parse_date(errors, "end_date", raw);

    let raw = pick(errors, "capacity");
    let capacity = parse_number::<i32>(errors, "capacity", raw);
    if let Some(capacity) = capacity {
        errors.merge("capacity", validate_capacity(capacity));
    }

    let raw = pick(errors, "level");
    let level = parse_enum::<CourseLevel>(errors, "level", raw);

    let raw = pick(errors, "trainer_id");
    let trainer_id = parse_number::<DbId>(errors, "trainer_id", raw);

    CourseFields {
        duration_hours,
        start_date,
        end_date,
        capacity,
        level,
        trainer_id,
    }
}

/// Record an error unless the referenced trainer exists.
async fn check_trainer(
    state: &AppState,
    errors: &mut FieldErrors,
    trainer_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(trainer_id) = trainer_id {
        if TrainerRepo::find_by_id(&state.pool, trainer_id).await?.is_none() {
            errors.add("trainer_id", format!("Trainer {trainer_id} does not exist"));
        }
    }
    Ok(())
}

/// GET /api/formations
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CourseListParams>,
) -> AppResult<Json<Page<CourseDetail>>> {
    let level = non_blank(&params.level)
        .map(|l| l.parse::<CourseLevel>())
        .transpose()?;
    let query = CourseQuery {
        search: non_blank(&params.search).map(str::to_string),
        category: non_blank(&params.category).map(str::to_string),
        level: level.map(|l| l.as_str().to_string()),
        trainer_id: params.trainer_id,
        limit: params.limit,
        offset: params.offset,
    };
    let page = CourseRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}

/// POST /api/formations
///
/// Multipart form; the optional `image` part is stored on disk.
pub async fn create(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<Course>)> {
    let form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;

    let mut errors = FieldErrors::new();
    let fields = parse_fields(&mut errors, &form, true);
    if let (Some(start), Some(end)) = (fields.start_date, fields.end_date) {
        errors.merge("end_date", validate_schedule(start, end));
    }
    check_trainer(&state, &mut errors, fields.trainer_id).await?;
    if let Some(file) = form.file() {
        errors.merge(IMAGE_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    // Every required field was checked above.
    let (
        Some(duration_hours),
        Some(start_date),
        Some(end_date),
        Some(capacity),
        Some(level),
        Some(trainer_id),
    ) = (
        fields.duration_hours,
        fields.start_date,
        fields.end_date,
        fields.capacity,
        fields.level,
        fields.trainer_id,
    )
    else {
        return Err(AppError::InternalError(
            "course form passed validation with missing fields".to_string(),
        ));
    };

    let image = state.uploads.save_opt(IMAGE_FIELD, form.file()).await?;
    let input = CreateCourse {
        title: form.string("title").unwrap_or_default(),
        description: form.string("description").unwrap_or_default(),
        category: form.string("category").unwrap_or_default(),
        duration_hours,
        start_date,
        end_date,
        capacity,
        level: level.as_str().to_string(),
        image: image.clone(),
        trainer_id,
    };

    match CourseRepo::create(&state.pool, &input).await {
        Ok(course) => {
            tracing::info!(course_id = course.id, trainer_id, "Course created");
            Ok((StatusCode::CREATED, Json(course)))
        }
        Err(e) => {
            state.uploads.remove_opt(image.as_deref()).await;
            Err(e.into())
        }
    }
}

/// GET /api/formations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<CourseDetail>> {
    let course = CourseRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Course", id))?;
    Ok(Json(course))
}

/// PUT /api/formations/{id}
///
/// Partial multipart update. The schedule is re-validated against the
/// stored dates, and capacity may not drop below the seats already taken.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<Course>> {
    let form = FormData::from_multipart(multipart, IMAGE_FIELD).await?;

    let existing = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Course", id))?;

    let mut errors = FieldErrors::new();
    let fields = parse_fields(&mut errors, &form, false);
    if fields.start_date.is_some() || fields.end_date.is_some() {
        let start = fields.start_date.unwrap_or(existing.start_date);
        let end = fields.end_date.unwrap_or(existing.end_date);
        errors.merge("end_date", validate_schedule(start, end));
    }
    check_trainer(&state, &mut errors, fields.trainer_id).await?;
    if let Some(file) = form.file() {
        errors.merge(IMAGE_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    let image = state.uploads.save_opt(IMAGE_FIELD, form.file()).await?;
    let input = UpdateCourse {
        title: form.string("title"),
        description: form.string("description"),
        category: form.string("category"),
        duration_hours: fields.duration_hours,
        start_date: fields.start_date,
        end_date: fields.end_date,
        capacity: fields.capacity,
        level: fields.level.map(|l| l.as_str().to_string()),
        image: image.clone(),
        trainer_id: fields.trainer_id,
    };

    let course = match apply_update(&state, id, &input).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            state.uploads.remove_opt(image.as_deref()).await;
            return Err(AppError::not_found("Course", id));
        }
        Err(e) => {
            state.uploads.remove_opt(image.as_deref()).await;
            return Err(e);
        }
    };

    if image.is_some() {
        state.uploads.remove_opt(existing.image.as_deref()).await;
    }
    Ok(Json(course))
}

/// Write a course update in one transaction. When capacity changes the
/// course row is locked first, the same lock enrollments take, so no seat
/// can be taken between counting active enrollments and lowering capacity.
async fn apply_update(
    state: &AppState,
    id: DbId,
    input: &UpdateCourse,
) -> AppResult<Option<Course>> {
    let mut tx = state.pool.begin().await?;

    if let Some(capacity) = input.capacity {
        let Some(current) = CourseRepo::lock_capacity(&mut *tx, id).await? else {
            return Ok(None);
        };
        if capacity < current {
            let active = EnrollmentRepo::count_active_for_course(&mut *tx, id).await?;
            validate_capacity_change(capacity, active)?;
        }
    }

    let course = CourseRepo::update(&mut *tx, id, input).await?;
    tx.commit().await?;
    Ok(course)
}

/// DELETE /api/formations/{id}
///
/// Enrollments in the course are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    let course = CourseRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Course", id))?;
    state.uploads.remove_opt(course.image.as_deref()).await;

    tracing::info!(course_id = id, "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/formations/{id}/inscriptions
pub async fn list_enrollments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<DataResponse<Vec<EnrollmentDetail>>>> {
    ensure_course_exists(&state, id).await?;
    let enrollments = EnrollmentRepo::list_by_course(&state.pool, id).await?;
    Ok(Json(DataResponse { data: enrollments }))
}

/// GET /api/formations/stats/summary
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<CourseStats>> {
    let stats = CourseRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}

/// 404 unless the course exists.
pub(crate) async fn ensure_course_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CourseRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::not_found("Course", id))
}
