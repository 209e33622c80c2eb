//! Handlers for the `/formateurs` (trainers) resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::validation::{normalize_email, FieldErrors, MAX_NAME_LEN, MAX_TEXT_LEN};
use campus_db::models::page::Page;
use campus_db::models::trainer::{CreateTrainer, Trainer, TrainerQuery, UpdateTrainer};
use campus_db::repositories::TrainerRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiMultipart, ApiPath, ApiQuery};
use crate::form::FormData;
use crate::query::{non_blank, TrainerListParams};
use crate::state::AppState;

/// Multipart field carrying the trainer's photo.
const PHOTO_FIELD: &str = "photo";

/// Validate the text fields shared by create and update. Required fields are
/// only enforced when `require_all` is set.
fn check_fields(errors: &mut FieldErrors, form: &FormData, require_all: bool) {
    for field in ["first_name", "last_name", "specialty"] {
        let value = if require_all {
            errors.require(field, form.text(field))
        } else {
            form.text(field)
        };
        if let Some(v) = value {
            errors.max_len(field, v, MAX_NAME_LEN);
        }
    }

    let email = if require_all {
        errors.require("email", form.text("email"))
    } else {
        form.text("email")
    };
    if let Some(email) = email {
        errors.email("email", email);
    }

    let phone = if require_all {
        errors.require("phone", form.text("phone"))
    } else {
        form.text("phone")
    };
    if let Some(phone) = phone {
        errors.phone("phone", phone);
    }

    if let Some(bio) = form.text("bio") {
        errors.max_len("bio", bio, MAX_TEXT_LEN);
    }
}

/// GET /api/formateurs
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TrainerListParams>,
) -> AppResult<Json<Page<Trainer>>> {
    let query = TrainerQuery {
        search: non_blank(&params.search).map(str::to_string),
        limit: params.limit,
        offset: params.offset,
    };
    let page = TrainerRepo::list(&state.pool, &query).await?;
    Ok(Json(page))
}

/// POST /api/formateurs
///
/// Multipart form; the optional `photo` part is stored on disk.
pub async fn create(
    State(state): State<AppState>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<(StatusCode, Json<Trainer>)> {
    let form = FormData::from_multipart(multipart, PHOTO_FIELD).await?;

    let mut errors = FieldErrors::new();
    check_fields(&mut errors, &form, true);
    if let Some(file) = form.file() {
        errors.merge(PHOTO_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    let photo = state.uploads.save_opt(PHOTO_FIELD, form.file()).await?;
    let input = CreateTrainer {
        first_name: form.string("first_name").unwrap_or_default(),
        last_name: form.string("last_name").unwrap_or_default(),
        specialty: form.string("specialty").unwrap_or_default(),
        email: form.text("email").map(normalize_email).unwrap_or_default(),
        phone: form.string("phone").unwrap_or_default(),
        bio: form.string("bio"),
        photo: photo.clone(),
    };

    match TrainerRepo::create(&state.pool, &input).await {
        Ok(trainer) => {
            tracing::info!(trainer_id = trainer.id, "Trainer created");
            Ok((StatusCode::CREATED, Json(trainer)))
        }
        Err(e) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            Err(e.into())
        }
    }
}

/// GET /api/formateurs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<Trainer>> {
    let trainer = TrainerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Trainer", id))?;
    Ok(Json(trainer))
}

/// PUT /api/formateurs/{id}
///
/// Partial multipart update. A new `photo` replaces the stored one.
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<Json<Trainer>> {
    let form = FormData::from_multipart(multipart, PHOTO_FIELD).await?;

    let existing = TrainerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Trainer", id))?;

    let mut errors = FieldErrors::new();
    check_fields(&mut errors, &form, false);
    if let Some(file) = form.file() {
        errors.merge(PHOTO_FIELD, state.uploads.check(file).map(|_| ()));
    }
    errors.into_result()?;

    let photo = state.uploads.save_opt(PHOTO_FIELD, form.file()).await?;
    let input = UpdateTrainer {
        first_name: form.string("first_name"),
        last_name: form.string("last_name"),
        specialty: form.string("specialty"),
        email: form.text("email").map(normalize_email),
        phone: form.string("phone"),
        bio: form.string("bio"),
        photo: photo.clone(),
    };

    let trainer = match TrainerRepo::update(&state.pool, id, &input).await {
        Ok(Some(trainer)) => trainer,
        Ok(None) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            return Err(AppError::not_found("Trainer", id));
        }
        Err(e) => {
            state.uploads.remove_opt(photo.as_deref()).await;
            return Err(e.into());
        }
    };

    if photo.is_some() {
        state.uploads.remove_opt(existing.photo.as_deref()).await;
    }
    Ok(Json(trainer))
}

/// DELETE /api/formateurs/{id}
///
/// Refused with 409 while any course still references the trainer.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<StatusCode> {
    let courses = TrainerRepo::count_courses(&state.pool, id).await?;
    if courses > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Trainer is assigned to {courses} course(s)"
        ))));
    }

    let trainer = TrainerRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Trainer", id))?;
    state.uploads.remove_opt(trainer.photo.as_deref()).await;

    tracing::info!(trainer_id = id, "Trainer deleted");
    Ok(StatusCode::NO_CONTENT)
}
