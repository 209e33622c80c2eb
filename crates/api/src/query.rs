//! Query parameter types for the list endpoints.
//!
//! Values are deserialized leniently (everything optional) and turned into
//! repository filters by the handlers, which validate enum-valued filters.
//! Limits and offsets are clamped in the repository layer via
//! `clamp_limit` / `clamp_offset`.

use campus_core::types::DbId;
use serde::Deserialize;

/// `?search=&limit=&offset=` for `/formateurs`.
#[derive(Debug, Default, Deserialize)]
pub struct TrainerListParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?search=&category=&level=&trainer_id=&limit=&offset=` for `/formations`.
#[derive(Debug, Default, Deserialize)]
pub struct CourseListParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub trainer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?search=&status=&limit=&offset=` for `/apprenants`.
#[derive(Debug, Default, Deserialize)]
pub struct TraineeListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?status=&payment_status=&course_id=&trainee_id=&limit=&offset=` for
/// `/inscriptions`.
#[derive(Debug, Default, Deserialize)]
pub struct EnrollmentListParams {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub course_id: Option<DbId>,
    pub trainee_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Blank query values (`?status=`) mean "no filter".
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
