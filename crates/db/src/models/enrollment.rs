//! Enrollment entity model and DTOs.

use campus_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::stats::CountByKey;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub trainee_id: DbId,
    pub course_id: DbId,
    pub enrolled_at: Timestamp,
    pub status: String,
    pub payment_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An enrollment with the display fields of its trainee and course.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EnrollmentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub enrollment: Enrollment,
    pub trainee_name: String,
    pub trainee_email: String,
    pub course_title: String,
    pub course_start_date: Date,
    pub course_end_date: Date,
}

/// DTO for updating an enrollment's lifecycle fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateEnrollment {
    pub status: Option<String>,
    pub payment_status: Option<String>,
}

/// Filters for the enrollment list.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentQuery {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub course_id: Option<DbId>,
    pub trainee_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate figures for `/inscriptions/stats/summary`.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentStats {
    pub total: i64,
    pub by_status: Vec<CountByKey>,
    pub by_payment_status: Vec<CountByKey>,
}
