//! Trainee entity model and DTOs.

use campus_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::enrollment::EnrollmentDetail;
use crate::models::stats::CountByKey;

/// A row from the `trainees` table. `age` is derived from `birth_date` at
/// query time and never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trainee {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    pub age: i32,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education_level: Option<String>,
    /// `active` or `inactive`.
    pub status: String,
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A trainee together with its embedded enrollment records.
#[derive(Debug, Clone, Serialize)]
pub struct TraineeDetail {
    #[serde(flatten)]
    pub trainee: Trainee,
    pub enrollments: Vec<EnrollmentDetail>,
}

/// DTO for creating a trainee. Emails are expected pre-normalized.
#[derive(Debug, Clone)]
pub struct CreateTrainee {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Date,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education_level: Option<String>,
    pub photo: Option<String>,
}

/// DTO for updating a trainee. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateTrainee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<Date>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education_level: Option<String>,
    pub status: Option<String>,
    pub photo: Option<String>,
}

/// Filters for the trainee list.
#[derive(Debug, Clone, Default)]
pub struct TraineeQuery {
    /// Substring matched against names and email.
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate figures for `/apprenants/stats/summary`.
#[derive(Debug, Clone, Serialize)]
pub struct TraineeStats {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub average_age: Option<f64>,
    /// Trainees holding at least one active enrollment.
    pub currently_enrolled: i64,
    pub by_education_level: Vec<CountByKey>,
}
