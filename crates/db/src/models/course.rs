//! Course entity model and DTOs.

use campus_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::stats::CountByKey;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_hours: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub capacity: i32,
    /// One of `campus_core::course::VALID_LEVELS`.
    pub level: String,
    pub image: Option<String>,
    pub trainer_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course with its trainer's display name and current seat usage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CourseDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
    pub trainer_name: String,
    pub active_enrollments: i64,
}

/// DTO for creating a course.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_hours: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub capacity: i32,
    pub level: String,
    pub image: Option<String>,
    pub trainer_id: DbId,
}

/// DTO for updating a course. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub duration_hours: Option<i32>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub capacity: Option<i32>,
    pub level: Option<String>,
    pub image: Option<String>,
    pub trainer_id: Option<DbId>,
}

/// Filters for the course list.
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    /// Substring matched against title, description and category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub trainer_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate figures for `/formations/stats/summary`.
#[derive(Debug, Clone, Serialize)]
pub struct CourseStats {
    pub total: i64,
    pub total_capacity: i64,
    pub active_enrollments: i64,
    /// Share of all seats currently taken, 0.0 - 1.0.
    pub fill_rate: f64,
    pub by_category: Vec<CountByKey>,
    pub by_level: Vec<CountByKey>,
}
