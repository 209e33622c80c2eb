//! Trainer entity model and DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `trainers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trainer {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub email: String,
    pub phone: String,
    pub bio: Option<String>,
    /// Stored file name under the upload directory.
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a trainer.
#[derive(Debug, Clone)]
pub struct CreateTrainer {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub email: String,
    pub phone: String,
    pub bio: Option<String>,
    pub photo: Option<String>,
}

/// DTO for updating a trainer. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateTrainer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<String>,
}

/// Filters for the trainer list.
#[derive(Debug, Clone, Default)]
pub struct TrainerQuery {
    /// Substring matched against names, specialty and email.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
