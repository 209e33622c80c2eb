//! Repository for the `trainers` table.

use campus_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_LIMIT, MAX_LIMIT};
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::trainer::{CreateTrainer, Trainer, TrainerQuery, UpdateTrainer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, first_name, last_name, specialty, email, phone, bio, photo, created_at, updated_at";

/// Search predicate; `$1` is an ILIKE pattern or NULL for no filter.
const SEARCH_FILTER: &str = "($1::TEXT IS NULL \
     OR first_name ILIKE $1 OR last_name ILIKE $1 \
     OR specialty ILIKE $1 OR email ILIKE $1)";

/// Provides CRUD operations for trainers.
pub struct TrainerRepo;

impl TrainerRepo {
    /// Insert a new trainer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTrainer) -> Result<Trainer, sqlx::Error> {
        let query = format!(
            "INSERT INTO trainers (first_name, last_name, specialty, email, phone, bio, photo)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.specialty)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.photo)
            .fetch_one(pool)
            .await
    }

    /// Find a trainer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trainers WHERE id = $1");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List trainers alphabetically, filtered and paginated.
    pub async fn list(pool: &PgPool, params: &TrainerQuery) -> Result<Page<Trainer>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(like_pattern);

        let query = format!(
            "SELECT {COLUMNS} FROM trainers WHERE {SEARCH_FILTER}
             ORDER BY last_name, first_name, id
             LIMIT $2 OFFSET $3"
        );
        let data = sqlx::query_as::<_, Trainer>(&query)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM trainers WHERE {SEARCH_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            data,
            total,
            limit,
            offset,
        })
    }

    /// Update a trainer. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainer,
    ) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!(
            "UPDATE trainers SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                specialty = COALESCE($4, specialty),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                bio = COALESCE($7, bio),
                photo = COALESCE($8, photo)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.specialty)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.photo)
            .fetch_optional(pool)
            .await
    }

    /// Number of courses taught by a trainer.
    pub async fn count_courses(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE trainer_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a trainer, returning the removed row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Trainer>, sqlx::Error> {
        let query = format!("DELETE FROM trainers WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Trainer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
