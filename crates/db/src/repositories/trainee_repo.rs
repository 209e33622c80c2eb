//! Repository for the `trainees` table.

use campus_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_LIMIT, MAX_LIMIT};
use campus_core::trainee::STATUS_INACTIVE;
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::Page;
use crate::models::stats::CountByKey;
use crate::models::trainee::{CreateTrainee, Trainee, TraineeQuery, TraineeStats, UpdateTrainee};
use crate::repositories::enrollment_repo::ACTIVE_STATUS_SQL;

/// Age in completed years, derived from `birth_date`.
const AGE_SQL: &str = "DATE_PART('year', AGE(CURRENT_DATE, birth_date))::INT4";

/// Column list shared across queries to avoid repetition.
fn columns() -> String {
    format!(
        "id, first_name, last_name, birth_date, {AGE_SQL} AS age, email, phone, address, \
         education_level, status, photo, created_at, updated_at"
    )
}

/// List predicate over `$1` search pattern and `$2` status.
const LIST_FILTER: &str = "($1::TEXT IS NULL \
         OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1 \
         OR CONCAT(first_name, ' ', last_name) ILIKE $1) \
     AND ($2::TEXT IS NULL OR status = $2)";

/// Provides CRUD operations for trainees.
pub struct TraineeRepo;

impl TraineeRepo {
    /// Insert a new trainee (status `active`), returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTrainee) -> Result<Trainee, sqlx::Error> {
        let query = format!(
            "INSERT INTO trainees
                (first_name, last_name, birth_date, email, phone, address, education_level, photo)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Trainee>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birth_date)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.education_level)
            .bind(&input.photo)
            .fetch_one(pool)
            .await
    }

    /// Find a trainee by ID, whatever its status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Trainee>, sqlx::Error> {
        let query = format!("SELECT {} FROM trainees WHERE id = $1", columns());
        sqlx::query_as::<_, Trainee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a trainee by email, case-insensitively.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Trainee>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM trainees WHERE LOWER(email) = LOWER($1)",
            columns()
        );
        sqlx::query_as::<_, Trainee>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Status of a trainee, or `None` if it does not exist.
    pub async fn find_status<'e, E>(executor: E, id: DbId) -> Result<Option<String>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT status FROM trainees WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List trainees alphabetically, filtered and paginated.
    pub async fn list(pool: &PgPool, params: &TraineeQuery) -> Result<Page<Trainee>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(like_pattern);

        let query = format!(
            "SELECT {} FROM trainees WHERE {LIST_FILTER}
             ORDER BY last_name, first_name, id
             LIMIT $3 OFFSET $4",
            columns()
        );
        let data = sqlx::query_as::<_, Trainee>(&query)
            .bind(&pattern)
            .bind(&params.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM trainees WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .bind(&params.status)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            data,
            total,
            limit,
            offset,
        })
    }

    /// Update a trainee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrainee,
    ) -> Result<Option<Trainee>, sqlx::Error> {
        let query = format!(
            "UPDATE trainees SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                birth_date = COALESCE($4, birth_date),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                address = COALESCE($7, address),
                education_level = COALESCE($8, education_level),
                status = COALESCE($9, status),
                photo = COALESCE($10, photo)
             WHERE id = $1
             RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Trainee>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.birth_date)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.education_level)
            .bind(&input.status)
            .bind(&input.photo)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a trainee by marking it inactive. The row and its
    /// enrollment history are kept. Returns `None` if the trainee does not
    /// exist.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Trainee>, sqlx::Error> {
        let query = format!(
            "UPDATE trainees SET status = $2 WHERE id = $1 RETURNING {}",
            columns()
        );
        sqlx::query_as::<_, Trainee>(&query)
            .bind(id)
            .bind(STATUS_INACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// Headcounts, average age and education-level breakdown.
    pub async fn stats(pool: &PgPool) -> Result<TraineeStats, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'active'),
                    COUNT(*) FILTER (WHERE status = 'inactive'),
                    AVG({AGE_SQL})::FLOAT8
             FROM trainees"
        );
        let (total, active, inactive, average_age): (i64, i64, i64, Option<f64>) =
            sqlx::query_as(&query).fetch_one(pool).await?;

        let enrolled_query = format!(
            "SELECT COUNT(DISTINCT trainee_id) FROM enrollments WHERE {ACTIVE_STATUS_SQL}"
        );
        let currently_enrolled: i64 = sqlx::query_scalar(&enrolled_query).fetch_one(pool).await?;

        let by_education_level = sqlx::query_as::<_, CountByKey>(
            "SELECT COALESCE(NULLIF(TRIM(education_level), ''), 'unspecified') AS key,
                    COUNT(*) AS count
             FROM trainees
             GROUP BY 1 ORDER BY count DESC, key",
        )
        .fetch_all(pool)
        .await?;

        Ok(TraineeStats {
            total,
            active,
            inactive,
            average_age,
            currently_enrolled,
            by_education_level,
        })
    }
}
