//! Repository for the `courses` table.

use campus_core::pagination::{clamp_limit, clamp_offset, like_pattern, DEFAULT_LIMIT, MAX_LIMIT};
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::course::{
    Course, CourseDetail, CourseQuery, CourseStats, CreateCourse, UpdateCourse,
};
use crate::models::page::Page;
use crate::models::stats::CountByKey;
use crate::repositories::enrollment_repo::ACTIVE_STATUS_SQL;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, duration_hours, start_date, end_date, \
     capacity, level, image, trainer_id, created_at, updated_at";

/// Provides CRUD operations for courses.
pub struct CourseRepo;

/// `SELECT ... FROM` prefix producing [`CourseDetail`] rows.
fn detail_select() -> String {
    format!(
        "SELECT c.id, c.title, c.description, c.category, c.duration_hours, \
                c.start_date, c.end_date, c.capacity, c.level, c.image, c.trainer_id, \
                c.created_at, c.updated_at, \
                CONCAT(t.first_name, ' ', t.last_name) AS trainer_name, \
                (SELECT COUNT(*) FROM enrollments e \
                  WHERE e.course_id = c.id AND e.{ACTIVE_STATUS_SQL}) AS active_enrollments \
         FROM courses c \
         JOIN trainers t ON t.id = c.trainer_id"
    )
}

/// List predicate over `$1` search pattern, `$2` category, `$3` level and
/// `$4` trainer; NULL disables a filter.
const LIST_FILTER: &str = "($1::TEXT IS NULL \
         OR c.title ILIKE $1 OR c.description ILIKE $1 OR c.category ILIKE $1) \
     AND ($2::TEXT IS NULL OR LOWER(c.category) = LOWER($2)) \
     AND ($3::TEXT IS NULL OR c.level = $3) \
     AND ($4::BIGINT IS NULL OR c.trainer_id = $4)";

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (title, description, category, duration_hours, start_date, end_date,
                 capacity, level, image, trainer_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.duration_hours)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.capacity)
            .bind(&input.level)
            .bind(&input.image)
            .bind(input.trainer_id)
            .fetch_one(pool)
            .await
    }

    /// Find a course row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a course with its trainer name and seat usage.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CourseDetail>, sqlx::Error> {
        let query = format!("{} WHERE c.id = $1", detail_select());
        sqlx::query_as::<_, CourseDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List courses by start date, filtered and paginated.
    pub async fn list(
        pool: &PgPool,
        params: &CourseQuery,
    ) -> Result<Page<CourseDetail>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);
        let pattern = params.search.as_deref().and_then(like_pattern);

        let query = format!(
            "{} WHERE {LIST_FILTER} ORDER BY c.start_date, c.title, c.id LIMIT $5 OFFSET $6",
            detail_select()
        );
        let data = sqlx::query_as::<_, CourseDetail>(&query)
            .bind(&pattern)
            .bind(&params.category)
            .bind(&params.level)
            .bind(params.trainer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM courses c WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&pattern)
            .bind(&params.category)
            .bind(&params.level)
            .bind(params.trainer_id)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            data,
            total,
            limit,
            offset,
        })
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                duration_hours = COALESCE($5, duration_hours),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                capacity = COALESCE($8, capacity),
                level = COALESCE($9, level),
                image = COALESCE($10, image),
                trainer_id = COALESCE($11, trainer_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.duration_hours)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.capacity)
            .bind(&input.level)
            .bind(&input.image)
            .bind(input.trainer_id)
            .fetch_optional(executor)
            .await
    }

    /// Lock a course row for the rest of the transaction and return its
    /// capacity. Concurrent enrollments into the same course serialize here.
    pub async fn lock_capacity<'e, E>(executor: E, id: DbId) -> Result<Option<i32>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT capacity FROM courses WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete a course, returning the removed row. Its
    /// enrollments are removed by `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("DELETE FROM courses WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Catalog-wide counts by category and level plus seat usage.
    pub async fn stats(pool: &PgPool) -> Result<CourseStats, sqlx::Error> {
        let (total, total_capacity): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(capacity), 0)::BIGINT FROM courses")
                .fetch_one(pool)
                .await?;

        let active_query = format!("SELECT COUNT(*) FROM enrollments WHERE {ACTIVE_STATUS_SQL}");
        let active_enrollments: i64 = sqlx::query_scalar(&active_query).fetch_one(pool).await?;

        let by_category = sqlx::query_as::<_, CountByKey>(
            "SELECT category AS key, COUNT(*) AS count FROM courses
             GROUP BY category ORDER BY count DESC, key",
        )
        .fetch_all(pool)
        .await?;

        let by_level = sqlx::query_as::<_, CountByKey>(
            "SELECT level AS key, COUNT(*) AS count FROM courses
             GROUP BY level ORDER BY count DESC, key",
        )
        .fetch_all(pool)
        .await?;

        let fill_rate = if total_capacity > 0 {
            active_enrollments as f64 / total_capacity as f64
        } else {
            0.0
        };

        Ok(CourseStats {
            total,
            total_capacity,
            active_enrollments,
            fill_rate,
            by_category,
            by_level,
        })
    }
}
