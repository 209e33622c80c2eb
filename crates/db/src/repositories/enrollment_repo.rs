//! Repository for the `enrollments` table.

use campus_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use campus_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{
    Enrollment, EnrollmentDetail, EnrollmentQuery, EnrollmentStats, UpdateEnrollment,
};
use crate::models::page::Page;
use crate::models::stats::CountByKey;

/// Predicate selecting seat-holding enrollments. Must stay in sync with
/// `campus_core::enrollment::ACTIVE_STATUSES`.
pub(crate) const ACTIVE_STATUS_SQL: &str = "status IN ('enrolled', 'in_progress')";

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, trainee_id, course_id, enrolled_at, status, payment_status, created_at, updated_at";

/// `SELECT ... FROM` prefix producing [`EnrollmentDetail`] rows.
const DETAIL_SELECT: &str = "SELECT e.id, e.trainee_id, e.course_id, e.enrolled_at, e.status, \
            e.payment_status, e.created_at, e.updated_at, \
            CONCAT(a.first_name, ' ', a.last_name) AS trainee_name, \
            a.email AS trainee_email, \
            c.title AS course_title, \
            c.start_date AS course_start_date, \
            c.end_date AS course_end_date \
     FROM enrollments e \
     JOIN trainees a ON a.id = e.trainee_id \
     JOIN courses c ON c.id = e.course_id";

/// List predicate over `$1` status, `$2` payment status, `$3` course and
/// `$4` trainee; NULL disables a filter.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR e.status = $1) \
     AND ($2::TEXT IS NULL OR e.payment_status = $2) \
     AND ($3::BIGINT IS NULL OR e.course_id = $3) \
     AND ($4::BIGINT IS NULL OR e.trainee_id = $4)";

/// Provides CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Insert a new enrollment with status `enrolled`.
    ///
    /// Callers are expected to have checked duplicates and capacity inside
    /// the same transaction; the partial unique index
    /// `uq_enrollments_trainee_course` rejects a second live enrollment
    /// regardless.
    pub async fn insert<'e, E>(
        executor: E,
        trainee_id: DbId,
        course_id: DbId,
        payment_status: &str,
    ) -> Result<Enrollment, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO enrollments (trainee_id, course_id, payment_status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(trainee_id)
            .bind(course_id)
            .bind(payment_status)
            .fetch_one(executor)
            .await
    }

    /// Find an enrollment row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find and row-lock an enrollment for the rest of the transaction.
    pub async fn find_for_update<'e, E>(
        executor: E,
        id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an enrollment with its trainee and course display fields.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<EnrollmentDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE e.id = $1");
        sqlx::query_as::<_, EnrollmentDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The non-cancelled enrollment of a trainee in a course, if any.
    pub async fn find_live<'e, E>(
        executor: E,
        trainee_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments
             WHERE trainee_id = $1 AND course_id = $2 AND status <> 'cancelled'"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(trainee_id)
            .bind(course_id)
            .fetch_optional(executor)
            .await
    }

    /// Number of seat-holding enrollments in a course.
    pub async fn count_active_for_course<'e, E>(
        executor: E,
        course_id: DbId,
    ) -> Result<i64, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query =
            format!("SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND {ACTIVE_STATUS_SQL}");
        sqlx::query_scalar(&query)
            .bind(course_id)
            .fetch_one(executor)
            .await
    }

    /// List enrollments, newest first, filtered and paginated.
    pub async fn list(
        pool: &PgPool,
        params: &EnrollmentQuery,
    ) -> Result<Page<EnrollmentDetail>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(params.offset);

        let query = format!(
            "{DETAIL_SELECT} WHERE {LIST_FILTER}
             ORDER BY e.enrolled_at DESC, e.id DESC
             LIMIT $5 OFFSET $6"
        );
        let data = sqlx::query_as::<_, EnrollmentDetail>(&query)
            .bind(&params.status)
            .bind(&params.payment_status)
            .bind(params.course_id)
            .bind(params.trainee_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM enrollments e WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&params.status)
            .bind(&params.payment_status)
            .bind(params.course_id)
            .bind(params.trainee_id)
            .fetch_one(pool)
            .await?;

        Ok(Page {
            data,
            total,
            limit,
            offset,
        })
    }

    /// All enrollments of a course, trainees in alphabetical order.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<EnrollmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE e.course_id = $1
             ORDER BY a.last_name, a.first_name, e.id"
        );
        sqlx::query_as::<_, EnrollmentDetail>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// All enrollments of a trainee, by course start date.
    pub async fn list_by_trainee(
        pool: &PgPool,
        trainee_id: DbId,
    ) -> Result<Vec<EnrollmentDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE e.trainee_id = $1
             ORDER BY c.start_date, e.id"
        );
        sqlx::query_as::<_, EnrollmentDetail>(&query)
            .bind(trainee_id)
            .fetch_all(pool)
            .await
    }

    /// Update status and/or payment status. Only non-`None` fields apply.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdateEnrollment,
    ) -> Result<Option<Enrollment>, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE enrollments SET
                status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.payment_status)
            .fetch_optional(executor)
            .await
    }

    /// Permanently delete an enrollment. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Counts by lifecycle status and by payment status.
    pub async fn stats(pool: &PgPool) -> Result<EnrollmentStats, sqlx::Error> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments")
            .fetch_one(pool)
            .await?;

        let by_status = sqlx::query_as::<_, CountByKey>(
            "SELECT status AS key, COUNT(*) AS count FROM enrollments
             GROUP BY status ORDER BY count DESC, key",
        )
        .fetch_all(pool)
        .await?;

        let by_payment_status = sqlx::query_as::<_, CountByKey>(
            "SELECT payment_status AS key, COUNT(*) AS count FROM enrollments
             GROUP BY payment_status ORDER BY count DESC, key",
        )
        .fetch_all(pool)
        .await?;

        Ok(EnrollmentStats {
            total,
            by_status,
            by_payment_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use campus_core::enrollment::ACTIVE_STATUSES;

    use super::ACTIVE_STATUS_SQL;

    #[test]
    fn active_status_sql_lists_every_active_status() {
        let quoted: Vec<String> = ACTIVE_STATUSES.iter().map(|s| format!("'{s}'")).collect();
        assert_eq!(
            ACTIVE_STATUS_SQL,
            format!("status IN ({})", quoted.join(", "))
        );
    }
}
