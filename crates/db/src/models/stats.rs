use serde::Serialize;
use sqlx::FromRow;

/// A `GROUP BY` bucket: the grouped value and its row count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CountByKey {
    pub key: String,
    pub count: i64,
}
