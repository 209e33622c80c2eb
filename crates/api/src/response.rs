//! Shared response envelope types for API handlers.
//!
//! Non-paginated collections use a `{ "data": ... }` envelope; paginated
//! lists return `campus_db::models::page::Page` which adds `total`, `limit`
//! and `offset` alongside `data`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
