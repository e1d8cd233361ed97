//! Get-or-create surrogate key resolution for the dimension tables.
//!
//! Both resolvers use a single atomic `INSERT … ON CONFLICT DO UPDATE …
//! RETURNING` statement: the no-op update on conflict makes `RETURNING` yield
//! the existing row's key, so one round-trip covers both the first sighting
//! and every later one. Safe under concurrent runs touching the same natural
//! key. Dimension rows are never updated or deleted after creation.

use sqlx::PgPool;

use crate::DbError;

/// Resolve the surrogate key for a collection name, creating the dimension
/// row on first sighting.
///
/// # Errors
///
/// Returns [`DbError::DimensionResolution`] naming the failing key.
pub async fn resolve_collection(pool: &PgPool, name: &str) -> Result<i64, DbError> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO dim_collection (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING collection_id",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| DbError::DimensionResolution {
        key: name.to_string(),
        source: e,
    })
}

/// Resolve the surrogate key for a year bucket, creating the dimension row
/// on first sighting.
///
/// # Errors
///
/// Returns [`DbError::DimensionResolution`] naming the failing key.
pub async fn resolve_year(pool: &PgPool, year: i32) -> Result<i64, DbError> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO dim_time (year) VALUES ($1) \
         ON CONFLICT (year) DO UPDATE SET year = EXCLUDED.year \
         RETURNING time_id",
    )
    .bind(year)
    .fetch_one(pool)
    .await
    .map_err(|e| DbError::DimensionResolution {
        key: year.to_string(),
        source: e,
    })
}
