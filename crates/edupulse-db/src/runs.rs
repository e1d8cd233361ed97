//! Database operations for the `etl_runs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `etl_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EtlRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub posts_collected: i32,
    pub facts_inserted: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates a new ETL run in `queued` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_etl_run(pool: &PgPool) -> Result<EtlRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, EtlRunRow>(
        "INSERT INTO etl_runs (public_id, status) \
         VALUES ($1, 'queued') \
         RETURNING id, public_id, status, started_at, completed_at, \
                   posts_collected, facts_inserted, error_message, created_at",
    )
    .bind(public_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `queued`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn start_etl_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE etl_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded`, sets `completed_at = NOW()` and the final counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_etl_run(
    pool: &PgPool,
    id: i64,
    posts_collected: i32,
    facts_inserted: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE etl_runs \
         SET status = 'succeeded', completed_at = NOW(), \
             posts_collected = $1, facts_inserted = $2 \
         WHERE id = $3 AND status = 'running'",
    )
    .bind(posts_collected)
    .bind(facts_inserted)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed`, sets `completed_at = NOW()` and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_etl_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE etl_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_etl_run(pool: &PgPool, id: i64) -> Result<EtlRunRow, DbError> {
    let row = sqlx::query_as::<_, EtlRunRow>(
        "SELECT id, public_id, status, started_at, completed_at, \
                posts_collected, facts_inserted, error_message, created_at \
         FROM etl_runs \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_etl_runs(pool: &PgPool, limit: i64) -> Result<Vec<EtlRunRow>, DbError> {
    let rows = sqlx::query_as::<_, EtlRunRow>(
        "SELECT id, public_id, status, started_at, completed_at, \
                posts_collected, facts_inserted, error_message, created_at \
         FROM etl_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
