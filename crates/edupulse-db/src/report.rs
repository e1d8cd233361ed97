//! Aggregate queries over the star schema for the reporting surface.

use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Per-collection aggregate over `fact_post`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CollectionAggRow {
    pub name: String,
    pub post_count: i64,
    /// `None` only when a collection has no facts, which the join excludes.
    pub avg_sentiment: Option<f64>,
    pub mention_count: i64,
}

/// Per-year aggregate over `fact_post`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct YearAggRow {
    pub year: i32,
    pub post_count: i64,
    pub avg_sentiment: Option<f64>,
    pub mention_count: i64,
}

/// Warehouse-wide totals with the three-way label breakdown.
///
/// Labels are derived in SQL with the same ±0.1 thresholds the transform
/// uses, since the label itself is not stored in the fact table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TotalsRow {
    pub post_count: i64,
    pub avg_sentiment: Option<f64>,
    pub mention_count: i64,
    pub positive_count: i64,
    pub negative_count: i64,
    pub neutral_count: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Post counts, mean sentiment, and mention counts per collection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn aggregate_by_collection(pool: &PgPool) -> Result<Vec<CollectionAggRow>, DbError> {
    let rows = sqlx::query_as::<_, CollectionAggRow>(
        "SELECT d.name, \
                COUNT(*) AS post_count, \
                AVG(f.sentiment)::float8 AS avg_sentiment, \
                COUNT(*) FILTER (WHERE f.dropout_mentioned) AS mention_count \
         FROM fact_post f \
         JOIN dim_collection d ON d.collection_id = f.collection_id \
         GROUP BY d.name \
         ORDER BY d.name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Post counts, mean sentiment, and mention counts per year bucket.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn aggregate_by_year(pool: &PgPool) -> Result<Vec<YearAggRow>, DbError> {
    let rows = sqlx::query_as::<_, YearAggRow>(
        "SELECT t.year, \
                COUNT(*) AS post_count, \
                AVG(f.sentiment)::float8 AS avg_sentiment, \
                COUNT(*) FILTER (WHERE f.dropout_mentioned) AS mention_count \
         FROM fact_post f \
         JOIN dim_time t ON t.time_id = f.time_id \
         GROUP BY t.year \
         ORDER BY t.year",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Warehouse-wide totals and label breakdown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn warehouse_totals(pool: &PgPool) -> Result<TotalsRow, DbError> {
    let row = sqlx::query_as::<_, TotalsRow>(
        "SELECT COUNT(*) AS post_count, \
                AVG(sentiment)::float8 AS avg_sentiment, \
                COUNT(*) FILTER (WHERE dropout_mentioned) AS mention_count, \
                COUNT(*) FILTER (WHERE sentiment > 0.1) AS positive_count, \
                COUNT(*) FILTER (WHERE sentiment < -0.1) AS negative_count, \
                COUNT(*) FILTER (WHERE sentiment >= -0.1 AND sentiment <= 0.1) AS neutral_count \
         FROM fact_post",
    )
    .fetch_one(pool)
    .await?;

    Ok(row)
}
