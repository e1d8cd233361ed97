//! Bulk insert into the `fact_post` table.

use sqlx::PgPool;

use crate::DbError;

/// One fact row ready for insertion, with dimension keys already resolved.
#[derive(Debug, Clone)]
pub struct NewFact {
    pub post_id: String,
    pub content: String,
    pub url: String,
    pub sentiment: f32,
    pub dropout_mentioned: bool,
    pub collection_id: i64,
    pub time_id: i64,
}

/// Insert a batch of facts, skipping any whose `post_id` already exists.
///
/// Returns the number of newly inserted rows (rows skipped as already-present
/// are the difference to `facts.len()`).
///
/// Uses a single `INSERT … SELECT * FROM UNNEST(…) ON CONFLICT DO NOTHING`
/// statement so the whole batch lands in one round-trip and is atomic: on
/// failure nothing from the batch was inserted. `DO NOTHING` also absorbs
/// duplicate ids within the batch itself.
///
/// # Errors
///
/// Returns [`DbError::LoadFailed`] if the statement fails.
pub async fn insert_facts(pool: &PgPool, facts: &[NewFact]) -> Result<u64, DbError> {
    if facts.is_empty() {
        return Ok(0);
    }

    // Collect each column into a parallel Vec for UNNEST binding.
    let mut post_ids: Vec<String> = Vec::with_capacity(facts.len());
    let mut contents: Vec<String> = Vec::with_capacity(facts.len());
    let mut urls: Vec<String> = Vec::with_capacity(facts.len());
    let mut sentiments: Vec<f32> = Vec::with_capacity(facts.len());
    let mut mentions: Vec<bool> = Vec::with_capacity(facts.len());
    let mut collection_ids: Vec<i64> = Vec::with_capacity(facts.len());
    let mut time_ids: Vec<i64> = Vec::with_capacity(facts.len());

    for fact in facts {
        post_ids.push(fact.post_id.clone());
        contents.push(fact.content.clone());
        urls.push(fact.url.clone());
        sentiments.push(fact.sentiment);
        mentions.push(fact.dropout_mentioned);
        collection_ids.push(fact.collection_id);
        time_ids.push(fact.time_id);
    }

    let inserted = sqlx::query(
        "INSERT INTO fact_post \
             (post_id, content, url, sentiment, dropout_mentioned, collection_id, time_id) \
         SELECT * FROM UNNEST(\
             $1::text[], $2::text[], $3::text[], $4::real[], $5::bool[], \
             $6::bigint[], $7::bigint[]) \
         ON CONFLICT (post_id) DO NOTHING",
    )
    .bind(&post_ids)
    .bind(&contents)
    .bind(&urls)
    .bind(&sentiments)
    .bind(&mentions)
    .bind(&collection_ids)
    .bind(&time_ids)
    .execute(pool)
    .await
    .map_err(|e| DbError::LoadFailed { source: e })?
    .rows_affected();

    Ok(inserted)
}
