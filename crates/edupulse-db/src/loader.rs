//! Dimensional load of one enriched batch.

use std::collections::HashMap;

use edupulse_analysis::EnrichedPost;
use sqlx::PgPool;

use crate::dims::{resolve_collection, resolve_year};
use crate::facts::{insert_facts, NewFact};
use crate::DbError;

/// Counts reported after a successful load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSummary {
    /// Fact rows newly inserted by this load.
    pub facts_inserted: u64,
    /// Fact rows skipped because the post id was already present.
    pub facts_skipped: u64,
    /// Distinct collection dimensions touched.
    pub collections: usize,
    /// Distinct year dimensions touched.
    pub years: usize,
}

/// Resolve dimensions for the batch, then bulk-insert the facts.
///
/// The name/year → surrogate key maps built here are a per-run cache only;
/// the warehouse tables stay authoritative, and the maps are rebuilt from the
/// get-or-create protocol on every run. Each resolution is its own committed
/// statement, so every surrogate key is durably assigned before the fact
/// insert begins. Dimension rows created before a fact-load failure are left
/// in place; they are idempotent to re-derive on the next run.
///
/// An empty batch is a no-op returning zero counts.
///
/// # Errors
///
/// - [`DbError::DimensionResolution`] — a dimension upsert failed; fatal.
/// - [`DbError::LoadFailed`] — the bulk fact insert failed; fatal, with zero
///   facts from this batch inserted.
pub async fn load_batch(pool: &PgPool, posts: &[EnrichedPost]) -> Result<LoadSummary, DbError> {
    if posts.is_empty() {
        return Ok(LoadSummary::default());
    }

    let mut collection_keys: HashMap<String, i64> = HashMap::new();
    let mut year_keys: HashMap<i32, i64> = HashMap::new();
    let mut facts: Vec<NewFact> = Vec::with_capacity(posts.len());

    for post in posts {
        let collection_id = match collection_keys.get(&post.collection) {
            Some(id) => *id,
            None => {
                let id = resolve_collection(pool, &post.collection).await?;
                collection_keys.insert(post.collection.clone(), id);
                id
            }
        };

        let time_id = match year_keys.get(&post.year) {
            Some(id) => *id,
            None => {
                let id = resolve_year(pool, post.year).await?;
                year_keys.insert(post.year, id);
                id
            }
        };

        facts.push(NewFact {
            post_id: post.id.clone(),
            content: post.content.clone(),
            url: post.url.clone(),
            sentiment: post.sentiment,
            dropout_mentioned: post.dropout_mentioned,
            collection_id,
            time_id,
        });
    }

    let facts_inserted = insert_facts(pool, &facts).await?;
    let facts_skipped = facts.len() as u64 - facts_inserted;

    tracing::info!(
        facts_inserted,
        facts_skipped,
        collections = collection_keys.len(),
        years = year_keys.len(),
        "batch loaded"
    );

    Ok(LoadSummary {
        facts_inserted,
        facts_skipped,
        collections: collection_keys.len(),
        years: year_keys.len(),
    })
}
