//! Deduplicating collector over the (collection, term) query matrix.

use std::collections::HashSet;
use std::time::Duration;

use edupulse_core::{AppConfig, TopicsFile};

use crate::client::RedditClient;
use crate::error::RedditError;
use crate::types::RawPost;

/// Pacing and sizing knobs for one collection pass.
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Per-(collection, term) ceiling on fetched posts.
    pub posts_per_query: usize,
    pub page_size: u32,
    /// Mandatory pause after every successful query pair.
    pub inter_query_delay_ms: u64,
    /// Pause after a failed query pair before moving to the next one.
    pub error_cooldown_secs: u64,
    /// Hard cap on the in-memory batch; collection stops once reached.
    pub max_batch_size: usize,
}

impl CollectorOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            posts_per_query: config.posts_per_query,
            page_size: config.page_size,
            inter_query_delay_ms: config.inter_query_delay_ms,
            error_cooldown_secs: config.error_cooldown_secs,
            max_batch_size: config.max_batch_size,
        }
    }
}

/// The deduplicated output of one collection pass, plus observability counts.
///
/// An empty `posts` vec is a valid, non-error outcome.
#[derive(Debug, Default)]
pub struct CollectedBatch {
    pub posts: Vec<RawPost>,
    pub queries_run: usize,
    pub queries_failed: usize,
    pub duplicates_skipped: usize,
}

/// Enumerate the full collections × terms matrix and merge results into one
/// deduplicated batch.
///
/// Queries run strictly sequentially to respect upstream rate limits. The
/// seen-identifier set lives only for this call; cross-run duplicates are
/// handled by the idempotent fact load. A failed pair is logged and followed
/// by a cool-down pause, then collection continues with the next pair — no
/// per-query error aborts the pass, so this function does not return `Err`.
pub async fn collect_posts(
    client: &RedditClient,
    topics: &TopicsFile,
    options: &CollectorOptions,
) -> CollectedBatch {
    let mut seen: HashSet<String> = HashSet::new();
    let mut batch = CollectedBatch::default();

    'matrix: for collection in &topics.collections {
        for term in &topics.terms {
            if batch.posts.len() >= options.max_batch_size {
                tracing::info!(
                    max_batch_size = options.max_batch_size,
                    "batch cap reached — stopping collection early"
                );
                break 'matrix;
            }

            match client
                .search_new(collection, term, options.page_size, options.posts_per_query)
                .await
            {
                Ok(posts) => {
                    batch.queries_run += 1;
                    let fetched = posts.len();
                    for post in posts {
                        if seen.insert(post.id.clone()) {
                            if batch.posts.len() < options.max_batch_size {
                                batch.posts.push(post);
                            }
                        } else {
                            batch.duplicates_skipped += 1;
                        }
                    }
                    tracing::debug!(
                        collection = collection.as_str(),
                        term = term.as_str(),
                        fetched,
                        batch_size = batch.posts.len(),
                        "query pair collected"
                    );
                    sleep_ms(options.inter_query_delay_ms).await;
                }
                Err(RedditError::RateLimited { retry_after_secs }) => {
                    batch.queries_failed += 1;
                    let cooldown_secs = retry_after_secs.max(options.error_cooldown_secs);
                    tracing::warn!(
                        collection = collection.as_str(),
                        term = term.as_str(),
                        retry_after_secs,
                        cooldown_secs,
                        "rate limited — cooling down before next query"
                    );
                    sleep_ms(cooldown_secs.saturating_mul(1000)).await;
                }
                Err(err) => {
                    batch.queries_failed += 1;
                    tracing::warn!(
                        collection = collection.as_str(),
                        term = term.as_str(),
                        error = %err,
                        "query pair failed — cooling down before next query"
                    );
                    sleep_ms(options.error_cooldown_secs.saturating_mul(1000)).await;
                }
            }
        }
    }

    tracing::info!(
        posts = batch.posts.len(),
        queries_run = batch.queries_run,
        queries_failed = batch.queries_failed,
        duplicates_skipped = batch.duplicates_skipped,
        "collection pass complete"
    );

    batch
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
