//! The `run` command: extract → deduplicate → transform → load.
//!
//! One bounded batch per invocation. Per-query source failures are absorbed
//! by the collector; transform failures skip the offending post; dimension or
//! fact-load failures are fatal to the run. Every path — success, empty
//! batch, or failure — prints a final summary before returning.

use edupulse_core::AppConfig;
use edupulse_reddit::{collect_posts, CollectedBatch, CollectorOptions, RedditAuth, RedditClient};

use crate::backup;

/// Execute one full pipeline run.
///
/// When `dry_run` is `true`, prints the query matrix and returns without
/// touching the source or the warehouse.
///
/// # Errors
///
/// Returns an error if the topics file is invalid, credentials are missing,
/// the source client cannot authenticate, or the load step fails. Errors are
/// logged with cause here; the process exit status is the caller's concern.
pub(crate) async fn run_pipeline(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    dry_run: bool,
    skip_backup: bool,
) -> anyhow::Result<()> {
    let topics = edupulse_core::load_topics(&config.topics_path)?;

    if dry_run {
        println!(
            "dry-run: would search {} collections × {} terms ({} queries)",
            topics.collections.len(),
            topics.terms.len(),
            topics.query_count()
        );
        println!("collections: [{}]", topics.collections.join(", "));
        println!("terms: [{}]", topics.terms.join(", "));
        return Ok(());
    }

    let auth = RedditAuth::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let etl_run = edupulse_db::create_etl_run(pool).await?;
    if let Err(e) = edupulse_db::start_etl_run(pool, etl_run.id).await {
        fail_run_best_effort(pool, etl_run.id, format!("{e:#}")).await;
        return Err(e.into());
    }

    // Token exchange failing means the whole source is down for this run, not
    // one query pair, so it is fatal rather than cooled down.
    let client = match RedditClient::new(&auth, config.reddit_request_timeout_secs).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "source client construction failed");
            fail_run_best_effort(pool, etl_run.id, format!("{e:#}")).await;
            print_summary(&CollectedBatch::default(), 0, 0, 0);
            return Err(e.into());
        }
    };

    let options = CollectorOptions::from_config(config);
    let batch = collect_posts(&client, &topics, &options).await;

    if !skip_backup && !batch.posts.is_empty() {
        if let Some(dir) = &config.backup_dir {
            // Advisory artifact; a write failure must not abort the run.
            match backup::write_snapshot(dir, &batch.posts) {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "raw batch snapshot written");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "snapshot write failed — continuing");
                }
            }
        }
    }

    if batch.posts.is_empty() {
        if let Err(e) = edupulse_db::complete_etl_run(pool, etl_run.id, 0, 0).await {
            fail_run_best_effort(pool, etl_run.id, format!("{e:#}")).await;
            return Err(e.into());
        }
        print_summary(&batch, 0, 0, 0);
        return Ok(());
    }

    let mut enriched = Vec::with_capacity(batch.posts.len());
    let mut transform_skipped = 0_usize;
    for post in &batch.posts {
        match edupulse_analysis::enrich(post) {
            Ok(p) => enriched.push(p),
            Err(e) => {
                transform_skipped += 1;
                tracing::warn!(error = %e, "skipping post that failed transform");
            }
        }
    }

    match edupulse_db::load_batch(pool, &enriched).await {
        Ok(summary) => {
            let posts_collected = i32::try_from(batch.posts.len()).unwrap_or(i32::MAX);
            let facts_inserted = i32::try_from(summary.facts_inserted).unwrap_or(i32::MAX);
            if let Err(e) =
                edupulse_db::complete_etl_run(pool, etl_run.id, posts_collected, facts_inserted)
                    .await
            {
                fail_run_best_effort(pool, etl_run.id, format!("{e:#}")).await;
                return Err(e.into());
            }
            print_summary(
                &batch,
                transform_skipped,
                summary.facts_inserted,
                summary.facts_skipped,
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "warehouse load failed");
            fail_run_best_effort(pool, etl_run.id, format!("{e:#}")).await;
            print_summary(&batch, transform_skipped, 0, 0);
            Err(e.into())
        }
    }
}

/// Print the end-of-run summary. Called on every exit path.
fn print_summary(
    batch: &CollectedBatch,
    transform_skipped: usize,
    facts_inserted: u64,
    facts_skipped: u64,
) {
    println!(
        "run complete: {} posts collected ({} duplicate sightings suppressed), \
         {} queries failed, {} posts skipped by transform, \
         {} facts inserted, {} facts already present",
        batch.posts.len(),
        batch.duplicates_skipped,
        batch.queries_failed,
        transform_skipped,
        facts_inserted,
        facts_skipped,
    );
}

/// Attempt to mark a run as failed, logging any secondary error.
async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, message: String) {
    if let Err(mark_err) = edupulse_db::fail_etl_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            error = %mark_err,
            "failed to mark run as failed"
        );
    }
}
