//! The `report` and `status` commands: read-only views over the warehouse.

use chrono::{DateTime, Utc};

/// Print a markdown aggregate report from the star schema.
///
/// # Errors
///
/// Returns an error if any aggregate query fails.
pub(crate) async fn run_report(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let totals = edupulse_db::warehouse_totals(pool).await?;

    println!("# Education Discourse Sentiment Report");
    println!();
    println!(
        "**Posts**: {} | **Avg sentiment**: {} | **Dropout mentions**: {}",
        totals.post_count,
        fmt_score(totals.avg_sentiment),
        totals.mention_count
    );
    println!(
        "**Labels**: {} positive / {} neutral / {} negative",
        totals.positive_count, totals.neutral_count, totals.negative_count
    );
    println!();

    let by_collection = edupulse_db::aggregate_by_collection(pool).await?;
    println!("## By collection");
    println!();
    println!("| Collection | Posts | Avg sentiment | Mentions |");
    println!("|------------|-------|---------------|----------|");
    for row in &by_collection {
        println!(
            "| {} | {} | {} | {} |",
            row.name,
            row.post_count,
            fmt_score(row.avg_sentiment),
            row.mention_count
        );
    }
    println!();

    let by_year = edupulse_db::aggregate_by_year(pool).await?;
    println!("## By year");
    println!();
    println!("| Year | Posts | Avg sentiment | Mentions |");
    println!("|------|-------|---------------|----------|");
    for row in &by_year {
        println!(
            "| {} | {} | {} | {} |",
            row.year,
            row.post_count,
            fmt_score(row.avg_sentiment),
            row.mention_count
        );
    }

    Ok(())
}

/// Print the most recent pipeline runs.
///
/// # Errors
///
/// Returns an error if the run listing query fails.
pub(crate) async fn run_status(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = edupulse_db::list_etl_runs(pool, limit).await?;

    if runs.is_empty() {
        println!("no pipeline runs recorded yet");
        return Ok(());
    }

    println!("| Run | Status | Started | Completed | Posts | Facts | Error |");
    println!("|-----|--------|---------|-----------|-------|-------|-------|");
    for run in &runs {
        println!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            run.id,
            run.status,
            fmt_time(run.started_at),
            fmt_time(run.completed_at),
            run.posts_collected,
            run.facts_inserted,
            run.error_message
                .as_deref()
                .map(|m| m.replace('|', "\\|"))
                .unwrap_or_else(|| "\u{2014}".to_string()),
        );
    }

    Ok(())
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "\u{2014}".to_string(), |s| format!("{s:+.3}"))
}

fn fmt_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "\u{2014}".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_score_renders_sign_and_precision() {
        assert_eq!(fmt_score(Some(0.25)), "+0.250");
        assert_eq!(fmt_score(Some(-0.1)), "-0.100");
        assert_eq!(fmt_score(None), "\u{2014}");
    }

    #[test]
    fn fmt_time_renders_utc_or_dash() {
        assert_eq!(fmt_time(None), "\u{2014}");
        let at = DateTime::from_timestamp(1_686_787_200, 0);
        assert_eq!(fmt_time(at), "2023-06-15 00:00:00");
    }
}
