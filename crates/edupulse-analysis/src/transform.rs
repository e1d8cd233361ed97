//! Per-post enrichment: clean, score, label, flag, bucket.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike};
use edupulse_reddit::RawPost;
use regex::Regex;
use thiserror::Error;

use crate::clean::clean_text;
use crate::lexicon::lexicon_score;
use crate::types::{EnrichedPost, SentimentLabel};

#[derive(Debug, Error)]
pub enum TransformError {
    /// The post has no alphabetic content once cleaned. Policy: the caller
    /// skips the post and continues the batch; scoring empty text is never
    /// attempted.
    #[error("post {id} has no alphabetic content after cleaning")]
    EmptyText { id: String },

    /// The creation timestamp cannot be represented as a date.
    #[error("post {id} has an unrepresentable creation timestamp {created_utc}")]
    InvalidTimestamp { id: String, created_utc: i64 },
}

static MENTION_RE: OnceLock<Regex> = OnceLock::new();

/// Matches dropout mentions in cleaned text. Cleaning has already removed
/// hyphens ("drop-out" becomes "dropout") and lowercased, so three surface
/// forms remain: "dropout", "drop out", "dropped out".
fn mention_re() -> &'static Regex {
    MENTION_RE.get_or_init(|| Regex::new(r"drop ?out|dropped out").expect("valid regex"))
}

/// Enrich one collected post with the default lexicon analyzer.
///
/// # Errors
///
/// Returns [`TransformError::EmptyText`] when the cleaned text is empty, or
/// [`TransformError::InvalidTimestamp`] when the creation time is out of range.
pub fn enrich(post: &RawPost) -> Result<EnrichedPost, TransformError> {
    enrich_with(post, lexicon_score)
}

/// Enrich one collected post with a caller-supplied sentiment analyzer.
///
/// The analyzer must be deterministic for a given text; it receives the
/// cleaned text and returns a polarity in `[-1.0, 1.0]`.
///
/// # Errors
///
/// Same failure modes as [`enrich`].
pub fn enrich_with<F>(post: &RawPost, analyzer: F) -> Result<EnrichedPost, TransformError>
where
    F: Fn(&str) -> f32,
{
    let content = clean_text(&post.text);
    if content.is_empty() {
        return Err(TransformError::EmptyText {
            id: post.id.clone(),
        });
    }

    let sentiment = analyzer(&content);
    let label = SentimentLabel::from_score(sentiment);
    let dropout_mentioned = mention_re().is_match(&content);

    // Year bucketing is done in UTC on purpose: created_utc is an epoch
    // timestamp, and deriving the bucket must not depend on the host's
    // ambient timezone.
    let year = DateTime::from_timestamp(post.created_utc, 0)
        .ok_or(TransformError::InvalidTimestamp {
            id: post.id.clone(),
            created_utc: post.created_utc,
        })?
        .year();

    Ok(EnrichedPost {
        id: post.id.clone(),
        content,
        url: post.url.clone(),
        sentiment,
        label,
        dropout_mentioned,
        year,
        collection: post.collection.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, text: &str, created_utc: i64) -> RawPost {
        RawPost {
            id: id.to_string(),
            text: text.to_string(),
            created_utc,
            url: format!("https://reddit.com/{id}"),
            collection: "Philippines".to_string(),
        }
    }

    // 2023-06-15T00:00:00Z
    const MID_2023: i64 = 1_686_787_200;

    #[test]
    fn enriches_a_typical_post() {
        let post = raw("p1", "Proud to have graduated! http://x.co 2023", MID_2023);
        let enriched = enrich(&post).unwrap();

        assert_eq!(enriched.content, "proud to have graduated");
        assert!(enriched.sentiment > 0.1);
        assert_eq!(enriched.label, SentimentLabel::Positive);
        assert!(!enriched.dropout_mentioned);
        assert_eq!(enriched.year, 2023);
        assert_eq!(enriched.collection, "Philippines");
    }

    #[test]
    fn mention_detected_for_spaced_form() {
        let post = raw("p1", "students drop out of school", MID_2023);
        assert!(enrich(&post).unwrap().dropout_mentioned);
    }

    #[test]
    fn mention_detected_for_joined_form() {
        let post = raw("p1", "dropout rate rising", MID_2023);
        assert!(enrich(&post).unwrap().dropout_mentioned);
    }

    #[test]
    fn mention_detected_for_hyphenated_form() {
        // Cleaning removes the hyphen before matching.
        let post = raw("p1", "drop-out numbers for DepEd", MID_2023);
        assert!(enrich(&post).unwrap().dropout_mentioned);
    }

    #[test]
    fn mention_detected_for_past_tense() {
        let post = raw("p1", "I dropped out last year", MID_2023);
        assert!(enrich(&post).unwrap().dropout_mentioned);
    }

    #[test]
    fn mention_not_detected_for_dropped_alone() {
        let post = raw("p1", "a dropped class", MID_2023);
        assert!(!enrich(&post).unwrap().dropout_mentioned);
    }

    #[test]
    fn empty_cleaned_text_is_rejected() {
        let post = raw("p9", "2024!!! http://only.a.link", MID_2023);
        let err = enrich(&post).unwrap_err();
        assert!(
            matches!(err, TransformError::EmptyText { ref id } if id == "p9"),
            "expected EmptyText(p9), got: {err:?}"
        );
    }

    #[test]
    fn year_bucket_is_utc() {
        // 2023-12-31T23:30:00Z stays 2023 regardless of host timezone.
        let post = raw("p1", "new year soon", 1_704_065_400);
        assert_eq!(enrich(&post).unwrap().year, 2023);

        // Thirty-one minutes later it is 2024.
        let post = raw("p1", "happy new year", 1_704_067_260);
        assert_eq!(enrich(&post).unwrap().year, 2024);
    }

    #[test]
    fn unrepresentable_timestamp_is_rejected() {
        let post = raw("p1", "valid text", i64::MAX);
        let err = enrich(&post).unwrap_err();
        assert!(matches!(err, TransformError::InvalidTimestamp { .. }));
    }

    #[test]
    fn analyzer_is_pluggable() {
        let post = raw("p1", "some neutral words", MID_2023);
        let enriched = enrich_with(&post, |_| -0.9).unwrap();
        assert_eq!(enriched.sentiment, -0.9);
        assert_eq!(enriched.label, SentimentLabel::Negative);
    }
}
