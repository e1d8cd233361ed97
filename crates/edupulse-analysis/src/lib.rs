//! Text enrichment for collected posts.
//!
//! Pure, I/O-free functions: text cleaning, lexicon sentiment scoring with a
//! three-way label, dropout-mention detection, and year bucketing. One
//! [`RawPost`](edupulse_reddit::RawPost) in, one [`EnrichedPost`] out.

pub mod clean;
pub mod lexicon;
pub mod transform;
pub mod types;

pub use clean::clean_text;
pub use lexicon::lexicon_score;
pub use transform::{enrich, enrich_with, TransformError};
pub use types::{EnrichedPost, SentimentLabel};
