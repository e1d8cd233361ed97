//! Reddit source adapter and deduplicating collector.
//!
//! [`RedditClient`] wraps the OAuth search API for a single (collection, term)
//! query; [`collect_posts`] drives it across the full query matrix while
//! enforcing post-identifier uniqueness and upstream pacing.

pub mod client;
pub mod collector;
pub mod error;
pub mod types;

pub use client::{RedditAuth, RedditClient};
pub use collector::{collect_posts, CollectedBatch, CollectorOptions};
pub use error::RedditError;
pub use types::RawPost;
