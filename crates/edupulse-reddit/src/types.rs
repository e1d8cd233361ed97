use serde::{Deserialize, Serialize};

/// A post as collected from the source, before enrichment.
///
/// `id` is unique within the source; the collector collapses repeat sightings
/// across query terms to a single record. `Serialize` exists for the raw-batch
/// snapshot artifact only.
#[derive(Debug, Clone, Serialize)]
pub struct RawPost {
    pub id: String,
    /// Title and body concatenated with a single space.
    pub text: String,
    /// Creation time in epoch seconds, as reported by the source.
    pub created_utc: i64,
    pub url: String,
    /// Name of the collection (subreddit) the post was found in.
    pub collection: String,
}

// ---------------------------------------------------------------------------
// Wire types for the search listing response
// ---------------------------------------------------------------------------

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub(crate) data: ListingData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData {
    pub(crate) children: Vec<Child>,
    pub(crate) after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Child {
    pub(crate) data: ChildData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildData {
    pub(crate) id: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) selftext: Option<String>,
    /// Reddit reports this as a float.
    pub(crate) created_utc: Option<f64>,
    pub(crate) url: Option<String>,
    pub(crate) permalink: Option<String>,
}

/// Convert one listing child into a [`RawPost`].
///
/// Returns `None` for children missing an id or title. Deleted/removed bodies
/// are treated as absent, leaving the title as the full text.
pub(crate) fn to_raw_post(child: &Child, collection: &str) -> Option<RawPost> {
    let id = child.data.id.as_deref().filter(|id| !id.is_empty())?;
    let title = child
        .data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())?;

    let text = match child.data.selftext.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() && body != "[deleted]" && body != "[removed]" => {
            format!("{title} {body}")
        }
        _ => title.to_string(),
    };

    let url = child
        .data
        .url
        .clone()
        .or_else(|| {
            child
                .data
                .permalink
                .as_ref()
                .map(|p| format!("https://reddit.com{p}"))
        })
        .unwrap_or_default();

    #[allow(clippy::cast_possible_truncation)]
    let created_utc = child.data.created_utc.unwrap_or(0.0) as i64;

    Some(RawPost {
        id: id.to_string(),
        text,
        created_utc,
        url,
        collection: collection.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child(
        id: Option<&str>,
        title: Option<&str>,
        selftext: Option<&str>,
        url: Option<&str>,
    ) -> Child {
        Child {
            data: ChildData {
                id: id.map(ToString::to_string),
                title: title.map(ToString::to_string),
                selftext: selftext.map(ToString::to_string),
                created_utc: Some(1_672_531_200.0),
                url: url.map(ToString::to_string),
                permalink: Some("/r/test/comments/p1/slug/".to_string()),
            },
        }
    }

    #[test]
    fn concatenates_title_and_body() {
        let post = to_raw_post(
            &child(Some("p1"), Some("Title here"), Some("body text"), None),
            "Philippines",
        )
        .unwrap();
        assert_eq!(post.text, "Title here body text");
        assert_eq!(post.collection, "Philippines");
        assert_eq!(post.created_utc, 1_672_531_200);
    }

    #[test]
    fn deleted_body_falls_back_to_title() {
        let post = to_raw_post(
            &child(Some("p1"), Some("Title"), Some("[deleted]"), None),
            "AskPH",
        )
        .unwrap();
        assert_eq!(post.text, "Title");
    }

    #[test]
    fn missing_title_is_skipped() {
        assert!(to_raw_post(&child(Some("p1"), None, None, None), "c").is_none());
        assert!(to_raw_post(&child(Some("p1"), Some("  "), None, None), "c").is_none());
    }

    #[test]
    fn missing_id_is_skipped() {
        assert!(to_raw_post(&child(None, Some("Title"), None, None), "c").is_none());
    }

    #[test]
    fn url_prefers_submission_url_then_permalink() {
        let with_url = to_raw_post(
            &child(Some("p1"), Some("T"), None, Some("https://example.com/x")),
            "c",
        )
        .unwrap();
        assert_eq!(with_url.url, "https://example.com/x");

        let without_url = to_raw_post(&child(Some("p1"), Some("T"), None, None), "c").unwrap();
        assert_eq!(without_url.url, "https://reddit.com/r/test/comments/p1/slug/");
    }
}
