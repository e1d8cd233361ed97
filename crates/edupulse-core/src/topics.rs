use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// The query matrix for one run: every listed collection is searched with
/// every listed term.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicsFile {
    /// Upstream content buckets (subreddit names, without the `r/` prefix).
    pub collections: Vec<String>,
    /// Search terms; each is issued verbatim as one query.
    pub terms: Vec<String>,
}

impl TopicsFile {
    /// Number of (collection, term) pairs the collector will enumerate.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.collections.len() * self.terms.len()
    }
}

/// Load and validate the topics configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_topics(path: &Path) -> Result<TopicsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TopicsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let topics: TopicsFile = serde_yaml::from_str(&content)?;

    validate_topics(&topics)?;

    Ok(topics)
}

fn validate_topics(topics: &TopicsFile) -> Result<(), ConfigError> {
    if topics.collections.is_empty() {
        return Err(ConfigError::Validation(
            "topics file must list at least one collection".to_string(),
        ));
    }
    if topics.terms.is_empty() {
        return Err(ConfigError::Validation(
            "topics file must list at least one term".to_string(),
        ));
    }

    let mut seen_collections = HashSet::new();
    for collection in &topics.collections {
        if collection.trim().is_empty() {
            return Err(ConfigError::Validation(
                "collection names must be non-empty".to_string(),
            ));
        }
        if collection.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "collection name '{collection}' must not contain whitespace"
            )));
        }
        if !seen_collections.insert(collection.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate collection: '{collection}'"
            )));
        }
    }

    let mut seen_terms = HashSet::new();
    for term in &topics.terms {
        if term.trim().is_empty() {
            return Err(ConfigError::Validation(
                "terms must be non-empty".to_string(),
            ));
        }
        if !seen_terms.insert(term.to_lowercase()) {
            return Err(ConfigError::Validation(format!("duplicate term: '{term}'")));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topics(collections: &[&str], terms: &[&str]) -> TopicsFile {
        TopicsFile {
            collections: collections.iter().map(ToString::to_string).collect(),
            terms: terms.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn parses_yaml_shape() {
        let raw = "collections:\n  - Philippines\n  - studentsph\nterms:\n  - school dropout\n  - education crisis\n";
        let parsed: TopicsFile = serde_yaml::from_str(raw).unwrap();
        assert_eq!(parsed.collections.len(), 2);
        assert_eq!(parsed.terms.len(), 2);
        assert_eq!(parsed.query_count(), 4);
    }

    #[test]
    fn validate_accepts_well_formed_matrix() {
        let t = topics(&["Philippines", "AskPH"], &["dropout", "DepEd"]);
        assert!(validate_topics(&t).is_ok());
    }

    #[test]
    fn validate_rejects_empty_collections() {
        let t = topics(&[], &["dropout"]);
        let err = validate_topics(&t).unwrap_err();
        assert!(err.to_string().contains("at least one collection"));
    }

    #[test]
    fn validate_rejects_empty_terms() {
        let t = topics(&["Philippines"], &[]);
        let err = validate_topics(&t).unwrap_err();
        assert!(err.to_string().contains("at least one term"));
    }

    #[test]
    fn validate_rejects_duplicate_collection_case_insensitively() {
        let t = topics(&["Philippines", "philippines"], &["dropout"]);
        let err = validate_topics(&t).unwrap_err();
        assert!(err.to_string().contains("duplicate collection"));
    }

    #[test]
    fn validate_rejects_duplicate_term() {
        let t = topics(&["Philippines"], &["DepEd", "deped"]);
        let err = validate_topics(&t).unwrap_err();
        assert!(err.to_string().contains("duplicate term"));
    }

    #[test]
    fn validate_rejects_collection_with_whitespace() {
        let t = topics(&["bad name"], &["dropout"]);
        let err = validate_topics(&t).unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn load_topics_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("topics.yaml");
        assert!(
            path.exists(),
            "topics.yaml missing at {path:?} — required for this test"
        );
        let result = load_topics(&path);
        assert!(result.is_ok(), "failed to load topics.yaml: {result:?}");
        let topics = result.unwrap();
        assert!(!topics.collections.is_empty());
        assert!(!topics.terms.is_empty());
    }
}
