use std::sync::OnceLock;

use regex::Regex;

static STRIP_RE: OnceLock<Regex> = OnceLock::new();

/// Matches URL tokens (http/https/www-prefixed) and any character outside the
/// alphabetic/whitespace set. Everything matched is deleted.
fn strip_re() -> &'static Regex {
    STRIP_RE.get_or_init(|| Regex::new(r"http\S+|www\S+|[^a-zA-Z\s]").expect("valid regex"))
}

/// Normalize raw post text for scoring and storage.
///
/// Strips URLs, digits, and punctuation, lowercases, and collapses whitespace
/// runs to single spaces. May return an empty string when the input has no
/// alphabetic content.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let stripped = strip_re().replace_all(text, "");
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_urls_digits_and_punctuation() {
        assert_eq!(clean_text("Check http://x.co NOW!! 2024"), "check now");
    }

    #[test]
    fn removes_www_tokens() {
        assert_eq!(clean_text("visit www.example.com today"), "visit today");
    }

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(clean_text("  Mixed   CASE\n\ttext  "), "mixed case text");
    }

    #[test]
    fn strips_hyphen_without_inserting_space() {
        assert_eq!(clean_text("drop-out rates"), "dropout rates");
    }

    #[test]
    fn empty_for_non_alphabetic_input() {
        assert_eq!(clean_text("2024!!! :-("), "");
        assert_eq!(clean_text(""), "");
    }
}
