//! Lexicon polarity scorer for education-discourse text.

/// Word weights for the education domain.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("scholarship", 0.5),
    ("graduate", 0.4),
    ("graduated", 0.5),
    ("passed", 0.4),
    ("success", 0.5),
    ("proud", 0.5),
    ("opportunity", 0.4),
    ("improve", 0.3),
    ("improved", 0.4),
    ("support", 0.3),
    ("supportive", 0.4),
    ("helped", 0.4),
    ("hope", 0.3),
    ("hopeful", 0.4),
    ("grateful", 0.5),
    ("free", 0.3),
    ("great", 0.4),
    ("good", 0.3),
    ("best", 0.5),
    ("love", 0.5),
    // Negative signals
    ("poverty", -0.5),
    ("crisis", -0.6),
    ("struggle", -0.4),
    ("struggling", -0.4),
    ("failed", -0.4),
    ("failure", -0.4),
    ("failing", -0.4),
    ("stress", -0.4),
    ("stressed", -0.4),
    ("depressed", -0.6),
    ("anxious", -0.4),
    ("worried", -0.4),
    ("expensive", -0.4),
    ("debt", -0.4),
    ("hungry", -0.5),
    ("quit", -0.4),
    ("unfair", -0.5),
    ("corrupt", -0.6),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("worst", -0.6),
    ("problem", -0.3),
    ("problems", -0.3),
    ("difficult", -0.3),
];

/// Score a text string using the domain lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
/// Deterministic: the same text always yields the same score.
#[must_use]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(lexicon_score(""), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(lexicon_score("the quick brown fox"), 0.0);
    }

    #[test]
    fn positive_keyword_returns_positive() {
        let score = lexicon_score("got a scholarship this year");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let score = lexicon_score("family is struggling with poverty");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn mixed_text_sums_weights() {
        // grateful (+0.5) + crisis (-0.6) = -0.1
        let score = lexicon_score("grateful but still a crisis");
        assert!(
            score > -1.0 && score < 0.0,
            "expected small negative score, got {score}"
        );
    }

    #[test]
    fn score_clamps_to_positive_one() {
        let text = "scholarship graduated success proud grateful best love improved";
        assert_eq!(lexicon_score(text), 1.0);
    }

    #[test]
    fn score_clamps_to_negative_one() {
        let text = "poverty crisis depressed corrupt terrible worst failed debt";
        assert_eq!(lexicon_score(text), -1.0);
    }

    #[test]
    fn punctuation_stripped_from_words() {
        let score = lexicon_score("graduated!");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn deterministic_for_same_input() {
        let text = "hope amid the education crisis";
        assert_eq!(lexicon_score(text), lexicon_score(text));
    }
}
