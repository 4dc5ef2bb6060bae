//! String similarity scoring for brand normalization
//!
//! The scorer is a pluggable strategy: anything producing an
//! edit-distance-based ratio in [0, 100] preserves the threshold
//! semantics. The default is a normalized Levenshtein ratio over
//! punctuation-stripped lowercase input, so "DRISCOLL" scores high
//! against "Driscoll's".

/// Similarity scoring strategy, ratio in [0, 100]
pub trait SimilarityScorer: Send + Sync {
    /// Score the similarity of two strings; 100 means identical
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Normalized Levenshtein ratio scorer
#[derive(Debug, Clone, Copy, Default)]
pub struct LevenshteinScorer;

impl LevenshteinScorer {
    /// Normalize a string for scoring: lowercase, drop punctuation,
    /// collapse whitespace
    fn normalize(s: &str) -> String {
        s.to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl SimilarityScorer for LevenshteinScorer {
    fn score(&self, a: &str, b: &str) -> u8 {
        let norm_a = Self::normalize(a);
        let norm_b = Self::normalize(b);

        if norm_a.is_empty() && norm_b.is_empty() {
            return 100;
        }

        let ratio = strsim::normalized_levenshtein(&norm_a, &norm_b);
        (ratio * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        let scorer = LevenshteinScorer;
        assert_eq!(scorer.score("Driscoll's", "Driscoll's"), 100);
    }

    #[test]
    fn test_punctuation_and_case_are_ignored() {
        let scorer = LevenshteinScorer;
        assert_eq!(scorer.score("DRISCOLLS", "Driscoll's"), 100);
    }

    #[test]
    fn test_close_brand_scores_above_threshold() {
        let scorer = LevenshteinScorer;
        // "driscoll" vs "driscolls": one edit over nine characters
        let score = scorer.score("Driscoll", "Driscoll's");
        assert!(score > 80, "score was {}", score);
    }

    #[test]
    fn test_unrelated_brand_scores_low() {
        let scorer = LevenshteinScorer;
        let score = scorer.score("Dole", "Driscoll's");
        assert!(score <= 80, "score was {}", score);
    }

    #[test]
    fn test_score_is_symmetric() {
        let scorer = LevenshteinScorer;
        assert_eq!(
            scorer.score("Driscoll", "Driscoll's"),
            scorer.score("Driscoll's", "Driscoll")
        );
    }
}
