//! Vocabulary normalization
//!
//! Reconciles the extractor's best-effort output against the controlled
//! vocabularies: fuzzy brand matching against the known-brand set and
//! lemmatization of the product type. The pack fields pass through
//! untouched: defaulting happened at extraction and is not repeated here.

mod lemma;
mod scorer;

pub use lemma::Lemmatizer;
pub use scorer::{LevenshteinScorer, SimilarityScorer};

use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{NormalizedAttributes, RawAttributes};
use crate::config::NormalizerConfig;
use crate::error::{Error, Result};

/// Vocabulary normalizer
///
/// Long-lived: constructed once per process/session and shared. Holds no
/// mutable state.
#[derive(Clone)]
pub struct Normalizer {
    scorer: Arc<dyn SimilarityScorer>,
    lemmatizer: Lemmatizer,
    brand_threshold: u8,
}

impl Normalizer {
    /// Create a normalizer with the default Levenshtein scorer
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            scorer: Arc::new(LevenshteinScorer),
            lemmatizer: Lemmatizer::new(),
            brand_threshold: config.brand_threshold,
        }
    }

    /// Swap in a different similarity strategy
    pub fn with_scorer(mut self, scorer: Arc<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Normalize a raw attribute record against the known-brand vocabulary
    ///
    /// Fails with `BrandNotConfident` when the raw brand is absent or no
    /// known brand scores strictly above the threshold. An absent product
    /// type normalizes to the empty string, which downstream matching
    /// treats as a guaranteed non-match.
    pub fn normalize(
        &self,
        raw: &RawAttributes,
        known_brands: &[String],
    ) -> Result<NormalizedAttributes> {
        let raw_brand = raw.brand.as_deref().unwrap_or("").trim();

        let (brand, brand_confidence) = self
            .best_brand(raw_brand, known_brands)
            .ok_or_else(|| Error::BrandNotConfident {
                brand: raw_brand.to_string(),
                best_score: self.best_score(raw_brand, known_brands),
                threshold: self.brand_threshold,
            })?;

        info!(
            raw = %raw_brand,
            standardized = %brand,
            confidence = brand_confidence,
            "Standardized brand"
        );

        let product_type = match raw.product_type.as_deref() {
            Some(t) if !t.trim().is_empty() => self.lemmatizer.lemmatize(t),
            _ => String::new(),
        };

        debug!(product_type = %product_type, "Lemmatized product type");

        Ok(NormalizedAttributes {
            brand: brand.to_string(),
            brand_confidence,
            product_type,
            pack_quantity: raw.pack_quantity,
            pack_size: raw.pack_size,
            uom: raw.uom.clone(),
        })
    }

    /// Lemmatize a product type without touching the brand
    pub fn lemmatize(&self, product_type: &str) -> String {
        self.lemmatizer.lemmatize(product_type)
    }

    /// Best-scoring known brand strictly above the threshold
    ///
    /// Ties break to the earliest candidate in `known_brands` order, so a
    /// fixed vocabulary snapshot always yields the same answer.
    fn best_brand<'a>(&self, raw_brand: &str, known_brands: &'a [String]) -> Option<(&'a str, u8)> {
        if raw_brand.is_empty() {
            return None;
        }

        let mut best: Option<(&'a str, u8)> = None;
        for candidate in known_brands {
            let score = self.scorer.score(raw_brand, candidate);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate.as_str(), score));
            }
        }

        best.filter(|&(_, score)| score > self.brand_threshold)
    }

    /// Best score over the vocabulary, for error reporting
    fn best_score(&self, raw_brand: &str, known_brands: &[String]) -> u8 {
        if raw_brand.is_empty() {
            return 0;
        }
        known_brands
            .iter()
            .map(|candidate| self.scorer.score(raw_brand, candidate))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_brands() -> Vec<String> {
        vec!["Driscoll's".to_string(), "Dole".to_string()]
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(&NormalizerConfig {
            brand_threshold: 80,
        })
    }

    fn raw(brand: Option<&str>, product_type: Option<&str>) -> RawAttributes {
        RawAttributes {
            brand: brand.map(String::from),
            product_type: product_type.map(String::from),
            pack_quantity: Some(8),
            pack_size: Some("1.0".parse().unwrap()),
            uom: Some("LB".to_string()),
        }
    }

    #[test]
    fn test_close_brand_resolves() {
        let normalized = normalizer()
            .normalize(&raw(Some("Driscoll"), Some("Strawberries")), &known_brands())
            .unwrap();

        assert_eq!(normalized.brand, "Driscoll's");
        assert!(normalized.brand_confidence > 80);
        assert_eq!(normalized.product_type, "Strawberry");
        // Pack fields pass through unchanged
        assert_eq!(normalized.pack_quantity, Some(8));
        assert_eq!(normalized.uom.as_deref(), Some("LB"));
    }

    #[test]
    fn test_distant_brand_is_not_confident() {
        let result = normalizer().normalize(&raw(Some("Sunkist"), Some("Orange")), &known_brands());

        match result {
            Err(Error::BrandNotConfident { brand, best_score, .. }) => {
                assert_eq!(brand, "Sunkist");
                assert!(best_score <= 80);
            }
            other => panic!("expected BrandNotConfident, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_brand_is_not_confident() {
        let result = normalizer().normalize(&raw(None, Some("Strawberry")), &known_brands());
        assert!(matches!(result, Err(Error::BrandNotConfident { .. })));
    }

    #[test]
    fn test_missing_product_type_becomes_empty() {
        let normalized = normalizer()
            .normalize(&raw(Some("Driscoll's"), None), &known_brands())
            .unwrap();
        assert_eq!(normalized.product_type, "");
    }

    #[test]
    fn test_tie_breaks_to_first_candidate() {
        // Two identical vocabulary entries: the earlier one wins
        let brands = vec!["Driscoll's".to_string(), "Driscoll's".to_string()];
        let normalized = normalizer()
            .normalize(&raw(Some("Driscoll's"), Some("Strawberry")), &brands)
            .unwrap();
        assert_eq!(normalized.brand, "Driscoll's");
        assert_eq!(normalized.brand_confidence, 100);
    }

    #[test]
    fn test_null_pack_quantity_not_redefaulted() {
        let mut record = raw(Some("Driscoll's"), Some("Strawberry"));
        record.pack_quantity = None;

        let normalized = normalizer().normalize(&record, &known_brands()).unwrap();
        assert_eq!(normalized.pack_quantity, None);
    }
}
