//! Canonical matching
//!
//! Exact structural match of a normalized record against the canonical
//! store. The predicate is brand + product type + pack quantity + pack
//! size, all exact; `uom` is deliberately excluded and carried for
//! display only. That is a known precision gap: two products identical
//! on the predicate but differing in unit collide as Ambiguous rather
//! than silently mis-matching. The matcher never guesses among
//! candidates and never accepts a partial match.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::catalog::{CanonicalProduct, NormalizedAttributes};
use crate::error::Result;
use crate::store::CatalogStore;

/// Terminal result of a match attempt
///
/// All three are valid outcomes, not errors: Ambiguous and NoMatch require
/// human judgment and must stay distinguishable from hard failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Exactly one canonical product satisfied the predicate
    Matched { product: CanonicalProduct },
    /// Two or more candidates satisfied the predicate: a data-quality
    /// problem in the canonical store, surfaced for human attention
    Ambiguous { candidates: Vec<CanonicalProduct> },
    /// No canonical product satisfied the predicate
    NoMatch,
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Deterministic matcher over a catalog store
#[derive(Clone)]
pub struct Matcher {
    store: Arc<dyn CatalogStore>,
}

impl Matcher {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Match a normalized record against the canonical store
    ///
    /// Records with an empty product type or missing pack fields cannot
    /// satisfy exact equality and short-circuit to `NoMatch` without a
    /// store round-trip.
    pub async fn resolve(&self, record: &NormalizedAttributes) -> Result<MatchOutcome> {
        if record.product_type.is_empty() {
            return Ok(MatchOutcome::NoMatch);
        }
        let (Some(pack_quantity), Some(pack_size)) = (record.pack_quantity, record.pack_size)
        else {
            return Ok(MatchOutcome::NoMatch);
        };

        let mut candidates = self
            .store
            .find_match(&record.brand, &record.product_type, pack_quantity, pack_size)
            .await?;

        info!(
            brand = %record.brand,
            product_type = %record.product_type,
            candidates = candidates.len(),
            "Canonical lookup complete"
        );

        Ok(if candidates.is_empty() {
            MatchOutcome::NoMatch
        } else if candidates.len() == 1 {
            MatchOutcome::Matched {
                product: candidates.remove(0),
            }
        } else {
            MatchOutcome::Ambiguous { candidates }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: i64, brand: &str, product_type: &str, qty: i64, size: &str) -> CanonicalProduct {
        CanonicalProduct {
            id,
            description: format!("{} {} {}/{}LB", product_type, brand, qty, size),
            brand: brand.to_string(),
            product_type: product_type.to_string(),
            pack_quantity: qty,
            pack_size: dec(size),
            uom: "LB".to_string(),
        }
    }

    fn record(brand: &str, product_type: &str, qty: Option<i64>, size: Option<&str>) -> NormalizedAttributes {
        NormalizedAttributes {
            brand: brand.to_string(),
            brand_confidence: 100,
            product_type: product_type.to_string(),
            pack_quantity: qty,
            pack_size: size.map(|s| dec(s)),
            uom: Some("LB".to_string()),
        }
    }

    #[tokio::test]
    async fn test_single_candidate_is_matched() {
        let store = Arc::new(MemoryStore::with_products(vec![product(
            7669,
            "Driscoll's",
            "Strawberry",
            8,
            "1.0",
        )]));
        let matcher = Matcher::new(store);

        let outcome = matcher
            .resolve(&record("Driscoll's", "Strawberry", Some(8), Some("1.0")))
            .await
            .unwrap();

        match outcome {
            MatchOutcome::Matched { product } => assert_eq!(product.id, 7669),
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_tuples_are_ambiguous() {
        // Identical brand/type/qty/size under different ids
        let store = Arc::new(MemoryStore::with_products(vec![
            product(1, "Driscoll's", "Strawberry", 8, "1.0"),
            product(2, "Driscoll's", "Strawberry", 8, "1.0"),
        ]));
        let matcher = Matcher::new(store);

        let outcome = matcher
            .resolve(&record("Driscoll's", "Strawberry", Some(8), Some("1.0")))
            .await
            .unwrap();

        match outcome {
            MatchOutcome::Ambiguous { candidates } => assert_eq!(candidates.len(), 2),
            other => panic!("expected ambiguous, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_type_is_no_match() {
        let store = Arc::new(MemoryStore::with_products(vec![product(
            1,
            "Driscoll's",
            "Strawberry",
            8,
            "1.0",
        )]));
        let matcher = Matcher::new(store);

        let outcome = matcher
            .resolve(&record("Driscoll's", "Dragonfruit", Some(8), Some("1.0")))
            .await
            .unwrap();
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_empty_type_short_circuits() {
        let store = Arc::new(MemoryStore::with_products(vec![product(
            1,
            "Driscoll's",
            "Strawberry",
            8,
            "1.0",
        )]));
        let matcher = Matcher::new(store);

        let outcome = matcher
            .resolve(&record("Driscoll's", "", Some(8), Some("1.0")))
            .await
            .unwrap();
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_missing_pack_fields_are_no_match() {
        let store = Arc::new(MemoryStore::with_products(vec![product(
            1,
            "Driscoll's",
            "Strawberry",
            8,
            "1.0",
        )]));
        let matcher = Matcher::new(store);

        let outcome = matcher
            .resolve(&record("Driscoll's", "Strawberry", None, Some("1.0")))
            .await
            .unwrap();
        assert_eq!(outcome, MatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_resolution_is_deterministic() {
        let store = Arc::new(MemoryStore::with_products(vec![product(
            7669,
            "Driscoll's",
            "Strawberry",
            8,
            "1.0",
        )]));
        let matcher = Matcher::new(store);
        let rec = record("Driscoll's", "Strawberry", Some(8), Some("1.0"));

        let first = matcher.resolve(&rec).await.unwrap();
        let second = matcher.resolve(&rec).await.unwrap();
        assert_eq!(first, second);
    }
}
