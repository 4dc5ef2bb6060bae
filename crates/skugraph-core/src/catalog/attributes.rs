//! Attribute records flowing through the pipeline
//!
//! `RawAttributes` is the unvalidated best-effort guess coming back from the
//! language model. `NormalizedAttributes` is the only shape the matcher
//! accepts: its brand is a member of the known-brand vocabulary and its
//! product type has been reduced to the singular lemma.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured attributes extracted from a raw product description.
///
/// Every field may be absent: the model is instructed to emit `null` for
/// anything it cannot find rather than fabricate a value. `pack_quantity`
/// defaults to 1 at extraction time when the description carries no
/// case/pack notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAttributes {
    /// Brand name as the model read it (unverified)
    #[serde(default)]
    pub brand: Option<String>,
    /// Product type, requested in singular base form
    #[serde(default)]
    pub product_type: Option<String>,
    /// Units per case, e.g. the 8 in "8/1LB"
    #[serde(default)]
    pub pack_quantity: Option<i64>,
    /// Size of one unit, e.g. the 1 in "8/1LB"
    #[serde(default)]
    pub pack_size: Option<Decimal>,
    /// Unit of measure, e.g. "LB"
    #[serde(default)]
    pub uom: Option<String>,
}

impl RawAttributes {
    /// True when no attribute was extracted at all
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.product_type.is_none()
            && self.pack_quantity.is_none()
            && self.pack_size.is_none()
            && self.uom.is_none()
    }
}

/// Attributes after vocabulary normalization.
///
/// `brand` is guaranteed to be a member of the known-brand set.
/// `product_type` is the singular lemma, or empty when extraction found
/// none: an empty type is a guaranteed non-match downstream. The pack
/// fields are copied through from extraction unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAttributes {
    /// Standardized brand from the controlled vocabulary
    pub brand: String,
    /// Similarity score the brand matched at (0-100)
    pub brand_confidence: u8,
    /// Singular lemma of the product type, empty when unknown
    pub product_type: String,
    pub pack_quantity: Option<i64>,
    pub pack_size: Option<Decimal>,
    pub uom: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_raw_attributes_deserialize_full() {
        let json = r#"{
            "brand": "Driscoll's",
            "product_type": "Strawberry",
            "pack_quantity": 8,
            "pack_size": 1.0,
            "uom": "LB"
        }"#;

        let raw: RawAttributes = serde_json::from_str(json).unwrap();
        assert_eq!(raw.brand.as_deref(), Some("Driscoll's"));
        assert_eq!(raw.pack_quantity, Some(8));
        assert_eq!(raw.pack_size, Some(dec("1.0")));
        assert!(!raw.is_empty());
    }

    #[test]
    fn test_raw_attributes_nulls_map_to_none() {
        let json = r#"{"brand": null, "product_type": "Strawberry", "pack_quantity": null, "pack_size": null, "uom": null}"#;
        let raw: RawAttributes = serde_json::from_str(json).unwrap();
        assert!(raw.brand.is_none());
        assert_eq!(raw.product_type.as_deref(), Some("Strawberry"));
        assert!(raw.pack_quantity.is_none());
    }

    #[test]
    fn test_raw_attributes_reduced_schema() {
        // The secondary prototype dataset returns pack_size/uom only
        let json = r#"{"pack_size": 4.5, "uom": "OZ"}"#;
        let raw: RawAttributes = serde_json::from_str(json).unwrap();
        assert!(raw.brand.is_none());
        assert!(raw.pack_quantity.is_none());
        assert_eq!(raw.pack_size, Some(dec("4.5")));
        assert_eq!(raw.uom.as_deref(), Some("OZ"));
    }

    #[test]
    fn test_raw_attributes_rejects_unknown_keys() {
        let json = r#"{"brand": "X", "flavor": "sweet"}"#;
        assert!(serde_json::from_str::<RawAttributes>(json).is_err());
    }
}
