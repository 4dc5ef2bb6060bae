//! Canonical product node and browsing rows

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An authoritative catalog entry representing one standardized SKU.
///
/// In the graph the product owns exactly one `HAS_BRAND` and one `IS_TYPE`
/// relationship; brand and product type are shared vocabulary nodes keyed
/// by unique name. The tuple (brand, product_type, pack_quantity,
/// pack_size) is intended to identify one product, but the schema does not
/// enforce it: duplicates surface as an ambiguity at match time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Unique canonical id, assigned by the upstream catalog
    pub id: i64,
    /// The standardized description string, e.g. "STRAWBERRY DRISCOLL 8/1LB"
    pub description: String,
    pub brand: String,
    pub product_type: String,
    pub pack_quantity: i64,
    pub pack_size: Decimal,
    /// Unit of measure. Carried for display; NOT part of the match predicate.
    pub uom: String,
}

/// Count of nodes for one label or relationships for one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub name: String,
    pub count: u64,
}

/// Aggregate statistics over the graph store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphStats {
    /// Node counts by label, descending count
    pub node_counts: Vec<LabelCount>,
    /// Relationship counts by type, descending count
    pub relationship_counts: Vec<LabelCount>,
}

/// A brand with the number of products carrying it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandCount {
    pub brand: String,
    pub product_count: u64,
}

/// A product type with the number of products of that type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTypeCount {
    pub product_type: String,
    pub product_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_roundtrip() {
        let product = CanonicalProduct {
            id: 7669,
            description: "STRAWBERRY DRISCOLL 8/1LB".into(),
            brand: "Driscoll's".into(),
            product_type: "Strawberry".into(),
            pack_quantity: 8,
            pack_size: "1.0".parse().unwrap(),
            uom: "LB".into(),
        };

        let json = serde_json::to_string(&product).unwrap();
        let back: CanonicalProduct = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_pack_size_equality_ignores_scale() {
        // "1" and "1.0" must compare equal for the exact-match predicate
        let a: Decimal = "1".parse().unwrap();
        let b: Decimal = "1.0".parse().unwrap();
        assert_eq!(a, b);
    }
}
