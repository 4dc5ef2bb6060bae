//! Catalog data model
//!
//! Types shared across the categorization pipeline: the attribute records
//! produced by extraction and normalization, the canonical product node,
//! and the aggregate rows served by the store's browsing operations.

mod attributes;
mod product;

pub use attributes::{NormalizedAttributes, RawAttributes};
pub use product::{BrandCount, CanonicalProduct, GraphStats, LabelCount, ProductTypeCount};
