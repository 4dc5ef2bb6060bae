//! Canonical store adapters
//!
//! Read-only query interface over the graph-shaped catalog (nodes:
//! Product, Brand, ProductType; edges: HAS_BRAND, IS_TYPE). Two
//! implementations: [`Neo4jStore`] speaks Cypher over the Neo4j HTTP
//! transaction endpoint; [`MemoryStore`] holds a fixed in-memory list,
//! which is the degenerate configuration and the test double.
//!
//! The categorization path never writes; `seed_products` exists for the
//! offline seed/load command only.

mod memory;
mod neo4j;

pub use memory::MemoryStore;
pub use neo4j::Neo4jStore;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::catalog::{BrandCount, CanonicalProduct, GraphStats, ProductTypeCount};
use crate::error::Result;

/// Read-mostly operations over the canonical product store
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All distinct brand names
    ///
    /// Order is not significant to callers but must be stable within a
    /// session so fuzzy-match scoring order is reproducible.
    async fn list_brands(&self) -> Result<Vec<String>>;

    /// Products matching the exact-equality predicate
    ///
    /// Brand and product type compare case-sensitively; quantity and size
    /// compare with no tolerance. `uom` is not part of the predicate.
    /// Zero, one, or many rows are all non-error results.
    async fn find_match(
        &self,
        brand: &str,
        product_type: &str,
        pack_quantity: i64,
        pack_size: Decimal,
    ) -> Result<Vec<CanonicalProduct>>;

    /// Node and relationship counts
    async fn stats(&self) -> Result<GraphStats>;

    /// All products with brand/type joined, ordered by brand then type
    async fn list_products(&self) -> Result<Vec<CanonicalProduct>>;

    /// Brands with product counts, descending count
    async fn list_brands_detailed(&self) -> Result<Vec<BrandCount>>;

    /// Product types with product counts, descending count
    async fn list_product_types_detailed(&self) -> Result<Vec<ProductTypeCount>>;

    /// Bulk upsert of canonical products, idempotent by id
    ///
    /// Offline load interface. `wipe` clears the graph first.
    async fn seed_products(&self, products: &[CanonicalProduct], wipe: bool) -> Result<()>;
}
