//! In-memory catalog store
//!
//! The degenerate store configuration: a fixed product list with the same
//! query surface as the graph-backed adapter. Used by tests and offline
//! demos.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::catalog::{BrandCount, CanonicalProduct, GraphStats, LabelCount, ProductTypeCount};
use crate::error::Result;

use super::CatalogStore;

/// Fixed-list catalog store
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<CanonicalProduct>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with products
    pub fn with_products(products: Vec<CanonicalProduct>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_brands(&self) -> Result<Vec<String>> {
        let products = self.products.read().await;
        // Insertion-order dedup keeps scoring order stable across calls
        let mut brands: Vec<String> = Vec::new();
        for product in products.iter() {
            if !brands.contains(&product.brand) {
                brands.push(product.brand.clone());
            }
        }
        Ok(brands)
    }

    async fn find_match(
        &self,
        brand: &str,
        product_type: &str,
        pack_quantity: i64,
        pack_size: Decimal,
    ) -> Result<Vec<CanonicalProduct>> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| {
                p.brand == brand
                    && p.product_type == product_type
                    && p.pack_quantity == pack_quantity
                    && p.pack_size == pack_size
            })
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<GraphStats> {
        let products = self.products.read().await;

        let mut brands: Vec<&str> = products.iter().map(|p| p.brand.as_str()).collect();
        brands.sort_unstable();
        brands.dedup();

        let mut types: Vec<&str> = products.iter().map(|p| p.product_type.as_str()).collect();
        types.sort_unstable();
        types.dedup();

        let mut node_counts = vec![
            LabelCount {
                name: "Product".to_string(),
                count: products.len() as u64,
            },
            LabelCount {
                name: "Brand".to_string(),
                count: brands.len() as u64,
            },
            LabelCount {
                name: "ProductType".to_string(),
                count: types.len() as u64,
            },
        ];
        node_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let relationship_counts = vec![
            LabelCount {
                name: "HAS_BRAND".to_string(),
                count: products.len() as u64,
            },
            LabelCount {
                name: "IS_TYPE".to_string(),
                count: products.len() as u64,
            },
        ];

        Ok(GraphStats {
            node_counts,
            relationship_counts,
        })
    }

    async fn list_products(&self) -> Result<Vec<CanonicalProduct>> {
        let products = self.products.read().await;
        let mut all: Vec<CanonicalProduct> = products.clone();
        all.sort_by(|a, b| {
            a.brand
                .cmp(&b.brand)
                .then_with(|| a.product_type.cmp(&b.product_type))
        });
        Ok(all)
    }

    async fn list_brands_detailed(&self) -> Result<Vec<BrandCount>> {
        let products = self.products.read().await;
        let mut counts: Vec<BrandCount> = Vec::new();
        for product in products.iter() {
            match counts.iter_mut().find(|c| c.brand == product.brand) {
                Some(entry) => entry.product_count += 1,
                None => counts.push(BrandCount {
                    brand: product.brand.clone(),
                    product_count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| {
            b.product_count
                .cmp(&a.product_count)
                .then_with(|| a.brand.cmp(&b.brand))
        });
        Ok(counts)
    }

    async fn list_product_types_detailed(&self) -> Result<Vec<ProductTypeCount>> {
        let products = self.products.read().await;
        let mut counts: Vec<ProductTypeCount> = Vec::new();
        for product in products.iter() {
            match counts
                .iter_mut()
                .find(|c| c.product_type == product.product_type)
            {
                Some(entry) => entry.product_count += 1,
                None => counts.push(ProductTypeCount {
                    product_type: product.product_type.clone(),
                    product_count: 1,
                }),
            }
        }
        counts.sort_by(|a, b| {
            b.product_count
                .cmp(&a.product_count)
                .then_with(|| a.product_type.cmp(&b.product_type))
        });
        Ok(counts)
    }

    async fn seed_products(&self, products: &[CanonicalProduct], wipe: bool) -> Result<()> {
        let mut store = self.products.write().await;
        if wipe {
            store.clear();
        }
        for product in products {
            // Merge by unique id
            match store.iter_mut().find(|p| p.id == product.id) {
                Some(existing) => *existing = product.clone(),
                None => store.push(product.clone()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[tokio::test]
    async fn test_find_match_exact() {
        let store = MemoryStore::with_products(vec![
            product(1, "Driscoll's", "Strawberry", 8, "1.0"),
            product(2, "Driscoll's", "Blueberry", 6, "6.0"),
        ]);

        let hits = store
            .find_match("Driscoll's", "Strawberry", 8, dec("1.0"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        // Quantity mismatch: no rows
        let hits = store
            .find_match("Driscoll's", "Strawberry", 12, dec("1.0"))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_by_id() {
        let store = MemoryStore::new();
        let batch = vec![product(1, "Driscoll's", "Strawberry", 8, "1.0")];

        store.seed_products(&batch, false).await.unwrap();
        store.seed_products(&batch, false).await.unwrap();

        assert_eq!(store.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_brands_is_stable() {
        let store = MemoryStore::with_products(vec![
            product(1, "Driscoll's", "Strawberry", 8, "1.0"),
            product(2, "Dole", "Banana", 1, "1.0"),
            product(3, "Driscoll's", "Blueberry", 6, "6.0"),
        ]);

        let first = store.list_brands().await.unwrap();
        let second = store.list_brands().await.unwrap();
        assert_eq!(first, vec!["Driscoll's", "Dole"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_stats_counts() {
        let store = MemoryStore::with_products(vec![
            product(1, "Driscoll's", "Strawberry", 8, "1.0"),
            product(2, "Driscoll's", "Blueberry", 6, "6.0"),
        ]);

        let stats = store.stats().await.unwrap();
        let products = stats
            .node_counts
            .iter()
            .find(|c| c.name == "Product")
            .unwrap();
        assert_eq!(products.count, 2);

        let brands = stats.node_counts.iter().find(|c| c.name == "Brand").unwrap();
        assert_eq!(brands.count, 1);
    }

    #[tokio::test]
    async fn test_detailed_counts_ordering() {
        let store = MemoryStore::with_products(vec![
            product(1, "Driscoll's", "Strawberry", 8, "1.0"),
            product(2, "Driscoll's", "Blueberry", 6, "6.0"),
            product(3, "Dole", "Banana", 1, "1.0"),
        ]);

        let brands = store.list_brands_detailed().await.unwrap();
        assert_eq!(brands[0].brand, "Driscoll's");
        assert_eq!(brands[0].product_count, 2);
        assert_eq!(brands[1].brand, "Dole");
    }
}
