//! Neo4j-backed catalog store
//!
//! Speaks Cypher over the HTTP transaction endpoint
//! (`{uri}/db/{database}/tx/commit`). Every operation is a single
//! auto-committed transaction; the categorization path only ever reads.
//! Connectivity and query failures surface as `Error::Store` and are never
//! retried here: retries belong to the caller's session policy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::debug;

use crate::catalog::{BrandCount, CanonicalProduct, GraphStats, LabelCount, ProductTypeCount};
use crate::config::{StoreConfig, StoreCredentials};
use crate::error::{Error, Result};

use super::CatalogStore;

const LIST_BRANDS: &str = "MATCH (b:Brand) RETURN b.name AS brand_name ORDER BY brand_name";

const FIND_MATCH: &str = "\
MATCH (p:Product)-[:HAS_BRAND]->(b:Brand {name: $brand})
MATCH (p)-[:IS_TYPE]->(pt:ProductType {name: $product_type})
WHERE p.pack_quantity = $pack_quantity AND p.pack_size = $pack_size
RETURN p.id AS id, p.description AS description, b.name AS brand,
       pt.name AS product_type, p.pack_quantity AS pack_quantity,
       p.pack_size AS pack_size, p.uom AS uom";

const NODE_COUNTS: &str = "\
MATCH (n)
RETURN labels(n)[0] AS node_type, count(n) AS count
ORDER BY count DESC";

const RELATIONSHIP_COUNTS: &str = "\
MATCH ()-[r]->()
RETURN type(r) AS relationship_type, count(r) AS count
ORDER BY count DESC";

const LIST_PRODUCTS: &str = "\
MATCH (p:Product)-[:HAS_BRAND]->(b:Brand)
MATCH (p)-[:IS_TYPE]->(pt:ProductType)
RETURN p.id AS id, p.description AS description, b.name AS brand,
       pt.name AS product_type, p.pack_quantity AS pack_quantity,
       p.pack_size AS pack_size, p.uom AS uom
ORDER BY brand, product_type";

const BRANDS_DETAILED: &str = "\
MATCH (b:Brand)<-[:HAS_BRAND]-(p:Product)
RETURN b.name AS brand_name, count(p) AS product_count
ORDER BY product_count DESC, brand_name";

const TYPES_DETAILED: &str = "\
MATCH (pt:ProductType)<-[:IS_TYPE]-(p:Product)
RETURN pt.name AS product_type, count(p) AS product_count
ORDER BY product_count DESC, product_type";

const WIPE: &str = "MATCH (n) DETACH DELETE n";

const MERGE_PRODUCT: &str = "\
MERGE (p:Product {id: $id})
ON CREATE SET p.description = $description,
              p.pack_quantity = $pack_quantity,
              p.pack_size = $pack_size,
              p.uom = $uom
MERGE (b:Brand {name: $brand})
MERGE (p)-[:HAS_BRAND]->(b)
MERGE (pt:ProductType {name: $product_type})
MERGE (p)-[:IS_TYPE]->(pt)";

/// Catalog store over the Neo4j HTTP transaction API
///
/// Expects the HTTP(S) endpoint of the database (e.g.
/// `http://localhost:7474`), not the Bolt URI.
#[derive(Clone)]
pub struct Neo4jStore {
    http_client: HttpClient,
    endpoint: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for Neo4jStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jStore")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .finish()
    }
}

impl Neo4jStore {
    /// Connect to a Neo4j database with the given credentials
    pub fn new(credentials: &StoreCredentials, config: &StoreConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Network)?;

        let endpoint = format!(
            "{}/db/{}/tx/commit",
            credentials.uri.trim_end_matches('/'),
            config.database
        );

        Ok(Self {
            http_client,
            endpoint,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
    }

    /// Run one or more Cypher statements in a single auto-commit transaction
    ///
    /// Returns the rows of each statement, in statement order.
    async fn run(&self, statements: Vec<(&str, Value)>) -> Result<Vec<Vec<Vec<Value>>>> {
        let statement_count = statements.len();
        let body = json!({
            "statements": statements
                .into_iter()
                .map(|(statement, parameters)| json!({
                    "statement": statement,
                    "parameters": parameters,
                }))
                .collect::<Vec<_>>(),
        });

        debug!(endpoint = %self.endpoint, statements = statement_count, "Running Cypher transaction");

        let response = self
            .http_client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Store(format!("Neo4j request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("Neo4j HTTP {}: {}", status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Store(format!("Malformed Neo4j response: {}", e)))?;

        check_errors(&body)?;

        (0..statement_count).map(|i| extract_rows(&body, i)).collect()
    }

    /// Run a single statement and return its rows
    async fn run_one(&self, statement: &str, parameters: Value) -> Result<Vec<Vec<Value>>> {
        let mut results = self.run(vec![(statement, parameters)]).await?;
        Ok(results.pop().unwrap_or_default())
    }
}

#[async_trait]
impl CatalogStore for Neo4jStore {
    async fn list_brands(&self) -> Result<Vec<String>> {
        let rows = self.run_one(LIST_BRANDS, json!({})).await?;
        rows.iter()
            .map(|row| {
                row.first()
                    .and_then(Value::as_str)
                    .map(String::from)
                    .ok_or_else(|| Error::Store("Brand row missing name".to_string()))
            })
            .collect()
    }

    async fn find_match(
        &self,
        brand: &str,
        product_type: &str,
        pack_quantity: i64,
        pack_size: Decimal,
    ) -> Result<Vec<CanonicalProduct>> {
        let parameters = json!({
            "brand": brand,
            "product_type": product_type,
            "pack_quantity": pack_quantity,
            "pack_size": pack_size,
        });

        let rows = self.run_one(FIND_MATCH, parameters).await?;
        rows.iter().map(|row| row_to_product(row)).collect()
    }

    async fn stats(&self) -> Result<GraphStats> {
        let mut results = self
            .run(vec![(NODE_COUNTS, json!({})), (RELATIONSHIP_COUNTS, json!({}))])
            .await?;

        let relationship_rows = results.pop().unwrap_or_default();
        let node_rows = results.pop().unwrap_or_default();

        Ok(GraphStats {
            node_counts: rows_to_label_counts(&node_rows)?,
            relationship_counts: rows_to_label_counts(&relationship_rows)?,
        })
    }

    async fn list_products(&self) -> Result<Vec<CanonicalProduct>> {
        let rows = self.run_one(LIST_PRODUCTS, json!({})).await?;
        rows.iter().map(|row| row_to_product(row)).collect()
    }

    async fn list_brands_detailed(&self) -> Result<Vec<BrandCount>> {
        let rows = self.run_one(BRANDS_DETAILED, json!({})).await?;
        rows.iter()
            .map(|row| {
                Ok(BrandCount {
                    brand: str_at(row, 0)?,
                    product_count: u64_at(row, 1)?,
                })
            })
            .collect()
    }

    async fn list_product_types_detailed(&self) -> Result<Vec<ProductTypeCount>> {
        let rows = self.run_one(TYPES_DETAILED, json!({})).await?;
        rows.iter()
            .map(|row| {
                Ok(ProductTypeCount {
                    product_type: str_at(row, 0)?,
                    product_count: u64_at(row, 1)?,
                })
            })
            .collect()
    }

    async fn seed_products(&self, products: &[CanonicalProduct], wipe: bool) -> Result<()> {
        if wipe {
            self.run_one(WIPE, json!({})).await?;
        }

        let statements: Vec<(&str, Value)> = products
            .iter()
            .map(|product| {
                (
                    MERGE_PRODUCT,
                    json!({
                        "id": product.id,
                        "description": product.description,
                        "brand": product.brand,
                        "product_type": product.product_type,
                        "pack_quantity": product.pack_quantity,
                        "pack_size": product.pack_size,
                        "uom": product.uom,
                    }),
                )
            })
            .collect();

        if !statements.is_empty() {
            self.run(statements).await?;
        }
        Ok(())
    }
}

/// Fail when the transaction response carries Neo4j errors
fn check_errors(body: &Value) -> Result<()> {
    let errors = body.get("errors").and_then(Value::as_array);
    if let Some(errors) = errors {
        if let Some(first) = errors.first() {
            let code = first.get("code").and_then(Value::as_str).unwrap_or("unknown");
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("no message");
            return Err(Error::Store(format!("Neo4j error {}: {}", code, message)));
        }
    }
    Ok(())
}

/// Extract the rows of the n-th statement result
fn extract_rows(body: &Value, index: usize) -> Result<Vec<Vec<Value>>> {
    let data = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.get(index))
        .and_then(|result| result.get("data"))
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Store("Malformed Neo4j response: missing results".to_string()))?;

    data.iter()
        .map(|entry| {
            entry
                .get("row")
                .and_then(Value::as_array)
                .cloned()
                .ok_or_else(|| Error::Store("Malformed Neo4j response: missing row".to_string()))
        })
        .collect()
}

/// Build a product from a FIND_MATCH / LIST_PRODUCTS row
fn row_to_product(row: &[Value]) -> Result<CanonicalProduct> {
    Ok(CanonicalProduct {
        id: i64_at(row, 0)?,
        description: row
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        brand: str_at(row, 2)?,
        product_type: str_at(row, 3)?,
        pack_quantity: i64_at(row, 4)?,
        pack_size: decimal_at(row, 5)?,
        uom: row
            .get(6)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn rows_to_label_counts(rows: &[Vec<Value>]) -> Result<Vec<LabelCount>> {
    rows.iter()
        .map(|row| {
            Ok(LabelCount {
                name: str_at(row, 0)?,
                count: u64_at(row, 1)?,
            })
        })
        .collect()
}

fn str_at(row: &[Value], index: usize) -> Result<String> {
    row.get(index)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| Error::Store(format!("Expected string at column {}", index)))
}

fn i64_at(row: &[Value], index: usize) -> Result<i64> {
    row.get(index)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::Store(format!("Expected integer at column {}", index)))
}

fn u64_at(row: &[Value], index: usize) -> Result<u64> {
    row.get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::Store(format!("Expected count at column {}", index)))
}

fn decimal_at(row: &[Value], index: usize) -> Result<Decimal> {
    let value = row
        .get(index)
        .ok_or_else(|| Error::Store(format!("Expected number at column {}", index)))?;

    // Neo4j returns floats for pack_size; integers appear for whole sizes
    if let Some(i) = value.as_i64() {
        return Ok(Decimal::from(i));
    }
    value
        .as_f64()
        .and_then(|f| Decimal::try_from(f).ok())
        .ok_or_else(|| Error::Store(format!("Expected number at column {}", index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_response() -> Value {
        serde_json::from_str(
            r#"{
            "results": [{
                "columns": ["id", "description", "brand", "product_type", "pack_quantity", "pack_size", "uom"],
                "data": [
                    {"row": [7669, "STRAWBERRY DRISCOLL 8/1LB", "Driscoll's", "Strawberry", 8, 1.0, "LB"]}
                ]
            }],
            "errors": []
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_extract_rows() {
        let body = match_response();
        let rows = extract_rows(&body, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], json!(7669));
    }

    #[test]
    fn test_extract_rows_missing_statement() {
        let body = match_response();
        assert!(extract_rows(&body, 1).is_err());
    }

    #[test]
    fn test_row_to_product() {
        let body = match_response();
        let rows = extract_rows(&body, 0).unwrap();
        let product = row_to_product(&rows[0]).unwrap();

        assert_eq!(product.id, 7669);
        assert_eq!(product.brand, "Driscoll's");
        assert_eq!(product.product_type, "Strawberry");
        assert_eq!(product.pack_quantity, 8);
        assert_eq!(product.pack_size, "1.0".parse().unwrap());
        assert_eq!(product.uom, "LB");
    }

    #[test]
    fn test_check_errors_reports_first_error() {
        let body: Value = serde_json::from_str(
            r#"{"results": [], "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "bad query"}]}"#,
        )
        .unwrap();

        match check_errors(&body) {
            Err(Error::Store(msg)) => {
                assert!(msg.contains("SyntaxError"));
                assert!(msg.contains("bad query"));
            }
            other => panic!("expected store error, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_pack_size_parses() {
        let row = vec![
            json!(1),
            json!("desc"),
            json!("Driscoll's"),
            json!("Blueberry"),
            json!(6),
            json!(6),
            json!("OZ"),
        ];
        let product = row_to_product(&row).unwrap();
        assert_eq!(product.pack_size, Decimal::from(6));
    }
}
