//! Categorization pipeline
//!
//! Wires the extractor, normalizer, and matcher into one synchronous
//! run per submission: extract → normalize → match. Every stage fails
//! fast; a failed submission leaves the session usable for the next one.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::catalog::{NormalizedAttributes, RawAttributes};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::AttributeExtractor;
use crate::llm::LlmClient;
use crate::matcher::{MatchOutcome, Matcher};
use crate::normalize::Normalizer;
use crate::store::CatalogStore;

/// Everything a display surface needs to explain one categorization run
#[derive(Debug, Clone, Serialize)]
pub struct CategorizationReport {
    /// The submitted description
    pub description: String,
    /// Attributes as extracted, before normalization
    pub extracted: RawAttributes,
    /// Attributes after vocabulary normalization
    pub normalized: NormalizedAttributes,
    /// Terminal match result
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

/// One categorization session over a catalog store
///
/// Owns the long-lived pipeline resources. The known-brand vocabulary is
/// fetched lazily on first use and cached for the lifetime of the
/// categorizer; staleness is an accepted trade-off since vocabulary
/// changes happen out of band.
pub struct Categorizer {
    extractor: AttributeExtractor,
    normalizer: Normalizer,
    matcher: Matcher,
    store: Arc<dyn CatalogStore>,
    known_brands: RwLock<Option<Vec<String>>>,
}

impl Categorizer {
    /// Assemble a categorizer from already-built components
    pub fn new(
        extractor: AttributeExtractor,
        normalizer: Normalizer,
        store: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            extractor,
            normalizer,
            matcher: Matcher::new(store.clone()),
            store,
            known_brands: RwLock::new(None),
        }
    }

    /// Build the standard pipeline from configuration
    ///
    /// Resolves the LLM API key from the environment; fails with a
    /// configuration error when it is missing.
    pub fn from_config(config: &Config, store: Arc<dyn CatalogStore>) -> Result<Self> {
        let api_key = config
            .llm
            .resolved_api_key()
            .map_err(|e| Error::Config(e.to_string()))?
            .ok_or_else(|| {
                Error::Config(
                    "No LLM API key set. Export OPENAI_API_KEY or SKUGRAPH_API_KEY.".to_string(),
                )
            })?;

        let llm_client = LlmClient::new(config.llm.clone(), api_key)?;
        let extractor = AttributeExtractor::new(Arc::new(llm_client));
        let normalizer = Normalizer::new(&config.normalizer);

        Ok(Self::new(extractor, normalizer, store))
    }

    /// Run the full pipeline on a raw product description
    pub async fn categorize(&self, description: &str) -> Result<CategorizationReport> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::InvalidInput(
                "Product description must not be empty".to_string(),
            ));
        }

        info!(description = %description, "Categorizing");

        let extracted = self.extractor.extract(description).await?;
        if extracted.is_empty() {
            warn!("Extraction produced no attributes");
        }
        self.resolve(description, extracted).await
    }

    /// Run the post-extraction half of the pipeline
    ///
    /// Split out so the normalization and matching stages can be driven
    /// without a live completion service.
    pub async fn resolve(
        &self,
        description: &str,
        extracted: RawAttributes,
    ) -> Result<CategorizationReport> {
        let brands = self.brands().await?;
        let normalized = self.normalizer.normalize(&extracted, &brands)?;
        let outcome = self.matcher.resolve(&normalized).await?;

        info!(matched = outcome.is_matched(), "Categorization complete");

        Ok(CategorizationReport {
            description: description.to_string(),
            extracted,
            normalized,
            outcome,
        })
    }

    /// Re-read the brand vocabulary from the store
    pub async fn refresh_brands(&self) -> Result<usize> {
        let brands = self.store.list_brands().await?;
        let count = brands.len();
        *self.known_brands.write().await = Some(brands);
        debug!(count, "Refreshed brand vocabulary");
        Ok(count)
    }

    /// The cached brand vocabulary, fetched on first use
    async fn brands(&self) -> Result<Vec<String>> {
        if let Some(brands) = self.known_brands.read().await.as_ref() {
            return Ok(brands.clone());
        }

        let brands = self.store.list_brands().await?;
        debug!(count = brands.len(), "Loaded brand vocabulary");
        *self.known_brands.write().await = Some(brands.clone());
        Ok(brands)
    }
}
