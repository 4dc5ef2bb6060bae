//! Attribute extraction from raw product descriptions
//!
//! Wraps one chat-completion request per description. The model is asked
//! for a JSON object carrying the attribute schema; the response is
//! schema-validated into a [`RawAttributes`] record. Anything else is a
//! contract violation reported as `Error::Extraction`; it is never
//! retried and never fatal to the session.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::catalog::RawAttributes;
use crate::error::{Error, Result};
use crate::llm::{LlmClient, Message};

/// Which attribute schema the model is asked to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeSchema {
    /// Five keys: brand, product_type, pack_quantity, pack_size, uom
    #[default]
    Full,
    /// Two keys: pack_size, uom (secondary prototype dataset variant)
    Reduced,
}

/// Attribute extractor over a chat-completion capability
///
/// Stateless beyond its configuration: one outbound request per call,
/// no store access, no caching.
#[derive(Clone)]
pub struct AttributeExtractor {
    llm_client: Arc<LlmClient>,
    schema: AttributeSchema,
}

impl AttributeExtractor {
    /// Create an extractor for the full five-key schema
    pub fn new(llm_client: Arc<LlmClient>) -> Self {
        Self {
            llm_client,
            schema: AttributeSchema::Full,
        }
    }

    /// Select the schema variant
    pub fn with_schema(mut self, schema: AttributeSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Extract structured attributes from a raw product description
    pub async fn extract(&self, description: &str) -> Result<RawAttributes> {
        info!(description = %description, "Extracting attributes");

        let system_prompt = match self.schema {
            AttributeSchema::Full => EXTRACTION_SYSTEM_PROMPT,
            AttributeSchema::Reduced => REDUCED_EXTRACTION_SYSTEM_PROMPT,
        };

        let messages = vec![
            Message::system(system_prompt),
            Message::user(format!("Product Description: {}", description)),
        ];

        let response = self.llm_client.complete_json(messages).await?;

        debug!(tokens = response.tokens_used, "Extraction response received");

        self.parse_response(&response.content, description)
    }

    /// Parse and validate the model's JSON response
    ///
    /// Public so the response contract can be exercised without a live
    /// completion service.
    pub fn parse_response(
        &self,
        content: &str,
        description: &str,
    ) -> Result<RawAttributes> {
        let json_str = extract_json_from_response(content);

        let mut raw: RawAttributes = serde_json::from_str(&json_str).map_err(|e| {
            warn!(error = %e, "Extraction response is not a valid attribute object");
            Error::Extraction(format!("Invalid response: {}", e))
        })?;

        // Case/pack notation in the description is ground truth; the model
        // does not get to disagree with the literal numbers.
        if let Some((quantity, size, uom)) = parse_pack_notation(description) {
            raw.pack_quantity = Some(quantity);
            raw.pack_size = Some(size);
            raw.uom = Some(uom);
        } else if self.schema == AttributeSchema::Full && raw.pack_quantity.is_none() {
            // No case format present: single-unit pack
            raw.pack_quantity = Some(1);
        }

        Ok(raw)
    }
}

/// Parse case/pack notation like "8/1LB" or "12/4.5OZ"
///
/// Returns (pack_quantity, pack_size, uom) when the description contains
/// exactly that shorthand.
pub fn parse_pack_notation(description: &str) -> Option<(i64, Decimal, String)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(\d+)\s*/\s*(\d+(?:\.\d+)?)\s*([A-Za-z]+)").expect("pack notation pattern")
    });

    let caps = re.captures(description)?;
    let quantity: i64 = caps[1].parse().ok()?;
    let size: Decimal = caps[2].parse().ok()?;
    let uom = caps[3].to_string();

    Some((quantity, size, uom))
}

/// System prompt for the full five-key schema
const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an expert supply chain data analyst. Your task is to extract and standardize key attributes from a raw product description string. Many descriptions use a case/pack format like '8/1LB' which means 8 units of 1 LB each.

Return a JSON object with the following keys:
'brand', 'product_type', 'pack_quantity', 'pack_size', and 'uom'.

- CRITICAL RULE: For 'product_type', always return the singular, base form.
  (e.g., "Strawberries" -> "Strawberry").
- Case/Pack Logic:
  - For "STRAWBERRY DRISCOLL 8/1LB", 'pack_quantity' is 8 and 'pack_size' is 1.
  - If no case format is present, 'pack_quantity' should be 1.
- If a value isn't found, the value should be null. Never invent a value."#;

/// System prompt for the reduced two-key schema
const REDUCED_EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an expert supply chain data analyst. Your task is to extract pack sizing from a raw product description string. Many descriptions use a case/pack format like '8/1LB' which means 8 units of 1 LB each.

Return a JSON object with exactly two keys: 'pack_size' and 'uom'.

- For "STRAWBERRY DRISCOLL 8/1LB", 'pack_size' is 1 and 'uom' is "LB".
- If a value isn't found, the value should be null. Never invent a value."#;

/// Extract JSON from a response that might contain markdown fences
fn extract_json_from_response(response: &str) -> String {
    // JSON in a ```json code block
    if let Some(start) = response.find("```json") {
        let json_start = start + 7;
        if let Some(end) = response[json_start..].find("```") {
            return response[json_start..json_start + end].trim().to_string();
        }
    }

    // JSON in a generic code block
    if let Some(start) = response.find("```") {
        let potential_start = start + 3;
        if let Some(newline) = response[potential_start..].find('\n') {
            let json_start = potential_start + newline + 1;
            if let Some(end) = response[json_start..].find("```") {
                return response[json_start..json_start + end].trim().to_string();
            }
        }
    }

    // Raw JSON object
    if let (Some(start), Some(end)) = (response.find('{'), response.rfind('}')) {
        return response[start..=end].to_string();
    }

    response.to_string()
}
