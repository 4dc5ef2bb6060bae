//! Error types for skugraph

use thiserror::Error;

/// Result type alias using skugraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Skugraph error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (E001-E099)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Network errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    Network(#[from] reqwest::Error),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Rate limited. Waiting {0} seconds before retry.")]
    RateLimited(u64),

    // Normalization errors (E200-E299)
    #[error(
        "No confident brand match for '{brand}' (best score {best_score}/100, need > {threshold})"
    )]
    BrandNotConfident {
        brand: String,
        best_score: u8,
        threshold: u8,
    },

    // Store errors (E300-E399)
    #[error("Store error: {0}")]
    Store(String),

    // Config errors (E400-E499)
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E001",
            Self::Network(_) => "E100",
            Self::Extraction(_) => "E101",
            Self::RateLimited(_) => "E102",
            Self::BrandNotConfident { .. } => "E200",
            Self::Store(_) => "E300",
            Self::Config(_) => "E400",
            Self::Json(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Network(_) => Some("Check internet connection".to_string()),
            Self::Extraction(_) => {
                Some("Verify OPENAI_API_KEY is set, then resubmit the description".to_string())
            }
            Self::BrandNotConfident { .. } => {
                Some("Seed the brand into the catalog or correct the description".to_string())
            }
            Self::Store(_) => {
                Some("Check NEO4J_URI, NEO4J_USERNAME and NEO4J_PASSWORD".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidInput("x".into()).code(), "E001");
        assert_eq!(Error::Extraction("bad json".into()).code(), "E101");
        assert_eq!(
            Error::BrandNotConfident {
                brand: "Driscol".into(),
                best_score: 70,
                threshold: 80,
            }
            .code(),
            "E200"
        );
        assert_eq!(Error::Store("down".into()).code(), "E300");
    }

    #[test]
    fn test_brand_not_confident_message() {
        let err = Error::BrandNotConfident {
            brand: "Driscol".into(),
            best_score: 72,
            threshold: 80,
        };
        let msg = err.to_string();
        assert!(msg.contains("Driscol"));
        assert!(msg.contains("72"));
        assert!(err.suggestion().is_some());
    }
}
