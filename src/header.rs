use crate::algorithm::RS256;
use crate::error::{Error, Result};
use crate::limits::MAX_DECODED_HEADER_SIZE;
use crate::utils::base64url;
use miniserde::{Deserialize, Serialize};

/// JWT header structure
///
/// Tokens written by this crate always carry `{"alg":"RS256","typ":"JWT"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Token type (typically "JWT")
    #[serde(rename = "typ")]
    pub token_type: Option<String>,
}

impl TokenHeader {
    /// The header written on every encoded token
    pub(crate) fn rs256() -> Self {
        Self {
            algorithm: RS256.name().to_string(),
            token_type: Some("JWT".to_string()),
        }
    }

    /// Serialize and Base64URL-encode the header
    pub(crate) fn to_base64(&self) -> String {
        base64url::encode_bytes(miniserde::json::to_string(self))
    }

    /// Decode a header segment
    pub(crate) fn from_base64(segment: &str) -> Result<Self> {
        let json = base64url::decode_string(segment, MAX_DECODED_HEADER_SIZE)?;
        miniserde::json::from_str(&json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))
    }

    /// Require the header to name the one supported algorithm
    pub(crate) fn ensure_rs256(&self) -> Result<()> {
        if self.algorithm == RS256.name() {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: self.algorithm.clone(),
                allowed: RS256.name().to_string(),
            })
        }
    }
}
