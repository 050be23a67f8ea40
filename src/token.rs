//! Token segment splitting
use crate::claims::ClaimSet;
use crate::error::{Error, Result};
use crate::limits::{MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH};
use crate::utils::base64url;
use serde_json::Value;

/// The three Base64URL segments of a token, borrowed from the token string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> TokenParts<'a> {
    /// Split a token into its segments
    ///
    /// The token must fit in `MAX_TOKEN_LENGTH` and consist of exactly three
    /// non-empty dot-separated segments.
    pub(crate) fn split(token: &'a str) -> Result<Self> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = token.split('.');
        let header = parts.next().ok_or(Error::FormatInvalid)?;
        let payload = parts.next().ok_or(Error::FormatInvalid)?;
        let signature = parts.next().ok_or(Error::FormatInvalid)?;
        if parts.next().is_some() {
            return Err(Error::FormatInvalid);
        }

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(Error::FormatInvalid);
        }

        Ok(Self {
            header,
            payload,
            signature,
        })
    }

    /// `header.payload`, the bytes covered by the signature
    pub(crate) fn signing_input(&self) -> String {
        format!("{}.{}", self.header, self.payload)
    }

    /// Decode the payload segment into a claim set
    pub(crate) fn payload_claims(&self) -> Result<ClaimSet> {
        let json = base64url::decode_string(self.payload, MAX_DECODED_PAYLOAD_SIZE)?;
        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(claims)) => Ok(claims),
            Ok(_) => Err(Error::FormatInvalidJson(
                "payload is not a JSON object".into(),
            )),
            Err(e) => Err(Error::FormatInvalidJson(format!(
                "Failed to parse payload: {e}"
            ))),
        }
    }
}
