//! Encoding helpers
pub mod base64url;

pub use base64url::encode_bytes;
