//! Errors for jwtpair

use thiserror::Error;

/// jwtpair Errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed jwt received: expected three non-empty parts separated by '.'")]
    FormatInvalid,

    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    // ============================================================================
    // Verification Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Algorithm '{found}' not allowed. Allowed: {allowed}")]
    AlgorithmNotAllowed { found: String, allowed: String },

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Expired token: expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    TokenIssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token claim validation failed: {0}")]
    TokenInvalidClaim(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("Invalid key material: {0}")]
    KeyFormatInvalid(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Missing required field: {0}")]
    ClaimMissingField(String),

    #[error("Invalid expiration expression: {0}")]
    ExpiresInvalid(String),

    #[error("Integer overflow in timestamp arithmetic")]
    TimestampOverflow,

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Leeway too large: {value} seconds (maximum: {max} seconds)")]
    LeewayTooLarge { value: u64, max: u64 },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token string is not a well-formed three part token
    Malformed,
    /// The signature or algorithm did not check out
    Verification,
    /// The token is signed correctly but outside its validity window
    Temporal,
    /// Key bytes could not be parsed as an RSA key
    Key,
    /// The private key is missing or the signing primitive failed
    Signing,
    /// Caller supplied arguments were rejected
    Input,
    /// The codec itself is misconfigured
    Configuration,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FormatInvalid
            | Error::TokenTooLarge { .. }
            | Error::FormatInvalidBase64(_)
            | Error::FormatInvalidJson(_) => ErrorKind::Malformed,

            Error::SignatureInvalid | Error::AlgorithmNotAllowed { .. } => ErrorKind::Verification,

            Error::TokenExpired { .. }
            | Error::TokenNotYetValid { .. }
            | Error::TokenIssuedInFuture { .. }
            | Error::TokenInvalidClaim(_) => ErrorKind::Temporal,

            Error::KeyFormatInvalid(_) => ErrorKind::Key,
            Error::SigningFailed(_) => ErrorKind::Signing,

            Error::ClaimMissingField(_) | Error::ExpiresInvalid(_) | Error::TimestampOverflow => {
                ErrorKind::Input
            }

            Error::ConfigurationInvalid(_) | Error::LeewayTooLarge { .. } => {
                ErrorKind::Configuration
            }
        }
    }

    /// Whether `decode(token, true)` turns this error into an absent result
    ///
    /// Only verification, temporal and key parsing failures qualify. A
    /// malformed token always reaches the caller.
    pub fn is_suppressible(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Verification | ErrorKind::Temporal | ErrorKind::Key
        )
    }
}

/// Result type alias for jwtpair operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_is_never_suppressible() {
        for err in [
            Error::FormatInvalid,
            Error::TokenTooLarge { size: 10, max: 5 },
            Error::FormatInvalidBase64("bad".into()),
            Error::FormatInvalidJson("bad".into()),
        ] {
            assert_eq!(err.kind(), ErrorKind::Malformed);
            assert!(!err.is_suppressible(), "{err} must propagate");
        }
    }

    #[test]
    fn test_verification_and_temporal_are_suppressible() {
        let expired = Error::TokenExpired {
            expired_at: 1,
            now: 2,
            leeway: 0,
        };
        assert!(expired.is_suppressible());
        assert!(Error::SignatureInvalid.is_suppressible());
        assert!(Error::KeyFormatInvalid("not pem".into()).is_suppressible());
        assert!(
            Error::AlgorithmNotAllowed {
                found: "HS256".into(),
                allowed: "RS256".into(),
            }
            .is_suppressible()
        );
    }

    #[test]
    fn test_signing_and_configuration_propagate() {
        assert!(!Error::SigningFailed("no private key configured".into()).is_suppressible());
        assert!(!Error::ConfigurationInvalid("no public key configured".into()).is_suppressible());
        assert!(!Error::LeewayTooLarge { value: 900, max: 300 }.is_suppressible());
        assert!(!Error::ExpiresInvalid("+ 1 lightyear".into()).is_suppressible());
    }

    #[test]
    fn test_expired_message() {
        let err = Error::TokenExpired {
            expired_at: 100,
            now: 200,
            leeway: 0,
        };
        assert!(err.to_string().starts_with("Expired token"));
    }
}
