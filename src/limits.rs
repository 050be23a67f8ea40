//! Size limit constants for input validation

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded JWT header JSON (8KB)
/// The header this crate writes is 27 bytes; foreign headers get a margin
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// Covers RSA moduli up to 8192 bits
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum leeway for temporal claim checks (300 seconds = 5 minutes)
pub const MAX_LEEWAY_SECONDS: u64 = 300;
