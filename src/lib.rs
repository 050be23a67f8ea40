//! # jwtpair - RS256 Tokens Bound to a Key Pair
//!
//! > Issue and validate RS256 JSON Web Tokens with a PEM key pair.
//!
//! **jwtpair** wraps one RSA key pair in a [`TokenCodec`]. The private key
//! signs tokens carrying caller claims plus `iss`, `aud`, `sub`, `iat` and an
//! optional relative `exp`; the public key verifies them and checks their
//! validity window. Either key may be withheld, so an issuing service and a
//! verifying service can each hold only the half they need.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtpair::{ClaimSet, TokenCodec};
//! use serde_json::json;
//!
//! let codec = TokenCodec::new()
//!     .private_key(private_pem)
//!     .public_key(public_pem)
//!     .build();
//!
//! let mut claims = ClaimSet::new();
//! claims.insert("role".into(), json!("admin"));
//!
//! let token = codec.encode("issuer", "audience", "subject", Some("+ 1 hour"), claims)?;
//!
//! // Verified claims, or an error naming the failure
//! let claims = codec.decode(&token, false)?;
//!
//! // Verified claims, or `None` when the token is expired or forged
//! let maybe = codec.decode(&token, true)?;
//!
//! // Claims without any verification
//! let unverified = codec.extract_payload(&token)?;
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! base64url({"alg":"RS256","typ":"JWT"}) "." base64url(claims) "." base64url(signature)
//! ```
//!
//! Segments are written without padding and read with or without it. Claims
//! keep their insertion order on the wire.
//!
//! ## Decode Pipeline
//!
//! ```text
//! split (3 non-empty segments, size limit)
//!     │
//!     ▼
//! RS256 signature over header.payload
//!     │
//!     ▼
//! header names RS256
//!     │
//!     ▼
//! payload is a JSON object
//!     │
//!     ▼
//! exp / nbf / iat within leeway
//! ```
//!
//! ## Error Handling
//!
//! Every failure is an [`Error`] with an [`ErrorKind`]. `decode(token, true)`
//! turns verification, temporal and key failures into `Ok(None)`; see
//! [`Error::is_suppressible`]. A token that is not well formed is reported
//! regardless.

mod error;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod claims;
pub(crate) mod codec;
pub(crate) mod expires;
pub(crate) mod header;
pub(crate) mod keys;
pub(crate) mod token;
pub mod utils;

// Public Interface
pub use algorithm::RS256;
pub use claims::{ClaimSet, RESERVED_CLAIMS};
pub use codec::TokenCodec;
pub use error::{Error, ErrorKind, Result};
pub use expires::{OffsetTerm, RelativeOffset, TimeUnit, resolve_expiration};
pub use keys::KeyPair;
pub use limits::MAX_LEEWAY_SECONDS;

pub(crate) mod limits;
