//! RS256 signing and verification
use crate::error::{Error, Result};
use crate::keys::{SigningKey, VerifyingKey};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, UnparsedPublicKey};

/// RS256 algorithm (RSASSA-PKCS1-v1_5 with SHA-256)
///
/// The only algorithm this crate issues or accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RS256;

impl RS256 {
    /// The algorithm identifier written to the `alg` header
    pub const fn name(&self) -> &'static str {
        "RS256"
    }

    /// Sign the signing input and return the Base64URL-encoded signature
    ///
    /// # Arguments
    /// * `signing_input` - The data to sign (header.payload)
    /// * `key` - Parsed RSA private key
    pub(crate) fn sign(&self, signing_input: &str, key: &SigningKey) -> Result<String> {
        let key_pair = key.as_key_pair();
        let rng = SystemRandom::new();
        let mut signature_bytes = vec![0u8; key_pair.public_modulus_len()];

        key_pair
            .sign(
                &signature::RSA_PKCS1_SHA256,
                &rng,
                signing_input.as_bytes(),
                &mut signature_bytes,
            )
            .map_err(|_| Error::SigningFailed("RSA signing operation failed".into()))?;

        Ok(base64url::encode_bytes(&signature_bytes))
    }

    /// Verify a signature
    ///
    /// # Arguments
    /// * `signing_input` - The data that was signed (header.payload)
    /// * `signature` - The Base64URL-encoded signature
    /// * `key` - Parsed RSA public key
    pub(crate) fn verify(
        &self,
        signing_input: &str,
        signature: &str,
        key: &VerifyingKey,
    ) -> Result<()> {
        // An undecodable signature segment cannot match any key
        let signature_bytes = base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| Error::SignatureInvalid)?;

        let public_key =
            UnparsedPublicKey::new(&signature::RSA_PKCS1_2048_8192_SHA256, key.as_der());

        public_key
            .verify(signing_input.as_bytes(), &signature_bytes)
            .map_err(|_| Error::SignatureInvalid)
    }
}

impl std::fmt::Display for RS256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
