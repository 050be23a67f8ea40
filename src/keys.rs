//! Key material for RS256 signing and verification
//!
//! A [`KeyPair`] holds the raw PEM bytes it was given and never changes them.
//! Each key is parsed on first use and the result (success or failure) is
//! kept for every later call and every clone, so malformed keys only surface
//! when `encode` or `decode` needs them:
//! - private keys: PKCS#8 (`PRIVATE KEY`) or PKCS#1 (`RSA PRIVATE KEY`)
//! - public keys: SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`)
use crate::error::{Error, Result};
use aws_lc_rs::signature::RsaKeyPair;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::{Arc, OnceLock};

/// PEM bytes plus their parsed form, filled on first use
struct KeySlot<K> {
    pem: Box<[u8]>,
    parsed: OnceLock<Result<K>>,
}

impl<K> KeySlot<K> {
    fn new(pem: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            pem: pem.into(),
            parsed: OnceLock::new(),
        })
    }

    fn get_or_parse(&self, parse: impl FnOnce(&[u8]) -> Result<K>) -> Result<&K> {
        self.parsed
            .get_or_init(|| parse(&*self.pem))
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// PEM-encoded private and public key, either of which may be absent
#[derive(Clone, Default)]
pub struct KeyPair {
    private_key: Option<Arc<KeySlot<SigningKey>>>,
    public_key: Option<Arc<KeySlot<VerifyingKey>>>,
}

impl KeyPair {
    /// Create a key pair from optional PEM bytes
    pub fn new(private_pem: Option<&[u8]>, public_pem: Option<&[u8]>) -> Self {
        Self {
            private_key: private_pem.map(KeySlot::new),
            public_key: public_pem.map(KeySlot::new),
        }
    }

    /// Replace the private key
    pub fn with_private(mut self, pem: impl AsRef<[u8]>) -> Self {
        self.private_key = Some(KeySlot::new(pem.as_ref()));
        self
    }

    /// Replace the public key
    pub fn with_public(mut self, pem: impl AsRef<[u8]>) -> Self {
        self.public_key = Some(KeySlot::new(pem.as_ref()));
        self
    }

    /// Whether a private key was supplied
    pub fn has_private(&self) -> bool {
        self.private_key.is_some()
    }

    /// Whether a public key was supplied
    pub fn has_public(&self) -> bool {
        self.public_key.is_some()
    }

    pub(crate) fn signing_key(&self) -> Result<&SigningKey> {
        self.private_key
            .as_deref()
            .ok_or_else(|| Error::SigningFailed("no private key configured".into()))?
            .get_or_parse(SigningKey::from_pem)
    }

    pub(crate) fn verifying_key(&self) -> Result<&VerifyingKey> {
        self.public_key
            .as_deref()
            .ok_or_else(|| Error::ConfigurationInvalid("no public key configured".into()))?
            .get_or_parse(VerifyingKey::from_pem)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_pem", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("public_pem", &self.public_key.as_ref().map(|k| k.pem.len()))
            .finish()
    }
}

/// RSA private key ready for signing
pub(crate) struct SigningKey {
    key_pair: RsaKeyPair,
}

impl SigningKey {
    pub(crate) fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = pem_str(pem)?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::KeyFormatInvalid(format!("Invalid RSA private key: {e}")))?;

        let pkcs8_doc = private_key
            .to_pkcs8_der()
            .map_err(|e| Error::KeyFormatInvalid(format!("Invalid RSA private key: {e}")))?;
        let key_pair = RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes())
            .map_err(|e| Error::KeyFormatInvalid(format!("RSA private key rejected: {e}")))?;

        Ok(Self { key_pair })
    }

    pub(crate) fn as_key_pair(&self) -> &RsaKeyPair {
        &self.key_pair
    }
}

/// RSA public key (DER-encoded PKCS#1 RSAPublicKey)
#[derive(Debug, Clone)]
pub(crate) struct VerifyingKey {
    der: Vec<u8>,
}

impl VerifyingKey {
    pub(crate) fn from_pem(pem: &[u8]) -> Result<Self> {
        let pem = pem_str(pem)?;
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| Error::KeyFormatInvalid(format!("Invalid RSA public key: {e}")))?;

        let der = public_key
            .to_pkcs1_der()
            .map_err(|e| Error::KeyFormatInvalid(format!("Invalid RSA public key: {e}")))?;

        Ok(Self {
            der: der.as_bytes().to_vec(),
        })
    }

    pub(crate) fn as_der(&self) -> &[u8] {
        &self.der
    }
}

fn pem_str(pem: &[u8]) -> Result<&str> {
    std::str::from_utf8(pem)
        .map(str::trim)
        .map_err(|_| Error::KeyFormatInvalid("PEM data is not valid UTF-8".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/private_key.pem");
    const PRIVATE_KEY_PKCS1: &[u8] = include_bytes!("../tests/fixtures/private_key_pkcs1.pem");
    const PUBLIC_KEY: &[u8] = include_bytes!("../tests/fixtures/public_key.pem");
    const PUBLIC_KEY_PKCS1: &[u8] = include_bytes!("../tests/fixtures/public_key_pkcs1.pem");
    const EC_PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/ec_private_key.pem");

    #[test]
    fn test_private_key_formats() {
        assert!(SigningKey::from_pem(PRIVATE_KEY).is_ok());
        assert!(SigningKey::from_pem(PRIVATE_KEY_PKCS1).is_ok());
    }

    #[test]
    fn test_public_key_formats_agree() {
        let spki = VerifyingKey::from_pem(PUBLIC_KEY).unwrap();
        let pkcs1 = VerifyingKey::from_pem(PUBLIC_KEY_PKCS1).unwrap();
        assert_eq!(spki.as_der(), pkcs1.as_der());
    }

    #[test]
    fn test_ec_key_rejected() {
        assert!(matches!(
            SigningKey::from_pem(EC_PRIVATE_KEY),
            Err(Error::KeyFormatInvalid(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            SigningKey::from_pem(b"not a key"),
            Err(Error::KeyFormatInvalid(_))
        ));
        assert!(matches!(
            VerifyingKey::from_pem(&[0xff, 0xfe, 0x00]),
            Err(Error::KeyFormatInvalid(_))
        ));
        // A private key is not a public key
        assert!(matches!(
            VerifyingKey::from_pem(PRIVATE_KEY),
            Err(Error::KeyFormatInvalid(_))
        ));
    }

    #[test]
    fn test_missing_keys() {
        let keys = KeyPair::default();
        assert!(!keys.has_private());
        assert!(!keys.has_public());
        assert!(matches!(keys.signing_key(), Err(Error::SigningFailed(_))));
        assert!(matches!(
            keys.verifying_key(),
            Err(Error::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn test_parsed_keys_cached_across_clones() {
        let keys = KeyPair::new(Some(PRIVATE_KEY), Some(PUBLIC_KEY));
        let shared = keys.clone();

        let first = keys.verifying_key().unwrap();
        assert!(std::ptr::eq(first, keys.verifying_key().unwrap()));
        assert!(std::ptr::eq(first, shared.verifying_key().unwrap()));
        assert!(std::ptr::eq(
            keys.signing_key().unwrap(),
            shared.signing_key().unwrap()
        ));
    }

    #[test]
    fn test_replaced_key_parsed_again() {
        let keys = KeyPair::default().with_public(b"not a key");
        assert!(matches!(
            keys.verifying_key(),
            Err(Error::KeyFormatInvalid(_))
        ));
        // The failure is kept for the same bytes
        assert!(keys.verifying_key().is_err());

        let keys = keys.with_public(PUBLIC_KEY);
        assert!(keys.verifying_key().is_ok());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let keys = KeyPair::new(Some(PRIVATE_KEY), Some(PUBLIC_KEY));
        let debug = format!("{keys:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("PRIVATE KEY"));
    }
}
