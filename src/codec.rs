use crate::algorithm::RS256;
use crate::claims::{self, ClaimSet, Identity};
use crate::error::{Error, Result};
use crate::expires::resolve_expiration;
use crate::header::TokenHeader;
use crate::keys::KeyPair;
use crate::limits::MAX_LEEWAY_SECONDS;
use crate::token::TokenParts;
use crate::utils::base64url;
use chrono::{DateTime, SubsecRound, Utc};

/// RS256 token codec bound to one key pair
///
/// The codec is configured once and can be reused (and shared across
/// threads) for any number of `encode`, `decode` and `extract_payload` calls.
#[derive(Debug, Clone, Default)]
pub struct TokenCodec {
    config_keys: KeyPair,
    config_leeway: u64,
}

impl TokenCodec {
    /// Create a codec without keys and without leeway
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the PEM private key used by `encode`
    pub fn private_key(&mut self, pem: impl AsRef<[u8]>) -> &mut Self {
        self.config_keys = self.config_keys.clone().with_private(pem);
        self
    }

    /// Configure the PEM public key used by `decode`
    pub fn public_key(&mut self, pem: impl AsRef<[u8]>) -> &mut Self {
        self.config_keys = self.config_keys.clone().with_public(pem);
        self
    }

    /// Configure both keys at once
    pub fn keys(&mut self, keys: KeyPair) -> &mut Self {
        self.config_keys = keys;
        self
    }

    /// Configure the clock tolerance (seconds) for `exp`, `nbf` and `iat`
    ///
    /// Values above [`MAX_LEEWAY_SECONDS`] make `decode` fail with
    /// [`Error::LeewayTooLarge`].
    pub fn leeway(&mut self, seconds: u64) -> &mut Self {
        self.config_leeway = seconds;
        self
    }

    /// Finish configuration
    pub fn build(&mut self) -> Self {
        self.clone()
    }

    /// The configured key pair
    pub fn key_pair(&self) -> &KeyPair {
        &self.config_keys
    }
}

impl TokenCodec {
    /// Issue a signed token
    ///
    /// `claims` are written first, followed by `iss`, `aud`, `sub`, `iat` and
    /// (when `expires` resolves) `exp`, which replace caller values of the
    /// same name. `expires` is a relative expression such as `"+ 1 hour"`.
    pub fn encode(
        &self,
        issuer: &str,
        audience: &str,
        subject: &str,
        expires: Option<&str>,
        claims: ClaimSet,
    ) -> Result<String> {
        self.encode_at(Utc::now().trunc_subsecs(0), issuer, audience, subject, expires, claims)
    }

    pub(crate) fn encode_at(
        &self,
        now: DateTime<Utc>,
        issuer: &str,
        audience: &str,
        subject: &str,
        expires: Option<&str>,
        claims: ClaimSet,
    ) -> Result<String> {
        let identity = Identity {
            issuer,
            audience,
            subject,
        };
        let expiration = resolve_expiration(now, expires)?;
        let claims = claims::assemble(claims, identity, now.timestamp(), expiration)?;

        let payload_json = serde_json::to_string(&claims)
            .map_err(|e| Error::SigningFailed(format!("Failed to serialize claims: {e}")))?;
        let signing_input = format!(
            "{}.{}",
            TokenHeader::rs256().to_base64(),
            base64url::encode_bytes(payload_json)
        );

        let key = self.config_keys.signing_key()?;
        let signature = RS256.sign(&signing_input, key)?;

        tracing::debug!(
            iss = issuer,
            sub = subject,
            exp = ?expiration,
            "signed token"
        );

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a token and return its claims
    ///
    /// With `ignore_failures` set, signature, algorithm, key and temporal
    /// failures yield `Ok(None)`. Malformed tokens and configuration errors
    /// are always returned as errors.
    pub fn decode(&self, token: &str, ignore_failures: bool) -> Result<Option<ClaimSet>> {
        self.decode_at(Utc::now().timestamp(), token, ignore_failures)
    }

    pub(crate) fn decode_at(
        &self,
        now: i64,
        token: &str,
        ignore_failures: bool,
    ) -> Result<Option<ClaimSet>> {
        match self.verify(now, token) {
            Ok(claims) => Ok(Some(claims)),
            Err(err) if ignore_failures && err.is_suppressible() => {
                tracing::debug!(error = %err, kind = ?err.kind(), "token rejected");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Read a token's claims without verifying it
    ///
    /// Only the token structure and the payload encoding are checked. Expired
    /// or foreign-signed tokens are read just the same.
    pub fn extract_payload(&self, token: &str) -> Result<ClaimSet> {
        TokenParts::split(token)?.payload_claims()
    }

    fn verify(&self, now: i64, token: &str) -> Result<ClaimSet> {
        // 1. Structure
        let parts = TokenParts::split(token)?;
        let leeway = self.checked_leeway()?;

        // 2. Signature
        let key = self.config_keys.verifying_key()?;
        RS256.verify(&parts.signing_input(), parts.signature, key)?;

        // 3. Header
        TokenHeader::from_base64(parts.header)?.ensure_rs256()?;

        // 4. Payload
        let claims = parts.payload_claims()?;

        // 5. Temporal claims
        claims::validate_temporal(&claims, now, leeway)?;

        Ok(claims)
    }

    fn checked_leeway(&self) -> Result<u64> {
        if self.config_leeway > MAX_LEEWAY_SECONDS {
            tracing::warn!(
                leeway = self.config_leeway,
                max = MAX_LEEWAY_SECONDS,
                "configured leeway out of bounds"
            );
            return Err(Error::LeewayTooLarge {
                value: self.config_leeway,
                max: MAX_LEEWAY_SECONDS,
            });
        }
        Ok(self.config_leeway)
    }
}
