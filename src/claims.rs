//! Claim sets and temporal claim validation
//!
//! This module assembles the claim set written by `encode` (caller claims
//! overlaid with the reserved `iss`, `aud`, `sub`, `iat`, `exp` claims) and
//! validates the temporal claims (`exp`, `nbf`, `iat`) read back by `decode`.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Insertion-ordered mapping from claim names to JSON values
pub type ClaimSet = Map<String, Value>;

/// Claim names the codec writes itself and never takes from the caller
pub const RESERVED_CLAIMS: [&str; 5] = ["iss", "aud", "sub", "iat", "exp"];

/// Identity claims supplied to `encode`
#[derive(Debug, Clone, Copy)]
pub(crate) struct Identity<'a> {
    pub issuer: &'a str,
    pub audience: &'a str,
    pub subject: &'a str,
}

impl Identity<'_> {
    fn ensure_present(&self) -> Result<()> {
        for (name, value) in [
            ("iss", self.issuer),
            ("aud", self.audience),
            ("sub", self.subject),
        ] {
            if value.is_empty() {
                return Err(Error::ClaimMissingField(name.into()));
            }
        }
        Ok(())
    }
}

/// Overlay the reserved claims on top of the caller's claims
///
/// A reserved key the caller already used keeps its position and takes the
/// codec's value. Without an expiration any caller `exp` is dropped so the
/// token never carries one.
pub(crate) fn assemble(
    mut claims: ClaimSet,
    identity: Identity<'_>,
    issued_at: i64,
    expiration: Option<i64>,
) -> Result<ClaimSet> {
    identity.ensure_present()?;

    claims.insert("iss".into(), Value::from(identity.issuer));
    claims.insert("aud".into(), Value::from(identity.audience));
    claims.insert("sub".into(), Value::from(identity.subject));
    claims.insert("iat".into(), Value::from(issued_at));
    match expiration {
        Some(exp) => {
            claims.insert("exp".into(), Value::from(exp));
        }
        None => {
            claims.shift_remove("exp");
        }
    }

    Ok(claims)
}

/// Read a numeric date claim, if present
fn numeric_date(claims: &ClaimSet, name: &str) -> Result<Option<i64>> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.floor() as i64))
            .map(Some)
            .ok_or_else(|| Error::TokenInvalidClaim(format!("'{name}' must be a number"))),
    }
}

/// Validate `exp`, `nbf` and `iat` against `now` with the given leeway
///
/// Bounds saturate, so a far-future `exp` is valid rather than an overflow.
pub(crate) fn validate_temporal(claims: &ClaimSet, now: i64, leeway: u64) -> Result<()> {
    let skew = i64::try_from(leeway).unwrap_or(i64::MAX);

    if let Some(exp) = numeric_date(claims, "exp")? {
        if exp.saturating_add(skew) < now {
            return Err(Error::TokenExpired {
                expired_at: exp,
                now,
                leeway,
            });
        }
    }

    if let Some(nbf) = numeric_date(claims, "nbf")? {
        if nbf.saturating_sub(skew) > now {
            return Err(Error::TokenNotYetValid {
                not_before: nbf,
                now,
                leeway,
            });
        }
    }

    if let Some(iat) = numeric_date(claims, "iat")? {
        if iat > now.saturating_add(skew) {
            return Err(Error::TokenIssuedInFuture {
                issued_at: iat,
                now,
                leeway,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    fn identity() -> Identity<'static> {
        Identity {
            issuer: "issuer",
            audience: "audience",
            subject: "subject",
        }
    }

    fn claims(value: Value) -> ClaimSet {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_reserved_claims_appended_after_caller_claims() {
        let caller = claims(json!({"key1": "v1", "key2": "v2"}));
        let assembled = assemble(caller, identity(), NOW, Some(NOW + 3600)).unwrap();

        let keys: Vec<&str> = assembled.keys().map(String::as_str).collect();
        assert_eq!(keys, ["key1", "key2", "iss", "aud", "sub", "iat", "exp"]);
        assert_eq!(
            Value::Object(assembled),
            json!({
                "key1": "v1",
                "key2": "v2",
                "iss": "issuer",
                "aud": "audience",
                "sub": "subject",
                "iat": NOW,
                "exp": NOW + 3600,
            })
        );
    }

    #[test]
    fn test_reserved_claims_override_caller() {
        let caller = claims(json!({
            "iss": "forged",
            "role": "admin",
            "iat": 1,
            "exp": 2,
        }));
        let assembled = assemble(caller, identity(), NOW, Some(NOW + 60)).unwrap();

        assert_eq!(assembled["iss"], "issuer");
        assert_eq!(assembled["iat"], NOW);
        assert_eq!(assembled["exp"], NOW + 60);
        // Overridden keys keep the caller's position
        let keys: Vec<&str> = assembled.keys().map(String::as_str).collect();
        assert_eq!(keys, ["iss", "role", "iat", "exp", "aud", "sub"]);
    }

    #[test]
    fn test_caller_exp_dropped_without_expiration() {
        let caller = claims(json!({"exp": 42, "a": 1, "b": 2}));
        let assembled = assemble(caller, identity(), NOW, None).unwrap();
        assert!(!assembled.contains_key("exp"));
        let keys: Vec<&str> = assembled.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "iss", "aud", "sub", "iat"]);
    }

    #[test]
    fn test_empty_identity_rejected() {
        let mut id = identity();
        id.audience = "";
        assert!(matches!(
            assemble(ClaimSet::new(), id, NOW, None),
            Err(Error::ClaimMissingField(field)) if field == "aud"
        ));
    }

    #[test]
    fn test_valid_token() {
        let set = claims(json!({"exp": NOW + 3600, "nbf": NOW - 60, "iat": NOW}));
        assert!(validate_temporal(&set, NOW, 0).is_ok());
    }

    #[test]
    fn test_no_temporal_claims() {
        assert!(validate_temporal(&ClaimSet::new(), NOW, 0).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let set = claims(json!({"exp": NOW - 1}));
        assert!(matches!(
            validate_temporal(&set, NOW, 0),
            Err(Error::TokenExpired { expired_at, .. }) if expired_at == NOW - 1
        ));
        // Expiring this very second is still valid
        let set = claims(json!({"exp": NOW}));
        assert!(validate_temporal(&set, NOW, 0).is_ok());
    }

    #[test]
    fn test_not_yet_valid() {
        let set = claims(json!({"nbf": NOW + 120}));
        assert!(matches!(
            validate_temporal(&set, NOW, 0),
            Err(Error::TokenNotYetValid { .. })
        ));
    }

    #[test]
    fn test_issued_in_future() {
        let set = claims(json!({"iat": NOW + 120}));
        assert!(matches!(
            validate_temporal(&set, NOW, 0),
            Err(Error::TokenIssuedInFuture { .. })
        ));
    }

    #[test]
    fn test_leeway() {
        // Expired 30 seconds ago, inside a 60 second leeway
        let set = claims(json!({"exp": NOW - 30}));
        assert!(validate_temporal(&set, NOW, 60).is_ok());

        // Expired 90 seconds ago, outside a 60 second leeway
        let set = claims(json!({"exp": NOW - 90}));
        assert!(validate_temporal(&set, NOW, 60).is_err());

        let set = claims(json!({"nbf": NOW + 30, "iat": NOW + 30}));
        assert!(validate_temporal(&set, NOW, 60).is_ok());
    }

    #[test]
    fn test_non_numeric_temporal_claim() {
        let set = claims(json!({"exp": "tomorrow"}));
        assert!(matches!(
            validate_temporal(&set, NOW, 0),
            Err(Error::TokenInvalidClaim(_))
        ));
    }

    #[test]
    fn test_fractional_temporal_claim() {
        let set = claims(json!({"exp": (NOW as f64) + 0.5}));
        assert!(validate_temporal(&set, NOW, 0).is_ok());
    }

    #[test]
    fn test_extreme_timestamps_saturate() {
        let set = claims(json!({"exp": i64::MAX, "nbf": i64::MIN, "iat": i64::MIN}));
        assert!(validate_temporal(&set, NOW, 10).is_ok());
        assert!(validate_temporal(&set, NOW, u64::MAX).is_ok());

        // Floats beyond i64 saturate to the far future as well
        let set = claims(json!({"exp": 1e300}));
        assert!(validate_temporal(&set, NOW, 10).is_ok());

        let set = claims(json!({"exp": i64::MIN}));
        assert!(matches!(
            validate_temporal(&set, NOW, 10),
            Err(Error::TokenExpired { .. })
        ));
    }
}
