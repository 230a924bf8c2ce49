//! Bearer-token claim decoding.
//!
//! Tokens are opaque three-part compact strings (`header.claims.signature`).
//! Only the claims segment is read here: the backend remains the sole
//! verifier of the signature, the client merely reads back data the backend
//! has already vouched for. Decoding is pure and performs no I/O.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

/// Claims in the token payload that the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Numeric ID of the authenticated user. A payload without one is
    /// malformed: the session invariant requires a subject.
    #[serde(rename = "user_id")]
    pub subject_id: i64,

    /// Expiry as Unix epoch seconds. A token without one is never
    /// considered valid.
    #[serde(rename = "exp")]
    pub expires_at: Option<i64>,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not in three-part compact form")]
    NotCompact,

    #[error("claims segment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("claims segment is not a valid claim set: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Decode the claims segment of a compact token.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(claims), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DecodeError::NotCompact);
    };

    let bytes = URL_SAFE_NO_PAD.decode(claims)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Whether a token should be treated as expired at `now` (epoch seconds).
///
/// Undecodable tokens and tokens without an expiry claim count as expired,
/// so an inconclusive answer always reads as "not authenticated".
pub fn is_expired(token: &str, now: i64) -> bool {
    match decode(token) {
        Ok(claims) => match claims.expires_at {
            Some(exp) => exp < now,
            None => true,
        },
        Err(_) => true,
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use serde_json::json;

    /// Build a compact token with the given claims payload. The signature
    /// segment is a placeholder; nothing client-side reads it.
    pub fn token_from(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{header}.{claims}.sig")
    }

    /// A well-formed token for `user_id` expiring at `exp` (or without an
    /// expiry claim when `None`).
    pub fn bearer(user_id: i64, exp: Option<i64>) -> String {
        match exp {
            Some(exp) => token_from(&json!({ "user_id": user_id, "exp": exp })),
            None => token_from(&json!({ "user_id": user_id })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::{bearer, token_from};
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_subject_and_expiry() {
        let claims = decode(&bearer(123, Some(1_700_000_000))).unwrap();
        assert_eq!(claims.subject_id, 123);
        assert_eq!(claims.expires_at, Some(1_700_000_000));
    }

    #[test]
    fn decodes_missing_expiry_as_none() {
        let claims = decode(&bearer(123, None)).unwrap();
        assert_eq!(claims.expires_at, None);
    }

    #[test]
    fn rejects_non_compact_input() {
        assert!(matches!(decode("not-a-token"), Err(DecodeError::NotCompact)));
        assert!(matches!(decode("only.two"), Err(DecodeError::NotCompact)));
        assert!(matches!(decode("a.b.c.d"), Err(DecodeError::NotCompact)));
        assert!(matches!(decode(""), Err(DecodeError::NotCompact)));
    }

    #[test]
    fn rejects_invalid_base64_claims() {
        assert!(matches!(decode("h.!!!.s"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn rejects_claims_without_subject() {
        let token = token_from(&json!({ "exp": 1_700_000_000 }));
        assert!(matches!(decode(&token), Err(DecodeError::Claims(_))));
    }

    #[test]
    fn rejects_claims_that_are_not_json() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let claims = URL_SAFE_NO_PAD.encode(b"plain text");
        let token = format!("{header}.{claims}.sig");
        assert!(matches!(decode(&token), Err(DecodeError::Claims(_))));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = 1_700_000_000;
        assert!(is_expired(&bearer(1, Some(now - 3600)), now));
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let now = 1_700_000_000;
        assert!(!is_expired(&bearer(1, Some(now + 3600)), now));
    }

    #[test]
    fn expiry_at_now_is_not_expired() {
        let now = 1_700_000_000;
        assert!(!is_expired(&bearer(1, Some(now)), now));
    }

    #[test]
    fn missing_expiry_is_expired() {
        assert!(is_expired(&bearer(1, None), 1_700_000_000));
    }

    #[test]
    fn undecodable_token_is_expired() {
        assert!(is_expired("garbage", 1_700_000_000));
    }
}
