//! Decoding of identity claims from access token payloads.
//!
//! The backend issues compact JWS tokens (`header.payload.signature`). The
//! client never verifies signatures - it only reads the payload segment to
//! learn who the token was issued to. Verification is the backend's job;
//! every claim here is advisory until the server accepts the token.

use base64::engine::general_purpose::{STANDARD as B64_STD, URL_SAFE_NO_PAD as B64_URL};
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token does not have the expected segment structure")]
    MalformedToken,

    #[error("token payload is not valid base64")]
    PayloadEncoding,

    #[error("token payload is not valid JSON")]
    PayloadJson,

    #[error("token payload is missing the `{0}` claim")]
    MissingClaim(&'static str),
}

/// Identity claims carried in an access token payload.
///
/// All fields are optional - different login providers populate different
/// subsets. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Claims {
    /// The subject identifier: the `sub` claim, falling back to `id`.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().or(self.id.as_deref())
    }
}

/// Decode the payload segment of a token into typed claims.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let payload = decode_payload(token)?;
    serde_json::from_value(payload).map_err(|_| ClaimsError::PayloadJson)
}

/// Look up a single named claim in a token payload.
///
/// Pure and infallible: any problem with the token (wrong segment count,
/// undecodable payload, non-JSON payload, missing or null field) degrades
/// to `None`.
pub fn extract_claim(token: &str, name: &str) -> Option<Value> {
    let payload = decode_payload(token).ok()?;
    payload.get(name).cloned().filter(|v| !v.is_null())
}

/// Decode the middle segment of a token as JSON.
fn decode_payload(token: &str) -> Result<Value, ClaimsError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() < 2 || segments[1].is_empty() {
        return Err(ClaimsError::MalformedToken);
    }

    let bytes = decode_b64_any(segments[1]).map_err(|_| ClaimsError::PayloadEncoding)?;
    serde_json::from_slice(&bytes).map_err(|_| ClaimsError::PayloadJson)
}

fn decode_b64_any(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    // JWS payloads are URL-safe without padding; some providers hand the
    // callback a standard-alphabet padded token, so try both.
    B64_URL.decode(s).or_else(|_| B64_STD.decode(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    // {"sub":"abc123"} in padded standard base64
    const PADDED_TOKEN: &str = "header.eyJzdWIiOiJhYmMxMjMifQ==.sig";

    fn url_safe_token(payload: &str) -> String {
        format!("h.{}.s", B64_URL.encode(payload))
    }

    #[test]
    fn test_decode_claims_padded_standard() {
        let claims = decode_claims(PADDED_TOKEN).expect("should decode padded payload");
        assert_eq!(claims.subject(), Some("abc123"));
    }

    #[test]
    fn test_decode_claims_url_safe() {
        let token = url_safe_token(r#"{"sub":"u-1","email":"a@b.com","nickname":"al","role":"USER"}"#);
        let claims = decode_claims(&token).expect("should decode url-safe payload");
        assert_eq!(claims.sub.as_deref(), Some("u-1"));
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.nickname.as_deref(), Some("al"));
        assert_eq!(claims.role.as_deref(), Some("USER"));
    }

    #[test]
    fn test_subject_falls_back_to_id() {
        let token = url_safe_token(r#"{"id":"fallback-id"}"#);
        let claims = decode_claims(&token).expect("should decode");
        assert_eq!(claims.subject(), Some("fallback-id"));
    }

    #[test]
    fn test_extract_claim_returns_exact_value() {
        let token = url_safe_token(r#"{"sub":"abc123","age":7}"#);
        assert_eq!(extract_claim(&token, "sub"), Some(Value::from("abc123")));
        assert_eq!(extract_claim(&token, "age"), Some(Value::from(7)));
    }

    #[test]
    fn test_extract_claim_missing_or_null_is_none() {
        let token = url_safe_token(r#"{"sub":"abc123","email":null}"#);
        assert_eq!(extract_claim(&token, "email"), None);
        assert_eq!(extract_claim(&token, "nickname"), None);
    }

    #[test]
    fn test_extract_claim_malformed_tokens_never_panic() {
        assert_eq!(extract_claim("", "sub"), None);
        assert_eq!(extract_claim("single-segment", "sub"), None);
        assert_eq!(extract_claim("a..b", "sub"), None);
        assert_eq!(extract_claim("a.!!!not-base64!!!.b", "sub"), None);
        // Valid base64 but not JSON
        let token = format!("a.{}.b", B64_URL.encode("plain text"));
        assert_eq!(extract_claim(&token, "sub"), None);
    }

    #[test]
    fn test_decode_claims_errors_are_typed() {
        assert!(matches!(
            decode_claims("one-segment"),
            Err(ClaimsError::MalformedToken)
        ));
        assert!(matches!(
            decode_claims("a.%%%.b"),
            Err(ClaimsError::PayloadEncoding)
        ));
        let not_json = format!("a.{}.b", B64_URL.encode("nope"));
        assert!(matches!(
            decode_claims(&not_json),
            Err(ClaimsError::PayloadJson)
        ));
    }
}
