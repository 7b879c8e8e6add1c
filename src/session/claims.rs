// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Access token claim inspection
//!
//! The access token arrives straight from the identity provider's token
//! endpoint over TLS, so its payload is read **without** verifying the
//! signature. This is a known limitation: never feed tokens from any other
//! source (a browser, a header) through these functions and then trust the
//! result for authorization.

use std::collections::HashMap;

use jsonwebtoken::{decode, DecodingKey, Validation};
use log::warn;
use serde_json::Value;

/// Decoded claims of a token, keyed by claim name.
pub type ClaimSet = HashMap<String, Value>;

/// A token whose payload could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ClaimDecodeError {
    #[error("malformed token: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

/// Decode the payload of a JWT without signature or time-based validation.
///
/// Fails when the token is not three base64url segments, when the header is
/// not a JWT header, or when the payload is not a JSON object.
pub fn try_decode_claims(token: &str) -> Result<ClaimSet, ClaimDecodeError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ClaimSet>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims)
}

/// Decode the payload of a JWT, degrading to an empty claim set.
///
/// A decode failure must not break a login: it is logged and the caller
/// sees no claims, which resolves to the default session policy.
pub fn decode_claims(token: &str) -> ClaimSet {
    try_decode_claims(token).unwrap_or_else(|e| {
        warn!("Could not decode access token claims: {}", e);
        ClaimSet::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn mint(payload: Value) -> String {
        encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decodes_custom_claims_without_key() {
        let token = mint(json!({"sub": "kp_123", "ksp": {"persistence": false}}));
        let claims = try_decode_claims(&token).unwrap();

        assert_eq!(claims["sub"], json!("kp_123"));
        assert_eq!(claims["ksp"], json!({"persistence": false}));
    }

    #[test]
    fn test_expired_token_still_decodes() {
        let token = mint(json!({"sub": "kp_123", "exp": 1}));
        assert!(try_decode_claims(&token).is_ok());
    }

    #[test]
    fn test_empty_payload_is_empty_claim_set() {
        let token = mint(json!({}));
        assert!(try_decode_claims(&token).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_tokens_yield_empty_claims() {
        for token in ["", "not-a-token", "a.b.c", "a.b", "....."] {
            assert!(try_decode_claims(token).is_err(), "{token:?} should fail");
            assert!(decode_claims(token).is_empty());
        }
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let token = mint(json!([1, 2, 3]));
        assert!(try_decode_claims(&token).is_err());
        assert!(decode_claims(&token).is_empty());
    }
}
