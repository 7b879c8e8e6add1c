// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! PKCE (RFC 7636) and OAuth `state` generation

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generates a random code verifier.
///
/// Returns a 64-character URL-safe string (48 random bytes, base64url).
pub fn generate_code_verifier() -> String {
    let mut random_bytes = [0u8; 48];
    rand::rng().fill_bytes(&mut random_bytes);
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// Computes the S256 code challenge: `BASE64URL(SHA256(verifier))`.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generates a random OAuth `state` parameter (22 characters).
pub fn generate_state() -> String {
    let mut random_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut random_bytes);
    URL_SAFE_NO_PAD.encode(random_bytes)
}
