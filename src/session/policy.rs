// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session persistence policy
//!
//! Kinde can embed a `ksp` ("Kinde session persistence") claim in the access
//! token:
//!
//! ```json
//! { "sub": "kp_...", "ksp": { "persistence": false } }
//! ```
//!
//! | `ksp` present | `ksp.persistence` | session cookie          |
//! |---------------|-------------------|-------------------------|
//! | no            |                   | persistent (29 days)    |
//! | yes           | `true`            | persistent (29 days)    |
//! | yes           | `false`           | ends with the browser   |
//!
//! Only an explicit `false` produces a session-only cookie. A `ksp` object
//! without a boolean `persistence` field is treated like a missing claim.

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::claims::ClaimSet;

/// Name of the session persistence claim
pub const KSP_CLAIM: &str = "ksp";

/// Lifetime of a persistent session cookie: 29 days
pub const PERSISTENT_SESSION_LIFETIME_SECS: i64 = 29 * 24 * 60 * 60;

/// How long the browser keeps the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieLifetime {
    /// Explicit lifetime in seconds
    Fixed(i64),
    /// No expiration: the cookie dies with the browser session
    BrowserSession,
}

impl CookieLifetime {
    pub fn as_secs(&self) -> Option<i64> {
        match self {
            CookieLifetime::Fixed(secs) => Some(*secs),
            CookieLifetime::BrowserSession => None,
        }
    }
}

/// Serialized as the number of seconds, or `"session"`.
impl Serialize for CookieLifetime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CookieLifetime::Fixed(secs) => serializer.serialize_i64(*secs),
            CookieLifetime::BrowserSession => serializer.serialize_str("session"),
        }
    }
}

/// Expiration policy of the session cookie.
///
/// Only constructible through [`SessionPolicy::persistent`],
/// [`SessionPolicy::session_only`] or [`resolve_session_policy`], so the
/// lifetime always matches the persistence flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPolicy {
    persistent: bool,
    cookie_lifetime: CookieLifetime,
}

impl SessionPolicy {
    pub fn persistent() -> Self {
        Self {
            persistent: true,
            cookie_lifetime: CookieLifetime::Fixed(PERSISTENT_SESSION_LIFETIME_SECS),
        }
    }

    pub fn session_only() -> Self {
        Self {
            persistent: false,
            cookie_lifetime: CookieLifetime::BrowserSession,
        }
    }

    pub fn from_persistence(persistent: bool) -> Self {
        if persistent {
            Self::persistent()
        } else {
            Self::session_only()
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn cookie_lifetime(&self) -> CookieLifetime {
        self.cookie_lifetime
    }

    /// Human readable lifetime, as shown after login
    pub fn lifetime_label(&self) -> &'static str {
        if self.persistent {
            "29 days"
        } else {
            "browser close"
        }
    }
}

/// Decide the session policy from the access token claims.
///
/// Pure function: the same claims always give the same policy.
pub fn resolve_session_policy(claims: &ClaimSet) -> SessionPolicy {
    let persistent = match ksp_claim(claims) {
        None => true,
        Some(ksp) => ksp.get("persistence").and_then(Value::as_bool) != Some(false),
    };
    SessionPolicy::from_persistence(persistent)
}

/// Describe the `ksp` claim for the post-login message.
pub fn ksp_status(claims: &ClaimSet) -> String {
    match ksp_claim(claims) {
        Some(ksp) => format!("KSP claim present: {}", ksp),
        None => "No KSP claim (defaulting to persistent)".to_string(),
    }
}

/// `ksp` claim, with an explicit `null` treated as absent
fn ksp_claim(claims: &ClaimSet) -> Option<&Value> {
    claims.get(KSP_CLAIM).filter(|v| !v.is_null())
}
