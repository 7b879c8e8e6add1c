// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Minimal token record kept in the session cookie
//!
//! Browsers cap cookies at about 4 KiB, which an encrypted access token can
//! approach on its own. Only what later requests need is kept: the refresh
//! token, the access token expiry and the resolved persistence flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::policy::SessionPolicy;
use crate::identity::TokenSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
    persistent: bool,
}

impl TokenStore {
    pub fn new(tokens: &TokenSet, policy: &SessionPolicy) -> Self {
        Self {
            refresh_token: tokens.refresh_token.clone(),
            expires_at: tokens.expires_at,
            persistent: policy.is_persistent(),
        }
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Policy this store was created under
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy::from_persistence(self.persistent)
    }

    /// Whether the access token has expired at `now`. Unknown expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn tokens(expires_at: Option<DateTime<Utc>>) -> TokenSet {
        TokenSet {
            access_token: "a".repeat(2048),
            refresh_token: Some("refresh".to_string()),
            id_token: Some("id".to_string()),
            expires_at,
        }
    }

    #[test]
    fn test_store_drops_access_token() {
        let store = TokenStore::new(&tokens(None), &SessionPolicy::session_only());
        let json = serde_json::to_string(&store).unwrap();

        assert!(!json.contains("aaaa"));
        assert_eq!(json, r#"{"refresh_token":"refresh","persistent":false}"#);
        assert_eq!(store.policy(), SessionPolicy::session_only());
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let store = TokenStore::new(
            &tokens(Some(now + Duration::seconds(60))),
            &SessionPolicy::persistent(),
        );
        assert!(!store.is_expired(now));
        assert!(store.is_expired(now + Duration::seconds(61)));

        let unknown = TokenStore::new(&tokens(None), &SessionPolicy::persistent());
        assert!(!unknown.is_expired(now));
    }
}
