// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use serde::{Deserialize, Serialize};

use super::token_store::TokenStore;

/// Identity of the logged in user, stored in the session cookie.
///
/// Created by a successful callback, removed at logout, read back by the
/// [`UserSession`] request guard (see [`super::cookie`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,
    #[serde(default)]
    pub user_email: Option<String>,
    pub token_store: TokenStore,
}

impl UserSession {
    pub fn new(user_id: String, user_email: Option<String>, token_store: TokenStore) -> Self {
        Self {
            user_id,
            user_email,
            token_store,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.token_store.is_persistent()
    }
}
