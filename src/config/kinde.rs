// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Kinde identity provider configuration
//!
//! Credentials are normally supplied through the `KINDE_CLIENT_ID`,
//! `KINDE_CLIENT_SECRET` and `KINDE_DOMAIN` environment variables and
//! applied on top of the file with [`Config::apply_args`](super::Config::apply_args).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindeConfig {
    /// OAuth client ID of the Kinde application
    pub client_id: String,

    /// OAuth client secret of the Kinde application
    pub client_secret: String,

    /// Kinde business domain, e.g. `https://example.kinde.com`
    pub domain: String,

    /// Redirect URI registered with Kinde, pointing at `/auth/callback`
    pub callback_url: String,

    /// Where Kinde sends the browser after logout
    pub logout_url: String,

    /// Space separated scopes requested at login
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Send a PKCE challenge with the authorization request
    #[serde(default = "default_pkce_enabled")]
    pub pkce_enabled: bool,

    /// Optional API audience requested in the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
}

fn default_scope() -> String {
    "openid profile email offline".to_string()
}

fn default_pkce_enabled() -> bool {
    true
}

impl Default for KindeConfig {
    fn default() -> Self {
        Self {
            client_id: "your_client_id_here".to_string(),
            client_secret: "your_client_secret_here".to_string(),
            domain: "https://your-business.kinde.com".to_string(),
            callback_url: "http://localhost:3000/auth/callback".to_string(),
            logout_url: "http://localhost:3000".to_string(),
            scope: default_scope(),
            pkce_enabled: default_pkce_enabled(),
            audience: None,
        }
    }
}
