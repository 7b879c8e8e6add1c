// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Web server configuration

use serde::{Deserialize, Serialize};

/// Settings for the Rocket web server hosting the demo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server identity sent in the `Server` header
    #[serde(default = "default_name")]
    pub name: String,

    /// Address to bind to
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base64 encoded key used by Rocket to encrypt private cookies.
    ///
    /// Must decode to 32 or 64 bytes. When absent, Rocket generates an
    /// ephemeral key in debug builds and refuses to start in release builds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Mark session cookies `Secure` (HTTPS only)
    #[serde(default)]
    pub secure_cookies: bool,

    /// Mount the `/test-*` endpoints that simulate logins with locally
    /// minted tokens. Never enable this in production.
    #[serde(default)]
    pub demo_endpoints: bool,
}

fn default_name() -> String {
    "KindeSessionDemo".to_string()
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            address: default_address(),
            port: default_port(),
            secret_key: None,
            secure_cookies: false,
            demo_endpoints: false,
        }
    }
}
