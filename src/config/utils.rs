// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use base64::Engine;
use log::{debug, warn};

use super::{Config, CONFIG_SCHEMA};

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./kinde_session_demo --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Check if a string is a valid IP address
///
/// Accepts IPv4 and IPv6 literals plus a few special values such as
/// "localhost" and "0.0.0.0".
pub fn is_valid_ip_address(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }

    matches!(addr, "localhost" | "::" | "::0" | "0.0.0.0")
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **Port Range**: the server port must be within 1-65534
/// - **Cookie Key**: `server.secret_key`, when present, must be base64 for 32 or 64 bytes
/// - **Kinde URLs**: `domain`, `callback_url` and `logout_url` must be absolute URLs
/// - **Cookie Name**: must be a valid cookie token (no separators or whitespace)
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if config.server.port < 1 || config.server.port > 65534 {
        anyhow::bail!("Invalid port number: {}", config.server.port);
    }

    if !is_valid_ip_address(&config.server.address) {
        // Hostnames are accepted by Rocket, only warn
        warn!(
            "Potentially invalid address format: {}",
            config.server.address
        );
    }

    if let Some(secret_key) = &config.server.secret_key {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(secret_key)
            .context("Server secret key is not valid base64")?;
        if decoded.len() != 32 && decoded.len() != 64 {
            anyhow::bail!(
                "Server secret key must decode to 32 or 64 bytes, got {}",
                decoded.len()
            );
        }
    }

    for (name, value) in [
        ("kinde.domain", &config.kinde.domain),
        ("kinde.callback_url", &config.kinde.callback_url),
        ("kinde.logout_url", &config.kinde.logout_url),
    ] {
        url::Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", name, value))?;
    }

    let cookie_name = &config.session.cookie_name;
    if cookie_name.is_empty()
        || cookie_name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "()<>@,;:\\\"/[]?={}".contains(c))
    {
        anyhow::bail!("Invalid session cookie name: {:?}", cookie_name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_addresses_are_valid() {
        assert!(is_valid_ip_address("127.0.0.1"));
        assert!(is_valid_ip_address("::1"));
        assert!(is_valid_ip_address("localhost"));
        assert!(!is_valid_ip_address("not an address"));
    }

    #[test]
    fn secret_key_length_is_checked() {
        let mut config = Config::default();
        config.server.secret_key =
            Some(base64::engine::general_purpose::STANDARD.encode([7u8; 64]));
        assert!(validate_specific_rules(&config).is_ok());

        config.server.secret_key =
            Some(base64::engine::general_purpose::STANDARD.encode([7u8; 16]));
        assert!(validate_specific_rules(&config).is_err());

        config.server.secret_key = Some("!!not base64!!".to_string());
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn relative_kinde_urls_are_rejected() {
        let mut config = Config::default();
        config.kinde.callback_url = "/auth/callback".to_string();
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn cookie_name_with_separator_is_rejected() {
        let mut config = Config::default();
        config.session.cookie_name = "my session".to_string();
        assert!(validate_specific_rules(&config).is_err());
    }
}
