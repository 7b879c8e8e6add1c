// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the Kinde session demo
//!
//! The configuration is backed by a YAML file and validated against an
//! embedded JSON schema before being deserialized, then checked against a
//! few rules the schema cannot express (see [`utils::validate_specific_rules`]).
//!
//! ## Configuration Structure
//!
//! - `server`: network binding, cookie key and demo endpoints
//! - `kinde`: identity provider credentials and endpoints
//! - `session`: session cookie naming
//!
//! ## Usage
//!
//! ```no_run
//! use kinde_session_demo::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Credentials usually come from the environment
//! config.apply_args(
//!     Some(3001),                         // Web port
//!     None,                               // Web address
//!     Some("my_client_id".to_string()),   // Client ID
//!     None,                               // Client secret
//!     None,                               // Domain
//! );
//!
//! println!("Server port: {}", config.server.port);
//! ```

pub mod kinde;
pub mod server;
pub mod session;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use kinde::KindeConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;
pub use utils::{is_valid_ip_address, output_config_schema};

/// Embedded JSON schema for the YAML configuration file
pub(crate) const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Root configuration structure.
///
/// Each section falls back to its defaults when omitted from the file, so a
/// minimal file only needs the `kinde` credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Identity provider settings
    #[serde(default)]
    pub kinde: KindeConfig,

    /// Session cookie settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// A missing file is replaced by the defaults, which are written to `path`.
    /// A file failing validation leaves a `*.sample.yaml` next to it and
    /// returns an error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        Self::from_yaml_str(&contents).map_err(|err| {
            if let Err(e) = Self::create_sample_config(path) {
                error!("Failed to create sample config: {}", e);
            }
            err.context(format!("Invalid configuration in {}", path.display()))
        })
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let yaml_value: serde_yml::Value =
            serde_yml::from_str(contents).context("Failed to parse YAML configuration")?;

        let json_value = serde_json::to_value(&yaml_value)
            .context("Failed to convert YAML to JSON for validation")?;

        let schema: serde_json::Value =
            serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating configuration against schema");
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        let config: Config = serde_yml::from_str(contents)
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Run the checks the JSON schema cannot express.
    pub fn validate(&self) -> Result<()> {
        utils::validate_specific_rules(self)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments (or their environment fallbacks) on top
    /// of the loaded configuration. Only provided values override.
    pub fn apply_args(
        &mut self,
        web_port: Option<u16>,
        web_address: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        domain: Option<String>,
    ) {
        if let Some(web_port) = web_port {
            debug!("Overriding port from command line: {}", web_port);
            self.server.port = web_port;
        }

        if let Some(web_address) = web_address {
            debug!("Overriding address from command line: {}", web_address);
            self.server.address = web_address;
        }

        if let Some(client_id) = client_id {
            debug!("Overriding Kinde client ID from command line");
            self.kinde.client_id = client_id;
        }

        if let Some(client_secret) = client_secret {
            debug!("Overriding Kinde client secret from command line");
            self.kinde.client_secret = client_secret;
        }

        if let Some(domain) = domain {
            debug!("Overriding Kinde domain from command line: {}", domain);
            self.kinde.domain = domain;
        }
    }
}
