// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the Kinde session persistence demo
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use kinde_session_demo::config::{output_config_schema, Config};
use kinde_session_demo::identity::{KindeClient, SharedIdentityProvider};
use kinde_session_demo::web::{build_rocket, figment_from_config};

/// Kinde login demo with ksp driven session persistence
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Web server port, overrides server.port
    #[arg(short = 'p', long)]
    web_port: Option<u16>,

    /// Web server address, overrides server.address
    #[arg(short = 'a', long)]
    web_address: Option<String>,

    /// Kinde application client ID, overrides kinde.client_id
    #[arg(long, env = "KINDE_CLIENT_ID")]
    client_id: Option<String>,

    /// Kinde application client secret, overrides kinde.client_secret
    #[arg(long, env = "KINDE_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Kinde business domain, e.g. https://your-business.kinde.com
    #[arg(long, env = "KINDE_DOMAIN")]
    domain: Option<String>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    show_config_schema: bool,
}

#[rocket::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.show_config_schema {
        return output_config_schema();
    }

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration from {:?}", args.config))?;
    config.apply_args(
        args.web_port,
        args.web_address,
        args.client_id,
        args.client_secret,
        args.domain,
    );
    config
        .validate()
        .context("Configuration is invalid after applying command line overrides")?;

    let provider: SharedIdentityProvider =
        Arc::new(KindeClient::new(&config.kinde).context("Failed to create Kinde client")?);

    info!(
        "Starting {} on {}:{}",
        config.server.name, config.server.address, config.server.port
    );
    let rocket = build_rocket(figment_from_config(&config), &config, provider)?;
    rocket.launch().await.context("Web server failed")?;
    Ok(())
}
