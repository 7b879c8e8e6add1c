// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::{Context, Result};
use log::warn;
use rocket::config::LogLevel;
use rocket::figment::Figment;
use rocket::{routes, Build, Rocket};

use super::pages::PageRenderer;
use super::{demo, handlers};
use crate::config::Config;
use crate::identity::SharedIdentityProvider;
use crate::session::CookieSettings;

/// Rocket figment for `config`.
///
/// Without a configured `secret_key` Rocket generates a random one in debug
/// builds, so sessions do not survive a restart, and refuses to start in
/// release builds.
pub fn figment_from_config(config: &Config) -> Figment {
    let mut figment = rocket::Config::figment()
        .merge(("ident", config.server.name.clone()))
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
        .merge(("log_level", LogLevel::Normal));

    if let Some(secret_key) = &config.server.secret_key {
        figment = figment.merge(("secret_key", secret_key.clone()));
    } else {
        warn!("No server.secret_key configured, session cookies will not survive a restart");
    }
    figment
}

/// Build the application.
///
/// # Errors
///
/// Fails when the page templates cannot be registered.
pub fn build_rocket(
    figment: Figment,
    config: &Config,
    provider: SharedIdentityProvider,
) -> Result<Rocket<Build>> {
    let pages =
        PageRenderer::new(config.server.name.clone()).context("Failed to register page templates")?;

    let mut rocket = rocket::custom(figment)
        .mount(
            "/",
            routes![
                handlers::index,
                handlers::login,
                handlers::callback,
                handlers::profile,
                handlers::logout,
                handlers::health,
            ],
        )
        .manage(provider)
        .manage(CookieSettings::from(config))
        .manage(pages);

    if config.server.demo_endpoints {
        warn!("Demo endpoints enabled: /test-ksp, /test-session-only, /test-persistent");
        rocket = rocket.mount(
            "/",
            routes![demo::test_ksp, demo::test_session_only, demo::test_persistent],
        );
    }

    Ok(rocket)
}
