// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Demonstration routes
//!
//! These mint HS256 tokens with a fixed test secret and push them through the
//! same policy resolution and cookie writer as a real login, so both session
//! modes can be tried without an identity provider tenant. Only mounted when
//! `server.demo_endpoints` is enabled.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::{error, info};
use rocket::http::{CookieJar, Status};
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::{get, uri, State};
use serde::Serialize;
use serde_json::{json, Value};

use super::handlers::write_session;
use crate::identity::TokenSet;
use crate::session::{decode_claims, resolve_session_policy, CompletedLogin, CookieSettings};

const DEMO_SIGNING_SECRET: &[u8] = b"secret";

/// Policies resolved for a persistent and a session-only token
#[derive(Debug, Serialize)]
pub struct KspTestResults {
    pub persistent: bool,
    pub non_persistent: bool,
    pub persistent_expiry: Option<i64>,
    pub non_persistent_expiry: Option<i64>,
}

fn mint(claims: &Value) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(DEMO_SIGNING_SECRET),
    )
}

/// Resolve the session policy of two locally minted tokens.
#[get("/test-ksp")]
pub fn test_ksp() -> Result<Json<KspTestResults>, Status> {
    let persistent_token = mint(&json!({"sub": "test_user", "ksp": {"persistence": true}}));
    let session_token = mint(&json!({"sub": "test_user", "ksp": {"persistence": false}}));

    let (Ok(persistent_token), Ok(session_token)) = (persistent_token, session_token) else {
        error!("Could not mint demo tokens");
        return Err(Status::InternalServerError);
    };

    let persistent = resolve_session_policy(&decode_claims(&persistent_token));
    let session_only = resolve_session_policy(&decode_claims(&session_token));

    Ok(Json(KspTestResults {
        persistent: persistent.is_persistent(),
        non_persistent: session_only.is_persistent(),
        persistent_expiry: persistent.cookie_lifetime().as_secs(),
        non_persistent_expiry: session_only.cookie_lifetime().as_secs(),
    }))
}

fn simulate_login(
    jar: &CookieJar<'_>,
    settings: &CookieSettings,
    user_id: &str,
    email: &str,
    persistent: bool,
    access_token_lifetime: Option<Duration>,
) -> Result<CompletedLogin, String> {
    let access_token = mint(&json!({
        "sub": user_id,
        "email": email,
        "ksp": {"persistence": persistent},
    }))
    .map_err(|e| e.to_string())?;

    let tokens = TokenSet {
        access_token,
        refresh_token: Some("test_refresh".to_string()),
        id_token: None,
        expires_at: access_token_lifetime.map(|lifetime| Utc::now() + lifetime),
    };
    let login = CompletedLogin::from_tokens(&tokens, user_id.to_string(), Some(email.to_string()));
    write_session(jar, settings, login).map_err(|e| e.to_string())
}

fn demo_outcome(result: Result<CompletedLogin, String>, message: &str) -> Flash<Redirect> {
    match result {
        Ok(login) => {
            info!("Demo login as {} ({})", login.session().user_id, login.state());
            Flash::success(Redirect::to(uri!(super::handlers::profile)), message)
        }
        Err(e) => {
            error!("Demo login failed: {}", e);
            Flash::error(Redirect::to(uri!(super::handlers::index)), format!("Test login failed: {}", e))
        }
    }
}

/// Log in as a demo user whose session ends with the browser.
#[get("/test-session-only")]
pub fn test_session_only(jar: &CookieJar<'_>, settings: &State<CookieSettings>) -> Flash<Redirect> {
    let result = simulate_login(
        jar,
        settings,
        "test_user_session_only",
        "test@example.com",
        false,
        None,
    );
    demo_outcome(result, "Test Login: Session-Only Mode (closes on browser exit)")
}

/// Log in as a demo user with a 29 day session.
#[get("/test-persistent")]
pub fn test_persistent(jar: &CookieJar<'_>, settings: &State<CookieSettings>) -> Flash<Redirect> {
    let result = simulate_login(
        jar,
        settings,
        "test_user_persistent",
        "persistent@example.com",
        true,
        Some(Duration::hours(1)),
    );
    demo_outcome(result, "Test Login: Persistent Mode (29 days)")
}
