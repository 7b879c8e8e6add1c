// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use jsonwebtoken::{encode, EncodingKey, Header};
use kinde_session_demo::config::Config;
use kinde_session_demo::identity::{
    AuthUrlParams, AuthorizationRequest, IdentityError, IdentityProvider, TokenSet, UserProfile,
};
use kinde_session_demo::web::{build_rocket, figment_from_config};
use rocket::config::LogLevel;
use rocket::http::Cookie;
use rocket::local::asynchronous::{Client, LocalResponse};
use serde_json::{json, Value};

/// 256-bit key so private cookies are stable across requests
pub const SECRET_KEY: &str = "hPRYyVRiMyxpw5sBB1XeCMN1kFsDCqKvBi2QJxBVHQk=";

pub const STUB_STATE: &str = "stub-state";
pub const STUB_VERIFIER: &str = "stub-verifier";

/// Authorization codes understood by [`StubProvider`]
pub const CODE_PERSISTENT: &str = "code-persistent";
pub const CODE_SESSION_ONLY: &str = "code-session-only";
pub const CODE_NO_CLAIM: &str = "code-no-claim";
pub const CODE_REJECTED: &str = "code-rejected";

pub fn mint(claims: Value) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap()
}

/// Identity provider answering from fixed tokens, recording exchanges.
#[derive(Default)]
pub struct StubProvider {
    pub exchanges: Mutex<Vec<(String, Option<String>)>>,
}

impl StubProvider {
    pub fn exchange_count(&self) -> usize {
        self.exchanges.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StubProvider {
    fn authorization_url(&self, params: &AuthUrlParams) -> AuthorizationRequest {
        let mut url = format!("https://stub.kinde.test/oauth2/auth?state={}", STUB_STATE);
        if let Some(hint) = &params.screen_hint {
            url.push_str("&screen_hint=");
            url.push_str(hint);
        }
        AuthorizationRequest {
            url,
            state: STUB_STATE.to_string(),
            code_verifier: Some(STUB_VERIFIER.to_string()),
        }
    }

    async fn fetch_tokens(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, IdentityError> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), code_verifier.map(str::to_string)));

        let claims = match code {
            CODE_PERSISTENT => json!({"sub": "kp_persistent", "ksp": {"persistence": true}}),
            CODE_SESSION_ONLY => json!({"sub": "kp_session", "ksp": {"persistence": false}}),
            CODE_NO_CLAIM => json!({"sub": "kp_default"}),
            _ => {
                return Err(IdentityError::Provider {
                    operation: "token exchange",
                    status: 400,
                    detail: "invalid_grant".to_string(),
                })
            }
        };

        Ok(TokenSet {
            access_token: mint(claims),
            refresh_token: Some("refresh".to_string()),
            id_token: None,
            expires_at: None,
        })
    }

    async fn get_user_profile(&self, tokens: &TokenSet) -> Result<UserProfile, IdentityError> {
        let claims = kinde_session_demo::session::decode_claims(&tokens.access_token);
        let id = claims
            .get("sub")
            .and_then(Value::as_str)
            .unwrap_or("kp_unknown")
            .to_string();
        Ok(UserProfile {
            email: Some(format!("{}@example.com", id)),
            id,
            given_name: None,
            family_name: None,
        })
    }

    fn logout_url(&self) -> String {
        "https://stub.kinde.test/logout?redirect=http%3A%2F%2Flocalhost%3A3000%2F".to_string()
    }
}

/// Tracked client over the full application with a stub provider.
pub async fn client(demo_endpoints: bool) -> (Client, Arc<StubProvider>) {
    let mut config = Config::default();
    config.server.demo_endpoints = demo_endpoints;

    let figment = figment_from_config(&config)
        .merge(("secret_key", SECRET_KEY))
        .merge(("log_level", LogLevel::Off));
    let provider = Arc::new(StubProvider::default());
    let rocket = build_rocket(figment, &config, provider.clone()).expect("valid configuration");
    let client = Client::tracked(rocket)
        .await
        .expect("valid rocket instance");
    (client, provider)
}

/// Cookies set by a response, attributes included.
pub fn set_cookies(response: &LocalResponse<'_>) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get("Set-Cookie")
        .filter_map(|header| Cookie::parse(header.to_string()).ok())
        .collect()
}

pub fn set_cookie(response: &LocalResponse<'_>, name: &str) -> Option<Cookie<'static>> {
    set_cookies(response).into_iter().find(|c| c.name() == name)
}
