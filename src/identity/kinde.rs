// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Kinde implementation of [`IdentityProvider`]
//!
//! A thin `reqwest` client over the Kinde OAuth2 endpoints:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | authorize | `GET {domain}/oauth2/auth` |
//! | token     | `POST {domain}/oauth2/token` |
//! | profile   | `GET {domain}/oauth2/v2/user_profile` |
//! | logout    | `GET {domain}/logout?redirect=...` |
//!
//! Timeouts and connection pooling are whatever the supplied
//! `reqwest::Client` does; nothing is retried.

use chrono::{Duration, Utc};
use log::debug;
use serde::Deserialize;
use url::Url;

use super::{
    pkce, AuthUrlParams, AuthorizationRequest, IdentityError, IdentityProvider, TokenSet,
    UserProfile,
};
use crate::config::KindeConfig;

/// Kinde OAuth2 client.
#[derive(Debug, Clone)]
pub struct KindeClient {
    client_id: String,
    client_secret: String,
    callback_url: Url,
    scope: String,
    audience: Option<String>,
    pkce_enabled: bool,
    auth_endpoint: Url,
    token_endpoint: Url,
    profile_endpoint: Url,
    logout_endpoint: Url,
    http: reqwest::Client,
}

/// Raw token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl KindeClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidConfig`] when the domain or one of the
    /// redirect URLs cannot be parsed.
    pub fn new(config: &KindeConfig) -> Result<Self, IdentityError> {
        let domain = parse_url("domain", &config.domain)?;
        let callback_url = parse_url("callback_url", &config.callback_url)?;
        let logout_redirect = parse_url("logout_url", &config.logout_url)?;

        let mut logout_endpoint = endpoint(&domain, "/logout")?;
        logout_endpoint
            .query_pairs_mut()
            .append_pair("redirect", logout_redirect.as_str());

        Ok(Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            callback_url,
            scope: config.scope.clone(),
            audience: config.audience.clone(),
            pkce_enabled: config.pkce_enabled,
            auth_endpoint: endpoint(&domain, "/oauth2/auth")?,
            token_endpoint: endpoint(&domain, "/oauth2/token")?,
            profile_endpoint: endpoint(&domain, "/oauth2/v2/user_profile")?,
            logout_endpoint,
            http: reqwest::Client::new(),
        })
    }

    /// Use a custom HTTP client (connection pool reuse, timeouts, tests).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Returns the response on success, or the status and body as an error.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, IdentityError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(IdentityError::Provider {
            operation,
            status,
            detail,
        })
    }
}

fn parse_url(name: &str, value: &str) -> Result<Url, IdentityError> {
    Url::parse(value).map_err(|e| IdentityError::InvalidConfig(format!("{name}: {e}")))
}

fn endpoint(domain: &Url, path: &str) -> Result<Url, IdentityError> {
    domain
        .join(path)
        .map_err(|e| IdentityError::InvalidConfig(format!("{path}: {e}")))
}

#[async_trait::async_trait]
impl IdentityProvider for KindeClient {
    fn authorization_url(&self, params: &AuthUrlParams) -> AuthorizationRequest {
        let state = pkce::generate_state();
        let code_verifier = self.pkce_enabled.then(pkce::generate_code_verifier);

        let mut url = self.auth_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", self.callback_url.as_str())
                .append_pair("scope", &self.scope)
                .append_pair("state", &state);

            if let Some(verifier) = &code_verifier {
                query
                    .append_pair("code_challenge", &pkce::generate_code_challenge(verifier))
                    .append_pair("code_challenge_method", "S256");
            }
            if let Some(screen_hint) = &params.screen_hint {
                query.append_pair("screen_hint", screen_hint);
            }
            if let Some(audience) = &self.audience {
                query.append_pair("audience", audience);
            }
        }

        AuthorizationRequest {
            url: url.into(),
            state,
            code_verifier,
        }
    }

    async fn fetch_tokens(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, IdentityError> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.callback_url.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if let Some(verifier) = code_verifier {
            params.push(("code_verifier", verifier));
        }

        debug!("Exchanging authorization code at {}", self.token_endpoint);
        let response = self
            .http
            .post(self.token_endpoint.clone())
            .form(&params)
            .send()
            .await?;

        let response = Self::ensure_success(response, "token exchange").await?;
        let tokens = response.json::<TokenResponse>().await?;

        Ok(TokenSet {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            id_token: tokens.id_token,
            expires_at: tokens
                .expires_in
                .map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }

    async fn get_user_profile(&self, tokens: &TokenSet) -> Result<UserProfile, IdentityError> {
        let response = self
            .http
            .get(self.profile_endpoint.clone())
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;

        let response = Self::ensure_success(response, "user profile request").await?;
        response.json::<UserProfile>().await.map_err(Into::into)
    }

    fn logout_url(&self) -> String {
        self.logout_endpoint.to_string()
    }
}
