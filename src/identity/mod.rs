// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Identity provider contract
//!
//! The web layer never talks HTTP to the identity provider directly. It goes
//! through the [`IdentityProvider`] trait, which covers the four operations a
//! login needs:
//!
//! - building the authorization URL (with PKCE),
//! - exchanging the authorization code for tokens,
//! - fetching the user profile,
//! - building the provider logout URL.
//!
//! [`KindeClient`] is the production implementation. Tests substitute their
//! own implementation to drive the login flow without a network.

pub mod error;
pub mod kinde;
pub mod pkce;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::IdentityError;
pub use kinde::KindeClient;

/// Optional parameters of the authorization request.
#[derive(Debug, Clone, Default)]
pub struct AuthUrlParams {
    /// `login` or `registration`; forwarded to the hosted login page
    pub screen_hint: Option<String>,
}

/// Authorization URL plus the values to keep until the callback.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    /// Present when PKCE is enabled
    pub code_verifier: Option<String>,
}

/// Tokens returned by the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Subset of the provider user profile kept by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Operations the application consumes from the identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the URL the browser is redirected to for login.
    fn authorization_url(&self, params: &AuthUrlParams) -> AuthorizationRequest;

    /// Exchange an authorization code for tokens.
    async fn fetch_tokens(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<TokenSet, IdentityError>;

    /// Fetch the profile of the user owning `tokens`.
    async fn get_user_profile(&self, tokens: &TokenSet) -> Result<UserProfile, IdentityError>;

    /// URL ending the provider session.
    fn logout_url(&self) -> String;
}

/// Provider handle managed as Rocket state.
pub type SharedIdentityProvider = Arc<dyn IdentityProvider>;
