// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authorization callback processing
//!
//! A login attempt moves through
//! `Anonymous → Authenticating → Authenticated(persistent | session-only) | Failed`.
//! [`complete_login`] covers everything from `Authenticating` on and never
//! touches cookies: it returns either a [`CompletedLogin`] ready to be
//! written, or a [`LoginError`] for the route to report. A failed attempt
//! leaves the visitor anonymous.

use std::fmt;

use log::{debug, info};

use super::claims::{decode_claims, ClaimSet};
use super::cookie::PendingLogin;
use super::policy::{ksp_status, resolve_session_policy, SessionPolicy, KSP_CLAIM};
use super::token_store::TokenStore;
use super::user::UserSession;
use crate::identity::{IdentityError, IdentityProvider, TokenSet};

/// Persistence of an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Persistent,
    SessionOnly,
}

/// States of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Anonymous,
    Authenticating,
    Authenticated(Persistence),
    Failed,
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginState::Anonymous => write!(f, "anonymous"),
            LoginState::Authenticating => write!(f, "authenticating"),
            LoginState::Authenticated(Persistence::Persistent) => {
                write!(f, "authenticated (persistent)")
            }
            LoginState::Authenticated(Persistence::SessionOnly) => {
                write!(f, "authenticated (session-only)")
            }
            LoginState::Failed => write!(f, "failed"),
        }
    }
}

/// Query parameters of `/auth/callback`
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Why a login attempt failed
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("identity provider returned {error}: {description}")]
    ProviderDenied { error: String, description: String },

    #[error("missing authorization code")]
    MissingCode,

    #[error("state mismatch")]
    StateMismatch,

    #[error("token exchange failed: {0}")]
    TokenExchange(#[source] IdentityError),

    #[error("user profile fetch failed: {0}")]
    ProfileFetch(#[source] IdentityError),

    #[error("session encoding failed: {0}")]
    SessionEncoding(#[from] serde_json::Error),
}

impl LoginError {
    /// Short reason shown to the user; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoginError::ProviderDenied { .. } => "the identity provider refused the login",
            LoginError::MissingCode => "missing authorization code",
            LoginError::StateMismatch => "the login request expired or was tampered with",
            LoginError::TokenExchange(_) => "could not exchange the authorization code",
            LoginError::ProfileFetch(_) => "could not fetch the user profile",
            LoginError::SessionEncoding(_) => "could not create the session",
        }
    }
}

/// Outcome of a successful login, not yet written to the session.
#[derive(Debug, Clone)]
pub struct CompletedLogin {
    session: UserSession,
    policy: SessionPolicy,
    ksp_status: String,
}

impl CompletedLogin {
    /// Build the session for `tokens`, resolving the policy from the access
    /// token claims.
    pub fn from_tokens(tokens: &TokenSet, user_id: String, user_email: Option<String>) -> Self {
        let claims = decode_claims(&tokens.access_token);
        log_claims(&claims);

        let policy = resolve_session_policy(&claims);
        let session = UserSession::new(user_id, user_email, TokenStore::new(tokens, &policy));

        Self {
            session,
            policy,
            ksp_status: ksp_status(&claims),
        }
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    pub fn state(&self) -> LoginState {
        if self.policy.is_persistent() {
            LoginState::Authenticated(Persistence::Persistent)
        } else {
            LoginState::Authenticated(Persistence::SessionOnly)
        }
    }

    /// Message flashed after the login
    pub fn status_message(&self) -> String {
        format!(
            "Logged in! Session: {} | {}",
            self.policy.lifetime_label(),
            self.ksp_status
        )
    }
}

fn log_claims(claims: &ClaimSet) {
    let mut names: Vec<&str> = claims.keys().map(String::as_str).collect();
    names.sort_unstable();
    debug!("Access token claims: {:?}", names);
    debug!("KSP claim: {:?}", claims.get(KSP_CLAIM));
}

/// Run the callback half of the login.
///
/// Checks the provider response and the `state`, exchanges the code, fetches
/// the profile and resolves the session policy. Nothing is persisted here.
pub async fn complete_login(
    provider: &dyn IdentityProvider,
    params: CallbackParams,
    pending: PendingLogin,
) -> Result<CompletedLogin, LoginError> {
    if let Some(error) = params.error {
        return Err(LoginError::ProviderDenied {
            error,
            description: params
                .error_description
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }

    let code = params.code.ok_or(LoginError::MissingCode)?;

    match (params.state, pending.state) {
        (Some(received), Some(stored)) if received == stored => {}
        _ => return Err(LoginError::StateMismatch),
    }

    debug!("Login {}", LoginState::Authenticating);
    let tokens = provider
        .fetch_tokens(&code, pending.code_verifier.as_deref())
        .await
        .map_err(LoginError::TokenExchange)?;

    let profile = provider
        .get_user_profile(&tokens)
        .await
        .map_err(LoginError::ProfileFetch)?;

    let login = CompletedLogin::from_tokens(&tokens, profile.id, profile.email);
    info!("Login {} for {}", login.state(), login.session.user_id);
    Ok(login)
}
