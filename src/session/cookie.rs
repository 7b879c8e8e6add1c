// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session and pending-login cookies
//!
//! The whole [`UserSession`] lives in a single private (encrypted) cookie.
//! Writing it goes through [`SessionCookieWriter`], which fixes the cookie
//! expiration from the [`SessionPolicy`] *before* any session data is
//! attached, then adds the cookie in one step. A session is therefore either
//! fully written with the right lifetime, or not written at all.
//!
//! Rocket gives private cookies a one week expiry when none is set, so a
//! session-only cookie carries an explicit `Expiration::Session`.
//!
//! All cookies here are `SameSite=Lax`: the callback is a cross-site
//! top-level redirect from the identity provider and `Strict` cookies would
//! not be sent with it.

use log::{debug, warn};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::time::{Duration, OffsetDateTime};

use super::policy::{CookieLifetime, SessionPolicy};
use super::user::UserSession;
use crate::config::Config;
use crate::identity::AuthorizationRequest;

/// Private cookie holding the PKCE code verifier between login and callback
pub const PKCE_VERIFIER_COOKIE: &str = "kinde_pkce_verifier";

/// Private cookie holding the OAuth `state` between login and callback
pub const OAUTH_STATE_COOKIE: &str = "kinde_oauth_state";

/// How long a started login may take before its cookies expire
const PENDING_LOGIN_TTL_MINUTES: i64 = 5;

/// Cookie settings managed as Rocket state.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub session_cookie_name: String,
    pub secure: bool,
}

impl From<&Config> for CookieSettings {
    fn from(config: &Config) -> Self {
        Self {
            session_cookie_name: config.session.cookie_name.clone(),
            secure: config.server.secure_cookies,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Values stored by `/login` and consumed by `/auth/callback`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingLogin {
    pub state: Option<String>,
    pub code_verifier: Option<String>,
}

/// Writes a [`UserSession`] under a [`SessionPolicy`].
pub struct SessionCookieWriter {
    cookie: Cookie<'static>,
}

impl SessionCookieWriter {
    /// Prepare the session cookie with the expiration dictated by `policy`.
    pub fn new(policy: &SessionPolicy, settings: &CookieSettings) -> Self {
        Self {
            cookie: session_cookie_template(policy, settings),
        }
    }

    /// Serialize `session` into the prepared cookie and add it to `jar`.
    ///
    /// # Errors
    ///
    /// Returns the serialization error; nothing is added to `jar` in that case.
    pub fn commit(
        mut self,
        jar: &CookieJar<'_>,
        session: &UserSession,
    ) -> Result<(), serde_json::Error> {
        let payload = serde_json::to_string(session)?;
        self.cookie.set_value(payload);
        debug!(
            "Writing session cookie for {} (expires: {:?})",
            session.user_id,
            self.cookie.expires()
        );
        jar.add_private(self.cookie);
        Ok(())
    }
}

fn session_cookie_template(policy: &SessionPolicy, settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = Cookie::new(settings.session_cookie_name.clone(), String::new());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(settings.secure);

    match policy.cookie_lifetime() {
        CookieLifetime::Fixed(secs) => {
            let lifetime = Duration::seconds(secs);
            cookie.set_max_age(lifetime);
            cookie.set_expires(OffsetDateTime::now_utc() + lifetime);
        }
        CookieLifetime::BrowserSession => cookie.set_expires(None::<OffsetDateTime>),
    }
    cookie
}

/// Remove the session cookie.
pub fn clear_session(jar: &CookieJar<'_>, settings: &CookieSettings) {
    jar.remove_private(removal_cookie(settings.session_cookie_name.clone()));
}

/// Remember the state and verifier of a login that is being started.
pub fn store_pending_login(
    jar: &CookieJar<'_>,
    request: &AuthorizationRequest,
    settings: &CookieSettings,
) {
    jar.add_private(pending_cookie(OAUTH_STATE_COOKIE, request.state.clone(), settings));
    match &request.code_verifier {
        Some(verifier) => {
            jar.add_private(pending_cookie(PKCE_VERIFIER_COOKIE, verifier.clone(), settings))
        }
        None => jar.remove_private(removal_cookie(PKCE_VERIFIER_COOKIE.to_string())),
    }
}

/// Read and remove the pending login cookies.
pub fn take_pending_login(jar: &CookieJar<'_>) -> PendingLogin {
    let pending = PendingLogin {
        state: jar
            .get_private(OAUTH_STATE_COOKIE)
            .map(|c| c.value().to_string()),
        code_verifier: jar
            .get_private(PKCE_VERIFIER_COOKIE)
            .map(|c| c.value().to_string()),
    };
    clear_pending_login(jar);
    pending
}

/// Remove the pending login cookies.
pub fn clear_pending_login(jar: &CookieJar<'_>) {
    jar.remove_private(removal_cookie(OAUTH_STATE_COOKIE.to_string()));
    jar.remove_private(removal_cookie(PKCE_VERIFIER_COOKIE.to_string()));
}

fn pending_cookie(name: &'static str, value: String, settings: &CookieSettings) -> Cookie<'static> {
    let lifetime = Duration::minutes(PENDING_LOGIN_TTL_MINUTES);
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(settings.secure);
    cookie.set_max_age(lifetime);
    cookie.set_expires(OffsetDateTime::now_utc() + lifetime);
    cookie
}

fn removal_cookie(name: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}

/// Why the session cookie could not be read
#[derive(Debug)]
pub enum SessionCookieError {
    /// `CookieSettings` is not managed by this Rocket instance
    NotConfigured,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserSession {
    type Error = SessionCookieError;

    /// Succeeds when the private session cookie is present and decodes.
    ///
    /// Missing or undecodable cookies forward with `401 Unauthorized`, so
    /// handlers take `Option<UserSession>` to serve anonymous visitors.
    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(settings) = request.rocket().state::<CookieSettings>() else {
            return Outcome::Error((
                Status::InternalServerError,
                SessionCookieError::NotConfigured,
            ));
        };

        let Some(cookie) = request.cookies().get_private(&settings.session_cookie_name) else {
            return Outcome::Forward(Status::Unauthorized);
        };

        match serde_json::from_str::<UserSession>(cookie.value()) {
            Ok(session) => Outcome::Success(session),
            Err(e) => {
                warn!("Discarding undecodable session cookie: {}", e);
                Outcome::Forward(Status::Unauthorized)
            }
        }
    }
}
