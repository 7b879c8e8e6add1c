// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Authentication routes
//!
//! `/login` starts the authorization code flow, `/auth/callback` finishes it
//! and writes the session cookie, `/logout` removes it. Callback failures
//! never reach the client as errors: they are logged, flashed and redirected
//! to the landing page.

use log::{error, info, warn};
use rocket::http::{CookieJar, Status};
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{get, uri, Responder, State};
use serde_json::{json, Value};

use super::pages::PageRenderer;
use crate::identity::{AuthUrlParams, SharedIdentityProvider};
use crate::session::{
    clear_pending_login, clear_session, complete_login, store_pending_login, take_pending_login,
    CallbackParams, CompletedLogin, CookieSettings, LoginError, LoginState, SessionCookieWriter,
    UserSession,
};

/// Response of routes that render a page or send the visitor elsewhere
#[derive(Responder)]
pub enum PageResponse {
    Page(RawHtml<String>),
    Redirect(Flash<Redirect>),
    Failed(Status),
}

impl From<Result<RawHtml<String>, Status>> for PageResponse {
    fn from(result: Result<RawHtml<String>, Status>) -> Self {
        match result {
            Ok(page) => PageResponse::Page(page),
            Err(status) => PageResponse::Failed(status),
        }
    }
}

pub(crate) fn flash_context(flash: Option<FlashMessage<'_>>) -> Value {
    match flash {
        Some(flash) => json!({ "kind": flash.kind(), "message": flash.message() }),
        None => Value::Null,
    }
}

/// Landing page
#[get("/")]
pub fn index(
    session: Option<UserSession>,
    flash: Option<FlashMessage<'_>>,
    pages: &State<PageRenderer>,
) -> Result<RawHtml<String>, Status> {
    let user = session.map(|s| {
        json!({
            "user_id": s.user_id,
            "user_email": s.user_email,
            "persistent": s.is_persistent(),
        })
    });

    pages.render(
        "index",
        &json!({
            "app_name": pages.app_name(),
            "flash": flash_context(flash),
            "user": user,
        }),
    )
}

/// Redirect to the hosted login page.
///
/// `screen_hint` may be `login` or `registration`; anything else is ignored.
#[get("/login?<screen_hint>")]
pub fn login(
    screen_hint: Option<String>,
    jar: &CookieJar<'_>,
    provider: &State<SharedIdentityProvider>,
    settings: &State<CookieSettings>,
) -> Redirect {
    let screen_hint = screen_hint.filter(|hint| {
        let known = matches!(hint.as_str(), "login" | "registration");
        if !known {
            warn!("Ignoring unknown screen_hint {:?}", hint);
        }
        known
    });

    let request = provider.authorization_url(&AuthUrlParams { screen_hint });
    store_pending_login(jar, &request, settings);
    info!("Login {}: redirecting to identity provider", LoginState::Authenticating);
    Redirect::to(request.url)
}

/// Authorization callback
///
/// The pending login cookies are consumed whatever the outcome. On success
/// the session cookie is written with the lifetime resolved from the access
/// token before the visitor lands on `/profile`.
#[get("/auth/callback?<code>&<state>&<error>&<error_description>")]
pub async fn callback(
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    jar: &CookieJar<'_>,
    provider: &State<SharedIdentityProvider>,
    settings: &State<CookieSettings>,
) -> Flash<Redirect> {
    let pending = take_pending_login(jar);
    let params = CallbackParams {
        code,
        state,
        error,
        error_description,
    };

    let outcome = match complete_login(provider.inner().as_ref(), params, pending).await {
        Ok(login) => write_session(jar, settings, login),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(login) => Flash::success(Redirect::to(uri!(profile)), login.status_message()),
        Err(e) => {
            error!("Login {}: {}", LoginState::Failed, e);
            Flash::error(
                Redirect::to(uri!(index)),
                format!("Authentication failed: {}", e.user_message()),
            )
        }
    }
}

/// Write the session of a completed login.
pub(crate) fn write_session(
    jar: &CookieJar<'_>,
    settings: &CookieSettings,
    login: CompletedLogin,
) -> Result<CompletedLogin, LoginError> {
    SessionCookieWriter::new(login.policy(), settings).commit(jar, login.session())?;
    Ok(login)
}

/// Profile page; anonymous visitors are sent back to `/`.
#[get("/profile")]
pub fn profile(
    session: Option<UserSession>,
    flash: Option<FlashMessage<'_>>,
    pages: &State<PageRenderer>,
) -> PageResponse {
    let Some(session) = session else {
        return PageResponse::Redirect(Flash::error(
            Redirect::to(uri!(index)),
            "Please log in first",
        ));
    };

    let policy = session.token_store.policy();
    pages
        .render(
            "profile",
            &json!({
                "app_name": pages.app_name(),
                "flash": flash_context(flash),
                "user_id": session.user_id,
                "user_email": session.user_email,
                "persistent": policy.is_persistent(),
                "lifetime": policy.lifetime_label(),
                "token_expires_at": session.token_store.expires_at().map(|at| at.to_rfc3339()),
            }),
        )
        .into()
}

/// Remove the local session and end the provider session.
#[get("/logout")]
pub fn logout(
    jar: &CookieJar<'_>,
    provider: &State<SharedIdentityProvider>,
    settings: &State<CookieSettings>,
) -> Redirect {
    clear_session(jar, settings);
    clear_pending_login(jar);
    info!("Session cleared, redirecting to provider logout");
    Redirect::to(provider.logout_url())
}

/// Health check
#[get("/up")]
pub fn health() -> &'static str {
    "OK"
}
