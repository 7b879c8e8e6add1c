// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Session handling
//!
//! - [`claims`]: unverified access token decoding
//! - [`policy`]: `ksp` claim to cookie lifetime
//! - [`login`]: callback processing
//! - [`cookie`]: writing and reading the session cookie

pub mod claims;
pub mod cookie;
pub mod login;
pub mod policy;
mod token_store;
mod user;

pub use claims::{decode_claims, try_decode_claims, ClaimDecodeError, ClaimSet};
pub use cookie::{
    clear_pending_login, clear_session, store_pending_login, take_pending_login, CookieSettings,
    PendingLogin, SessionCookieWriter,
};
pub use login::{complete_login, CallbackParams, CompletedLogin, LoginError, LoginState, Persistence};
pub use policy::{
    ksp_status, resolve_session_policy, CookieLifetime, SessionPolicy, KSP_CLAIM,
    PERSISTENT_SESSION_LIFETIME_SECS,
};
pub use token_store::TokenStore;
pub use user::UserSession;
