// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Web server
//!
//! Rocket routes for the login flow, the server rendered pages and the
//! optional demonstration endpoints.

pub mod demo;
pub mod handlers;
pub mod pages;
pub mod server;

pub use pages::PageRenderer;
pub use server::{build_rocket, figment_from_config};
