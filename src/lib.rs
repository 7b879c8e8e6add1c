// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Kinde session persistence demo
//!
//! A small server rendered web application that signs users in with Kinde
//! and sets the lifetime of its session cookie from the `ksp` claim of the
//! access token: 29 days by default, or until the browser closes when the
//! claim says `persistence: false`.

pub mod config;
pub mod identity;
pub mod session;
pub mod web;
