// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the kinde-session-demo project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use handlebars::Handlebars;
use log::error;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use serde::Serialize;

/// Server rendered pages, registered once at startup.
pub struct PageRenderer {
    handlebars: Handlebars<'static>,
    app_name: String,
}

impl PageRenderer {
    pub fn new(app_name: impl Into<String>) -> Result<Self, handlebars::TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_partial("flash", include_str!("../../resources/templates/flash.hbs"))?;
        handlebars
            .register_template_string("index", include_str!("../../resources/templates/index.hbs"))?;
        handlebars.register_template_string(
            "profile",
            include_str!("../../resources/templates/profile.hbs"),
        )?;
        Ok(Self {
            handlebars,
            app_name: app_name.into(),
        })
    }

    /// Application name shown in page titles
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Render `template` with `data`; a render failure becomes a 500.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<RawHtml<String>, Status> {
        self.handlebars
            .render(template, data)
            .map(RawHtml)
            .map_err(|e| {
                error!("Failed to render {} page: {}", template, e);
                Status::InternalServerError
            })
    }
}
