//! Server-side HTML views
//!
//! Templates are compiled into the binary and registered once at startup.
//! Entity text is HTML-escaped before it is stored, so templates emit it
//! with triple-stash to avoid escaping it twice.

pub mod models;

use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

use crate::error::AppResult;

pub use models::{AuthorView, BookInstanceView, BookOption, BookView, ErrorView, GenreView, StatusOption};

const LAYOUT: &str = include_str!("../../templates/layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("author_list", include_str!("../../templates/author_list.hbs")),
    ("author_detail", include_str!("../../templates/author_detail.hbs")),
    ("author_form", include_str!("../../templates/author_form.hbs")),
    ("author_delete", include_str!("../../templates/author_delete.hbs")),
    ("genre_list", include_str!("../../templates/genre_list.hbs")),
    ("genre_detail", include_str!("../../templates/genre_detail.hbs")),
    ("genre_form", include_str!("../../templates/genre_form.hbs")),
    ("genre_delete", include_str!("../../templates/genre_delete.hbs")),
    ("bookinstance_list", include_str!("../../templates/bookinstance_list.hbs")),
    ("bookinstance_detail", include_str!("../../templates/bookinstance_detail.hbs")),
    ("bookinstance_form", include_str!("../../templates/bookinstance_form.hbs")),
    ("bookinstance_delete", include_str!("../../templates/bookinstance_delete.hbs")),
];

/// Registry of compiled page templates
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", LAYOUT)?;
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> AppResult<Html<String>> {
        Ok(Html(self.registry.render(name, context)?))
    }
}
