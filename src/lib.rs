//! Local Library catalog server
//!
//! Server-rendered pages for managing a library catalog: authors, genres
//! and the physical copies (book instances) of books.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
    pub views: Arc<views::Views>,
}

impl AppState {
    pub fn new(repository: repository::Repository) -> Result<Self, handlebars::TemplateError> {
        Ok(Self {
            services: Arc::new(services::Services::new(repository)),
            views: Arc::new(views::Views::new()?),
        })
    }
}
