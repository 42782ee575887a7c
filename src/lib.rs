//! Local Library catalog server
//!
//! Authors, books, genres and the physical copies of books, each with
//! list, detail, create, update and delete pages. Pages are rendered as
//! JSON view models naming the template they belong to.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
