//! Catalog home page

use axum::{extract::State, response::Redirect};

use crate::AppState;

use super::View;

/// Site root sends visitors to the catalog
pub async fn root() -> Redirect {
    Redirect::to("/catalog")
}

/// Display record counts for the whole catalog.
///
/// The page still renders when counting fails, with `error` set instead of `data`.
pub async fn index(State(state): State<AppState>) -> View {
    let view = View::new("index", "Local Library Home");
    match state.services.catalog.counts().await {
        Ok(counts) => view.with("data", counts),
        Err(e) => {
            tracing::error!("Failed to count catalog records: {}", e);
            view.with("error", "Catalog counts are unavailable")
        }
    }
}
