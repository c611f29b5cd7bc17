//! Route definitions for the embed server.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::embeds::EmbedStore;

use super::embed;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EmbedStore>,
}

/// Create the full app router.
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route("/embed", get(embed::serve_embed))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
