//! Web server using Axum.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use crate::embeds::EmbedStore;
use crate::error::Error;
use crate::shutdown;

use super::router::{create_app_router, AppState};

/// Web server configuration.
pub struct WebServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Run the web server until the shutdown signal fires.
pub async fn run_server(config: WebServerConfig, store: EmbedStore) -> Result<(), Error> {
    let state = AppState {
        store: Arc::new(store),
    };
    let app = create_app_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Web(format!("Invalid address: {}", e)))?;

    tracing::info!("Starting embed server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let mut rx = shutdown::subscribe();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = rx.changed().await;
            tracing::info!("Embed server shutting down");
        })
        .await
        .map_err(|e| Error::Web(format!("serve: {}", e)))?;

    Ok(())
}

/// Run the web server with default host binding.
pub async fn run_web_server(port: u16, store: EmbedStore) -> Result<(), Error> {
    let config = WebServerConfig {
        port,
        ..Default::default()
    };

    run_server(config, store).await
}
