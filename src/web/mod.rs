//! Embed web server.

pub mod embed;
pub mod router;
pub mod server;

pub use router::{create_app_router, AppState};
pub use server::{run_server, run_web_server, WebServerConfig};
