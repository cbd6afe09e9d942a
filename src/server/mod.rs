//! HTTP API
//!
//! - `POST /api/parse-slides`: text in, slides out
//! - `POST /api/proxy/glm`: intermediary used by the proxied transport
//! - `GET /health`

pub mod handlers;
mod request_id;
mod router;
mod state;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use router::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

use crate::ai::transport::TransportKind;
use crate::config::Config;
use crate::types::Result;

/// Bind the configured address and serve until the process is stopped
pub async fn serve(config: &Config) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    // Port 0 binds an ephemeral port; the derived proxy target must use it
    let mut config = config.clone();
    config.server.port = local_addr.port();

    let state = AppState::from_config(&config)?;
    let transport = state.orchestrator.transport_kind();
    info!(
        "Listening on http://{} ({} mode, {} transport)",
        local_addr, config.deployment.mode, transport
    );
    if transport == TransportKind::Proxied {
        info!("Proxied transport target: {}", config.proxy_url());
    }
    let router = create_router(state);

    axum::serve(listener, router).await?;
    Ok(())
}
