//! Serve Command
//!
//! Run the HTTP API.
//!
//! Usage:
//!   slidecraft serve [--host 0.0.0.0] [--port 8080]

use tokio::runtime::Runtime;

use crate::config::ConfigLoader;
use crate::server;
use crate::types::{Result, SlideError};

pub fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    if config.llm.api_key().is_none() {
        tracing::warn!(
            "No API key configured; every request will use rule-based parsing"
        );
    }

    let rt = Runtime::new().map_err(|e| SlideError::internal(e.to_string()))?;
    rt.block_on(server::serve(&config))
}
