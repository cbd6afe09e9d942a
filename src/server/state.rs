use std::sync::Arc;
use std::time::Duration;

use crate::ai::transport::{GlmClient, TransportSettings};
use crate::config::Config;
use crate::slides::ParseOrchestrator;
use crate::types::Result;

/// Shared, read-only request context
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ParseOrchestrator>,
    pub vendor: Arc<GlmClient>,
    pub default_model: String,
    pub vendor_timeout: Duration,
}

impl AppState {
    pub fn new(orchestrator: ParseOrchestrator, vendor: GlmClient, config: &Config) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            vendor: Arc::new(vendor),
            default_model: config.llm.model.clone(),
            vendor_timeout: Duration::from_secs(config.llm.timeout_secs),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let orchestrator = ParseOrchestrator::from_config(config)?;
        let vendor = GlmClient::new(&TransportSettings::from(config))?;
        Ok(Self::new(orchestrator, vendor, config))
    }
}
