//! LLM Transport Abstraction
//!
//! A transport sends one prompt and returns the assistant's message text or a
//! typed `TransportError`. Nothing else escapes its boundary.
//!
//! ## Modules
//!
//! - `glm`: raw vendor client
//! - `direct`: calls the vendor from this process
//! - `proxied`: calls the vendor through the intermediary endpoint
//! - `router`: picks one of the two from the deployment context

mod direct;
mod glm;
mod proxied;
mod router;

pub use direct::DirectTransport;
pub use glm::{GlmClient, message_content};
pub use proxied::ProxiedTransport;
pub use router::route;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::ai::timeout::Deadline;
use crate::config::{Config, DeploymentMode};
use crate::constants::{network, vendor};
use crate::types::{Result, TransportError};

/// Which network path a transport takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Direct,
    Proxied,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportKind::Direct => write!(f, "direct"),
            TransportKind::Proxied => write!(f, "proxied"),
        }
    }
}

/// One completion call
pub struct CompletionRequest<'a> {
    pub api_key: &'a SecretString,
    pub model: &'a str,
    pub prompt: &'a str,
    pub deadline: Deadline,
}

/// Shared transport type for concurrent requests.
pub type SharedTransport = Arc<dyn LlmTransport>;

/// Send prompt, receive text-or-error
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Return the trimmed assistant message text.
    ///
    /// Implementations must give up once `request.deadline` passes.
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<String, TransportError>;

    fn kind(&self) -> TransportKind;
}

// =============================================================================
// Transport Settings
// =============================================================================

/// Values the concrete transports need from configuration
#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub api_base: String,
    pub proxy_url: String,
    pub temperature: f32,
    pub max_tokens: usize,
    pub connect_timeout: Duration,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            api_base: vendor::DEFAULT_API_BASE.to_string(),
            proxy_url: format!(
                "http://{}:{}{}",
                network::DEFAULT_HOST,
                network::DEFAULT_PORT,
                network::PROXY_PATH
            ),
            temperature: vendor::DEFAULT_TEMPERATURE,
            max_tokens: vendor::DEFAULT_MAX_TOKENS,
            connect_timeout: Duration::from_secs(network::CONNECTION_TIMEOUT_SECS),
        }
    }
}

impl From<&Config> for TransportSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_base: config.llm.api_base.clone(),
            proxy_url: config.proxy_url(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            ..Self::default()
        }
    }
}

/// Build the transport for a deployment mode. Called once at startup.
pub fn create_transport(
    mode: DeploymentMode,
    settings: &TransportSettings,
) -> Result<SharedTransport> {
    match route(mode) {
        TransportKind::Direct => Ok(Arc::new(DirectTransport::new(settings)?)),
        TransportKind::Proxied => Ok(Arc::new(ProxiedTransport::new(settings)?)),
    }
}
