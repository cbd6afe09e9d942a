//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/slidecraft/) and project (.slidecraft/) level configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{network, slide, vendor};
use crate::slides::FallbackRules;
use crate::types::{Result, SlideError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM vendor settings
    pub llm: LlmConfig,

    /// Deployment context (decides the transport)
    pub deployment: DeploymentConfig,

    /// HTTP API settings
    pub server: ServerConfig,

    /// Rule-based fallback parser tuning
    pub fallback: FallbackRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            deployment: DeploymentConfig::default(),
            server: ServerConfig::default(),
            fallback: FallbackRules::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SlideError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(SlideError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(SlideError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(SlideError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        validate_http_url("llm.api_base", &self.llm.api_base)?;
        if let Some(proxy_url) = &self.deployment.proxy_url {
            validate_http_url("deployment.proxy_url", proxy_url)?;
        }

        if !(1..=slide::MAX_ARGUMENTS).contains(&self.fallback.max_arguments) {
            return Err(SlideError::Config(format!(
                "fallback.max_arguments must be between 1 and {}, got {}",
                slide::MAX_ARGUMENTS,
                self.fallback.max_arguments
            )));
        }

        if self.fallback.loose_title_min_chars >= self.fallback.loose_title_max_chars {
            return Err(SlideError::Config(
                "fallback.loose_title_min_chars must be below loose_title_max_chars".to_string(),
            ));
        }

        Ok(())
    }

    /// Intermediary endpoint for development mode. An explicit
    /// `deployment.proxy_url` wins; otherwise it points at this process's own
    /// `[server]` address.
    pub fn proxy_url(&self) -> String {
        match &self.deployment.proxy_url {
            Some(url) => url.clone(),
            None => format!("{}{}", self.server.local_url(), network::PROXY_PATH),
        }
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| SlideError::Config(format!("Invalid URL for {} '{}': {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SlideError::Config(format!(
            "{} must use http or https scheme, got: {}",
            field,
            url.scheme()
        )));
    }

    Ok(())
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name
    pub model: String,

    /// Vendor API base URL
    pub api_base: String,

    /// Transport deadline in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Vendor credential. Never serialized to output.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: vendor::DEFAULT_MODEL.to_string(),
            api_base: vendor::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: vendor::DEFAULT_TEMPERATURE,
            max_tokens: vendor::DEFAULT_MAX_TOKENS,
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Configured credential, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

// =============================================================================
// Deployment Configuration
// =============================================================================

/// Deployment context. Production hosts reach the vendor directly; development
/// hosts go through the local proxy endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Production,
    #[default]
    Development,
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Production => write!(f, "production"),
            DeploymentMode::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for DeploymentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(DeploymentMode::Production),
            "development" | "dev" => Ok(DeploymentMode::Development),
            _ => Err(format!(
                "Unknown deployment mode: {}. Valid values: production, development",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub mode: DeploymentMode,

    /// Intermediary endpoint used in development mode.
    /// Unset means this process's own proxy route; see `Config::proxy_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_string(),
            port: network::DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Base URL a local client uses to reach this server.
    /// Wildcard binds are dialled on loopback.
    pub fn local_url(&self) -> String {
        match self.host.as_str() {
            "0.0.0.0" | "" => format!("http://127.0.0.1:{}", self.port),
            "::" | "[::]" => format!("http://[::1]:{}", self.port),
            host if host.contains(':') && !host.starts_with('[') => {
                format!("http://[{}]:{}", host, self.port)
            }
            host => format!("http://{}:{}", host, self.port),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "glm-4.5");
        assert_eq!(config.llm.timeout_secs, 55);
        assert_eq!(config.deployment.mode, DeploymentMode::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deployment_mode() {
        assert_eq!(DeploymentMode::Production.to_string(), "production");
        assert_eq!(
            "prod".parse::<DeploymentMode>().unwrap(),
            DeploymentMode::Production
        );
        assert_eq!(
            "Development".parse::<DeploymentMode>().unwrap(),
            DeploymentMode::Development
        );
        assert!("staging".parse::<DeploymentMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.deployment.proxy_url = Some("ftp://localhost/proxy".to_string());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.fallback.max_arguments = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_proxy_url_follows_server_address() {
        let mut config = Config::default();
        assert_eq!(config.proxy_url(), "http://127.0.0.1:3000/api/proxy/glm");

        config.server.port = 8080;
        assert_eq!(config.proxy_url(), "http://127.0.0.1:8080/api/proxy/glm");

        config.server.host = "0.0.0.0".to_string();
        config.server.port = 9000;
        assert_eq!(config.proxy_url(), "http://127.0.0.1:9000/api/proxy/glm");

        config.server.host = "::".to_string();
        assert_eq!(config.proxy_url(), "http://[::1]:9000/api/proxy/glm");
    }

    #[test]
    fn test_explicit_proxy_url_wins() {
        let mut config = Config::default();
        config.server.port = 8080;
        config.deployment.proxy_url = Some("https://gateway.internal/api/proxy/glm".to_string());
        assert_eq!(config.proxy_url(), "https://gateway.internal/api/proxy/glm");
    }

    #[test]
    fn test_api_key_is_redacted_and_blank_ignored() {
        let mut llm = LlmConfig {
            api_key: Some("sk-secret".to_string()),
            ..LlmConfig::default()
        };
        let debug = format!("{:?}", llm);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));

        llm.api_key = Some("   ".to_string());
        assert_eq!(llm.api_key(), None);
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
    }
}
