//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/slidecraft/config.toml)
//! 3. Project config (.slidecraft/config.toml)
//! 4. Environment variables (SLIDECRAFT_* prefix, `__` between nested keys)
//! 5. `GLM_API_KEY`, only when no credential was configured above

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::vendor;
use crate::types::{Result, SlideError};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        Self::extract(Self::with_env(figment))
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));

        Self::extract(Self::with_env(figment))
    }

    fn with_env(figment: Figment) -> Figment {
        // SLIDECRAFT_LLM__MODEL -> llm.model
        figment
            .merge(Env::prefixed("SLIDECRAFT_").split("__"))
            .join(
                Env::raw()
                    .only(&[vendor::API_KEY_ENV])
                    .map(|_| "llm.api_key".into()),
            )
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| SlideError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/slidecraft/)
    pub fn global_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "slidecraft")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".slidecraft")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| SlideError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            SlideError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;

        Ok(global_dir)
    }

    /// Initialize project configuration in `root`
    pub fn init_project(root: &Path, force: bool) -> Result<PathBuf> {
        let project_dir = root.join(Self::project_dir());
        fs::create_dir_all(&project_dir)?;

        let config_path = project_dir.join("config.toml");
        Self::write_default(&config_path, force)?;

        Ok(project_dir)
    }

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if !path.exists() || force {
            fs::write(path, Self::default_config_template())?;
            info!("Created config: {}", path.display());
        } else {
            info!("Config exists: {}", path.display());
        }
        Ok(())
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Default config content (TOML)
    fn default_config_template() -> String {
        r#"# Slidecraft Configuration
# Project settings in .slidecraft/config.toml override ~/.config/slidecraft/config.toml.
# The vendor credential is read from GLM_API_KEY; avoid committing it here.

version = "1.0"

[llm]
model = "glm-4.5"
api_base = "https://open.bigmodel.cn/api/paas/v4"
timeout_secs = 55
temperature = 0.3
max_tokens = 2000

# "production" calls the vendor directly; "development" goes through proxy_url,
# which defaults to this server's own /api/proxy/glm route
[deployment]
mode = "development"
# proxy_url = "http://127.0.0.1:3000/api/proxy/glm"

[server]
host = "127.0.0.1"
port = 3000

[fallback]
title_max_chars = 30
max_arguments = 5
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeploymentMode;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_as_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, ConfigLoader::default_config_template()).unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.model, "glm-4.5");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[deployment]\nmode = \"production\"\n\n[llm]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.deployment.mode, DeploymentMode::Production);
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.llm.max_tokens, 2000);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[llm]\ntemperature = 9.5\n").unwrap();

        assert!(matches!(
            ConfigLoader::load_from_file(&path),
            Err(SlideError::Config(_))
        ));
    }

    #[test]
    fn test_init_project() {
        let temp_dir = TempDir::new().unwrap();

        let dir = ConfigLoader::init_project(temp_dir.path(), false).unwrap();

        assert!(dir.exists());
        assert!(dir.join("config.toml").exists());
    }

    #[test]
    fn test_init_project_keeps_existing_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let dir = ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "version = \"custom\"\n").unwrap();

        ConfigLoader::init_project(temp_dir.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"custom\"\n");

        ConfigLoader::init_project(temp_dir.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[llm]"));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        // SAFETY: This test runs in isolation
        unsafe {
            std::env::set_var("SLIDECRAFT_LLM__MODEL", "glm-test");
        }
        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.llm.model, "glm-test");
        unsafe {
            std::env::remove_var("SLIDECRAFT_LLM__MODEL");
        }
    }
}
