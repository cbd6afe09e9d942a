//! Config Command
//!
//! Manage Slidecraft configuration.
//!
//! Usage:
//!   slidecraft config show [-f json]
//!   slidecraft config path
//!   slidecraft config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file, globally or under the current directory
pub fn init(global: bool, force: bool) -> Result<()> {
    let output = Output::new();

    if global {
        let dir = ConfigLoader::init_global(force)?;
        output.success("Initialized global configuration");
        output.detail("directory", dir.display());
        if let Some(config_path) = ConfigLoader::global_config_path() {
            output.detail("config", config_path.display());
        }
    } else {
        let root = std::env::current_dir()?;
        let dir = ConfigLoader::init_project(&root, force)?;
        output.success("Initialized project configuration");
        output.detail("directory", dir.display());
        output.detail("config", dir.join("config.toml").display());
    }
    Ok(())
}
