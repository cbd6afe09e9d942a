//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/slidecraft/config.toml)
//! 3. Project config (.slidecraft/config.toml)
//! 4. Environment variables (SLIDECRAFT_*, plus GLM_API_KEY for the credential)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
