//! Parse Command
//!
//! Turn a text file (or stdin) into slides.
//!
//! Usage:
//!   slidecraft parse notes.txt
//!   cat notes.txt | slidecraft parse --format json
//!   slidecraft parse notes.txt --deployment production

use std::io::Read;
use std::path::PathBuf;

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::config::{ConfigLoader, DeploymentMode};
use crate::slides::ParseOrchestrator;
use crate::types::{Result, SlideError};

pub struct ParseOptions {
    /// Input file; stdin when absent
    pub file: Option<PathBuf>,
    /// `text` or `json`
    pub format: String,
    /// Overrides `[deployment] mode`
    pub deployment: Option<DeploymentMode>,
}

pub fn run(options: ParseOptions) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(mode) = options.deployment {
        config.deployment.mode = mode;
    }

    let text = read_input(options.file.as_ref())?;
    let orchestrator = ParseOrchestrator::from_config(&config)?;

    let rt = Runtime::new().map_err(|e| SlideError::internal(e.to_string()))?;
    let outcome = rt.block_on(orchestrator.parse(&text))?;

    if options.format == "json" {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        Output::new().outcome(&outcome);
    }
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
