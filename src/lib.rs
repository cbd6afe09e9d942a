//! Slidecraft - Free Text to Presentation Slides
//!
//! Converts unstructured text into an ordered set of slides (title, core idea,
//! supporting arguments). An LLM produces the structure when it can; a
//! rule-based parser takes over whenever the model is unavailable, slow, or
//! returns something unusable. Either way the caller gets a valid, bounded,
//! de-duplicated slide set.
//!
//! ## Quick Start
//!
//! ```ignore
//! use slidecraft::{ConfigLoader, ParseOrchestrator};
//!
//! let config = ConfigLoader::load()?;
//! let orchestrator = ParseOrchestrator::from_config(&config)?;
//! let outcome = orchestrator.parse("Quarterly review\nRevenue: up 10%").await?;
//! println!("{} slides via {:?}", outcome.count, outcome.metadata.parse_method);
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: prompt construction, vendor transports, deadlines, response extraction
//! - [`slides`]: fallback parser, normalizer, parse orchestrator
//! - [`server`]: HTTP API
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod server;
pub mod slides;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, DeploymentMode};

// Error Types
pub use types::error::{Result, SlideError, TransportError};

// Data Model
pub use types::{Slide, SlideCandidate};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use slides::{
    FallbackParser, FallbackReason, FallbackRules, ParseConfig, ParseMetadata, ParseMethod,
    ParseOrchestrator, ParseOutcome, Quality, normalize,
};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{LlmTransport, SharedTransport, TransportKind, create_transport};
