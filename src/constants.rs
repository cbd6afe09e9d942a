//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// LLM vendor constants
pub mod vendor {
    /// Chat completion API base (the `/chat/completions` path is appended)
    pub const DEFAULT_API_BASE: &str = "https://open.bigmodel.cn/api/paas/v4";

    /// Default model identifier
    pub const DEFAULT_MODEL: &str = "glm-4.5";

    /// Sampling temperature for slide extraction
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Completion token ceiling
    pub const DEFAULT_MAX_TOKENS: usize = 2000;

    /// Environment variable holding the vendor credential
    pub const API_KEY_ENV: &str = "GLM_API_KEY";
}

/// Network constants
pub mod network {
    /// Upper bound for a single transport call (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 55;

    /// TCP connect timeout for outbound clients (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    /// Path of the intermediary endpoint served by this process
    pub const PROXY_PATH: &str = "/api/proxy/glm";

    /// Default bind address for the HTTP API
    pub const DEFAULT_HOST: &str = "127.0.0.1";

    /// Default port for the HTTP API
    pub const DEFAULT_PORT: u16 = 3000;
}

/// Slide shape limits
pub mod slide {
    /// Maximum arguments kept per slide
    pub const MAX_ARGUMENTS: usize = 5;

    /// Placeholder argument inserted when none survive filtering
    pub const PLACEHOLDER_ARGUMENT: &str = "Add supporting arguments";

    /// Placeholder core idea for slides without one
    pub const PLACEHOLDER_CORE_IDEA: &str = "Core idea";

    /// Prefix of the positional title placeholder ("Slide N")
    pub const PLACEHOLDER_TITLE_PREFIX: &str = "Slide";
}

/// Rule-based fallback parser thresholds
pub mod fallback {
    /// Lines up to this many characters without a colon read as titles
    pub const TITLE_MAX_CHARS: usize = 30;

    /// A title-less draft adopts lines longer than this...
    pub const LOOSE_TITLE_MIN_CHARS: usize = 10;

    /// ...and no longer than this
    pub const LOOSE_TITLE_MAX_CHARS: usize = 100;
}

/// Log preview limits
pub mod preview {
    /// Characters of raw model output echoed into debug logs
    pub const RESPONSE_PREVIEW_CHARS: usize = 200;
}
