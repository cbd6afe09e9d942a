//! Parse Orchestrator
//!
//! Drives one parse request through an explicit state machine:
//!
//! ```text
//! Idle → PreparingPrompt → AwaitingTransport → ExtractingResponse → Normalizing → Done
//!              │                   │                    │
//!              └───────────────────┴────────────────────┴──→ Fallback → Normalizing
//! ```
//!
//! Once input validation passes, every path ends in `Done` with a non-empty
//! slide set. Transport failures, timeouts and undecodable model output are
//! recorded in the metadata and replaced by the rule-based parser.

use std::time::{Duration, Instant};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::fallback::FallbackParser;
use super::normalizer::normalize;
use crate::ai::prompt::PromptTemplates;
use crate::ai::timeout::{Deadline, within_deadline};
use crate::ai::transport::{
    CompletionRequest, SharedTransport, TransportKind, TransportSettings, create_transport,
};
use crate::ai::validation::decode_candidates;
use crate::config::{Config, DeploymentMode};
use crate::constants::preview::RESPONSE_PREVIEW_CHARS;
use crate::types::{Result, Slide, SlideCandidate, SlideError, TransportError, char_len, preview};

// =============================================================================
// Configuration
// =============================================================================

/// Everything a parse needs besides the text and the transport.
///
/// The credential is handed in explicitly; the orchestrator never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub timeout: Duration,
    pub environment: DeploymentMode,
}

impl From<&Config> for ParseConfig {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config
                .llm
                .api_key()
                .map(|key| SecretString::from(key.to_string())),
            model: config.llm.model.clone(),
            timeout: Duration::from_secs(config.llm.timeout_secs),
            environment: config.deployment.mode,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Which path produced the slides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMethod {
    DirectAi,
    ProxiedAi,
    RuleFallback,
}

impl From<TransportKind> for ParseMethod {
    fn from(kind: TransportKind) -> Self {
        match kind {
            TransportKind::Direct => ParseMethod::DirectAi,
            TransportKind::Proxied => ParseMethod::ProxiedAi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Medium,
}

/// Why the AI path was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackReason {
    MissingCredential,
    Timeout,
    Unauthorized,
    RateLimited,
    ServerError,
    NetworkError,
    MalformedResponse,
    EmptyResult,
}

impl From<&TransportError> for FallbackReason {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Unauthorized { .. } => FallbackReason::Unauthorized,
            TransportError::RateLimited => FallbackReason::RateLimited,
            TransportError::ServerError { .. } => FallbackReason::ServerError,
            TransportError::NetworkError(_) => FallbackReason::NetworkError,
            TransportError::Timeout(_) => FallbackReason::Timeout,
            TransportError::MalformedResponse(_) => FallbackReason::MalformedResponse,
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FallbackReason::MissingCredential => "no API key configured",
            FallbackReason::Timeout => "timed out",
            FallbackReason::Unauthorized => "credential rejected",
            FallbackReason::RateLimited => "rate limited",
            FallbackReason::ServerError => "server error",
            FallbackReason::NetworkError => "network error",
            FallbackReason::MalformedResponse => "unreadable response",
            FallbackReason::EmptyResult => "empty result",
        };
        write!(f, "{}", text)
    }
}

/// Diagnostics describing how a result was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    #[serde(rename = "usedAI")]
    pub used_ai: bool,
    pub parse_method: ParseMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub api_call_time: String,
    pub elapsed_ms: u64,
    pub quality: Quality,
    pub text_length: usize,
    pub slide_count: usize,
    pub environment: DeploymentMode,
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

/// Result of one parse request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub success: bool,
    pub slides: Vec<Slide>,
    pub count: usize,
    pub metadata: ParseMetadata,
    pub message: String,
}

// =============================================================================
// State Machine
// =============================================================================

/// Observable orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    PreparingPrompt,
    AwaitingTransport,
    ExtractingResponse,
    Fallback,
    Normalizing,
    Done,
}

/// Record of an abandoned AI attempt
#[derive(Debug, Clone)]
struct Abandoned {
    reason: FallbackReason,
    error: Option<TransportError>,
    attempted: bool,
}

impl Abandoned {
    fn before_call(reason: FallbackReason) -> Self {
        Self {
            reason,
            error: None,
            attempted: false,
        }
    }

    fn after_call(reason: FallbackReason, error: Option<TransportError>) -> Self {
        Self {
            reason,
            error,
            attempted: true,
        }
    }
}

/// How the candidates reaching `Normalizing` were obtained
#[derive(Debug)]
enum Source {
    Ai,
    Rules(Abandoned),
}

/// State plus the data it carries
enum Stage<'a> {
    PreparingPrompt,
    AwaitingTransport {
        prompt: String,
        api_key: &'a SecretString,
    },
    ExtractingResponse(String),
    Fallback(Abandoned),
    Normalizing(Vec<SlideCandidate>, Source),
    Done(ParseOutcome),
}

impl Stage<'_> {
    fn state(&self) -> ParseState {
        match self {
            Stage::PreparingPrompt => ParseState::PreparingPrompt,
            Stage::AwaitingTransport { .. } => ParseState::AwaitingTransport,
            Stage::ExtractingResponse(_) => ParseState::ExtractingResponse,
            Stage::Fallback(_) => ParseState::Fallback,
            Stage::Normalizing(..) => ParseState::Normalizing,
            Stage::Done(_) => ParseState::Done,
        }
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Text-to-slides pipeline
pub struct ParseOrchestrator {
    config: ParseConfig,
    transport: SharedTransport,
    fallback: FallbackParser,
}

impl ParseOrchestrator {
    pub fn new(config: ParseConfig, transport: SharedTransport, fallback: FallbackParser) -> Self {
        Self {
            config,
            transport,
            fallback,
        }
    }

    /// Wire up the transport for the configured deployment mode
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = create_transport(config.deployment.mode, &TransportSettings::from(config))?;
        let fallback = FallbackParser::new(config.fallback.clone())?;
        Ok(Self::new(ParseConfig::from(config), transport, fallback))
    }

    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    /// Parse free text into slides.
    ///
    /// Fails only with `InvalidInput` for blank text.
    #[instrument(skip_all, fields(text_len = text.len(), transport = %self.transport.kind()))]
    pub async fn parse(&self, text: &str) -> Result<ParseOutcome> {
        if text.trim().is_empty() {
            return Err(SlideError::invalid_input("Please provide text to parse"));
        }

        let started = Instant::now();
        let mut call_ms: u64 = 0;
        let mut stage = Stage::PreparingPrompt;
        debug!(state = ?ParseState::Idle, "Parse started");

        loop {
            debug!(state = ?stage.state(), "Parse transition");
            stage = match stage {
                Stage::PreparingPrompt => {
                    match self.config.api_key.as_ref() {
                        Some(api_key) => Stage::AwaitingTransport {
                            prompt: PromptTemplates::slide_parsing(text),
                            api_key,
                        },
                        None => {
                            info!("No API key configured, using rule-based parsing");
                            Stage::Fallback(Abandoned::before_call(
                                FallbackReason::MissingCredential,
                            ))
                        }
                    }
                }

                Stage::AwaitingTransport { prompt, api_key } => {
                    let call_started = Instant::now();
                    let result = self.call_transport(api_key, &prompt).await;
                    call_ms = elapsed_ms(call_started);

                    match result {
                        Ok(raw) => Stage::ExtractingResponse(raw),
                        Err(err) => {
                            warn!("AI call failed after {}ms: {}", call_ms, err);
                            Stage::Fallback(Abandoned::after_call(
                                FallbackReason::from(&err),
                                Some(err),
                            ))
                        }
                    }
                }

                Stage::ExtractingResponse(raw) => match decode_candidates(&raw) {
                    Ok(items) if !items.is_empty() => {
                        let candidates = items.iter().map(SlideCandidate::from_value).collect();
                        Stage::Normalizing(candidates, Source::Ai)
                    }
                    Ok(_) => {
                        warn!("AI returned an empty slide array");
                        Stage::Fallback(Abandoned::after_call(FallbackReason::EmptyResult, None))
                    }
                    Err(err) => {
                        warn!(
                            "Could not decode AI output ({}): {}",
                            err,
                            preview(&raw, RESPONSE_PREVIEW_CHARS)
                        );
                        Stage::Fallback(Abandoned::after_call(
                            FallbackReason::MalformedResponse,
                            Some(err),
                        ))
                    }
                },

                Stage::Fallback(abandoned) => {
                    let candidates = self.fallback.parse(text);
                    Stage::Normalizing(candidates, Source::Rules(abandoned))
                }

                Stage::Normalizing(candidates, source) => {
                    let slides = normalize(&candidates);
                    Stage::Done(self.finish(text, slides, source, call_ms, elapsed_ms(started)))
                }

                Stage::Done(outcome) => {
                    info!(
                        "Parsed {} slides via {:?} in {}ms",
                        outcome.count, outcome.metadata.parse_method, outcome.metadata.elapsed_ms
                    );
                    return Ok(outcome);
                }
            };
        }
    }

    async fn call_transport(
        &self,
        api_key: &SecretString,
        prompt: &str,
    ) -> std::result::Result<String, TransportError> {
        let deadline = Deadline::after(self.config.timeout);
        let request = CompletionRequest {
            api_key,
            model: &self.config.model,
            prompt,
            deadline,
        };

        within_deadline(deadline, self.transport.complete(&request)).await
    }

    fn finish(
        &self,
        text: &str,
        slides: Vec<Slide>,
        source: Source,
        call_ms: u64,
        elapsed_ms: u64,
    ) -> ParseOutcome {
        let count = slides.len();
        let kind = self.transport.kind();

        let (metadata, message) = match source {
            Source::Ai => (
                ParseMetadata {
                    used_ai: true,
                    parse_method: ParseMethod::from(kind),
                    model: Some(self.config.model.clone()),
                    api_call_time: format!("{} call succeeded in {}ms", kind, call_ms),
                    elapsed_ms,
                    quality: Quality::High,
                    text_length: char_len(text),
                    slide_count: count,
                    environment: self.config.environment,
                    timed_out: false,
                    fallback_reason: None,
                    http_status: None,
                },
                format!("AI parsing succeeded, generated {} slides", count),
            ),
            Source::Rules(abandoned) => {
                let timed_out = abandoned.reason == FallbackReason::Timeout;
                let api_call_time = if !abandoned.attempted {
                    format!("rule-based parsing ({})", abandoned.reason)
                } else if timed_out {
                    format!(
                        "{} call timed out after {}s, used rule-based parsing",
                        kind,
                        self.config.timeout.as_secs_f64()
                    )
                } else {
                    format!(
                        "{} call failed after {}ms ({}), used rule-based parsing",
                        kind, call_ms, abandoned.reason
                    )
                };
                let message = match abandoned.reason {
                    FallbackReason::Timeout => format!(
                        "AI service timed out, rule-based parsing generated {} slides",
                        count
                    ),
                    FallbackReason::MissingCredential => format!(
                        "No API key configured, rule-based parsing generated {} slides",
                        count
                    ),
                    _ => format!("Rule-based parsing generated {} slides", count),
                };

                (
                    ParseMetadata {
                        used_ai: false,
                        parse_method: ParseMethod::RuleFallback,
                        model: abandoned.attempted.then(|| self.config.model.clone()),
                        api_call_time,
                        elapsed_ms,
                        quality: Quality::Medium,
                        text_length: char_len(text),
                        slide_count: count,
                        environment: self.config.environment,
                        timed_out,
                        fallback_reason: Some(abandoned.reason),
                        http_status: abandoned.error.as_ref().and_then(TransportError::http_status),
                    },
                    message,
                )
            }
        };

        ParseOutcome {
            success: true,
            slides,
            count,
            metadata,
            message,
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::transport::LlmTransport;
    use crate::slides::FallbackRules;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const REPORT: &str = "AI Usage Report\nCore point: match model to task\nModel selection: pick the right model first";

    enum Reply {
        Text(&'static str),
        Fail(TransportError),
        Hang,
    }

    struct MockTransport {
        reply: Reply,
        kind: TransportKind,
        calls: AtomicUsize,
    }

    impl MockTransport {
        fn new(reply: Reply) -> Arc<Self> {
            Self::with_kind(reply, TransportKind::Direct)
        }

        fn with_kind(reply: Reply, kind: TransportKind) -> Arc<Self> {
            Arc::new(Self {
                reply,
                kind,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmTransport for MockTransport {
        async fn complete(
            &self,
            _request: &CompletionRequest<'_>,
        ) -> std::result::Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail(err) => Err(err.clone()),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("[]".to_string())
                }
            }
        }

        fn kind(&self) -> TransportKind {
            self.kind
        }
    }

    fn config(with_key: bool) -> ParseConfig {
        ParseConfig {
            api_key: with_key.then(|| SecretString::from("sk-test".to_string())),
            model: "glm-4.5".to_string(),
            timeout: Duration::from_secs(5),
            environment: DeploymentMode::Production,
        }
    }

    fn orchestrator(config: ParseConfig, transport: Arc<MockTransport>) -> ParseOrchestrator {
        let fallback = FallbackParser::new(FallbackRules::default()).unwrap();
        ParseOrchestrator::new(config, transport, fallback)
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let transport = MockTransport::new(Reply::Text("[]"));
        let orch = orchestrator(config(true), transport.clone());

        let err = orch.parse("  \n\t ").await.unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_transport() {
        let transport = MockTransport::new(Reply::Text("[]"));
        let orch = orchestrator(config(false), transport.clone());

        let outcome = orch.parse(REPORT).await.unwrap();

        assert_eq!(transport.calls(), 0);
        assert!(outcome.success);
        assert!(!outcome.metadata.used_ai);
        assert_eq!(outcome.metadata.parse_method, ParseMethod::RuleFallback);
        assert_eq!(
            outcome.metadata.fallback_reason,
            Some(FallbackReason::MissingCredential)
        );
        assert_eq!(outcome.metadata.quality, Quality::Medium);
        assert_eq!(outcome.metadata.model, None);
        assert_eq!(outcome.slides[0].title, "AI Usage Report");
    }

    #[tokio::test]
    async fn test_ai_success_direct() {
        let transport = MockTransport::new(Reply::Text(
            "Here you go:\n```json\n[{\"title\":\"A\",\"coreIdea\":\"B\",\"arguments\":[\"X: foo\",\"x: Foo\",\"Y: bar\"]}]\n```",
        ));
        let orch = orchestrator(config(true), transport.clone());

        let outcome = orch.parse(REPORT).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(outcome.metadata.used_ai);
        assert_eq!(outcome.metadata.parse_method, ParseMethod::DirectAi);
        assert_eq!(outcome.metadata.quality, Quality::High);
        assert_eq!(outcome.metadata.fallback_reason, None);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.slides[0].arguments, vec!["X: foo", "Y: bar"]);
        assert_eq!(outcome.slides[0].id, "1");
    }

    #[tokio::test]
    async fn test_ai_success_proxied() {
        let transport = MockTransport::with_kind(
            Reply::Text(r#"[{"title":"A"},{"title":"B"}]"#),
            TransportKind::Proxied,
        );
        let orch = orchestrator(config(true), transport);

        let outcome = orch.parse(REPORT).await.unwrap();
        assert_eq!(outcome.metadata.parse_method, ParseMethod::ProxiedAi);
        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.slides[1].id, "2");
    }

    #[tokio::test]
    async fn test_timeout_falls_back_within_deadline() {
        let transport = MockTransport::new(Reply::Hang);
        let orch = orchestrator(
            ParseConfig {
                timeout: Duration::from_millis(50),
                ..config(true)
            },
            transport,
        );

        let started = Instant::now();
        let outcome = orch.parse(REPORT).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(outcome.metadata.timed_out);
        assert_eq!(outcome.metadata.fallback_reason, Some(FallbackReason::Timeout));
        assert!(outcome.message.contains("timed out"));
        assert_eq!(outcome.count, 1);
    }

    #[tokio::test]
    async fn test_status_failures_record_class() {
        let cases = [
            (
                TransportError::Unauthorized { status: 401 },
                FallbackReason::Unauthorized,
                Some(401),
            ),
            (TransportError::RateLimited, FallbackReason::RateLimited, Some(429)),
            (
                TransportError::ServerError {
                    status: 502,
                    body: "bad gateway".to_string(),
                },
                FallbackReason::ServerError,
                Some(502),
            ),
            (
                TransportError::NetworkError("refused".to_string()),
                FallbackReason::NetworkError,
                None,
            ),
        ];

        for (err, reason, status) in cases {
            let orch = orchestrator(config(true), MockTransport::new(Reply::Fail(err)));
            let outcome = orch.parse(REPORT).await.unwrap();

            assert!(outcome.success);
            assert!(!outcome.metadata.used_ai);
            assert_eq!(outcome.metadata.fallback_reason, Some(reason));
            assert_eq!(outcome.metadata.http_status, status);
            assert_eq!(outcome.metadata.model.as_deref(), Some("glm-4.5"));
        }
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let orch = orchestrator(
            config(true),
            MockTransport::new(Reply::Text("Sorry, I cannot help with that.")),
        );
        let outcome = orch.parse(REPORT).await.unwrap();

        assert_eq!(
            outcome.metadata.fallback_reason,
            Some(FallbackReason::MalformedResponse)
        );
        assert_eq!(outcome.slides[0].core_idea, "match model to task");
    }

    #[tokio::test]
    async fn test_empty_array_falls_back() {
        let orch = orchestrator(config(true), MockTransport::new(Reply::Text("```json\n[]\n```")));
        let outcome = orch.parse(REPORT).await.unwrap();

        assert_eq!(outcome.metadata.fallback_reason, Some(FallbackReason::EmptyResult));
        assert_eq!(outcome.metadata.parse_method, ParseMethod::RuleFallback);
    }

    #[tokio::test]
    async fn test_metadata_serializes_camel_case() {
        let orch = orchestrator(config(false), MockTransport::new(Reply::Text("[]")));
        let outcome = orch.parse("第一页\n要点：内容").await.unwrap();
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["metadata"]["usedAI"], false);
        assert_eq!(value["metadata"]["parseMethod"], "rule-fallback");
        assert_eq!(value["metadata"]["fallbackReason"], "missing-credential");
        assert_eq!(value["metadata"]["environment"], "production");
        assert_eq!(value["metadata"]["textLength"], 9);
        assert!(value["metadata"].get("httpStatus").is_none());
        assert_eq!(value["slides"][0]["coreIdea"], "Core idea");
    }

    #[test]
    fn test_parse_config_from_config() {
        let mut cfg = Config::default();
        cfg.llm.api_key = Some("  ".to_string());
        cfg.llm.timeout_secs = 12;

        let parse_config = ParseConfig::from(&cfg);
        assert!(parse_config.api_key.is_none());
        assert_eq!(parse_config.timeout, Duration::from_secs(12));
        assert_eq!(parse_config.environment, DeploymentMode::Development);
    }
}
