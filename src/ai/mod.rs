//! AI Integration Layer
//!
//! Prompt construction, transports to the LLM vendor, deadlines, and
//! extraction of structured output from model text.

pub mod prompt;
pub mod timeout;
pub mod transport;
pub mod validation;

pub use prompt::{PromptBuilder, PromptSection, PromptTemplates};
pub use timeout::{Deadline, within_deadline};
pub use transport::{
    CompletionRequest, DirectTransport, GlmClient, LlmTransport, ProxiedTransport,
    SharedTransport, TransportKind, TransportSettings, create_transport, message_content, route,
};
pub use validation::{decode_candidates, extract_json_array};
