use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Axis;

/// One message of generator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorMessage {
    /// "user" or "assistant"; the core never invents other roles.
    pub role: String,
    pub content: String,
}

/// Rendering hints handed alongside the messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorHints {
    /// Optional one-line stylistic preface to weave in.
    pub preface: Option<String>,
    /// The rendering lane (active rotation axis).
    pub lane: Axis,
}

/// The text-generation backend, out of scope for this core.
///
/// The core never inspects the backend's internals, only whether the call
/// succeeded. Failures and timeouts degrade to the Forward contract at the
/// call site; nothing here retries.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        messages: Vec<GeneratorMessage>,
        hints: GeneratorHints,
    ) -> DomainResult<String>;
}
