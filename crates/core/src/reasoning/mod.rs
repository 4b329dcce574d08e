//! Remote Reasoning Clients
//!
//! The reasoning backend is an opaque remote capability: given a composed
//! request it returns raw text or fails. This module defines that seam and
//! the provider implementations behind it. There are no retries here; one
//! call is made per user-initiated analysis.

pub mod gemini;
pub mod openai;

use crate::{composer::ComposedRequest, error::RemoteError};
use async_trait::async_trait;

pub use gemini::GeminiClient;
pub use openai::OpenAICompatibleClient;

/// Defines the contract for any backend that can answer an analysis request.
///
/// Implementations return the backend's text verbatim. A response without any
/// text is returned as an empty string so the decoder can classify it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    /// Human-readable provider name for logs.
    fn provider(&self) -> &'static str;

    /// Sends one composed request and returns the raw response text.
    async fn generate(&self, request: &ComposedRequest) -> Result<String, RemoteError>;
}
