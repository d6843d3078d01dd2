pub mod openai;

use async_trait::async_trait;
use futures::Stream;
use serde::Deserialize;
use std::error::Error as StdError;
use std::pin::Pin;
use thiserror::Error;

use crate::models::chat::ChatMessage;

pub type ChunkResult = Result<String, Box<dyn StdError + Send + Sync>>;

/// Incremental assistant output. Concatenating the items in arrival order
/// yields the full reply.
pub type ChunkStream = Pin<Box<dyn Stream<Item = ChunkResult> + Send>>;

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success HTTP status.
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("no completion choices in provider response")]
    EmptyCompletion,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Single-shot completion, full reply in one response.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionResponse, ProviderError>;

    /// Streaming completion. The returned stream is live and append-only;
    /// the provider call has already been accepted (status checked) by the
    /// time this resolves, so rejections surface here as `ProviderError`
    /// rather than as a poisoned stream.
    async fn stream_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChunkStream, ProviderError>;
}
