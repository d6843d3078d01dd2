pub mod console;
pub mod session;

use async_trait::async_trait;
use futures_util::StreamExt;
use std::error::Error as StdError;
use thiserror::Error;

use crate::llm::chat::ChunkStream;
use crate::models::chat::ChatRequest;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay answered with a non-success HTTP status.
    #[error("relay returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The response stream broke after it had started.
    #[error("response stream failed: {0}")]
    Stream(String),
}

/// Transport seam between the conversation client and the relay endpoint.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChunkStream, RelayError>;
}

/// Production transport: POSTs the conversation to the relay endpoint and
/// yields the chunked text body as it arrives.
pub struct HttpRelay {
    http: reqwest::Client,
    url: String,
}

impl HttpRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn send(&self, request: &ChatRequest) -> Result<ChunkStream, RelayError> {
        let resp = self.http.post(&self.url).json(request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Status { status: status.as_u16(), body });
        }

        let stream = resp.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)
        });
        Ok(Box::pin(stream))
    }
}
