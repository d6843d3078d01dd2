use async_trait::async_trait;
use futures::StreamExt;
use log::warn;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use super::{ ChatClient, ChunkStream, CompletionResponse, ProviderError };
use crate::llm::{ LlmConfig, DEFAULT_CHAT_BASE_URL };
use crate::models::chat::ChatMessage;

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAIChatClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct OpenAIStreamResponse {
    choices: Vec<OpenAIStreamChoice>,
}

#[derive(Deserialize)]
struct OpenAIStreamChoice {
    delta: OpenAIDelta,
    #[serde(rename = "finish_reason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIDelta {
    content: Option<String>,
}

enum StreamLine {
    Delta(String),
    Done,
    Skip,
}

impl OpenAIChatClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, ProviderError> {
        let api_url = base_url.unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string());
        let http = HttpClient::builder().build()?;
        Ok(Self {
            http,
            api_key,
            base_url: api_url,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        Self::new(config.api_key.clone().unwrap_or_default(), config.base_url.clone())
    }

    async fn send(
        &self,
        model: &str,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, ProviderError> {
        let req = OpenAIChatRequest {
            model,
            messages,
            stream: if stream { Some(true) } else { None },
        };

        let resp = self.http
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status: status.as_u16(), body });
        }
        Ok(resp)
    }
}

/// Interprets one line of the provider's event stream.
fn parse_stream_line(line: &str) -> StreamLine {
    if line.is_empty() {
        return StreamLine::Skip;
    }
    if line == "data: [DONE]" {
        return StreamLine::Done;
    }
    let Some(data) = line.strip_prefix("data: ") else {
        return StreamLine::Skip;
    };
    match serde_json::from_str::<OpenAIStreamResponse>(data) {
        Ok(stream_resp) => {
            for choice in stream_resp.choices {
                if let Some(content) = choice.delta.content {
                    if !content.is_empty() {
                        return StreamLine::Delta(content);
                    }
                }
                if choice.finish_reason.as_deref() == Some("stop") {
                    return StreamLine::Done;
                }
            }
            StreamLine::Skip
        }
        Err(e) => {
            warn!("Unparseable stream event ({}): {}", e, data);
            StreamLine::Skip
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionResponse, ProviderError> {
        let resp = self.send(model, messages, false).await?;
        let parsed = resp.json::<OpenAIResponse>().await?;
        let content = parsed.choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyCompletion)?
            .message.content;
        Ok(CompletionResponse { response: content })
    }

    async fn stream_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<ChunkStream, ProviderError> {
        let resp = self.send(model, messages, true).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut bytes = resp.bytes_stream();
            // Event lines may straddle network chunks; hold the incomplete
            // tail until the next chunk arrives.
            let mut buf = String::new();
            while let Some(chunk_result) = bytes.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.send(Err(Box::new(e) as _)).await;
                        return;
                    }
                };
                buf.push_str(&String::from_utf8_lossy(&chunk));
                while let Some(pos) = buf.find('\n') {
                    let line = buf[..pos].trim_end_matches('\r').to_string();
                    buf.drain(..=pos);
                    match parse_stream_line(&line) {
                        StreamLine::Delta(content) => {
                            if tx.send(Ok(content)).await.is_err() {
                                // Receiver gone: caller disconnected, stop
                                // reading from the provider.
                                return;
                            }
                        }
                        StreamLine::Done => return,
                        StreamLine::Skip => {}
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}
