use futures_util::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

use super::{ RelayError, RelayTransport };
use crate::models::chat::{ ChatMessage, ChatRequest, Conversation };

type RenderFn = Box<dyn Fn(&Conversation, Option<&str>) + Send>;

/// Session-scoped conversation state plus the relay driver.
///
/// Holds the ordered message history, the current input text and the
/// selected model. `submit` appends the user's message, invokes the relay
/// and folds arriving chunks into a pending assistant message; subscribers
/// are re-invoked on every state change so a renderer can repaint
/// incrementally. `submit` requires exclusive access for the duration of
/// the exchange, which keeps the session to a single in-flight request.
pub struct ChatSession {
    conversation: Conversation,
    input: String,
    model: String,
    pending: Option<String>,
    transport: Arc<dyn RelayTransport>,
    listeners: Vec<RenderFn>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn RelayTransport>, model: impl Into<String>) -> Self {
        Self {
            conversation: Conversation {
                id: Uuid::new_v4().to_string(),
                messages: Vec::new(),
            },
            input: String::new(),
            model: model.into(),
            pending: None,
            transport,
            listeners: Vec::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.notify();
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Only affects requests made after the switch; history is untouched.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Assistant text accumulated for the reply currently streaming in.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Registers a render callback invoked on every state change, with the
    /// conversation and the pending assistant text (if a reply is
    /// streaming).
    pub fn subscribe(&mut self, render: impl Fn(&Conversation, Option<&str>) + Send + 'static) {
        self.listeners.push(Box::new(render));
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.conversation, self.pending.as_deref());
        }
    }

    /// Sends the current input. Returns `Ok(false)` without any side effect
    /// when the input is empty. On success the finalized assistant reply is
    /// the last history entry. If the stream breaks after partial output
    /// arrived, the partial text is kept in history and the error is
    /// returned; if the relay call fails outright, history gains no
    /// assistant message.
    pub async fn submit(&mut self) -> Result<bool, RelayError> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return Ok(false);
        }

        self.conversation.messages.push(ChatMessage::user(text));
        self.input.clear();
        self.notify();

        let request = ChatRequest {
            messages: self.conversation.messages.clone(),
            model: Some(self.model.clone()),
        };
        let mut stream = self.transport.send(&request).await?;

        self.pending = Some(String::new());
        self.notify();

        let mut failure = None;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(delta) => {
                    if let Some(pending) = self.pending.as_mut() {
                        pending.push_str(&delta);
                    }
                    self.notify();
                }
                Err(e) => {
                    failure = Some(RelayError::Stream(e.to_string()));
                    break;
                }
            }
        }

        let reply = self.pending.take().unwrap_or_default();
        if !reply.is_empty() {
            self.conversation.messages.push(ChatMessage::assistant(reply));
        }
        self.notify();

        match failure {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }
}
