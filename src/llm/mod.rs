pub mod chat;

pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Provider connection settings. The model is not part of the connection:
/// it is chosen per request, falling back to [`DEFAULT_CHAT_MODEL`].
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}
