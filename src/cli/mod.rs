use clap::Parser;

use crate::llm::DEFAULT_CHAT_MODEL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:4000")]
    pub listen_addr: String,

    /// Base URL for the chat completion provider API. Defaults to the
    /// OpenAI chat completions endpoint.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// API key for the chat completion provider.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model used when a chat request does not name one.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,

    /// Run the interactive console client instead of the server.
    #[arg(long, default_value = "false")]
    pub console: bool,

    /// Relay endpoint URL for the console client.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:4000/api/chat")]
    pub relay_url: String,
}
