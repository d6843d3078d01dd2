pub mod cli;
pub mod client;
pub mod llm;
pub mod models;
pub mod server;

use cli::Args;
use llm::chat::openai::OpenAIChatClient;
use llm::chat::ChatClient;
use llm::LlmConfig;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Listen Address: {}", args.listen_addr);
    info!(
        "Chat Base URL: {}",
        args.chat_base_url.as_deref().unwrap_or(llm::DEFAULT_CHAT_BASE_URL)
    );
    info!("Default Chat Model: {}", args.chat_model);
    info!("Console Mode: {}", args.console);
    if args.console {
        info!("Relay URL: {}", args.relay_url);
    }
    info!("-------------------------");

    if args.console {
        return client::console::run(&args.relay_url, &args.chat_model).await;
    }

    let config = LlmConfig {
        api_key: Some(args.chat_api_key.clone()),
        base_url: args.chat_base_url.clone(),
    };
    let client: Arc<dyn ChatClient> = Arc::new(OpenAIChatClient::from_config(&config)?);

    let server = Server::new(args.listen_addr.clone(), client, args.chat_model.clone());
    server.run().await
}
