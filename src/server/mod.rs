pub mod api;
pub mod catalog;

use crate::llm::chat::ChatClient;
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    addr: String,
    state: api::AppState,
}

impl Server {
    pub fn new(addr: String, client: Arc<dyn ChatClient>, default_model: String) -> Self {
        Self {
            addr,
            state: api::AppState {
                client,
                default_model,
            },
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(&self.addr, self.state.clone()).await
    }
}
