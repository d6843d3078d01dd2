use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{ header, StatusCode },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use log::{ error, info };
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };

use super::catalog;
use crate::llm::chat::{ ChatClient, ProviderError };
use crate::models::chat::{ ChatRequest, ChatResponse, ROLE_USER };

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn ChatClient>,
    pub default_model: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(site_handler))
        .route("/api/solutions", get(solutions_handler))
        .route("/api/tools", get(tools_handler))
        .route("/api/docs", get(docs_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/complete", post(chat_complete_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr: &str,
    state: AppState,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr: SocketAddr = addr.parse()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn site_handler() -> impl IntoResponse {
    Json(catalog::site_info())
}

async fn solutions_handler() -> impl IntoResponse {
    Json(catalog::solution_stats())
}

async fn tools_handler() -> impl IntoResponse {
    Json(catalog::tool_entries())
}

async fn docs_handler() -> impl IntoResponse {
    Json(catalog::doc_stats())
}

/// Streaming chat relay. Forwards the conversation to the completion
/// provider and republishes its output as a plain chunked text body; the
/// response starts before the full reply is known.
async fn chat_handler(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let model = resolve_model(req.model.as_deref(), &state.default_model);
    info!("Chat relay request: {} messages, model: {}", req.messages.len(), model);

    match state.client.stream_completion(&model, &req.messages).await {
        Ok(stream) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from_stream(stream),
        ).into_response(),
        Err(e) => provider_error_response(e),
    }
}

/// Non-streaming variant: full reply in one JSON body.
async fn chat_complete_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Response {
    if req.messages.is_empty() {
        return bad_request("No messages provided");
    }
    if req.messages.last().map(|m| m.role.as_str()) != Some(ROLE_USER) {
        return bad_request("Last message must be from user");
    }

    let model = resolve_model(req.model.as_deref(), &state.default_model);

    match state.client.complete(&model, &req.messages).await {
        Ok(completion) => Json(ChatResponse {
            response: completion.response,
            error: None,
        }).into_response(),
        Err(e) => provider_error_response(e),
    }
}

fn resolve_model(requested: Option<&str>, default_model: &str) -> String {
    match requested {
        Some(model) if !model.is_empty() => model.to_string(),
        _ => default_model.to_string(),
    }
}

fn bad_request(detail: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
}

/// Providers that answered with an HTTP error keep their status; failures
/// before any status exists map to 502.
fn provider_error_response(err: ProviderError) -> Response {
    error!("Chat relay provider call failed: {}", err);
    match err {
        ProviderError::Api { status, body } => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (code, body).into_response()
        }
        other => (StatusCode::BAD_GATEWAY, other.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::chat::{ ChunkResult, ChunkStream, CompletionResponse };
    use crate::llm::DEFAULT_CHAT_MODEL;
    use crate::models::chat::ChatMessage;
    use async_trait::async_trait;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct StubClient {
        chunks: Vec<String>,
        failure: Option<(u16, String)>,
        calls: Mutex<Vec<(String, Vec<ChatMessage>)>>,
    }

    impl StubClient {
        fn replying(chunks: &[&str]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                failure: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16, body: &str) -> Self {
            Self {
                chunks: Vec::new(),
                failure: Some((status, body.to_string())),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, model: &str, messages: &[ChatMessage]) -> Result<(), ProviderError> {
            self.calls.lock().unwrap().push((model.to_string(), messages.to_vec()));
            match &self.failure {
                Some((status, body)) => Err(ProviderError::Api {
                    status: *status,
                    body: body.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl ChatClient for StubClient {
        async fn complete(
            &self,
            model: &str,
            messages: &[ChatMessage],
        ) -> Result<CompletionResponse, ProviderError> {
            self.record(model, messages)?;
            Ok(CompletionResponse { response: self.chunks.concat() })
        }

        async fn stream_completion(
            &self,
            model: &str,
            messages: &[ChatMessage],
        ) -> Result<ChunkStream, ProviderError> {
            self.record(model, messages)?;
            let chunks: Vec<ChunkResult> = self.chunks.iter().cloned().map(Ok).collect();
            Ok(Box::pin(futures::stream::iter(chunks)))
        }
    }

    fn app(client: StubClient) -> (Router, Arc<StubClient>) {
        let client = Arc::new(client);
        let state = AppState {
            client: client.clone(),
            default_model: DEFAULT_CHAT_MODEL.to_string(),
        };
        (router(state), client)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn relay_concatenation_matches_full_reply() {
        let (app, client) = app(StubClient::replying(&["BLAST ", "is ", "a tool."]));
        let request = post_json(
            "/api/chat",
            json!({ "messages": [{ "role": "user", "content": "What is BLAST?" }] }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "BLAST is a tool.");

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (model, messages) = &calls[0];
        assert_eq!(model, DEFAULT_CHAT_MODEL);
        assert_eq!(messages, &vec![ChatMessage::user("What is BLAST?")]);
    }

    #[tokio::test]
    async fn relay_uses_supplied_model_verbatim() {
        let (app, client) = app(StubClient::replying(&["ok"]));
        let request = post_json(
            "/api/chat",
            json!({
                "messages": [{ "role": "user", "content": "hi" }],
                "model": "gpt-4"
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.calls.lock().unwrap()[0].0, "gpt-4");
    }

    #[tokio::test]
    async fn relay_treats_empty_model_as_absent() {
        let (app, client) = app(StubClient::replying(&["ok"]));
        let request = post_json(
            "/api/chat",
            json!({
                "messages": [{ "role": "user", "content": "hi" }],
                "model": ""
            }),
        );

        app.oneshot(request).await.unwrap();
        assert_eq!(client.calls.lock().unwrap()[0].0, DEFAULT_CHAT_MODEL);
    }

    #[tokio::test]
    async fn relay_passes_provider_status_through() {
        let (app, _client) = app(StubClient::failing(401, "Incorrect API key provided"));
        let request = post_json(
            "/api/chat",
            json!({ "messages": [{ "role": "user", "content": "hi" }] }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Incorrect API key provided");
    }

    #[tokio::test]
    async fn relay_preserves_history_order_and_roles() {
        let (app, client) = app(StubClient::replying(&["ok"]));
        let history = vec![
            ChatMessage::system("You are a bioinformatics assistant."),
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there!"),
            ChatMessage::user("What bioinformatics tools do you know?"),
        ];
        let request = post_json("/api/chat", json!({ "messages": &history }));

        app.oneshot(request).await.unwrap();
        assert_eq!(client.calls.lock().unwrap()[0].1, history);
    }

    #[tokio::test]
    async fn complete_rejects_empty_history() {
        let (app, client) = app(StubClient::replying(&["ok"]));
        let request = post_json("/api/chat/complete", json!({ "messages": [] }));

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("No messages provided"));
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn complete_rejects_non_user_last_message() {
        let (app, _client) = app(StubClient::replying(&["ok"]));
        let request = post_json(
            "/api/chat/complete",
            json!({ "messages": [{ "role": "assistant", "content": "This should fail" }] }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Last message must be from user"));
    }

    #[tokio::test]
    async fn complete_returns_full_reply() {
        let (app, _client) = app(StubClient::replying(&["BLAST is a tool."]));
        let request = post_json(
            "/api/chat/complete",
            json!({ "messages": [{ "role": "user", "content": "What is BLAST?" }] }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["response"], "BLAST is a tool.");
    }

    #[tokio::test]
    async fn catalog_routes_serve_seeded_data() {
        let (app, _client) = app(StubClient::replying(&[]));

        let get = |uri: &str| {
            Request::builder().uri(uri).body(Body::empty()).unwrap()
        };

        let response = app.clone().oneshot(get("/")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["name"], "BioinfoGPT");

        let response = app.clone().oneshot(get("/api/solutions")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["totalSolutions"], 1000);

        let response = app.clone().oneshot(get("/api/tools")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["name"], "BLAST");

        let response = app.oneshot(get("/api/docs")).await.unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["totalDocs"], 500);
    }
}
