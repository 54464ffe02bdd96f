/// Completion client: the single point of entry for all LLM calls in the action server.
///
/// ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
/// All LLM interactions MUST go through `CompletionService`.
///
/// Speaks the OpenAI-compatible chat-completions dialect (OpenRouter by default):
/// one user message in, `choices[0].message.content` out.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::Config;

pub mod retry;

pub use retry::RetryingCompletion;

/// Upper bound for one completion round-trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub const RATE_LIMITED_MESSAGE: &str = "⏱️ Rate limit reached. Please wait a moment and try again.";
pub const UNAVAILABLE_MESSAGE: &str =
    "🔧 AI service temporarily unavailable. Please try again shortly.";
pub const TIMEOUT_MESSAGE: &str =
    "⏱️ Analysis is taking longer than expected. Please try a simpler query.";
pub const CONNECTION_MESSAGE: &str =
    "🔌 Connection issue detected. Please check your internet connection.";
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't analyze the resume right now. Please try again.";
pub const EXHAUSTED_MESSAGE: &str = "Analysis temporarily unavailable. Please try again.";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("service unavailable (HTTP 503)")]
    Unavailable,

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion returned no content")]
    EmptyContent,

    #[error("gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl CompletionError {
    /// Failures that surface as the generic apology. These are the only ones worth retrying.
    pub fn is_generic(&self) -> bool {
        matches!(
            self,
            CompletionError::Api { .. }
                | CompletionError::Http(_)
                | CompletionError::Parse(_)
                | CompletionError::EmptyContent
        )
    }

    /// The chat reply that stands in for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            CompletionError::RateLimited => RATE_LIMITED_MESSAGE,
            CompletionError::Unavailable => UNAVAILABLE_MESSAGE,
            CompletionError::Timeout => TIMEOUT_MESSAGE,
            CompletionError::Connect(_) => CONNECTION_MESSAGE,
            CompletionError::Exhausted { .. } => EXHAUSTED_MESSAGE,
            CompletionError::Api { .. }
            | CompletionError::Http(_)
            | CompletionError::Parse(_)
            | CompletionError::EmptyContent => GENERIC_FAILURE_MESSAGE,
        }
    }

    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout
        } else if e.is_connect() {
            CompletionError::Connect(e.to_string())
        } else {
            CompletionError::Http(e)
        }
    }
}

/// Anything that can turn a prompt into a reply. Carried in `AppState` as
/// `Arc<dyn CompletionService>` so the retry policy can be layered on at startup.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn try_complete(&self, prompt: &str) -> Result<String, CompletionError>;

    /// Never fails: any error is logged and replaced by its user-facing message.
    async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                if e.is_generic() {
                    error!("Completion request failed: {e}");
                } else {
                    warn!("Completion request failed: {e}");
                }
                e.user_message().to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Content of the first choice, surrounding whitespace removed.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the chat-completions endpoint. Configuration is fixed at construction.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        api_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
            model,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Self::new(
            config.openrouter_api_url.clone(),
            config.openrouter_api_key.clone(),
            config.openrouter_model.clone(),
            REQUEST_TIMEOUT,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    /// One POST, no retries. 429 and 503 are classified before the body is read.
    async fn try_complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(CompletionError::from_transport)?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(CompletionError::RateLimited),
            StatusCode::SERVICE_UNAVAILABLE => return Err(CompletionError::Unavailable),
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(CompletionError::from_transport)?;

        if !status.is_success() {
            // Try to parse error message
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .text()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyContent)
    }
}


#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    #[derive(Clone)]
    struct FakeEndpoint {
        status: u16,
        body: Value,
        delay: Duration,
        seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    }

    async fn fake_completion(
        State(endpoint): State<FakeEndpoint>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        endpoint.seen.lock().unwrap().push((headers, body));
        tokio::time::sleep(endpoint.delay).await;
        let status = axum::http::StatusCode::from_u16(endpoint.status).unwrap();
        (status, Json(endpoint.body.clone()))
    }

    async fn serve(endpoint: FakeEndpoint) -> SocketAddr {
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completion))
            .with_state(endpoint);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn endpoint(status: StatusCode, body: Value) -> FakeEndpoint {
        FakeEndpoint {
            status: status.as_u16(),
            body,
            delay: Duration::ZERO,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn client_for(addr: SocketAddr, timeout: Duration) -> CompletionClient {
        CompletionClient::new(
            format!("http://{addr}/v1/chat/completions"),
            "test-key".to_string(),
            "test/model".to_string(),
            timeout,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_success_trims_first_choice() {
        let fake = endpoint(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": " Python, Go "}}]}),
        );
        let seen = fake.seen.clone();
        let client = client_for(serve(fake).await, REQUEST_TIMEOUT);

        assert_eq!(client.complete("list skills").await, "Python, Go");

        let seen = seen.lock().unwrap();
        let (headers, body) = &seen[0];
        assert_eq!(headers["authorization"], "Bearer test-key");
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(
            body,
            &json!({"model": "test/model", "messages": [{"role": "user", "content": "list skills"}]})
        );
    }

    #[tokio::test]
    async fn test_429_maps_to_rate_limit_message_regardless_of_body() {
        let fake = endpoint(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"choices": [{"message": {"content": "should be ignored"}}]}),
        );
        let client = client_for(serve(fake).await, REQUEST_TIMEOUT);
        assert_eq!(client.complete("p").await, RATE_LIMITED_MESSAGE);
    }

    #[tokio::test]
    async fn test_503_maps_to_unavailable_message() {
        let fake = endpoint(StatusCode::SERVICE_UNAVAILABLE, json!({"error": {"message": "down"}}));
        let client = client_for(serve(fake).await, REQUEST_TIMEOUT);
        assert_eq!(client.complete("p").await, UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_error_status_is_generic_failure() {
        let fake = endpoint(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "No auth credentials found", "code": 401}}),
        );
        let client = client_for(serve(fake).await, REQUEST_TIMEOUT);

        let err = client.try_complete("p").await.unwrap_err();
        match &err {
            CompletionError::Api { status, message } => {
                assert_eq!(*status, 401);
                assert_eq!(message, "No auth credentials found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_choices_is_generic_failure() {
        let fake = endpoint(StatusCode::OK, json!({"choices": []}));
        let client = client_for(serve(fake).await, REQUEST_TIMEOUT);

        let err = client.try_complete("p").await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyContent));
        assert_eq!(client.complete("p").await, GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_slow_endpoint_maps_to_timeout_message() {
        let mut fake = endpoint(StatusCode::OK, json!({"choices": []}));
        fake.delay = Duration::from_secs(5);
        let client = client_for(serve(fake).await, Duration::from_millis(200));

        let err = client.try_complete("p").await.unwrap_err();
        assert!(matches!(err, CompletionError::Timeout), "got {err:?}");
        assert_eq!(err.user_message(), TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connection_message() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr, REQUEST_TIMEOUT);
        assert_eq!(client.complete("p").await, CONNECTION_MESSAGE);
    }

    #[test]
    fn test_only_generic_failures_are_retryable() {
        assert!(CompletionError::EmptyContent.is_generic());
        assert!(CompletionError::Api {
            status: 500,
            message: String::new()
        }
        .is_generic());
        assert!(!CompletionError::RateLimited.is_generic());
        assert!(!CompletionError::Unavailable.is_generic());
        assert!(!CompletionError::Timeout.is_generic());
        assert!(!CompletionError::Exhausted { attempts: 3 }.is_generic());
    }
}
