//! Chat Completions client for the recognition API.
//!
//! Sends the image via data URL in the user message content array. The
//! credential is supplied per call because the dispatcher rotates keys
//! between requests; the reqwest client and its connection pool are shared.

use super::{ImageInput, RECOGNITION_PROMPT};
use crate::config::RecognitionConfig;
use crate::error::RecognitionError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct RecognitionClient {
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl RecognitionClient {
    /// Build a client from the recognition config section.
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
            client: reqwest::Client::new(),
        }
    }

    /// Extract the text from a captcha image.
    ///
    /// One outbound call, no retries. Every failure mode — transport error,
    /// non-success status, unparseable body, empty choices — comes back as a
    /// `RecognitionError` value; this method never panics on API failure.
    pub async fn extract_text(
        &self,
        image: &ImageInput,
        credential: &str,
    ) -> Result<String, RecognitionError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: RECOGNITION_PROMPT.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {credential}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RecognitionError::Request {
                message: format!("recognition request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RecognitionError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let chat_resp: ChatResponse =
            resp.json()
                .await
                .map_err(|e| RecognitionError::MalformedResponse {
                    message: format!("failed to parse recognition response: {e}"),
                })?;

        let text = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| RecognitionError::MalformedResponse {
                message: "recognition response had no choices with content".to_string(),
            })?;

        tracing::debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            "recognition call completed"
        );

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Bind a stub chat-completions server on an ephemeral port.
    ///
    /// Returns the endpoint URL and a handle to the last request body seen.
    async fn stub_server(response: Value, status: u16) -> (String, Arc<std::sync::Mutex<Value>>) {
        let seen = Arc::new(std::sync::Mutex::new(Value::Null));

        #[derive(Clone)]
        struct StubState {
            response: Value,
            status: u16,
            seen: Arc<std::sync::Mutex<Value>>,
        }

        async fn handler(
            State(state): State<StubState>,
            Json(body): Json<Value>,
        ) -> (axum::http::StatusCode, Json<Value>) {
            *state.seen.lock().unwrap() = body;
            (
                axum::http::StatusCode::from_u16(state.status).unwrap(),
                Json(state.response.clone()),
            )
        }

        let app = Router::new()
            .route("/v1/chat/completions", post(handler))
            .with_state(StubState {
                response,
                status,
                seen: seen.clone(),
            });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1/chat/completions"), seen)
    }

    fn client_for(endpoint: &str) -> RecognitionClient {
        let config = RecognitionConfig {
            endpoint: endpoint.to_string(),
            model: "test-model".to_string(),
            timeout_ms: 5000,
            max_tokens: 100,
            temperature: 0.0,
        };
        RecognitionClient::new(&config)
    }

    fn choices_response(text: &str) -> Value {
        json!({
            "choices": [{"message": {"role": "assistant", "content": text}}],
            "model": "test-model"
        })
    }

    #[tokio::test]
    async fn test_extract_text_returns_first_choice() {
        let (endpoint, _) = stub_server(choices_response("XY7Q"), 200).await;
        let client = client_for(&endpoint);

        let text = client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap();
        assert_eq!(text, "XY7Q");
    }

    #[tokio::test]
    async fn test_extract_text_trims_whitespace() {
        let (endpoint, _) = stub_server(choices_response("  XY7Q\n"), 200).await;
        let client = client_for(&endpoint);

        let text = client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap();
        assert_eq!(text, "XY7Q");
    }

    #[tokio::test]
    async fn test_request_shape_carries_prompt_and_data_url() {
        let (endpoint, seen) = stub_server(choices_response("ok"), 200).await;
        let client = client_for(&endpoint);

        client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap();

        let body = seen.lock().unwrap().clone();
        assert_eq!(body["model"], "test-model");
        let content = &body["messages"][0]["content"];
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], RECOGNITION_PROMPT);
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,aGVsbG8="
        );
    }

    #[tokio::test]
    async fn test_api_error_status_is_surfaced() {
        let (endpoint, _) = stub_server(json!({"error": "quota exceeded"}), 429).await;
        let client = client_for(&endpoint);

        let err = client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap_err();
        match err {
            RecognitionError::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("quota exceeded"));
            }
            other => panic!("expected Api error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed_response() {
        let (endpoint, _) = stub_server(json!({"choices": []}), 200).await;
        let client = client_for(&endpoint);

        let err = client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Port 1 is never listening
        let client = client_for("http://127.0.0.1:1/v1/chat/completions");

        let err = client
            .extract_text(&ImageInput::from_base64("aGVsbG8="), "key-1")
            .await
            .unwrap_err();
        assert!(matches!(err, RecognitionError::Request { .. }));
    }
}
