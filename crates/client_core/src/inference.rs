use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::{
    error::InferenceError,
    protocol::{error_message, extract_generated_text, InferenceRequest},
};

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Sends the already-wrapped prompt and returns the generated story.
    async fn generate(&self, inputs: &str) -> Result<String, InferenceError>;
}

pub struct MissingInferenceBackend;

#[async_trait]
impl InferenceBackend for MissingInferenceBackend {
    async fn generate(&self, _inputs: &str) -> Result<String, InferenceError> {
        Err(InferenceError::Transport(
            "inference backend is unavailable".to_string(),
        ))
    }
}

pub struct HttpInferenceClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(Client::new(), endpoint, token)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token,
        }
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceClient {
    async fn generate(&self, inputs: &str) -> Result<String, InferenceError> {
        let mut request = self.http.post(&self.endpoint).json(&InferenceRequest {
            inputs: inputs.to_string(),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;
        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| InferenceError::Transport(err.to_string()))?;

        // The body decides the outcome even on non-2xx statuses.
        let body = match serde_json::from_str::<Value>(&raw) {
            Ok(body) => body,
            Err(err) if status.is_success() => {
                return Err(InferenceError::Malformed(err.to_string()))
            }
            Err(_) => {
                return Err(InferenceError::Rejected {
                    status: status.as_u16(),
                    message: None,
                })
            }
        };

        if let Some(text) = extract_generated_text(&body) {
            return Ok(text);
        }
        if !status.is_success() {
            return Err(InferenceError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        match error_message(&body) {
            Some(message) => Err(InferenceError::Rejected {
                status: status.as_u16(),
                message: Some(message),
            }),
            None => Err(InferenceError::MissingGeneratedText),
        }
    }
}
