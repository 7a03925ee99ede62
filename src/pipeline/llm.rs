use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::config;

/// Model the extraction service is asked to run.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Hosted Messages API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8000;

/// Default request timeout. The service is the only latency-bearing step in
/// a run; the adapter surfaces a timeout as a failure rather than blocking.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Capability interface for the structured-extraction service. The pipeline
/// depends only on this trait, so tests swap in a deterministic stub.
pub trait LlmClient {
    fn generate(&self, prompt: &str) -> Result<String, ExtractionError>;
}

/// Request body for the Messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body from the Messages API
#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl AnthropicClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client for the hosted API with the key taken from the environment.
    pub fn from_env() -> Result<Self, ExtractionError> {
        let api_key = config::api_key().ok_or_else(|| {
            ExtractionError::Service(format!("{} is not set", config::API_KEY_ENV))
        })?;
        Ok(Self::new(
            DEFAULT_BASE_URL,
            &api_key,
            DEFAULT_MODEL,
            DEFAULT_TIMEOUT_SECS,
        ))
    }
}

impl LlmClient for AnthropicClient {
    fn generate(&self, prompt: &str) -> Result<String, ExtractionError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Service(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    ExtractionError::Service(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::Service(format!(
                "API error {status}: {body}"
            )));
        }

        let parsed: MessagesResponse = response
            .json()
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        parsed
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| {
                ExtractionError::MalformedResponse("response contained no content blocks".into())
            })
    }
}

/// Stub service for testing. Returns a configured response, counting calls.
pub struct MockLlmClient {
    response: String,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A stub whose every call fails as a service error.
    pub fn failing(message: &str) -> Self {
        Self {
            response: String::new(),
            failure: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(ExtractionError::Service(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate("prompt").unwrap();
        assert_eq!(result, "test response");
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn mock_client_failure_is_service_error() {
        let client = MockLlmClient::failing("boom");
        let result = client.generate("prompt");
        assert!(matches!(result, Err(ExtractionError::Service(_))));
    }

    #[test]
    fn anthropic_client_trims_trailing_slash() {
        let client = AnthropicClient::new("http://localhost:8080/", "key", DEFAULT_MODEL, 60);
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn from_env_without_key_is_service_error() {
        std::env::remove_var(config::API_KEY_ENV);
        let result = AnthropicClient::from_env();
        assert!(matches!(result, Err(ExtractionError::Service(_))));
    }
}
