//! Transport for the `/chatbot` endpoint.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ChatConfig;
use crate::error::ChatError;

/// Request body: `{"message": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body: `{"response": string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Sends one user message and returns the bot's reply.
#[async_trait]
pub trait ChatTransport: Send + Sync + Debug {
    async fn send(&self, message: &str) -> Result<String, ChatError>;
}

/// `POST`s JSON to the chatbot endpoint with reqwest.
///
/// # Example
///
/// ```rust,no_run
/// use docbot_web::chat::{ChatTransport, HttpChatTransport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpChatTransport::new("http://127.0.0.1:5000", "/chatbot")?;
/// let reply = transport.send("hello").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    endpoint: Url,
    http: reqwest::Client,
}

impl HttpChatTransport {
    /// Create a transport for `base_url` joined with `path`.
    pub fn new(base_url: impl AsRef<str>, path: &str) -> Result<Self, ChatError> {
        Self::with_client(base_url, path, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(
        base_url: impl AsRef<str>,
        path: &str,
        http: reqwest::Client,
    ) -> Result<Self, ChatError> {
        let endpoint = Url::parse(base_url.as_ref())?.join(path)?;
        Ok(Self { endpoint, http })
    }

    /// Build from configuration, applying the optional request timeout.
    pub fn from_config(config: &ChatConfig) -> Result<Self, ChatError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_client(&config.base_url, &config.endpoint, builder.build()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&body)?;
        Ok(parsed.response)
    }
}
