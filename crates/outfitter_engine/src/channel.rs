use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Failure of the RPC channel itself, before any payload interpretation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// String-keyed RPC channel to the backend, returning JSON envelopes.
#[async_trait::async_trait]
pub trait BackendChannel: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError>;
}

#[derive(Debug, Clone)]
pub struct ChannelSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ChannelSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8799/rpc/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP implementation: each method is a route under the base URL and the
/// params travel as a JSON body.
#[derive(Debug, Clone)]
pub struct HttpChannel {
    base: Url,
    client: reqwest::Client,
}

impl HttpChannel {
    pub fn new(settings: ChannelSettings) -> Result<Self, ChannelError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ChannelError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ChannelError::Transport(err.to_string()))?;
        Ok(Self { base, client })
    }
}

#[async_trait::async_trait]
impl BackendChannel for HttpChannel {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        let url = self
            .base
            .join(method)
            .map_err(|err| ChannelError::InvalidUrl(err.to_string()))?;

        let response = self
            .client
            .post(url)
            .json(&params)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::HttpStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ChannelError::Malformed(err.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ChannelError {
    if err.is_timeout() {
        return ChannelError::Timeout;
    }
    ChannelError::Transport(err.to_string())
}
