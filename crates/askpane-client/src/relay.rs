//! Transports that deliver a conversation request to the API

use crate::error::AskError;
use askpane_core::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What a relay needs to forward one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    pub api_url: String,
    pub api_key: String,
    pub request_body: Value,
}

/// Delivers a request and returns the parsed JSON response
///
/// Non-success statuses fail with [`AskError::Relay`] carrying the status code
/// and response text.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn forward(&self, request: &RelayRequest) -> Result<Value, AskError>;
}

/// Forwards through a CORS relay that re-issues the call without an `Origin` header
///
/// The relay takes `{apiUrl, apiKey, requestBody}` as a JSON POST body.
#[derive(Debug, Clone)]
pub struct ProxyRelay {
    client: reqwest::Client,
    relay_url: String,
}

impl ProxyRelay {
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: relay_url.into(),
        }
    }
}

#[async_trait]
impl Relay for ProxyRelay {
    async fn forward(&self, request: &RelayRequest) -> Result<Value, AskError> {
        tracing::info!(relay = %self.relay_url, "making API call via relay");
        let response = self
            .client
            .post(&self.relay_url)
            .json(request)
            .send()
            .await?;
        read_json_response(response).await
    }
}

/// Calls the API directly with bearer authentication
#[derive(Debug, Clone, Default)]
pub struct DirectRelay {
    client: reqwest::Client,
}

impl DirectRelay {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Relay for DirectRelay {
    async fn forward(&self, request: &RelayRequest) -> Result<Value, AskError> {
        tracing::info!(api_url = %request.api_url, "making direct API call");
        let response = self
            .client
            .post(&request.api_url)
            .bearer_auth(&request.api_key)
            .json(&request.request_body)
            .send()
            .await?;
        read_json_response(response).await
    }
}

async fn read_json_response(response: reqwest::Response) -> Result<Value, AskError> {
    let status = response.status();
    tracing::debug!(%status, "relay response status");

    let body = response.text().await?;
    if !status.is_success() {
        return Err(AskError::Relay {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// Relay selected by configuration: the configured relay URL, or a direct call
pub fn relay_for(config: &Config) -> Arc<dyn Relay> {
    match config.relay_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Arc::new(ProxyRelay::new(url)),
        _ => Arc::new(DirectRelay::new()),
    }
}
