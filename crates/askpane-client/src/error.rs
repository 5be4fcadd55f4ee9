//! Failure taxonomy for a conversational call

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AskError {
    /// Required settings are absent; raised before any network call
    #[error("API not configured ({0}). Run `askpane setup` to complete configuration.")]
    ConfigurationMissing(String),

    /// The relay answered with a non-success status
    #[error("Relay error ({status}): {body}")]
    Relay { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(
        "Request timed out after {}s. Check your network connection and try again.",
        .0.as_secs()
    )]
    TimedOut(Duration),

    #[error("Request cancelled")]
    Cancelled,
}

/// Coarse category reported to front ends so they can present failures differently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Configuration,
    Relay,
    Network,
    Timeout,
    Cancelled,
    Storage,
}

impl AskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AskError::ConfigurationMissing(_) => ErrorKind::Configuration,
            AskError::Relay { .. } => ErrorKind::Relay,
            AskError::Network(_) | AskError::Payload(_) => ErrorKind::Network,
            AskError::TimedOut(_) => ErrorKind::Timeout,
            AskError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Failures worth offering a retry for
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AskError::ConfigurationMissing(_) | AskError::Cancelled)
    }
}

impl From<reqwest::Error> for AskError {
    fn from(err: reqwest::Error) -> Self {
        AskError::Network(err.to_string())
    }
}
