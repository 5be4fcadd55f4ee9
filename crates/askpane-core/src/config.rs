//! User configuration
//!
//! Stored as camelCase JSON so settings exported from the browser extension
//! load unchanged. Older flat configs (only `apiKey`, `workspaceId`,
//! `agentId`) pick up defaults for the nested sections.

use crate::io::atomic_write;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://eu.dust.tt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Identity reported to the service with each message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserContext {
    pub username: String,
    pub timezone: String,
}

/// Optional conversation settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestConfig {
    pub title: String,
    pub skip_tools_validation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub api_key: String,
    pub workspace_id: String,
    pub agent_id: String,
    pub user_context: UserContext,
    pub request_config: RequestConfig,
    /// Relay to forward calls through; calls go straight to the API when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            workspace_id: String::new(),
            agent_id: String::new(),
            user_context: UserContext::default(),
            request_config: RequestConfig::default(),
            relay_url: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        atomic_write(path, json.as_bytes()).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `ASKPANE_API_KEY`, `ASKPANE_WORKSPACE_ID` and `ASKPANE_RELAY_URL`
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = non_empty_env("ASKPANE_API_KEY") {
            self.api_key = key;
        }
        if let Some(workspace) = non_empty_env("ASKPANE_WORKSPACE_ID") {
            self.workspace_id = workspace;
        }
        if let Some(relay) = non_empty_env("ASKPANE_RELAY_URL") {
            self.relay_url = Some(relay);
        }
        self
    }

    /// Both the API key and the workspace are set
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.workspace_id.trim().is_empty()
    }

    /// Endpoint that creates a conversation
    pub fn conversations_url(&self) -> String {
        format!(
            "{}/api/v1/w/{}/assistant/conversations",
            self.api_base.trim_end_matches('/'),
            self.workspace_id.trim()
        )
    }

    /// Link to open a conversation in the browser
    pub fn conversation_url(&self, conversation_id: &str) -> Option<String> {
        let workspace = self.workspace_id.trim();
        if workspace.is_empty() || conversation_id.is_empty() {
            return None;
        }
        Some(format!(
            "{}/w/{}/conversation/{}",
            self.api_base.trim_end_matches('/'),
            workspace,
            conversation_id
        ))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
