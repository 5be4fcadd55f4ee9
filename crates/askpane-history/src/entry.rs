//! History record type

use askpane_core::StructuredLink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attempted query, successful or not
///
/// Serialized with camelCase keys and a millisecond timestamp, the layout the
/// browser extension exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,
    /// Entries written without a timestamp load as "now"
    #[serde(default = "Utc::now", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub selected_text: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub links: Vec<StructuredLink>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    /// Call duration in milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
}

impl HistoryEntry {
    /// Empty entry for `query`, timestamped now; the store assigns the id
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            id: String::new(),
            timestamp: Utc::now(),
            page_url: String::new(),
            page_title: String::new(),
            selected_text: query.clone(),
            query,
            answer: None,
            links: Vec::new(),
            conversation_id: None,
            workspace_id: None,
            error: None,
            agent_id: None,
            duration: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Text the entry is listed and searched by
    pub fn query_text(&self) -> &str {
        if self.query.is_empty() {
            &self.selected_text
        } else {
            &self.query
        }
    }
}
