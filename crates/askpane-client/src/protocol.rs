//! Typed request/response protocol between front ends and the backend
//!
//! Requests are JSON objects tagged by `action`. Replies always carry
//! `success`; failures add `error` and a machine-readable `kind`.

use crate::error::{AskError, ErrorKind};
use crate::orchestrator::{AskOutcome, Orchestrator, QueryContext};
use crate::relay::RelayRequest;
use askpane_history::{DeleteReport, HistoryEntry, HistoryError, HistoryStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const DEFAULT_RECENT_LIMIT: usize = 5;

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Request {
    MakeApiCall {
        #[serde(flatten)]
        call: RelayRequest,
    },
    MakeApiCallWithHistory {
        #[serde(flatten)]
        call: RelayRequest,
        #[serde(default)]
        selected_text: String,
        #[serde(default)]
        page_url: String,
        #[serde(default)]
        page_title: String,
        #[serde(default)]
        workspace_id: Option<String>,
        #[serde(default)]
        agent_id: Option<String>,
    },
    GetHistory,
    GetRecentHistory {
        #[serde(default = "default_recent_limit")]
        limit: usize,
    },
    GetEntry {
        id: String,
    },
    DeleteHistoryEntry {
        id: String,
    },
    DeleteHistoryEntries {
        ids: Vec<String>,
    },
    ClearHistory,
    SearchHistory {
        term: String,
    },
    ExportHistory,
}

/// Reply payloads, flattened next to `success`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Answer(AskOutcome),
    Data { data: Value },
    History { history: Vec<HistoryEntry> },
    Entry { entry: Option<HistoryEntry> },
    Deleted { deleted: bool },
    BulkDeleted { report: DeleteReport },
    Export { json: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Option<Payload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl Reply {
    pub fn ok(payload: Payload) -> Self {
        Self {
            success: true,
            payload: Some(payload),
            error: None,
            kind: None,
        }
    }

    pub fn done() -> Self {
        Self {
            success: true,
            payload: None,
            error: None,
            kind: None,
        }
    }

    pub fn failure(error: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            success: false,
            payload: None,
            error: Some(error.into()),
            kind: Some(kind),
        }
    }
}

impl From<AskError> for Reply {
    fn from(err: AskError) -> Self {
        Reply::failure(err.to_string(), err.kind())
    }
}

impl From<HistoryError> for Reply {
    fn from(err: HistoryError) -> Self {
        Reply::failure(err.to_string(), ErrorKind::Storage)
    }
}

/// Answers protocol requests using one orchestrator and one history store
pub struct Dispatcher {
    orchestrator: Orchestrator,
    history: Arc<HistoryStore>,
}

impl Dispatcher {
    pub fn new(orchestrator: Orchestrator, history: Arc<HistoryStore>) -> Self {
        Self {
            orchestrator,
            history,
        }
    }

    pub async fn handle(&self, request: Request, cancel: &CancellationToken) -> Reply {
        match request {
            Request::MakeApiCall { call } => {
                if let Err(reply) = validate_call(&call) {
                    return reply;
                }
                match self.orchestrator.perform_call(&call, cancel).await {
                    Ok(data) => Reply::ok(Payload::Data { data }),
                    Err(e) => e.into(),
                }
            }
            Request::MakeApiCallWithHistory {
                call,
                selected_text,
                page_url,
                page_title,
                workspace_id,
                agent_id,
            } => {
                if let Err(reply) = validate_call(&call) {
                    return reply;
                }
                let context = QueryContext {
                    selected_text,
                    page_url,
                    page_title,
                    workspace_id,
                    agent_id,
                };
                match self
                    .orchestrator
                    .call_with_history(&call, &context, cancel)
                    .await
                {
                    Ok(outcome) => Reply::ok(Payload::Answer(outcome)),
                    Err(e) => e.into(),
                }
            }
            Request::GetHistory => self.history_reply(self.history.get_history()),
            Request::GetRecentHistory { limit } => {
                self.history_reply(self.history.get_recent_history(limit))
            }
            Request::SearchHistory { term } => {
                self.history_reply(self.history.search_history(&term))
            }
            Request::GetEntry { id } => match self.history.get_entry(&id) {
                Ok(entry) => Reply::ok(Payload::Entry { entry }),
                Err(e) => e.into(),
            },
            Request::DeleteHistoryEntry { id } => match self.history.delete_entry(&id) {
                Ok(deleted) => Reply::ok(Payload::Deleted { deleted }),
                Err(e) => e.into(),
            },
            Request::DeleteHistoryEntries { ids } => match self.history.delete_entries(&ids) {
                Ok(report) => Reply::ok(Payload::BulkDeleted { report }),
                Err(e) => e.into(),
            },
            Request::ClearHistory => match self.history.clear_history() {
                Ok(()) => Reply::done(),
                Err(e) => e.into(),
            },
            Request::ExportHistory => match self.history.export_history() {
                Ok(json) => Reply::ok(Payload::Export { json }),
                Err(e) => e.into(),
            },
        }
    }

    fn history_reply(&self, result: Result<Vec<HistoryEntry>, HistoryError>) -> Reply {
        match result {
            Ok(history) => Reply::ok(Payload::History { history }),
            Err(e) => e.into(),
        }
    }
}

/// Reject calls missing any field, as the relay itself would
fn validate_call(call: &RelayRequest) -> Result<(), Reply> {
    let mut missing = Vec::new();
    if call.api_url.trim().is_empty() {
        missing.push("apiUrl");
    }
    if call.api_key.trim().is_empty() {
        missing.push("apiKey");
    }
    if call.request_body.is_null() {
        missing.push("requestBody");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        let reason = format!("missing {}", missing.join(", "));
        Err(AskError::ConfigurationMissing(reason).into())
    }
}
