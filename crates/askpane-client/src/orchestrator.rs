//! Drives one conversational call from configuration to a recorded outcome

use crate::error::AskError;
use crate::relay::{Relay, RelayRequest};
use crate::request::build_request_body;
use askpane_core::{annotate, AnnotatedAnswer, Config};
use askpane_history::{HistoryEntry, HistoryStore};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Bounded wait for a single call
pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Lifecycle of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Sent,
    Succeeded,
    FailedNetwork,
    FailedTimeout,
    Cancelled,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CallState::Idle | CallState::Sent)
    }
}

/// State holder enforcing that a call reaches exactly one terminal state
#[derive(Debug)]
pub struct Call {
    state: CallState,
}

impl Call {
    pub fn new() -> Self {
        Self {
            state: CallState::Idle,
        }
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    /// Move to `next`; returns `false` and stays put if the transition is not allowed
    pub fn advance(&mut self, next: CallState) -> bool {
        let allowed = match (self.state, next) {
            (CallState::Idle, CallState::Sent) => true,
            (CallState::Idle, CallState::Cancelled) => true,
            (CallState::Sent, next) => next.is_terminal(),
            _ => false,
        };
        if allowed {
            self.state = next;
        }
        allowed
    }

    fn finish(&mut self, outcome: &Result<Value, AskError>) {
        let next = match outcome {
            Ok(_) => CallState::Succeeded,
            Err(AskError::Cancelled) => CallState::Cancelled,
            Err(AskError::TimedOut(_)) => CallState::FailedTimeout,
            Err(_) => CallState::FailedNetwork,
        };
        if !self.advance(next) {
            tracing::warn!(from = ?self.state, to = ?next, "ignored call state transition");
        }
    }
}

impl Default for Call {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the question came from, recorded alongside the answer
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    pub selected_text: String,
    pub page_url: String,
    pub page_title: String,
    pub workspace_id: Option<String>,
    pub agent_id: Option<String>,
}

impl QueryContext {
    pub fn new(selected_text: impl Into<String>) -> Self {
        Self {
            selected_text: selected_text.into(),
            ..Default::default()
        }
    }
}

/// Result of a completed call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskOutcome {
    /// Raw conversation response
    pub response: Value,
    #[serde(flatten)]
    pub answer: AnnotatedAnswer,
    /// History entry id, when the outcome was recorded
    pub entry_id: Option<String>,
    pub duration_ms: u64,
}

pub struct Orchestrator {
    relay: Arc<dyn Relay>,
    history: Option<Arc<HistoryStore>>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(relay: Arc<dyn Relay>) -> Self {
        Self {
            relay,
            history: None,
            timeout: CALL_TIMEOUT,
        }
    }

    /// Record every completed call in `store`
    pub fn with_history(mut self, store: Arc<HistoryStore>) -> Self {
        self.history = Some(store);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit `request` to the relay, bounded by the timeout and `cancel`
    ///
    /// Once `cancel` fires the pending relay future is dropped, so a late
    /// response is never observed.
    pub async fn perform_call(
        &self,
        request: &RelayRequest,
        cancel: &CancellationToken,
    ) -> Result<Value, AskError> {
        let mut call = Call::new();
        if cancel.is_cancelled() {
            call.advance(CallState::Cancelled);
            return Err(AskError::Cancelled);
        }
        call.advance(CallState::Sent);
        tracing::debug!(api_url = %request.api_url, "call sent");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AskError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.relay.forward(request)) => {
                result.unwrap_or(Err(AskError::TimedOut(self.timeout)))
            }
        };

        call.finish(&outcome);
        match &outcome {
            Ok(_) => tracing::info!("call succeeded"),
            Err(AskError::Cancelled) => tracing::info!("call cancelled"),
            Err(e) => tracing::warn!(error = %e, state = ?call.state(), "call failed"),
        }
        outcome
    }

    /// Perform the call, derive the answer and record the outcome in history
    ///
    /// Failures are recorded with `answer: None` and the error message;
    /// cancelled calls are not recorded at all.
    pub async fn call_with_history(
        &self,
        request: &RelayRequest,
        context: &QueryContext,
        cancel: &CancellationToken,
    ) -> Result<AskOutcome, AskError> {
        let started = Instant::now();
        let result = self.perform_call(request, cancel).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if cancel.is_cancelled() {
            return Err(AskError::Cancelled);
        }

        let mut entry = HistoryEntry::new(context.selected_text.clone());
        entry.page_url = context.page_url.clone();
        entry.page_title = context.page_title.clone();
        entry.workspace_id = context.workspace_id.clone();
        entry.agent_id = context.agent_id.clone();
        entry.duration = Some(duration_ms);

        match result {
            Ok(response) => {
                let answer = annotate(&response);
                tracing::debug!(
                    answer_len = answer.answer.as_ref().map_or(0, String::len),
                    links = answer.links.len(),
                    conversation_id = ?answer.conversation_id,
                    "response extracted"
                );

                entry.answer = answer.answer.clone();
                entry.links = answer.links.clone();
                entry.conversation_id = answer.conversation_id.clone();
                let entry_id = self.record(entry);

                Ok(AskOutcome {
                    response,
                    answer,
                    entry_id,
                    duration_ms,
                })
            }
            Err(AskError::Cancelled) => Err(AskError::Cancelled),
            Err(err) => {
                entry.error = Some(err.to_string());
                self.record(entry);
                Err(err)
            }
        }
    }

    /// Ask `context.selected_text` using `config`
    pub async fn ask(
        &self,
        config: &Config,
        context: QueryContext,
        cancel: &CancellationToken,
    ) -> Result<AskOutcome, AskError> {
        if config.api_key.trim().is_empty() {
            return Err(AskError::ConfigurationMissing("API key is not set".to_string()));
        }
        if config.workspace_id.trim().is_empty() {
            return Err(AskError::ConfigurationMissing(
                "workspace ID is not set".to_string(),
            ));
        }

        let body = build_request_body(&context.selected_text, config);
        let request = RelayRequest {
            api_url: config.conversations_url(),
            api_key: config.api_key.trim().to_string(),
            request_body: serde_json::to_value(&body)?,
        };

        let context = QueryContext {
            workspace_id: Some(config.workspace_id.trim().to_string()),
            agent_id: Some(config.agent_id.trim().to_string()).filter(|a| !a.is_empty()),
            ..context
        };
        self.call_with_history(&request, &context, cancel).await
    }

    fn record(&self, entry: HistoryEntry) -> Option<String> {
        let store = self.history.as_ref()?;
        match store.add_entry(entry) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "failed to record history entry");
                None
            }
        }
    }
}
