//! Request orchestration: request building, relay transport, timeouts and cancellation

mod error;
mod orchestrator;
pub mod protocol;
mod relay;
mod request;

pub use error::{AskError, ErrorKind};
pub use orchestrator::{AskOutcome, Call, CallState, Orchestrator, QueryContext, CALL_TIMEOUT};
pub use protocol::{Dispatcher, Reply, Request};
pub use relay::{relay_for, DirectRelay, ProxyRelay, Relay, RelayRequest};
pub use request::{
    build_request_body, default_timezone, generate_username, Mention, MessageBody, MessageContext,
    RequestBody,
};
pub use tokio_util::sync::CancellationToken;
