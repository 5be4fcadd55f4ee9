//! Response extraction and link injection for conversational answers

mod answer;
pub mod config;
pub mod format;
mod io;
mod links;
mod paths;
mod response;
mod types;

pub use answer::{annotate, format_links_list, strip_citation_markers, AnnotatedAnswer};
pub use config::{Config, ConfigError, RequestConfig, UserContext};
pub use io::{atomic_write, read_json, write_json};
pub use links::{apply_style, inject_links_into_answer, MatchStyle};
pub use paths::Paths;
pub use response::{
    extract_answer, extract_conversation_id, extract_structured_links, AssistantShape,
    AssistantTurn,
};
pub use types::StructuredLink;
