//! Presentation-ready answer built from a raw response

use crate::links::inject_links_into_answer;
use crate::response::{extract_answer, extract_conversation_id, extract_structured_links};
use crate::types::StructuredLink;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

static CITE_MARKER_RE: OnceLock<Regex> = OnceLock::new();
static CITE_BRACKET_RE: OnceLock<Regex> = OnceLock::new();

/// Everything the presentation layer needs from one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedAnswer {
    pub answer: Option<String>,
    /// `answer` with structured links injected inline
    pub annotated: Option<String>,
    pub links: Vec<StructuredLink>,
    pub conversation_id: Option<String>,
}

/// Run all extractors on `response` and inject the links into the answer
pub fn annotate(response: &Value) -> AnnotatedAnswer {
    let answer = extract_answer(response);
    let links = extract_structured_links(response);
    let conversation_id = extract_conversation_id(response);
    let annotated = answer
        .as_deref()
        .map(|text| inject_links_into_answer(text, &links));

    AnnotatedAnswer {
        answer,
        annotated,
        links,
        conversation_id,
    }
}

/// Remove `:cite[...]` and `[:cite:...]` markers left in answers
pub fn strip_citation_markers(text: &str) -> String {
    let marker =
        CITE_MARKER_RE.get_or_init(|| Regex::new(r":cite\[[^\]]+\]").expect("static pattern"));
    let bracket =
        CITE_BRACKET_RE.get_or_init(|| Regex::new(r"\[:cite:[^\]]+\]").expect("static pattern"));
    let text = marker.replace_all(text, "");
    bracket.replace_all(&text, "").into_owned()
}

/// Plain-text list of links for copying, one bullet per link
pub fn format_links_list(links: &[StructuredLink]) -> String {
    let lines: Vec<String> = links
        .iter()
        .map(|link| format!("• {} - {}", link.display_text(), link.uri))
        .collect();
    format!("🔗 Links\n\n{}", lines.join("\n"))
}
