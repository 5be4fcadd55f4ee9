pub mod ask;
pub mod history;
pub mod parse;
pub mod rpc;
pub mod setup;
pub mod status;
pub mod version;

use askpane_core::{format_links_list, strip_citation_markers, AnnotatedAnswer};
use std::io::Read;

/// Answer text for the terminal: links injected, citation markers removed,
/// followed by the plain links list when there are any
pub(crate) fn render_answer(answer: &AnnotatedAnswer) -> String {
    let body = match answer.annotated.as_deref().or(answer.answer.as_deref()) {
        Some(text) => strip_citation_markers(text),
        None => "No answer found in the response.".to_string(),
    };

    if answer.links.is_empty() {
        body
    } else {
        format!(
            "{}\n\n{}",
            body.trim_end(),
            format_links_list(&answer.links)
        )
    }
}

pub(crate) fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use askpane_core::StructuredLink;

    #[test]
    fn test_render_strips_markers_and_lists_links() {
        let answer = AnnotatedAnswer {
            answer: Some("See Guide :cite[a1] now.".to_string()),
            annotated: Some("See [Guide](https://g) :cite[a1]now.".to_string()),
            links: vec![StructuredLink::new("https://g", "Guide")],
            conversation_id: None,
        };
        let rendered = render_answer(&answer);
        assert!(rendered.starts_with("See [Guide](https://g) now."));
        assert!(rendered.contains("🔗 Links"));
        assert!(rendered.contains("• Guide - https://g"));
    }

    #[test]
    fn test_render_without_answer() {
        let answer = AnnotatedAnswer {
            answer: None,
            annotated: None,
            links: Vec::new(),
            conversation_id: None,
        };
        assert_eq!(render_answer(&answer), "No answer found in the response.");
    }
}
