//! Rewrites plain mentions of cited resources into inline markdown links
//!
//! Answers often name a resource by its display text without linking it. For
//! every structured link, longest display text first, the first match style
//! (in [`MatchStyle::PRIORITY`] order) that matches anywhere in the current
//! text is applied to every occurrence, producing `[text](uri)`.
//!
//! Text that is already part of a markdown link is never rewritten.

use crate::types::StructuredLink;
use regex::Regex;
use std::cmp::Reverse;
use std::ops::Range;
use std::sync::OnceLock;

static MARKDOWN_LINK_RE: OnceLock<Regex> = OnceLock::new();

/// How a link's display text appears in the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStyle {
    /// `Text: (https://...)`, the model already wrote the URL out
    LabelWithUrl,
    /// `Text: prose...` up to the next newline or `[`
    LabelWithProse,
    /// `Text:` with nothing usable after the colon
    BareLabel,
    /// `Text` inside running prose
    Inline,
}

impl MatchStyle {
    pub const PRIORITY: [MatchStyle; 4] = [
        MatchStyle::LabelWithUrl,
        MatchStyle::LabelWithProse,
        MatchStyle::BareLabel,
        MatchStyle::Inline,
    ];

    fn pattern(self, escaped: &str) -> String {
        match self {
            MatchStyle::LabelWithUrl => format!(r"{escaped}:\s*\(https?://[^)\s]+\)"),
            MatchStyle::LabelWithProse => format!(r"{escaped}:[^\n\[]+"),
            MatchStyle::BareLabel => format!("{escaped}:"),
            MatchStyle::Inline => escaped.to_string(),
        }
    }

    /// Lookahead on the text following a candidate match
    fn accepts_suffix(self, rest: &str) -> bool {
        match self {
            MatchStyle::LabelWithUrl | MatchStyle::LabelWithProse => true,
            MatchStyle::BareLabel => !rest.starts_with(']'),
            MatchStyle::Inline => !rest.starts_with("](") && !rest.starts_with(':'),
        }
    }
}

/// Inject inline links for `links` into `answer`
///
/// Returns `answer` unchanged when `links` is empty. Links are expected in the
/// deduplicated order produced by extraction.
pub fn inject_links_into_answer(answer: &str, links: &[StructuredLink]) -> String {
    if links.is_empty() {
        return answer.to_string();
    }

    let mut ordered: Vec<&StructuredLink> = links.iter().collect();
    // UTF-16 length keeps ordering identical to annotations stored by the extension
    ordered.sort_by_key(|link| Reverse(link.display_text().encode_utf16().count()));

    let mut text = answer.to_string();
    for link in ordered {
        let link_text = link.display_text();
        if link_text.is_empty() || link.uri.is_empty() {
            continue;
        }

        match first_applicable_style(&text, link_text, &link.uri) {
            Some((style, rewritten)) => {
                tracing::debug!(uri = %link.uri, ?style, "injected link");
                text = rewritten;
            }
            None => tracing::debug!(uri = %link.uri, "link text not found in answer"),
        }
    }
    text
}

fn first_applicable_style(text: &str, link_text: &str, uri: &str) -> Option<(MatchStyle, String)> {
    for style in MatchStyle::PRIORITY {
        if let Some(rewritten) = apply_style(text, link_text, uri, style) {
            return Some((style, rewritten));
        }
    }
    None
}

/// Apply a single match style, replacing every accepted occurrence
///
/// Returns `None` when the style matches nowhere in `text`.
pub fn apply_style(text: &str, link_text: &str, uri: &str, style: MatchStyle) -> Option<String> {
    let re = match Regex::new(&style.pattern(&regex::escape(link_text))) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "could not build link pattern");
            return None;
        }
    };
    let protected = markdown_link_spans(text);
    let replacement = format!("[{}]({})", link_text, uri);

    let mut out = String::with_capacity(text.len() + replacement.len());
    let mut copied_to = 0;
    let mut search_from = 0;
    let mut replaced = false;

    while let Some(m) = re.find_at(text, search_from) {
        let accepted = style.accepts_suffix(&text[m.end()..])
            && !protected.iter().any(|span| overlaps(span, &m.range()));

        if accepted {
            out.push_str(&text[copied_to..m.start()]);
            out.push_str(&replacement);
            copied_to = m.end();
            search_from = m.end();
            replaced = true;
        } else {
            // Retry one character further, as a lookahead failure would
            match text[m.start()..].chars().next() {
                Some(c) => search_from = m.start() + c.len_utf8(),
                None => break,
            }
        }

        if search_from >= text.len() {
            break;
        }
    }

    if !replaced {
        return None;
    }
    out.push_str(&text[copied_to..]);
    Some(out)
}

fn markdown_link_spans(text: &str) -> Vec<Range<usize>> {
    let re = MARKDOWN_LINK_RE.get_or_init(|| {
        Regex::new(r"\[[^\]\n]*\]\([^)\n]*\)").expect("static pattern")
    });
    re.find_iter(text).map(|m| m.range()).collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, uri: &str) -> StructuredLink {
        StructuredLink::new(uri, text)
    }

    #[test]
    fn test_empty_links_is_identity() {
        let answer = "Nothing to see: here [x](y)";
        assert_eq!(inject_links_into_answer(answer, &[]), answer);
    }

    #[test]
    fn test_label_with_url() {
        let out = inject_links_into_answer(
            "See Example Doc: (https://x/y)",
            &[link("Example Doc", "https://x/y")],
        );
        assert_eq!(out, "See [Example Doc](https://x/y)");
    }

    #[test]
    fn test_label_with_prose_replaces_to_end_of_line() {
        let out = apply_style(
            "Pricing Page: covers every plan\nnext line",
            "Pricing Page",
            "https://p",
            MatchStyle::LabelWithProse,
        );
        assert_eq!(out.as_deref(), Some("[Pricing Page](https://p)\nnext line"));
    }

    #[test]
    fn test_label_with_prose_stops_at_bracket() {
        let out = apply_style(
            "Guide: read this [1]",
            "Guide",
            "https://g",
            MatchStyle::LabelWithProse,
        );
        assert_eq!(out.as_deref(), Some("[Guide](https://g)[1]"));
    }

    #[test]
    fn test_bare_label() {
        let out = inject_links_into_answer("Sources:\nGuide:\nmore", &[link("Guide", "https://g")]);
        assert_eq!(out, "Sources:\n[Guide](https://g)\nmore");

        assert_eq!(
            apply_style("Guide:]", "Guide", "https://g", MatchStyle::BareLabel),
            None
        );
    }

    #[test]
    fn test_first_matching_style_wins_for_all_occurrences() {
        // Prose style matches the first line, so the bare label and the inline
        // mention further down are left as they are
        let out = inject_links_into_answer(
            "Guide: a\nGuide:\nGuide here",
            &[link("Guide", "https://g")],
        );
        assert_eq!(out, "[Guide](https://g)\nGuide:\nGuide here");
    }

    #[test]
    fn test_inline_replaces_every_occurrence() {
        let out = inject_links_into_answer(
            "The Handbook says so, and the Handbook is right.",
            &[link("Handbook", "https://h")],
        );
        assert_eq!(
            out,
            "The [Handbook](https://h) says so, and the [Handbook](https://h) is right."
        );
    }

    #[test]
    fn test_inline_skips_existing_links() {
        let answer = "Read [Handbook](https://other) first.";
        assert_eq!(
            apply_style(answer, "Handbook", "https://h", MatchStyle::Inline),
            None
        );
    }

    #[test]
    fn test_inline_rejects_partial_then_finds_later_match() {
        let out = apply_style(
            "Handbook](broken) and Handbook",
            "Handbook",
            "https://h",
            MatchStyle::Inline,
        );
        assert_eq!(
            out.as_deref(),
            Some("Handbook](broken) and [Handbook](https://h)")
        );
    }

    #[test]
    fn test_priority_prefers_url_label_over_prose() {
        let out = inject_links_into_answer(
            "Doc: (https://d) and more",
            &[link("Doc", "https://d")],
        );
        assert_eq!(out, "[Doc](https://d) and more");
    }

    #[test]
    fn test_longest_text_first() {
        let links = vec![
            link("API", "https://api"),
            link("API Protection", "https://prot"),
        ];
        let out = inject_links_into_answer("Enable API Protection today.", &links);
        assert_eq!(out, "Enable [API Protection](https://prot) today.");
    }

    #[test]
    fn test_reapplying_does_not_double_wrap() {
        let links = vec![
            link("Example Doc", "https://x/y"),
            link("Guide", "https://g"),
        ];
        let once = inject_links_into_answer("Example Doc and the Guide.", &links);
        let twice = inject_links_into_answer(&once, &links);
        assert_eq!(
            once,
            "[Example Doc](https://x/y) and the [Guide](https://g)."
        );
        assert_eq!(twice, once);
    }

    #[test]
    fn test_text_is_matched_literally() {
        let out = inject_links_into_answer(
            "Cost is $5 (approx.)",
            &[link("$5 (approx.)", "https://c")],
        );
        assert_eq!(out, "Cost is [$5 (approx.)](https://c)");

        let out = inject_links_into_answer("a.c", &[link("a+c", "https://c")]);
        assert_eq!(out, "a.c");
    }

    #[test]
    fn test_missing_text_is_left_alone() {
        let out = inject_links_into_answer("Nothing relevant", &[link("Guide", "https://g")]);
        assert_eq!(out, "Nothing relevant");
    }

    #[test]
    fn test_uri_used_as_text_when_text_empty() {
        let out = inject_links_into_answer(
            "Visit https://g for details",
            &[link("", "https://g")],
        );
        assert_eq!(out, "Visit [https://g](https://g) for details");
    }

    #[test]
    fn test_non_ascii_text() {
        let out = inject_links_into_answer(
            "Voir la Sécurité API.",
            &[link("Sécurité", "https://s")],
        );
        assert_eq!(out, "Voir la [Sécurité](https://s) API.");
    }
}
