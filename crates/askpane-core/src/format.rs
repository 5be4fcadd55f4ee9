//! Display formatting helpers

use chrono::{DateTime, Local, Utc};

/// Relative age of `timestamp`, e.g. "2 mins ago"; dates older than a week are shown absolute
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{} min{} ago", minutes, plural(minutes));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }

    let days = hours / 24;
    if days < 7 {
        return format!("{} day{} ago", days, plural(days));
    }

    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string()
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

pub fn format_absolute_time(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Truncate to `max_units` UTF-16 code units, appending "..." when cut
///
/// Lengths are counted the way the browser extension counts them, but a
/// character is never split: one that would cross the limit is dropped whole.
pub fn truncate_text(text: &str, max_units: usize) -> String {
    let mut units = 0;
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max_units {
            return format!("{}...", &text[..idx]);
        }
    }
    text.to_string()
}

/// "234ms" below a second, "1.5s" above; "N/A" when unknown
pub fn format_duration(duration_ms: Option<u64>) -> String {
    match duration_ms {
        None | Some(0) => "N/A".to_string(),
        Some(ms) if ms < 1000 => format!("{}ms", ms),
        Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
    }
}

/// Host name of `url`, or `url` itself when it cannot be parsed
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub domain: String,
    pub full_url: String,
}

/// Title truncated for list display, falling back to the page's domain
pub fn format_page_info(title: &str, url: &str) -> PageInfo {
    let domain = extract_domain(url);
    let title = if title.is_empty() {
        domain.clone()
    } else {
        truncate_text(title, 50)
    };
    PageInfo {
        title,
        domain,
        full_url: url.to_string(),
    }
}
