use crate::cli::HistoryAction;
use askpane_core::format::{
    format_absolute_time, format_duration, format_page_info, format_relative_time, truncate_text,
};
use askpane_core::{format_links_list, strip_citation_markers, Paths};
use askpane_history::{HistoryEntry, HistoryStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub fn run(
    action: Option<HistoryAction>,
    limit: usize,
    agent: Option<&str>,
    stats: bool,
) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let store = HistoryStore::open(paths.history_file());
    println!("{}", execute(&store, action, limit, agent, stats)?);
    Ok(())
}

fn execute(
    store: &HistoryStore,
    action: Option<HistoryAction>,
    limit: usize,
    agent: Option<&str>,
    stats: bool,
) -> anyhow::Result<String> {
    let now = Utc::now();
    match action {
        None | Some(HistoryAction::List) => {
            let entries = match agent {
                Some(agent) => store.filter_by_agent(agent)?,
                None => store.get_history()?,
            };
            if stats {
                return Ok(compute_stats(&entries));
            }
            Ok(list_entries(&entries, limit, now))
        }
        Some(HistoryAction::Show { id }) => match store.get_entry(&id)? {
            Some(entry) => Ok(show_entry(&entry, now)),
            None => anyhow::bail!("No history entry with id {}", id),
        },
        Some(HistoryAction::Search { term }) => {
            let matches = store.search_history(&term)?;
            if matches.is_empty() {
                return Ok(format!("No entries matching \"{}\"", term));
            }
            Ok(list_entries(&matches, limit, now))
        }
        Some(HistoryAction::Delete { ids }) => {
            let report = store.delete_entries(&ids)?;
            let mut out = format!("Deleted {} entries", report.deleted_count);
            if !report.failed_ids.is_empty() {
                out.push_str(&format!("\nNot found: {}", report.failed_ids.join(", ")));
            }
            Ok(out)
        }
        Some(HistoryAction::Clear) => {
            store.clear_history()?;
            Ok("History cleared".to_string())
        }
        Some(HistoryAction::Export { output }) => {
            let json = store.export_history()?;
            match output {
                Some(path) => {
                    askpane_core::atomic_write(&path, json.as_bytes())?;
                    Ok(format!("Exported history to {}", path.display()))
                }
                None => Ok(json),
            }
        }
    }
}

fn list_entries(entries: &[HistoryEntry], limit: usize, now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return "No history".to_string();
    }

    let shown: Vec<&HistoryEntry> = entries.iter().take(limit).collect();
    let mut lines = vec![
        format!("Recent Queries (last {})", shown.len()),
        "======================".to_string(),
    ];
    for entry in shown {
        let status = if entry.is_error() { "✗" } else { "✓" };
        let mut line = format!(
            "  {} {} | {} | {}",
            status,
            entry.id,
            format_relative_time(entry.timestamp, now),
            truncate_text(entry.query_text(), 60)
        );
        if !entry.page_url.is_empty() {
            let page = format_page_info(&entry.page_title, &entry.page_url);
            line.push_str(&format!(" ({})", page.title));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn show_entry(entry: &HistoryEntry, now: DateTime<Utc>) -> String {
    let mut out = vec![
        format!("Id:       {}", entry.id),
        format!(
            "When:     {} ({})",
            format_absolute_time(entry.timestamp),
            format_relative_time(entry.timestamp, now)
        ),
        format!("Duration: {}", format_duration(entry.duration)),
    ];
    if !entry.page_url.is_empty() {
        let page = format_page_info(&entry.page_title, &entry.page_url);
        out.push(format!("Page:     {} <{}>", page.title, page.full_url));
    }
    if let Some(agent) = &entry.agent_id {
        out.push(format!("Agent:    {}", agent));
    }
    out.push(String::new());
    out.push(format!("Query:\n{}", entry.query_text()));
    out.push(String::new());

    match (&entry.error, &entry.answer) {
        (Some(error), _) => out.push(format!("Error:\n{}", error)),
        (None, Some(answer)) => out.push(format!("Answer:\n{}", strip_citation_markers(answer))),
        (None, None) => out.push("No answer recorded".to_string()),
    }
    if !entry.links.is_empty() {
        out.push(String::new());
        out.push(format_links_list(&entry.links));
    }
    out.join("\n")
}

fn compute_stats(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No queries to analyze.".to_string();
    }
    let total = entries.len();
    let failed = entries.iter().filter(|e| e.is_error()).count();
    let durations: Vec<u64> = entries.iter().filter_map(|e| e.duration).collect();
    let avg_duration = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<u64>() / durations.len() as u64)
    };
    let total_links: usize = entries.iter().map(|e| e.links.len()).sum();

    let mut agents: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        *agents
            .entry(entry.agent_id.as_deref().unwrap_or("(none)"))
            .or_default() += 1;
    }
    let mut agents: Vec<(&str, usize)> = agents.into_iter().collect();
    agents.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    let agents: Vec<String> = agents
        .iter()
        .map(|(agent, count)| format!("{} ({})", agent, count))
        .collect();

    format!(
        "Total queries: {}\n\
         Failed: {} ({:.0}%)\n\
         Avg duration: {}\n\
         Links cited: {}\n\
         Agents: {}",
        total,
        failed,
        failed as f64 / total as f64 * 100.0,
        format_duration(avg_duration),
        total_links,
        agents.join(", ")
    )
}
