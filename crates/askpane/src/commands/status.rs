use askpane_core::format::format_relative_time;
use askpane_core::{Config, Paths};
use askpane_history::HistoryStore;

pub fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    println!("{}", summarize(&paths)?);
    Ok(())
}

fn summarize(paths: &Paths) -> anyhow::Result<String> {
    let config_path = paths.config_file();
    let config = Config::load(&config_path)?.with_env_overrides();
    let history = HistoryStore::open(paths.history_file()).get_history()?;

    let or_unset = |value: &str| {
        if value.trim().is_empty() {
            "(not set)".to_string()
        } else {
            value.trim().to_string()
        }
    };
    let api_key = if config.api_key.trim().is_empty() {
        "(not set)".to_string()
    } else {
        mask(config.api_key.trim())
    };
    let transport = match &config.relay_url {
        Some(relay) => format!("relay {}", relay),
        None => format!("direct {}", config.api_base),
    };

    let mut lines = vec![
        format!("Config:     {}", config_path.display()),
        format!(
            "Configured: {}",
            if config.is_configured() { "yes" } else { "no" }
        ),
        format!("API key:    {}", api_key),
        format!("Workspace:  {}", or_unset(&config.workspace_id)),
        format!("Agent:      {}", or_unset(&config.agent_id)),
        format!("Transport:  {}", transport),
        format!("History:    {} entries", history.len()),
    ];
    if let Some(latest) = history.first() {
        lines.push(format!(
            "Last query: {}",
            format_relative_time(latest.timestamp, chrono::Utc::now())
        ));
    }
    Ok(lines.join("\n"))
}

/// Keep only the last four characters of a secret
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let visible: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****{}", visible)
}
