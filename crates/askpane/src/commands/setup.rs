use crate::cli::SetupArgs;
use askpane_core::{Config, Paths};

pub fn run(args: SetupArgs) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let config_path = paths.config_file();

    let mut config = Config::load(&config_path)?;
    apply(&mut config, args);
    config.save(&config_path)?;

    println!("✓ Saved configuration to {}", config_path.display());
    if !config.is_configured() {
        println!("\nStill missing:");
        if config.api_key.trim().is_empty() {
            println!("  - API key (--api-key)");
        }
        if config.workspace_id.trim().is_empty() {
            println!("  - Workspace ID (--workspace-id)");
        }
    }
    Ok(())
}

/// Overwrite the fields given on the command line, trimming surrounding whitespace
fn apply(config: &mut Config, args: SetupArgs) {
    let trimmed = |value: String| value.trim().to_string();

    if let Some(key) = args.api_key {
        config.api_key = trimmed(key);
    }
    if let Some(workspace) = args.workspace_id {
        config.workspace_id = trimmed(workspace);
    }
    if let Some(agent) = args.agent_id {
        config.agent_id = trimmed(agent);
    }
    if let Some(username) = args.username {
        config.user_context.username = trimmed(username);
    }
    if let Some(timezone) = args.timezone {
        config.user_context.timezone = trimmed(timezone);
    }
    if let Some(title) = args.title {
        config.request_config.title = trimmed(title);
    }
    if let Some(skip) = args.skip_tools_validation {
        config.request_config.skip_tools_validation = skip;
    }
    if let Some(relay) = args.relay_url {
        config.relay_url = Some(trimmed(relay)).filter(|r| !r.is_empty());
    }
    if let Some(base) = args.api_base {
        config.api_base = trimmed(base);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_apply_only_given_fields() {
        let mut config = Config {
            api_key: "old".to_string(),
            agent_id: "agent".to_string(),
            relay_url: Some("https://relay".to_string()),
            ..Config::default()
        };
        apply(
            &mut config,
            SetupArgs {
                api_key: Some("  new-key ".to_string()),
                relay_url: Some(String::new()),
                skip_tools_validation: Some(true),
                ..SetupArgs::default()
            },
        );
        assert_eq!(config.api_key, "new-key");
        assert_eq!(config.agent_id, "agent");
        assert_eq!(config.relay_url, None);
        assert!(config.request_config.skip_tools_validation);
    }

    #[test]
    #[serial]
    fn test_setup_writes_config_file() {
        let temp = TempDir::new().unwrap();
        std::env::set_var("ASKPANE_HOME", temp.path());

        let result = run(SetupArgs {
            api_key: Some("sk-1".to_string()),
            workspace_id: Some("ws".to_string()),
            ..SetupArgs::default()
        });
        let second = run(SetupArgs {
            agent_id: Some("helper".to_string()),
            ..SetupArgs::default()
        });
        std::env::remove_var("ASKPANE_HOME");

        assert!(result.is_ok());
        assert!(second.is_ok());
        let saved = Config::load(&temp.path().join("config.json")).unwrap();
        assert_eq!(saved.api_key, "sk-1");
        assert_eq!(saved.workspace_id, "ws");
        assert_eq!(saved.agent_id, "helper");
        assert!(saved.is_configured());
    }
}
