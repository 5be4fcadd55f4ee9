use crate::cli::AskArgs;
use askpane_client::{
    relay_for, AskError, AskOutcome, CancellationToken, Orchestrator, QueryContext,
};
use askpane_core::format::format_duration;
use askpane_core::{Config, Paths};
use askpane_history::HistoryStore;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => super::read_stdin()?,
    };
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!("Nothing to ask. Pass TEXT or pipe it on stdin.");
    }

    let paths = Paths::new()?;
    let config = Config::load(&paths.config_file())?.with_env_overrides();
    let history = Arc::new(HistoryStore::open(paths.history_file()));
    let orchestrator = Orchestrator::new(relay_for(&config)).with_history(history);

    let mut context = QueryContext::new(text);
    context.page_url = args.page_url;
    context.page_title = args.page_title;

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };
    let ticker = (!args.json).then(|| tokio::spawn(progress_ticker()));

    let result = orchestrator.ask(&config, context, &cancel).await;

    interrupt.abort();
    if let Some(ticker) = ticker {
        ticker.abort();
        eprint!("\r\x1b[K");
    }

    match result {
        Ok(outcome) if args.json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Ok(outcome) => {
            println!("{}", render_outcome(&outcome, &config));
            Ok(())
        }
        // Cancelling is a neutral outcome
        Err(AskError::Cancelled) => {
            eprintln!("Cancelled.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Elapsed-time indicator on stderr while the call is pending
async fn progress_ticker() {
    let started = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        eprint!("\rThinking... {}s", started.elapsed().as_secs());
        let _ = std::io::stderr().flush();
    }
}

fn render_outcome(outcome: &AskOutcome, config: &Config) -> String {
    let mut out = super::render_answer(&outcome.answer);

    let conversation_url = outcome
        .answer
        .conversation_id
        .as_deref()
        .and_then(|id| config.conversation_url(id));
    if let Some(url) = conversation_url {
        out.push_str(&format!("\n\nOpen conversation: {}", url));
    }
    out.push_str(&format!(
        "\n({})",
        format_duration(Some(outcome.duration_ms))
    ));
    out
}
