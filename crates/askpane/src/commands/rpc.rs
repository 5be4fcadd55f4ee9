use askpane_client::protocol::{Dispatcher, Reply, Request};
use askpane_client::{relay_for, CancellationToken, Orchestrator};
use askpane_core::{Config, Paths};
use askpane_history::HistoryStore;
use std::sync::Arc;

pub async fn run() -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let config = Config::load(&paths.config_file())?.with_env_overrides();
    let history = Arc::new(HistoryStore::open(paths.history_file()));
    let orchestrator = Orchestrator::new(relay_for(&config)).with_history(history.clone());
    let dispatcher = Dispatcher::new(orchestrator, history);

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let input = super::read_stdin()?;
    let reply = respond(&dispatcher, &input, &cancel).await;
    interrupt.abort();

    println!("{}", serde_json::to_string(&reply)?);
    Ok(())
}

/// Decode one request and answer it; malformed input becomes a failed reply
async fn respond(dispatcher: &Dispatcher, input: &str, cancel: &CancellationToken) -> Reply {
    match serde_json::from_str::<Request>(input) {
        Ok(request) => dispatcher.handle(request, cancel).await,
        Err(e) => {
            tracing::warn!(error = %e, "rejected protocol request");
            Reply {
                success: false,
                payload: None,
                error: Some(format!("Invalid request: {}", e)),
                kind: None,
            }
        }
    }
}
