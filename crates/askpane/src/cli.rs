use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "askpane")]
#[command(version)]
#[command(about = "Ask a conversational assistant about a piece of text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask about TEXT (read from stdin when omitted)
    Ask(AskArgs),

    /// Extract the answer and links from a saved conversation response
    Parse {
        /// Response JSON file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the extracted fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage past queries
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,

        /// Number of entries to list
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Only show entries answered by this agent
        #[arg(long)]
        agent: Option<String>,

        /// Show statistics summary
        #[arg(long)]
        stats: bool,
    },

    /// Write API credentials and defaults to the config file
    Setup(SetupArgs),

    /// Show configuration status
    Status,

    /// Answer one JSON protocol request from stdin
    Rpc,

    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
pub struct AskArgs {
    pub text: Option<String>,

    /// URL of the page the text came from
    #[arg(long, default_value = "")]
    pub page_url: String,

    /// Title of the page the text came from
    #[arg(long, default_value = "")]
    pub page_title: String,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum HistoryAction {
    /// List recent entries
    List,
    /// Show one entry in full
    Show { id: String },
    /// Case-insensitive search over queries and answers
    Search { term: String },
    /// Delete one or more entries
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Delete every entry
    Clear,
    /// Write the history as JSON
    Export {
        /// Destination file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub workspace_id: Option<String>,

    /// Agent configuration to mention in every message
    #[arg(long)]
    pub agent_id: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub timezone: Option<String>,

    /// Conversation title
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub skip_tools_validation: Option<bool>,

    /// Forward calls through this relay (empty string to call the API directly)
    #[arg(long)]
    pub relay_url: Option<String>,

    /// API base URL
    #[arg(long)]
    pub api_base: Option<String>,
}
