//! CLI entrypoint for parley.
//!
//! Wires the layers together: loads configuration, builds the HTTP adapters,
//! and drives the session store from a plain-text event loop.

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};
use parley_application::{ConnectionStatus, DebateApi, SessionStore};
use parley_domain::{ConfigDraft, DebateId, DebateSession, SessionAction};
use parley_infrastructure::{ConfigLoader, FileConfig, HttpDebateApi, HttpStreamConnector};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley", version, about = "Live viewer for multi-party debates")]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a debate and stream it until it completes
    Run {
        /// The question to debate
        question: String,

        /// Participant id (repeat for each participant)
        #[arg(short, long = "participant")]
        participants: Vec<String>,

        /// Number of debate rounds
        #[arg(long)]
        rounds: Option<u32>,

        /// Agreement fraction required for consensus (0.5 - 1.0)
        #[arg(long)]
        consensus_threshold: Option<f64>,
    },

    /// Show one debate
    Show { id: String },

    /// List known debates
    List,

    /// Delete a debate
    Delete { id: String },

    /// Show configuration sources
    Config {
        /// Print the built-in defaults as TOML
        #[arg(long)]
        defaults: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };
    let base_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.server.base_url.clone());

    let mut api = HttpDebateApi::new(&base_url);
    if let Some(correlation_id) = &config.server.correlation_id {
        api = api.with_correlation_id(correlation_id.clone());
    }

    match cli.command {
        Command::Run {
            question,
            participants,
            rounds,
            consensus_threshold,
        } => {
            run_debate(
                &api,
                &base_url,
                &config,
                question,
                participants,
                rounds,
                consensus_threshold,
            )
            .await
        }
        Command::Show { id } => {
            let summary = api.get_debate(&DebateId::new(id.as_str())).await?;
            print_summary(&summary);
            Ok(())
        }
        Command::List => {
            let debates = api.list_debates().await?;
            if debates.is_empty() {
                println!("No debates.");
            }
            for summary in &debates {
                print_summary(summary);
            }
            Ok(())
        }
        Command::Delete { id } => {
            api.delete_debate(&DebateId::new(id.as_str())).await?;
            println!("Deleted {id}");
            Ok(())
        }
        Command::Config { defaults } => {
            ConfigLoader::print_config_sources();
            if defaults {
                println!();
                println!("{}", FileConfig::default_toml()?);
            }
            Ok(())
        }
    }
}

/// Create a debate, then drive the store from the event stream until the
/// session reaches a terminal state.
async fn run_debate(
    api: &HttpDebateApi,
    base_url: &str,
    config: &FileConfig,
    question: String,
    participants: Vec<String>,
    rounds: Option<u32>,
    consensus_threshold: Option<f64>,
) -> Result<()> {
    let connector = Arc::new(HttpStreamConnector::new(base_url));
    let (mut store, mut events) =
        SessionStore::new(connector, config.stream.transport_config());

    // Config-file defaults first, command-line values on top.
    store.update_config(config.debate.draft());
    store.update_config(ConfigDraft {
        question: Some(question),
        participants: if participants.is_empty() {
            None
        } else {
            Some(participants)
        },
        rounds,
        consensus_threshold,
        fork_mode: None,
    });
    store.start_debate()?;

    let debate_config = match store.session() {
        DebateSession::Starting { config } => config.clone(),
        other => bail!("unexpected session state: {}", other.name()),
    };

    let created = api.create_debate(&debate_config).await?;
    info!(debate_id = %created.debate_id, "debate created");
    println!("Debate {} started", created.debate_id);
    println!("Question: {}", debate_config.question);
    println!("Participants: {}", debate_config.participants.join(", "));
    println!();

    store.dispatch(SessionAction::DebateStarted(created.debate_id));

    let mut printed = 0;
    let mut last_status = store.connection_status();
    while let Some(event) = events.recv().await {
        store.apply_stream_event(event);

        let status = store.connection_status();
        if status != last_status {
            if status == ConnectionStatus::Reconnecting {
                eprintln!("(connection lost, reconnecting...)");
            }
            last_status = status;
        }

        let turns = store.turns();
        for turn in &turns[printed..] {
            println!("[{}] {}", turn.participant_id, turn.content);
        }
        printed = turns.len();

        // Terminal session, or transport gone (e.g. a bare `complete` event):
        // either way no further events can arrive.
        if store.session().is_terminal() || store.connection_status() == ConnectionStatus::Idle {
            break;
        }
    }

    match store.session() {
        DebateSession::Completed { consensus, .. } => {
            println!();
            println!(
                "Consensus: {} ({:.0}% agreement, {} for / {} against)",
                consensus.level,
                consensus.percentage * 100.0,
                consensus.supporting,
                consensus.dissenting
            );
            Ok(())
        }
        DebateSession::Error { error, .. } => bail!("debate failed: {error}"),
        other => bail!("stream ended in state '{}'", other.name()),
    }
}

fn print_summary(summary: &parley_domain::DebateSummary) {
    println!(
        "{}  [{}]  {}  ({} participants, created {})",
        summary.debate_id,
        summary.status,
        summary.question,
        summary.participants.len(),
        summary.created_at.format("%Y-%m-%d %H:%M")
    );
}
