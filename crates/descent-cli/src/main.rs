use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use descent_core::SessionBuilder;
use descent_core::app::SessionConfig;
use descent_core::domain::DeciderKind;
use descent_core::engine::VerifyPolicy;
use tracing::info;

mod stdio;

use crate::stdio::LineTransport;

/// Answers game rounds read as JSON lines on stdin; replies go to stdout.
#[derive(Parser, Debug)]
#[command(name = "descent", version, about)]
struct Cli {
    /// JSON session configuration; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial action cap.
    #[arg(long)]
    max_actions: Option<usize>,

    /// Time allowed per decision before the greedy fallback answers.
    #[arg(long)]
    budget_ms: Option<u64>,

    #[arg(long, value_enum)]
    decider: Option<DeciderArg>,

    /// Submit nothing when the chosen sequence is predicted to be fatal.
    #[arg(long)]
    reject_on_death: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeciderArg {
    Tiered,
    Greedy,
}

impl From<DeciderArg> for DeciderKind {
    fn from(arg: DeciderArg) -> Self {
        match arg {
            DeciderArg::Tiered => DeciderKind::Tiered,
            DeciderArg::Greedy => DeciderKind::Greedy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let session = SessionBuilder::new(LineTransport::stdio())
        .config(config)
        .build()
        .context("invalid session configuration")?;

    let summary = session.run().await.context("session failed")?;
    info!(
        rounds = summary.rounds,
        actions_sent = summary.actions_sent,
        fallbacks = summary.fallbacks,
        end = ?summary.end,
        "done"
    );
    Ok(())
}

/// ログは stderr へ（stdout はプロトコルの返信専用）
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => SessionConfig::default(),
    };

    if let Some(max_actions) = cli.max_actions {
        config.initial_max_actions = max_actions;
    }
    if let Some(budget_ms) = cli.budget_ms {
        config.decision_budget_ms = budget_ms;
    }
    if let Some(decider) = cli.decider {
        config.decider = decider.into();
    }
    if cli.reject_on_death {
        config.engine.verify_policy = VerifyPolicy::RejectOnDeath;
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<SessionConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("config file {} did not contain valid JSON", path.display()))
}
