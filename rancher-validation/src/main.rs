//! Secret validation runner
//!
//! Runs the Secret CRUD checks against the Rancher server described by the
//! test configuration and prints a report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rancher_client::{wait, RancherClient, RancherConfig, Session};
use rancher_validation::checks::{self, Check};
use rancher_validation::logging::LoggingConfig;
use rancher_validation::output::{self, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Test configuration file
    #[arg(short, long, env = "CATTLE_TEST_CONFIG")]
    config: PathBuf,

    /// Bearer token. Empty uses the configured admin token.
    #[arg(long, default_value = "")]
    token: String,

    /// Override the configured cluster name
    #[arg(long)]
    cluster_name: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Seconds to wait for a deleted secret to disappear
    #[arg(long, default_value_t = wait::DEFAULT_TIMEOUT.as_secs())]
    delete_timeout: u64,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a secret and validate its name and labels
    Create,
    /// Create a secret, replace its annotations and validate them
    Update,
    /// Create a secret, delete it and validate it is gone
    Delete,
    /// Run every check
    All,
}

impl Commands {
    fn checks(&self) -> Vec<Check> {
        match self {
            Commands::Create => vec![Check::Create],
            Commands::Update => vec![Check::Update],
            Commands::Delete => vec![Check::Delete],
            Commands::All => Check::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = LoggingConfig {
        level: cli.log_level.clone(),
        file_dir: cli.log_dir.clone(),
        json_format: cli.log_json,
    }
    .init()?;

    let mut config = RancherConfig::from_path(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(name) = &cli.cluster_name {
        config = config.with_cluster_name(name);
    }

    let session = Session::new();
    let client = RancherClient::from_config(config, &cli.token, &session)
        .context("Failed to create Rancher client")?;

    let reports = match checks::resolve_cluster(&client).await {
        Ok(cluster) => {
            tracing::info!(cluster = %cluster.id, name = %cluster.name, "Running secret checks");
            checks::run_checks(&client, &cli.command.checks(), Duration::from_secs(cli.delete_timeout)).await
        }
        Err(e) => {
            session.cleanup().await;
            return Err(e);
        }
    };

    let failures = session.cleanup().await;
    if failures > 0 {
        tracing::warn!(failures, "Cleanup reported failures");
    }

    output::print_reports(&reports, cli.output)?;

    if reports.iter().all(|r| r.passed) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
