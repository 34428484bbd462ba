//! Techlens CLI
//!
//! Command-line interface for submitting technologies to the analysis API
//! and following their analysis.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "techlens")]
#[command(about = "Technology landscape analysis CLI", long_about = None)]
struct Cli {
    /// Analysis API base URL
    #[arg(long, env = "TECHLENS_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Path prefix in front of every endpoint (e.g., /api/v1)
    #[arg(long, env = "TECHLENS_API_PREFIX", default_value = "")]
    api_prefix: String,

    /// Request timeout in seconds
    #[arg(long, env = "TECHLENS_REQUEST_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "TECHLENS_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "techlens_cli=info,techlens_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_args(cli.api_url, cli.api_prefix, cli.timeout, cli.auth_token)?;

    handle_command(cli.command, &config).await
}
