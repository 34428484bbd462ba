//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod display;
mod report;
mod status;
mod submit;
mod watch;

pub use report::ReportArgs;
pub use status::StatusArgs;
pub use submit::SubmitArgs;
pub use watch::WatchArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a technology for analysis
    Submit(SubmitArgs),
    /// Show the current analysis status once
    Status(StatusArgs),
    /// Follow the analysis until every stage has finished
    Watch(WatchArgs),
    /// Print everything the analysis has produced so far
    Report(ReportArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit(args) => submit::handle_submit(args, config).await,
        Commands::Status(args) => status::handle_status(args, config).await,
        Commands::Watch(args) => watch::handle_watch(args, config).await,
        Commands::Report(args) => report::handle_report(args, config).await,
    }
}
