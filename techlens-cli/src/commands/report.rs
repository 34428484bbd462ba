//! Report command handler

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use techlens_core::domain::TechnologyId;

use super::display::print_report;
use crate::config::Config;

#[derive(Args)]
pub struct ReportArgs {
    /// Technology ID
    pub id: String,

    /// Print the raw report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fetch and print everything produced so far for a technology
pub async fn handle_report(args: ReportArgs, config: &Config) -> Result<()> {
    let client = config.api_client()?;
    let id = TechnologyId::new(args.id);

    let report = client
        .get_report(&id)
        .await
        .with_context(|| format!("Failed to build report for technology {}", id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);

    if !report.is_final() {
        println!();
        println!(
            "{}",
            "Analysis still running; some sections may be incomplete.".yellow()
        );
    }

    Ok(())
}
