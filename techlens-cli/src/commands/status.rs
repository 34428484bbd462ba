//! Status command handler

use anyhow::{Context, Result};
use clap::Args;
use techlens_core::domain::TechnologyId;

use super::display::print_status;
use crate::config::Config;

#[derive(Args)]
pub struct StatusArgs {
    /// Technology ID
    pub id: String,
}

/// Fetch and print the analysis status once
pub async fn handle_status(args: StatusArgs, config: &Config) -> Result<()> {
    let client = config.api_client()?;
    let id = TechnologyId::new(args.id);

    let status = client
        .get_analysis_status(&id)
        .await
        .with_context(|| format!("Failed to fetch analysis status for technology {}", id))?;

    print_status(&status);
    Ok(())
}
