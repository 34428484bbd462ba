//! Submit command handler
//!
//! Validates the technology form locally and creates the technology.

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use colored::*;
use techlens_core::validation::{TechnologyForm, ValidationErrors};
use tracing::info;

use crate::config::Config;

#[derive(Args)]
pub struct SubmitArgs {
    /// Technology name (3 to 100 characters)
    #[arg(short, long)]
    pub name: String,

    /// Technology abstract (50 to 2000 characters)
    #[arg(short, long = "abstract", conflicts_with = "abstract_file")]
    pub abstract_text: Option<String>,

    /// Read the abstract from a file instead
    #[arg(long, value_name = "PATH")]
    pub abstract_file: Option<String>,

    /// Number of comparison axes to generate
    #[arg(long, default_value = "3")]
    pub axes: String,
}

/// Validate the form and submit it
pub async fn handle_submit(args: SubmitArgs, config: &Config) -> Result<()> {
    let abstract_text = match (args.abstract_text, args.abstract_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read abstract file: {}", path))?
            .trim()
            .to_string(),
        (None, None) => bail!("Either --abstract or --abstract-file is required"),
    };

    let form = TechnologyForm::new(args.name, abstract_text, args.axes);
    let request = match form.into_request() {
        Ok(request) => request,
        Err(errors) => {
            print_field_errors(&errors);
            bail!("Invalid technology data");
        }
    };

    let client = config.api_client()?;
    let technology = client
        .create_technology(&request)
        .await
        .map_err(|e| anyhow!("Submission Error: {}", e.user_message()))?;

    info!(id = %technology.id, "Technology submitted");

    println!("{}", "✓ Technology submitted successfully!".green().bold());
    println!("  ID:   {}", technology.id.to_string().cyan());
    println!("  Name: {}", technology.name.bold());
    println!("  Axes: {}", technology.num_of_axes);
    println!();
    println!(
        "Follow the analysis with: {}",
        format!("techlens watch {}", technology.id).cyan()
    );

    Ok(())
}

fn print_field_errors(errors: &ValidationErrors) {
    println!("{}", "The form has errors:".red().bold());
    for error in errors.errors() {
        println!("  {} {}", "✗".red(), error);
    }
}
