//! Watch command handler
//!
//! Runs the status poller and prints each new snapshot until every
//! analysis stage has finished. Each stage's results are fetched and
//! printed the first time the stage is seen complete.

use anyhow::Result;
use clap::Args;
use colored::*;
use std::time::Duration;
use techlens_client::{
    AnalysisClient, PollSettings, PollerView, SectionData, SectionLoader, StatusPoller,
};
use techlens_core::domain::axis::ComparisonAxis;
use techlens_core::domain::{AnalysisStatus, TechnologyId};
use tracing::{debug, info};

use super::display::{print_changes, print_section, print_status, print_update};
use crate::config::Config;

#[derive(Args)]
pub struct WatchArgs {
    /// Technology ID
    pub id: String,

    /// Never poll more often than this many seconds
    #[arg(long, value_name = "SECS")]
    pub min_interval: Option<u64>,
}

impl WatchArgs {
    fn poll_settings(&self) -> Result<PollSettings> {
        let mut settings = PollSettings::default();
        if let Some(secs) = self.min_interval {
            settings.min_interval = Duration::from_secs(secs);
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// Follow an analysis until it settles or the user interrupts
pub async fn handle_watch(args: WatchArgs, config: &Config) -> Result<()> {
    let settings = args.poll_settings()?;
    let id = TechnologyId::new(args.id);

    let client = config.api_client()?;
    let poller = StatusPoller::new(client.clone(), settings);
    let mut updates = poller.subscribe();
    poller.start(id.clone(), true);

    println!(
        "{} {} {}",
        "Watching technology".bold(),
        id.to_string().cyan(),
        "(Ctrl-C to stop)".dimmed()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut previous: Option<AnalysisStatus> = None;
    let mut seen = 0;
    let mut results = Results::default();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                if view.fetch_count > seen {
                    seen = view.fetch_count;
                    render(&view, previous.as_ref());
                    if let Some(status) = &view.snapshot {
                        results.load(&client, status).await;
                    }
                    previous = view.snapshot.clone();
                }
                if view.is_settled() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!(%id, "Interrupted, stopping poller");
                poller.stop();
                println!();
                println!("{}", "Stopped watching.".yellow());
                return Ok(());
            }
        }
    }

    match poller.snapshot() {
        Some(status) => {
            // Stages that failed to load get one more try once polling ends.
            results.load(&client, &status).await;
            println!();
            println!("{}", "✓ Analysis finished".green().bold());
            print_status(&status);
        }
        None => println!("{}", "Polling ended without a status.".yellow()),
    }

    Ok(())
}

/// Stage results fetched so far during a watch
#[derive(Default)]
struct Results {
    loader: SectionLoader,
    axes: Vec<ComparisonAxis>,
}

impl Results {
    async fn load(&mut self, client: &AnalysisClient, status: &AnalysisStatus) {
        for (component, section) in self.loader.load(client, status).await {
            if let Ok(SectionData::ComparisonAxes(axes)) = &section {
                self.axes = axes.clone();
            }
            print_section(component, &section, &self.axes);
        }
    }
}

fn render(view: &PollerView, previous: Option<&AnalysisStatus>) {
    if let Some(error) = &view.error {
        let now = chrono::Local::now().format("%H:%M:%S").to_string();
        println!("{} {} {}", now.dimmed(), "✗".red(), error.red());
    } else if let Some(status) = &view.snapshot {
        print_update(status);
        print_changes(previous, status);
    }

    if let Some(delay) = view.next_delay {
        debug!(delay_secs = delay.as_secs(), "Next poll scheduled");
        println!(
            "{}",
            format!("  next check in {}s", delay.as_secs()).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_interval_override() {
        let args = WatchArgs {
            id: "7".to_string(),
            min_interval: Some(20),
        };
        let settings = args.poll_settings().unwrap();
        assert_eq!(settings.min_interval, Duration::from_secs(20));
        assert_eq!(settings.failure_backoff, PollSettings::default().failure_backoff);
    }

    #[test]
    fn test_zero_min_interval_rejected() {
        let args = WatchArgs {
            id: "7".to_string(),
            min_interval: Some(0),
        };
        assert!(args.poll_settings().is_err());
    }
}
