//! Terminal rendering shared by the status, watch and report commands

use colored::*;
use techlens_client::{ClientError, SectionData, SectionState, TechnologyReport};
use techlens_core::domain::axis::ComparisonAxis;
use techlens_core::domain::market::{MarketAnalysis, mean_score_by_axis};
use techlens_core::domain::medical::MedicalAssessment;
use techlens_core::domain::paper::RelatedPaper;
use techlens_core::domain::patent::RelatedPatent;
use techlens_core::domain::visualization::PcaVisualization;
use techlens_core::domain::{
    AnalysisComponent, AnalysisProgress, AnalysisStatus, ComponentState, ComponentStatus,
    Technology,
};

const BAR_WIDTH: usize = 30;

/// Print every component of a status snapshot with a progress bar
pub fn print_status(status: &AnalysisStatus) {
    let progress = status.progress();

    println!(
        "{} {}",
        "Analysis of technology".bold(),
        status.technology_id.to_string().cyan()
    );
    println!("  Overall:  {}", status.overall);
    println!("  Progress: {}", progress_line(&progress));
    println!();

    for (key, state) in &status.components {
        print_component(key, state);
    }
}

/// Print the one-line summary used while watching
pub fn print_update(status: &AnalysisStatus) {
    let now = chrono::Local::now().format("%H:%M:%S").to_string();
    println!("{} {}", now.dimmed(), progress_line(&status.progress()));
}

/// Print components whose state changed between two snapshots
pub fn print_changes(previous: Option<&AnalysisStatus>, current: &AnalysisStatus) {
    for (key, state) in &current.components {
        let unchanged = previous
            .and_then(|p| p.components.get(key))
            .is_some_and(|old| old.status == state.status);
        if !unchanged {
            print_component(key, state);
        }
    }
}

fn print_component(key: &str, state: &ComponentState) {
    let name = AnalysisComponent::from_key(key)
        .map(|c| c.display_name().to_string())
        .unwrap_or_else(|| key.to_string());

    let mut line = format!("  {} {:<20} {}", "▸".cyan(), name, colorize_status(&state.status));
    if let Some(elapsed) = state.elapsed() {
        line.push_str(&format!(" {}", format!("({}s)", elapsed.num_seconds()).dimmed()));
    }
    println!("{}", line);

    if let Some(message) = &state.error_message {
        println!("      {}", message.red());
    }
}

fn progress_line(progress: &AnalysisProgress) -> String {
    let filled = if progress.total == 0 {
        0
    } else {
        progress.complete * BAR_WIDTH / progress.total
    };
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));

    let mut line = format!(
        "{} {}/{} complete ({:.0}%)",
        bar.green(),
        progress.complete,
        progress.total,
        progress.percent()
    );
    if progress.failed > 0 {
        line.push_str(&format!(", {}", format!("{} failed", progress.failed).red()));
    }
    line
}

/// Colorize a component status for display
fn colorize_status(status: &ComponentStatus) -> ColoredString {
    match status {
        ComponentStatus::Pending => status.as_str().dimmed(),
        ComponentStatus::Processing => status.as_str().cyan(),
        ComponentStatus::Complete => status.as_str().green(),
        ComponentStatus::Error => status.as_str().red(),
        ComponentStatus::Unknown(raw) => raw.as_str().yellow(),
    }
}

fn print_technology(technology: &Technology) {
    println!("{}", "Technology:".bold());
    println!("  ID:        {}", technology.id.to_string().cyan());
    println!("  Name:      {}", technology.name);
    println!("  Axes:      {}", technology.num_of_axes);
    if let Some(created) = technology.created() {
        println!("  Submitted: {}", created.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(keywords) = &technology.search_keywords {
        println!("  Keywords:  {}", keywords.dimmed());
    }
    println!("\n{}", technology.abstract_text);
    if let Some(problem) = &technology.problem_statement {
        println!("\n{}", "Problem statement:".bold());
        println!("{}", problem);
    }
    if let Some(summary) = &technology.market_analysis_summary {
        println!("\n{}", "Market summary:".bold());
        println!("{}", summary);
    }
}

fn section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(80).dimmed());
}

fn print_failed(message: &str) {
    println!("{} {}", "failed to load:".red(), message);
}

fn pending(report: &TechnologyReport, component: AnalysisComponent) -> bool {
    if report.status.is_complete(component) {
        return false;
    }
    let state = report
        .status
        .component(component)
        .map(|c| c.status.to_string())
        .unwrap_or_else(|| "not reported".to_string());
    println!("{}", format!("Not available yet ({}).", state).yellow());
    true
}

fn print_axes(axes: &[ComparisonAxis]) {
    if axes.is_empty() {
        println!("{}", "No comparison axes found.".yellow());
    }
    for axis in axes {
        println!(
            "  {} {} ({} ↔ {}) weight {:.2}",
            "▸".cyan(),
            axis.axis_name.bold(),
            axis.extreme1,
            axis.extreme2,
            axis.weight
        );
    }
}

fn print_patents(patents: &[RelatedPatent]) {
    if patents.is_empty() {
        println!("{}", "No related patents found.".yellow());
    }
    for patent in patents {
        println!("  {} {} {}", "▸".cyan(), patent.document_id.dimmed(), patent.name);
        println!("    {} · {}", patent.assignees, patent.publication_date.dimmed());
        println!("    {}", patent.url.dimmed());
    }
}

fn print_papers(papers: &[RelatedPaper]) {
    if papers.is_empty() {
        println!("{}", "No related papers found.".yellow());
    }
    for paper in papers {
        println!("  {} {}", "▸".cyan(), paper.title);
        println!(
            "    {} · {} · {} citations",
            paper.authors,
            paper.journal.dimmed(),
            paper.citation_count
        );
    }
}

/// Mean score per axis, named from `axes` when the axis is known
fn print_market(entries: &[MarketAnalysis], axes: &[ComparisonAxis]) {
    if entries.is_empty() {
        println!("{}", "No market analysis found.".yellow());
    }
    for (axis_id, mean, count) in mean_score_by_axis(entries) {
        let name = axes
            .iter()
            .find(|a| a.id == axis_id)
            .map(|a| a.axis_name.clone())
            .unwrap_or_else(|| format!("axis {}", axis_id));
        println!("  {} {:<24} mean score {:.2} over {} entries", "▸".cyan(), name, mean, count);
    }
}

fn print_visualization(viz: &PcaVisualization) {
    println!(
        "  {} points, {:.1}% of variance explained by PC1+PC2",
        viz.pca_view.points.len(),
        viz.total_variance_explained() * 100.0
    );
    if let Some(loading) = viz.dominant_loading() {
        println!("  Strongest axis: {}", loading.axis.bold());
    }
    if let Some(cluster) = viz.target_cluster() {
        println!("  Target cluster: {}", cluster.name.bold());
    }
    for cluster in &viz.cluster_view.clusters {
        let marker = if cluster.contains_target { "★".yellow() } else { "▸".cyan() };
        println!(
            "  {} {} ({} members, spread {:.2})",
            marker,
            cluster.name,
            cluster.members.len(),
            cluster.spread
        );
    }
}

fn print_medical(assessment: &MedicalAssessment) {
    println!(
        "  Association: {}",
        assessment.medical_association.as_deref().unwrap_or("N/A")
    );
    println!(
        "  {}",
        assessment
            .recommendations
            .as_deref()
            .unwrap_or("No recommendations available.")
    );
    for item in &assessment.billable_items {
        println!(
            "  {} {:<8} {:<40} ${:>10.2}",
            "▸".cyan(),
            item.hcpcs_code,
            item.description,
            item.fee
        );
    }
    println!("  {} ${:.2}", "Total:".bold(), assessment.total_fee);
}

/// Print the results of a stage that just finished
///
/// `axes` names the market analysis scores when the axes are already known.
pub fn print_section(
    component: AnalysisComponent,
    section_result: &Result<SectionData, ClientError>,
    axes: &[ComparisonAxis],
) {
    section(component.display_name());
    match section_result {
        Ok(SectionData::ComparisonAxes(data)) => print_axes(data),
        Ok(SectionData::RelatedPatents(data)) => print_patents(data),
        Ok(SectionData::RelatedPapers(data)) => print_papers(data),
        Ok(SectionData::MarketAnalysis(data)) => print_market(data, axes),
        Ok(SectionData::PcaVisualization(data)) => print_visualization(data),
        Ok(SectionData::MedicalAssessment(data)) => print_medical(data),
        Err(e) => print_failed(&e.to_string()),
    }
}

/// Print a full text report
pub fn print_report(report: &TechnologyReport) {
    print_technology(&report.technology);

    section("Analysis Progress");
    println!("{}", progress_line(&report.status.progress()));

    section(AnalysisComponent::ComparisonAxes.display_name());
    if !pending(report, AnalysisComponent::ComparisonAxes) {
        print_axes(&report.comparison_axes);
    }

    section(AnalysisComponent::RelatedPatents.display_name());
    if !pending(report, AnalysisComponent::RelatedPatents) {
        print_patents(&report.related_patents);
    }

    section(AnalysisComponent::RelatedPapers.display_name());
    if !pending(report, AnalysisComponent::RelatedPapers) {
        print_papers(&report.related_papers);
    }

    section(AnalysisComponent::MarketAnalysis.display_name());
    if !pending(report, AnalysisComponent::MarketAnalysis) {
        print_market(&report.market_analysis, &report.comparison_axes);
    }

    section(AnalysisComponent::PcaVisualization.display_name());
    if !pending(report, AnalysisComponent::PcaVisualization) {
        match &report.visualization {
            SectionState::Loaded(viz) => print_visualization(viz),
            SectionState::Failed(message) => print_failed(message),
            SectionState::Pending => println!("{}", "No visualization data.".yellow()),
        }
    }

    section(AnalysisComponent::MedicalAssessment.display_name());
    if !pending(report, AnalysisComponent::MedicalAssessment) {
        match &report.medical_assessment {
            SectionState::Loaded(assessment) => print_medical(assessment),
            SectionState::Failed(message) => print_failed(message),
            SectionState::Pending => println!("{}", "No medical assessment.".yellow()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_counts() {
        colored::control::set_override(false);
        let line = progress_line(&AnalysisProgress {
            complete: 3,
            failed: 1,
            in_flight: 2,
            total: 6,
        });
        assert!(line.ends_with("3/6 complete (50%), 1 failed"));
        assert_eq!(line.chars().filter(|c| *c == '█').count(), 15);
    }

    #[test]
    fn test_progress_line_empty() {
        colored::control::set_override(false);
        let line = progress_line(&AnalysisProgress::default());
        assert!(line.ends_with("0/0 complete (0%)"));
    }
}
