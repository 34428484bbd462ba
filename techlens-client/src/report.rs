//! Aggregated technology report

use serde::Serialize;
use techlens_core::domain::axis::ComparisonAxis;
use techlens_core::domain::market::MarketAnalysis;
use techlens_core::domain::medical::MedicalAssessment;
use techlens_core::domain::paper::RelatedPaper;
use techlens_core::domain::patent::RelatedPatent;
use techlens_core::domain::visualization::PcaVisualization;
use techlens_core::domain::{AnalysisComponent, AnalysisStatus, Technology, TechnologyId};
use tracing::debug;

use crate::AnalysisClient;
use crate::error::Result;

/// Everything the backend has produced for one technology so far
///
/// Sections whose analysis stage has not completed are left empty.
#[derive(Debug, Clone, Serialize)]
pub struct TechnologyReport {
    pub technology: Technology,
    pub status: AnalysisStatus,
    pub comparison_axes: Vec<ComparisonAxis>,
    pub related_patents: Vec<RelatedPatent>,
    pub related_papers: Vec<RelatedPaper>,
    pub market_analysis: Vec<MarketAnalysis>,
    pub visualization: SectionState<PcaVisualization>,
    pub medical_assessment: SectionState<MedicalAssessment>,
}

/// Outcome of loading a single report section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum SectionState<T> {
    /// The analysis stage behind this section has not completed
    Pending,
    Loaded(T),
    /// The stage completed but its result could not be fetched
    Failed(String),
}

impl<T> SectionState<T> {
    fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl TechnologyReport {
    /// Whether every analysis stage has finished
    pub fn is_final(&self) -> bool {
        self.status.is_terminal()
    }
}

impl AnalysisClient {
    /// Fetch the technology, its status and every completed section
    ///
    /// Sections are fetched concurrently. List sections degrade to empty on
    /// failure. The visualization and medical assessment record their own
    /// failure so the rest of the report is still returned; only the
    /// technology record and status are required.
    pub async fn get_report(&self, id: &TechnologyId) -> Result<TechnologyReport> {
        let (technology, status) =
            tokio::try_join!(self.get_technology(id), self.get_analysis_status(id))?;

        let done = |component| status.is_complete(component);

        let (comparison_axes, related_patents, related_papers, market_analysis) = tokio::join!(
            async {
                if done(AnalysisComponent::ComparisonAxes) {
                    self.get_comparison_axes(id).await
                } else {
                    Vec::new()
                }
            },
            async {
                if done(AnalysisComponent::RelatedPatents) {
                    self.get_related_patents(id).await
                } else {
                    Vec::new()
                }
            },
            async {
                if done(AnalysisComponent::RelatedPapers) {
                    self.get_related_papers(id).await
                } else {
                    Vec::new()
                }
            },
            async {
                if done(AnalysisComponent::MarketAnalysis) {
                    self.get_market_analysis(id).await
                } else {
                    Vec::new()
                }
            },
        );

        let (visualization, medical_assessment) = tokio::join!(
            async {
                if done(AnalysisComponent::PcaVisualization) {
                    SectionState::from_result(self.get_pca_visualization(id).await)
                } else {
                    SectionState::Pending
                }
            },
            async {
                if done(AnalysisComponent::MedicalAssessment) {
                    SectionState::from_result(self.get_medical_assessment(id).await)
                } else {
                    SectionState::Pending
                }
            },
        );

        debug!(
            %id,
            axes = comparison_axes.len(),
            patents = related_patents.len(),
            papers = related_papers.len(),
            "Assembled report"
        );

        Ok(TechnologyReport {
            technology,
            status,
            comparison_axes,
            related_patents,
            related_papers,
            market_analysis,
            visualization,
            medical_assessment,
        })
    }
}
