//! Progressive loading of analysis results
//!
//! While an analysis runs, each stage's results become available as soon as
//! that stage reports `complete`. [`SectionLoader`] remembers which stages
//! have been fetched so every snapshot only triggers the new ones.

use serde::Serialize;
use std::collections::HashSet;
use techlens_core::domain::axis::ComparisonAxis;
use techlens_core::domain::market::MarketAnalysis;
use techlens_core::domain::medical::MedicalAssessment;
use techlens_core::domain::paper::RelatedPaper;
use techlens_core::domain::patent::RelatedPatent;
use techlens_core::domain::visualization::PcaVisualization;
use techlens_core::domain::{AnalysisComponent, AnalysisStatus, TechnologyId};
use tracing::{debug, warn};

use crate::AnalysisClient;
use crate::error::Result;

/// Results of one analysis stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", content = "data", rename_all = "camelCase")]
pub enum SectionData {
    ComparisonAxes(Vec<ComparisonAxis>),
    RelatedPatents(Vec<RelatedPatent>),
    RelatedPapers(Vec<RelatedPaper>),
    MarketAnalysis(Vec<MarketAnalysis>),
    PcaVisualization(PcaVisualization),
    MedicalAssessment(MedicalAssessment),
}

impl AnalysisClient {
    /// Fetch the results of one stage
    ///
    /// Returns `None` for stages without a results endpoint. List stages
    /// degrade to empty like their `get_*` methods.
    pub async fn get_section(
        &self,
        id: &TechnologyId,
        component: AnalysisComponent,
    ) -> Option<Result<SectionData>> {
        let section = match component {
            AnalysisComponent::ComparisonAxes => {
                Ok(SectionData::ComparisonAxes(self.get_comparison_axes(id).await))
            }
            AnalysisComponent::RelatedPatents => {
                Ok(SectionData::RelatedPatents(self.get_related_patents(id).await))
            }
            AnalysisComponent::RelatedPapers => {
                Ok(SectionData::RelatedPapers(self.get_related_papers(id).await))
            }
            AnalysisComponent::MarketAnalysis => {
                Ok(SectionData::MarketAnalysis(self.get_market_analysis(id).await))
            }
            AnalysisComponent::PcaVisualization => self
                .get_pca_visualization(id)
                .await
                .map(SectionData::PcaVisualization),
            AnalysisComponent::MedicalAssessment => self
                .get_medical_assessment(id)
                .await
                .map(SectionData::MedicalAssessment),
            AnalysisComponent::ClusterAnalysis => return None,
        };
        Some(section)
    }
}

/// Tracks which stages have had their results fetched
#[derive(Debug, Default)]
pub struct SectionLoader {
    loaded: HashSet<AnalysisComponent>,
}

impl SectionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, component: AnalysisComponent) -> bool {
        self.loaded.contains(&component)
    }

    /// Fetches every stage that is complete in `status` and not loaded yet
    ///
    /// A stage is marked loaded only after a successful fetch, so a failed
    /// stage is tried again on the next call.
    pub async fn load(
        &mut self,
        client: &AnalysisClient,
        status: &AnalysisStatus,
    ) -> Vec<(AnalysisComponent, Result<SectionData>)> {
        let mut sections = Vec::new();

        for component in AnalysisComponent::ALL {
            if self.is_loaded(component) || !status.is_complete(component) {
                continue;
            }

            match client.get_section(&status.technology_id, component).await {
                Some(Ok(data)) => {
                    debug!(id = %status.technology_id, component = component.key(), "Section loaded");
                    self.loaded.insert(component);
                    sections.push((component, Ok(data)));
                }
                Some(Err(e)) => {
                    warn!(
                        id = %status.technology_id,
                        component = component.key(),
                        "Section failed to load, will retry: {}",
                        e
                    );
                    sections.push((component, Err(e)));
                }
                None => {
                    self.loaded.insert(component);
                }
            }
        }

        sections
    }
}
