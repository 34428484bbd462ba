//! Per-stage analysis result endpoints
//!
//! List endpoints degrade to an empty list on any failure so a partial
//! report can still be shown; the `try_*` variants keep the error. The
//! visualization and medical assessment are single documents and always
//! return their error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use techlens_core::domain::TechnologyId;
use techlens_core::domain::axis::ComparisonAxis;
use techlens_core::domain::market::MarketAnalysis;
use techlens_core::domain::medical::MedicalAssessment;
use techlens_core::domain::paper::RelatedPaper;
use techlens_core::domain::patent::RelatedPatent;
use techlens_core::domain::visualization::PcaVisualization;
use tracing::{error, warn};

use crate::AnalysisClient;
use crate::error::Result;

const VISUALIZATION_QUERY: [(&str, &str); 4] = [
    ("show_clusters", "true"),
    ("viz_type", "pca"),
    ("show_labels", "true"),
    ("show_annotations", "true"),
];

impl AnalysisClient {
    // =============================================================================
    // List Endpoints
    // =============================================================================

    /// Comparison axes generated for the technology, empty on failure
    pub async fn get_comparison_axes(&self, id: &TechnologyId) -> Vec<ComparisonAxis> {
        or_empty("comparison axes", id, self.try_get_comparison_axes(id).await)
    }

    pub async fn try_get_comparison_axes(&self, id: &TechnologyId) -> Result<Vec<ComparisonAxis>> {
        self.get_resource(id, "comparison-axes").await
    }

    /// Patents related to the technology, empty on failure
    pub async fn get_related_patents(&self, id: &TechnologyId) -> Vec<RelatedPatent> {
        or_empty("related patents", id, self.try_get_related_patents(id).await)
    }

    pub async fn try_get_related_patents(&self, id: &TechnologyId) -> Result<Vec<RelatedPatent>> {
        self.get_resource(id, "related").await
    }

    /// Research papers related to the technology, empty on failure
    pub async fn get_related_papers(&self, id: &TechnologyId) -> Vec<RelatedPaper> {
        or_empty("related papers", id, self.try_get_related_papers(id).await)
    }

    pub async fn try_get_related_papers(&self, id: &TechnologyId) -> Result<Vec<RelatedPaper>> {
        self.get_resource(id, "papers").await
    }

    /// Market analysis scores, empty on failure
    pub async fn get_market_analysis(&self, id: &TechnologyId) -> Vec<MarketAnalysis> {
        or_empty("market analysis", id, self.try_get_market_analysis(id).await)
    }

    pub async fn try_get_market_analysis(&self, id: &TechnologyId) -> Result<Vec<MarketAnalysis>> {
        self.get_resource(id, "market-analysis").await
    }

    // =============================================================================
    // Document Endpoints
    // =============================================================================

    /// PCA projection and clusters for the technology and its related work
    pub async fn get_pca_visualization(&self, id: &TechnologyId) -> Result<PcaVisualization> {
        self.get_resource_with_query(id, "visualization", &VISUALIZATION_QUERY)
            .await
            .inspect_err(|e| error!(%id, "Failed to fetch PCA visualization: {}", e))
    }

    /// Medical billing assessment for the technology
    pub async fn get_medical_assessment(&self, id: &TechnologyId) -> Result<MedicalAssessment> {
        self.get_resource(id, "billable-items")
            .await
            .inspect_err(|e| error!(%id, "Failed to fetch medical assessment: {}", e))
    }

    pub(crate) async fn get_resource<T: DeserializeOwned>(
        &self,
        id: &TechnologyId,
        resource: &str,
    ) -> Result<T> {
        self.get_resource_with_query(id, resource, &[] as &[(&str, &str)])
            .await
    }

    async fn get_resource_with_query<T, Q>(
        &self,
        id: &TechnologyId,
        resource: &str,
        query: &Q,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.technology_url(id, resource)?;
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }
}

fn or_empty<T>(what: &str, id: &TechnologyId, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(%id, "Failed to fetch {}, showing none: {}", what, e);
            Vec::new()
        }
    }
}
