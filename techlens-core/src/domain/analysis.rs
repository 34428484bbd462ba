//! Analysis status domain types
//!
//! The backend computes each analysis stage independently and reports their
//! progress through a single status document. The client reads it, never
//! writes it: each fetch produces a fresh [`AnalysisStatus`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::technology::{TechnologyId, parse_timestamp};

/// Status of a single analysis component
///
/// The wire value is an open string. Known values map to the first four
/// variants; anything else is kept as [`ComponentStatus::Unknown`] and is
/// treated as not yet terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentStatus {
    Pending,
    Processing,
    Complete,
    Error,
    Unknown(String),
}

impl ComponentStatus {
    /// Whether no further change is expected for this component
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ComponentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "complete" => Self::Complete,
            "error" => Self::Error,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<ComponentStatus> for String {
    fn from(status: ComponentStatus) -> Self {
        match status {
            ComponentStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one analysis component as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentState {
    pub status: ComponentStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ComponentState {
    pub fn new(status: ComponentStatus) -> Self {
        Self {
            status,
            started_at: None,
            completed_at: None,
            error_message: None,
        }
    }

    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.started_at.as_deref().and_then(parse_timestamp)
    }

    pub fn completed(&self) -> Option<DateTime<Utc>> {
        self.completed_at.as_deref().and_then(parse_timestamp)
    }

    /// Wall-clock time the backend spent on this component, once finished
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        Some(self.completed()?.signed_duration_since(self.started()?))
    }
}

/// The analysis stages the backend is known to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisComponent {
    ComparisonAxes,
    RelatedPatents,
    RelatedPapers,
    MarketAnalysis,
    PcaVisualization,
    MedicalAssessment,
    ClusterAnalysis,
}

impl AnalysisComponent {
    pub const ALL: [AnalysisComponent; 7] = [
        Self::ComparisonAxes,
        Self::RelatedPatents,
        Self::RelatedPapers,
        Self::MarketAnalysis,
        Self::PcaVisualization,
        Self::MedicalAssessment,
        Self::ClusterAnalysis,
    ];

    /// Key used in the status document's `components` map
    pub fn key(self) -> &'static str {
        match self {
            Self::ComparisonAxes => "comparisonAxes",
            Self::RelatedPatents => "relatedPatents",
            Self::RelatedPapers => "relatedPapers",
            Self::MarketAnalysis => "marketAnalysis",
            Self::PcaVisualization => "pcaVisualization",
            Self::MedicalAssessment => "medicalAssessment",
            Self::ClusterAnalysis => "clusterAnalysis",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::ComparisonAxes => "Comparison Axes",
            Self::RelatedPatents => "Patent Analysis",
            Self::RelatedPapers => "Research Papers",
            Self::MarketAnalysis => "Market Analysis",
            Self::PcaVisualization => "PCA Visualization",
            Self::MedicalAssessment => "Medical Assessment",
            Self::ClusterAnalysis => "Cluster Analysis",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Backend hint for the delay before the next status check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollingRecommendation {
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

impl PollingRecommendation {
    /// Recommended interval, `default` when absent, clamped into `[min, max]`
    pub fn clamped(&self, min: Duration, max: Duration, default: Duration) -> Duration {
        self.interval_ms
            .map(Duration::from_millis)
            .unwrap_or(default)
            .clamp(min, max)
    }
}

/// Snapshot of the backend's analysis progress for one technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStatus {
    pub technology_id: TechnologyId,
    pub components: BTreeMap<String, ComponentState>,
    #[serde(default)]
    pub overall: String,
    #[serde(default)]
    pub polling_recommendation: PollingRecommendation,
}

impl AnalysisStatus {
    /// True once every component is `complete` or `error`
    pub fn is_terminal(&self) -> bool {
        self.components.values().all(|c| c.status.is_terminal())
    }

    pub fn component(&self, component: AnalysisComponent) -> Option<&ComponentState> {
        self.components.get(component.key())
    }

    /// Whether a known stage has finished successfully
    pub fn is_complete(&self, component: AnalysisComponent) -> bool {
        self.component(component)
            .is_some_and(|c| c.status == ComponentStatus::Complete)
    }

    /// Error message reported for the component stored under `key`
    pub fn error_message(&self, key: &str) -> Option<&str> {
        self.components.get(key)?.error_message.as_deref()
    }

    pub fn progress(&self) -> AnalysisProgress {
        let mut progress = AnalysisProgress {
            total: self.components.len(),
            ..Default::default()
        };
        for state in self.components.values() {
            match state.status {
                ComponentStatus::Complete => progress.complete += 1,
                ComponentStatus::Error => progress.failed += 1,
                _ => progress.in_flight += 1,
            }
        }
        progress
    }
}

/// Completion counts across all components of a status snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisProgress {
    pub complete: usize,
    pub failed: usize,
    pub in_flight: usize,
    pub total: usize,
}

impl AnalysisProgress {
    /// Share of components that completed successfully, 0 to 100
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.complete as f64 / self.total as f64 * 100.0
    }
}
