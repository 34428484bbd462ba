//! PCA and cluster visualization payload
//!
//! The backend projects the technology and its related work onto the first
//! two principal components of the comparison-axis scores and groups the
//! projected points into clusters. The client only reads the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point in the plane of the first two principal components
pub type PcaCoords = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaVisualization {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub interactive: InteractiveSettings,
    pub pca_view: PcaView,
    #[serde(default)]
    pub cluster_view: ClusterView,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractiveSettings {
    #[serde(default)]
    pub show_labels: bool,
    #[serde(default)]
    pub show_annotations: bool,
    #[serde(default)]
    pub selected_axes: Vec<serde_json::Value>,
    #[serde(default)]
    pub click_details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaView {
    /// Projected coordinates keyed by technology name
    pub points: BTreeMap<String, PcaCoords>,
    #[serde(default)]
    pub loadings: Vec<PcaLoading>,
    /// Variance ratio explained by PC1 and PC2
    pub variance_explained: [f64; 2],
}

/// Contribution of one comparison axis to the two components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaLoading {
    pub axis: String,
    pub pc1_loading: f64,
    pub pc2_loading: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: i64,
    pub name: String,
    pub center: PcaCoords,
    pub spread: f64,
    #[serde(default)]
    pub contains_target: bool,
    #[serde(default)]
    pub members: Vec<ClusterMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterMember {
    pub name: String,
    pub distance: f64,
    pub coords: PcaCoords,
}

impl PcaVisualization {
    /// Combined variance ratio of the two plotted components
    pub fn total_variance_explained(&self) -> f64 {
        self.pca_view.variance_explained.iter().sum()
    }

    /// The cluster the analysed technology falls into, if any
    pub fn target_cluster(&self) -> Option<&Cluster> {
        self.cluster_view.clusters.iter().find(|c| c.contains_target)
    }

    /// Loading with the largest magnitude on either component
    pub fn dominant_loading(&self) -> Option<&PcaLoading> {
        self.pca_view.loadings.iter().max_by(|a, b| {
            let ma = a.pc1_loading.abs().max(a.pc2_loading.abs());
            let mb = b.pc1_loading.abs().max(b.pc2_loading.abs());
            ma.total_cmp(&mb)
        })
    }
}
