//! Market analysis domain types

use serde::{Deserialize, Serialize};

/// Score of one related technology on one comparison axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub id: i64,
    pub technology_id: i64,
    pub related_technology_id: i64,
    pub axis_id: i64,
    pub score: f64,
    pub explanation: String,
    pub confidence: f64,
}

/// Mean score per axis over a set of market analysis entries
///
/// Returns `(axis_id, mean_score, entry_count)` sorted by axis id.
pub fn mean_score_by_axis(entries: &[MarketAnalysis]) -> Vec<(i64, f64, usize)> {
    let mut sums: std::collections::BTreeMap<i64, (f64, usize)> = Default::default();
    for entry in entries {
        let slot = sums.entry(entry.axis_id).or_default();
        slot.0 += entry.score;
        slot.1 += 1;
    }
    sums.into_iter()
        .map(|(axis, (sum, count))| (axis, sum / count as f64, count))
        .collect()
}
