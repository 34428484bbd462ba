//! Comparison axis domain types

use serde::{Deserialize, Serialize};

/// A dimension along which the technology is compared to related work
///
/// `extreme1` and `extreme2` name the two ends of the axis; `weight` is the
/// relative importance the backend assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAxis {
    pub id: i64,
    pub technology_id: i64,
    pub axis_name: String,
    pub extreme1: String,
    pub extreme2: String,
    pub weight: f64,
}
