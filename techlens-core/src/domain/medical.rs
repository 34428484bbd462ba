//! Medical billing assessment domain types

use serde::{Deserialize, Serialize};

/// A billable item identified by its HCPCS code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillableItem {
    pub id: i64,
    pub description: String,
    pub hcpcs_code: String,
    pub fee: f64,
}

/// Medical reimbursement assessment for a technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalAssessment {
    #[serde(default)]
    pub medical_association: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub billable_items: Vec<BillableItem>,
    #[serde(default, alias = "totalFee")]
    pub total_fee: f64,
}

impl MedicalAssessment {
    /// Sum of the individual item fees
    ///
    /// May differ from `total_fee` when the backend applies adjustments.
    pub fn computed_total(&self) -> f64 {
        self.billable_items.iter().map(|item| item.fee).sum()
    }
}
