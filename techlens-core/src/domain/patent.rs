//! Related patent domain types

use serde::{Deserialize, Serialize};

/// A patent the backend retrieved as related to the technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPatent {
    pub id: i64,
    pub technology_id: i64,
    pub name: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub document_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub cluster: i64,
    pub url: String,
    pub publication_date: String,
    pub inventors: String,
    pub assignees: String,
    /// Column of this document in the comparison matrix
    pub col: i64,
}
