//! Related paper domain types

use serde::{Deserialize, Serialize};

/// A research paper the backend retrieved as related to the technology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedPaper {
    pub id: i64,
    pub technology_id: i64,
    pub paper_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub authors: String,
    pub publication_date: String,
    pub journal: String,
    pub url: String,
    #[serde(default)]
    pub citation_count: u64,
    pub col: i64,
}
