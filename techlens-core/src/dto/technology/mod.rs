//! Technology DTOs

use serde::{Deserialize, Serialize};

/// Request to register a technology and start its analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTechnology {
    pub name: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub num_of_axes: u32,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: String,
}

impl ApiErrorBody {
    /// Extracts `detail` from a raw response body, if it is an error document
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
