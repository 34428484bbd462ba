//! Technology domain types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a technology record
///
/// Owned by the backend and opaque to the client. The API sends it as a
/// string in some payloads and as a number in others, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TechnologyId(String);

impl TechnologyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TechnologyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TechnologyId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TechnologyId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for TechnologyId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for TechnologyId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

impl Serialize for TechnologyId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Technology record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub id: TechnologyId,
    pub name: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub num_of_axes: u32,
    #[serde(default)]
    pub search_keywords: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub market_analysis_summary: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Technology {
    /// Creation time, if the backend sent a parseable timestamp
    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Last update time, if the backend sent a parseable timestamp
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }
}

/// Parses a backend timestamp
///
/// Accepts RFC 3339 and the naive `YYYY-MM-DDTHH:MM:SS[.fff]` form the
/// backend emits for UTC columns.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_id_accepts_number_and_string() {
        let from_num: TechnologyId = serde_json::from_str("42").unwrap();
        let from_str: TechnologyId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"42\"");
    }

    #[test]
    fn test_technology_from_wire() {
        let json = r#"{
            "id": 7,
            "name": "Smart bandage",
            "abstract": "A bandage that reports wound temperature.",
            "num_of_axes": 4,
            "search_keywords": null,
            "problem_statement": "Infections are detected late",
            "created_at": "2024-03-01T10:15:00",
            "updated_at": "2024-03-01T10:20:00Z"
        }"#;
        let tech: Technology = serde_json::from_str(json).unwrap();
        assert_eq!(tech.id.as_str(), "7");
        assert_eq!(tech.num_of_axes, 4);
        assert_eq!(tech.search_keywords, None);
        assert_eq!(tech.market_analysis_summary, None);
        assert_eq!(tech.created().unwrap().minute(), 15);
        assert_eq!(tech.updated().unwrap().minute(), 20);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
