use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Which analysis operation produced a stored result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    Summary,
    MissingDetails,
    Suggestions,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::MissingDetails => "MissingDetails",
            Self::Suggestions => "Suggestions",
        }
    }
}

impl std::str::FromStr for AnalysisType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Summary" => Ok(Self::Summary),
            "MissingDetails" => Ok(Self::MissingDetails),
            "Suggestions" => Ok(Self::Suggestions),
            _ => Err(DatabaseError::InvalidEnum {
                field: "AnalysisType".into(),
                value: s.into(),
            }),
        }
    }
}

/// Persisted output of one analysis operation, tagged by type.
/// `confidence` is an opaque, unvalidated string ("N/A" for rule-based output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: i64,
    pub medical_record_id: i64,
    pub analysis_type: String,
    pub result: String,
    pub confidence: String,
    pub created_at: DateTime<Utc>,
}
