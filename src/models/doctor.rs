use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::medical_record::MedicalRecord;

/// Doctor account. Credential fields never serialize to JSON — the
/// authentication service reads them straight from the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital: String,
    #[serde(skip_serializing, default)]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing, default)]
    pub refresh_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Doctor with their medical records joined in — returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorDetail {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub medical_records: Vec<MedicalRecord>,
}
