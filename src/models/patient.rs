use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::medical_record::MedicalRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub medical_record_number: String,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Patient with their medical records joined in — returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    #[serde(flatten)]
    pub patient: Patient,
    pub medical_records: Vec<MedicalRecord>,
}
