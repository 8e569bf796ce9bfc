use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One patient encounter, owned by exactly one patient and one doctor.
/// The free-text sections feed the analysis service verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: DateTime<Utc>,
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub physical_examination: String,
    pub assessment: String,
    pub plan: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
