//! Medical record endpoints (protected).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lock_db, RecordsApiContext};
use crate::db::repository::doctor::doctor_exists;
use crate::db::repository::medical_record;
use crate::db::repository::patient::patient_exists;
use crate::models::MedicalRecord;

#[derive(Deserialize)]
pub struct RecordPayload {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: DateTime<Utc>,
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub history_of_present_illness: String,
    #[serde(default)]
    pub physical_examination: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub plan: String,
    #[serde(default)]
    pub notes: String,
}

impl From<RecordPayload> for medical_record::NewMedicalRecord {
    fn from(r: RecordPayload) -> Self {
        Self {
            patient_id: r.patient_id,
            doctor_id: r.doctor_id,
            visit_date: r.visit_date,
            chief_complaint: r.chief_complaint,
            history_of_present_illness: r.history_of_present_illness,
            physical_examination: r.physical_examination,
            assessment: r.assessment,
            plan: r.plan,
            notes: r.notes,
        }
    }
}

/// `GET /api/medicalrecords` — all records.
pub async fn list(
    State(ctx): State<RecordsApiContext>,
) -> Result<Json<Vec<MedicalRecord>>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    Ok(Json(medical_record::fetch_medical_records(&conn)?))
}

/// `POST /api/medicalrecords` — create a record. The referenced patient
/// and doctor must exist.
pub async fn create(
    State(ctx): State<RecordsApiContext>,
    Json(body): Json<RecordPayload>,
) -> Result<(StatusCode, Json<MedicalRecord>), ApiError> {
    let conn = lock_db(&ctx.db)?;
    if !patient_exists(&conn, body.patient_id)? {
        return Err(ApiError::NotFound(format!(
            "Patient {} not found",
            body.patient_id
        )));
    }
    if !doctor_exists(&conn, body.doctor_id)? {
        return Err(ApiError::NotFound(format!(
            "Doctor {} not found",
            body.doctor_id
        )));
    }

    let id = medical_record::insert_medical_record(&conn, &body.into())?;
    let created = medical_record::fetch_medical_record(&conn, id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/medicalrecords/:id` — one record.
pub async fn get(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecord>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    Ok(Json(medical_record::fetch_medical_record(&conn, id)?))
}

/// `PUT /api/medicalrecords/:id` — replace a record's fields.
pub async fn update(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
    Json(body): Json<RecordPayload>,
) -> Result<Json<MedicalRecord>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    medical_record::update_medical_record(&conn, id, &body.into())?;
    Ok(Json(medical_record::fetch_medical_record(&conn, id)?))
}

/// `DELETE /api/medicalrecords/:id` — delete; analysis results cascade.
pub async fn delete(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = lock_db(&ctx.db)?;
    medical_record::delete_medical_record(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
