//! Patient CRUD and search endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lock_db, RecordsApiContext};
use crate::db::repository::medical_record::fetch_records_for_patient;
use crate::db::repository::patient;
use crate::models::{Patient, PatientDetail};

#[derive(Deserialize)]
pub struct PatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub medical_record_number: String,
    #[serde(default)]
    pub contact_info: String,
}

impl From<PatientPayload> for patient::NewPatient {
    fn from(p: PatientPayload) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            date_of_birth: p.date_of_birth,
            gender: p.gender,
            medical_record_number: p.medical_record_number,
            contact_info: p.contact_info,
        }
    }
}

/// `GET /api/patients` — all patients.
pub async fn list(State(ctx): State<RecordsApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    Ok(Json(patient::fetch_patients(&conn)?))
}

/// `POST /api/patients` — create a patient.
pub async fn create(
    State(ctx): State<RecordsApiContext>,
    Json(body): Json<PatientPayload>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let conn = lock_db(&ctx.db)?;
    let id = patient::insert_patient(&conn, &body.into())?;
    let created = patient::fetch_patient(&conn, id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/patients/:id` — one patient with their medical records.
pub async fn get(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetail>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    let found = patient::fetch_patient(&conn, id)?;
    let medical_records = fetch_records_for_patient(&conn, id)?;
    Ok(Json(PatientDetail {
        patient: found,
        medical_records,
    }))
}

/// `PUT /api/patients/:id` — replace a patient's fields.
pub async fn update(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
    Json(body): Json<PatientPayload>,
) -> Result<Json<Patient>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    patient::update_patient(&conn, id, &body.into())?;
    Ok(Json(patient::fetch_patient(&conn, id)?))
}

/// `DELETE /api/patients/:id` — delete a patient; records cascade.
pub async fn delete(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = lock_db(&ctx.db)?;
    patient::delete_patient(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: String,
}

/// `GET /api/patients/search?term=` — substring search.
pub async fn search(
    State(ctx): State<RecordsApiContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let term = query.term.trim();
    if term.is_empty() {
        return Err(ApiError::BadRequest("search term is required".into()));
    }
    let conn = lock_db(&ctx.db)?;
    Ok(Json(patient::search_patients(&conn, term)?))
}
