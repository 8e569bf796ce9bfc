//! Doctor profile endpoints. Accounts and credentials are managed by
//! the auth service; these handlers only touch profile fields.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lock_db, RecordsApiContext};
use crate::db::repository::doctor;
use crate::db::repository::medical_record::fetch_records_for_doctor;
use crate::models::{Doctor, DoctorDetail};

#[derive(Deserialize)]
pub struct DoctorPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub specialization: String,
    pub license_number: String,
    #[serde(default)]
    pub hospital: String,
}

impl From<DoctorPayload> for doctor::NewDoctor {
    fn from(d: DoctorPayload) -> Self {
        Self {
            first_name: d.first_name,
            last_name: d.last_name,
            email: d.email,
            password_hash: String::new(),
            specialization: d.specialization,
            license_number: d.license_number,
            hospital: d.hospital,
        }
    }
}

/// `GET /api/doctors` — all doctors.
pub async fn list(State(ctx): State<RecordsApiContext>) -> Result<Json<Vec<Doctor>>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    Ok(Json(doctor::fetch_doctors(&conn)?))
}

/// `POST /api/doctors` — create a doctor profile (no credentials).
pub async fn create(
    State(ctx): State<RecordsApiContext>,
    Json(body): Json<DoctorPayload>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let conn = lock_db(&ctx.db)?;
    let id = doctor::insert_doctor(&conn, &body.into())?;
    let created = doctor::fetch_doctor(&conn, id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/doctors/:id` — one doctor with the records they authored.
pub async fn get(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<DoctorDetail>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    let found = doctor::fetch_doctor(&conn, id)?;
    let medical_records = fetch_records_for_doctor(&conn, id)?;
    Ok(Json(DoctorDetail {
        doctor: found,
        medical_records,
    }))
}

/// `PUT /api/doctors/:id` — replace profile fields.
pub async fn update(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
    Json(body): Json<DoctorPayload>,
) -> Result<Json<Doctor>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    doctor::update_doctor(&conn, id, &body.into())?;
    Ok(Json(doctor::fetch_doctor(&conn, id)?))
}

/// `DELETE /api/doctors/:id` — refused while medical records reference
/// the doctor (FK restrict → 409).
pub async fn delete(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let conn = lock_db(&ctx.db)?;
    doctor::delete_doctor(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
