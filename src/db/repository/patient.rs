//! Patient repository — CRUD and search against the patients table.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::Patient;

/// Input for creating or replacing a patient.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub medical_record_number: String,
    pub contact_info: String,
}

fn row_to_patient(row: &Row) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        date_of_birth: row.get(3)?,
        gender: row.get(4)?,
        medical_record_number: row.get(5)?,
        contact_info: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const PATIENT_COLUMNS: &str = "id, first_name, last_name, date_of_birth, gender,
     medical_record_number, contact_info, created_at, updated_at";

/// Inserts a new patient. Returns the generated row id.
pub fn insert_patient(conn: &Connection, entry: &NewPatient) -> Result<i64, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO patients (first_name, last_name, date_of_birth, gender,
         medical_record_number, contact_info, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            entry.first_name,
            entry.last_name,
            entry.date_of_birth,
            entry.gender,
            entry.medical_record_number,
            entry.contact_info,
            now,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches all patients, oldest first.
pub fn fetch_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"
    ))?;
    let rows = stmt.query_map([], |row| row_to_patient(row))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

/// Fetches one patient by id.
pub fn fetch_patient(conn: &Connection, id: i64) -> Result<Patient, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], |row| row_to_patient(row))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Patient".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Updates a patient in place. `updated_at` is bumped, `created_at` is kept.
pub fn update_patient(
    conn: &Connection,
    id: i64,
    entry: &NewPatient,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE patients SET first_name = ?1, last_name = ?2, date_of_birth = ?3,
         gender = ?4, medical_record_number = ?5, contact_info = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            entry.first_name,
            entry.last_name,
            entry.date_of_birth,
            entry.gender,
            entry.medical_record_number,
            entry.contact_info,
            Utc::now(),
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Hard-deletes a patient. Medical records cascade.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Substring search over first name, last name, and medical record number.
pub fn search_patients(conn: &Connection, term: &str) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = format!("%{term}%");
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE first_name LIKE ?1 OR last_name LIKE ?1 OR medical_record_number LIKE ?1
         ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![pattern], |row| row_to_patient(row))?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

/// True when a patient row with this id exists.
pub fn patient_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM patients WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
