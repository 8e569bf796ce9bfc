//! Medical record repository. Records hang off a patient (cascade on
//! delete) and a doctor (delete restricted).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::MedicalRecord;

/// Input for creating or replacing a medical record.
#[derive(Debug, Clone)]
pub struct NewMedicalRecord {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub visit_date: DateTime<Utc>,
    pub chief_complaint: String,
    pub history_of_present_illness: String,
    pub physical_examination: String,
    pub assessment: String,
    pub plan: String,
    pub notes: String,
}

fn row_to_record(row: &Row) -> rusqlite::Result<MedicalRecord> {
    Ok(MedicalRecord {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        visit_date: row.get(3)?,
        chief_complaint: row.get(4)?,
        history_of_present_illness: row.get(5)?,
        physical_examination: row.get(6)?,
        assessment: row.get(7)?,
        plan: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const RECORD_COLUMNS: &str = "id, patient_id, doctor_id, visit_date, chief_complaint,
     history_of_present_illness, physical_examination, assessment, plan, notes,
     created_at, updated_at";

/// Inserts a new medical record. Returns the generated row id.
pub fn insert_medical_record(
    conn: &Connection,
    entry: &NewMedicalRecord,
) -> Result<i64, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO medical_records (patient_id, doctor_id, visit_date, chief_complaint,
         history_of_present_illness, physical_examination, assessment, plan, notes,
         created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            entry.patient_id,
            entry.doctor_id,
            entry.visit_date,
            entry.chief_complaint,
            entry.history_of_present_illness,
            entry.physical_examination,
            entry.assessment,
            entry.plan,
            entry.notes,
            now,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches all medical records, oldest first.
pub fn fetch_medical_records(conn: &Connection) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM medical_records ORDER BY id"
    ))?;
    let rows = stmt.query_map([], |row| row_to_record(row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Fetches one medical record by id.
pub fn fetch_medical_record(conn: &Connection, id: i64) -> Result<MedicalRecord, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM medical_records WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], |row| row_to_record(row))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "MedicalRecord".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Fetches every record for one patient, most recent visit first.
pub fn fetch_records_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM medical_records
         WHERE patient_id = ?1 ORDER BY visit_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![patient_id], |row| row_to_record(row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Fetches every record authored by one doctor, most recent visit first.
pub fn fetch_records_for_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<MedicalRecord>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM medical_records
         WHERE doctor_id = ?1 ORDER BY visit_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![doctor_id], |row| row_to_record(row))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Updates a medical record in place. `updated_at` is bumped.
pub fn update_medical_record(
    conn: &Connection,
    id: i64,
    entry: &NewMedicalRecord,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE medical_records SET patient_id = ?1, doctor_id = ?2, visit_date = ?3,
         chief_complaint = ?4, history_of_present_illness = ?5, physical_examination = ?6,
         assessment = ?7, plan = ?8, notes = ?9, updated_at = ?10
         WHERE id = ?11",
        params![
            entry.patient_id,
            entry.doctor_id,
            entry.visit_date,
            entry.chief_complaint,
            entry.history_of_present_illness,
            entry.physical_examination,
            entry.assessment,
            entry.plan,
            entry.notes,
            Utc::now(),
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "MedicalRecord".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Hard-deletes a medical record. Analysis results cascade.
pub fn delete_medical_record(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM medical_records WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "MedicalRecord".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// True when a medical record row with this id exists.
pub fn medical_record_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM medical_records WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
