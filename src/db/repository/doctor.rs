//! Doctor repository — CRUD plus the credential lookups used by the
//! authentication service (email, refresh token).

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::Doctor;

/// Input for creating or replacing a doctor.
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital: String,
}

fn row_to_doctor(row: &Row) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        specialization: row.get(5)?,
        license_number: row.get(6)?,
        hospital: row.get(7)?,
        refresh_token: row.get(8)?,
        refresh_token_expiry: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const DOCTOR_COLUMNS: &str = "id, first_name, last_name, email, password_hash,
     specialization, license_number, hospital, refresh_token, refresh_token_expiry,
     created_at, updated_at";

/// Inserts a new doctor. Returns the generated row id.
pub fn insert_doctor(conn: &Connection, entry: &NewDoctor) -> Result<i64, DatabaseError> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO doctors (first_name, last_name, email, password_hash,
         specialization, license_number, hospital, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.first_name,
            entry.last_name,
            entry.email,
            entry.password_hash,
            entry.specialization,
            entry.license_number,
            entry.hospital,
            now,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches all doctors, oldest first.
pub fn fetch_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id"))?;
    let rows = stmt.query_map([], |row| row_to_doctor(row))?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(row?);
    }
    Ok(doctors)
}

/// Fetches one doctor by id.
pub fn fetch_doctor(conn: &Connection, id: i64) -> Result<Doctor, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"))?;
    stmt.query_row(params![id], |row| row_to_doctor(row))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Doctor".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Looks a doctor up by email. Returns None when no account matches.
pub fn find_doctor_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE email = ?1"
    ))?;
    match stmt.query_row(params![email], |row| row_to_doctor(row)) {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Looks a doctor up by an unexpired refresh token.
pub fn find_doctor_by_refresh_token(
    conn: &Connection,
    refresh_token: &str,
) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors
         WHERE refresh_token = ?1 AND refresh_token_expiry > ?2"
    ))?;
    match stmt.query_row(params![refresh_token, Utc::now()], |row| row_to_doctor(row)) {
        Ok(doctor) => Ok(Some(doctor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Stores a new refresh token and its expiry for a doctor.
pub fn set_refresh_token(
    conn: &Connection,
    doctor_id: i64,
    refresh_token: &str,
    expiry: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors SET refresh_token = ?1, refresh_token_expiry = ?2, updated_at = ?3
         WHERE id = ?4",
        params![refresh_token, expiry, Utc::now(), doctor_id],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: doctor_id.to_string(),
        });
    }
    Ok(())
}

/// Clears a stored refresh token (logout). Returns false when no doctor
/// holds this token.
pub fn clear_refresh_token(conn: &Connection, refresh_token: &str) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors SET refresh_token = NULL, refresh_token_expiry = NULL, updated_at = ?1
         WHERE refresh_token = ?2",
        params![Utc::now(), refresh_token],
    )?;
    Ok(updated > 0)
}

/// Updates the profile fields of a doctor. Credentials are untouched.
pub fn update_doctor(conn: &Connection, id: i64, entry: &NewDoctor) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE doctors SET first_name = ?1, last_name = ?2, email = ?3,
         specialization = ?4, license_number = ?5, hospital = ?6, updated_at = ?7
         WHERE id = ?8",
        params![
            entry.first_name,
            entry.last_name,
            entry.email,
            entry.specialization,
            entry.license_number,
            entry.hospital,
            Utc::now(),
            id,
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Hard-deletes a doctor. Refused by the FK when medical records reference them.
pub fn delete_doctor(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let deleted = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// True when a doctor row with this id exists.
pub fn doctor_exists(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM doctors WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
