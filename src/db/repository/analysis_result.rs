//! Analysis result repository. Results are append-only rows attached to a
//! medical record; they cascade away with the record.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use crate::db::DatabaseError;
use crate::models::AnalysisResult;

/// Input for storing one analysis result.
#[derive(Debug, Clone)]
pub struct NewAnalysisResult {
    pub medical_record_id: i64,
    pub analysis_type: String,
    pub result: String,
    pub confidence: String,
}

fn row_to_result(row: &Row) -> rusqlite::Result<AnalysisResult> {
    Ok(AnalysisResult {
        id: row.get(0)?,
        medical_record_id: row.get(1)?,
        analysis_type: row.get(2)?,
        result: row.get(3)?,
        confidence: row.get(4)?,
        created_at: row.get(5)?,
    })
}

const RESULT_COLUMNS: &str =
    "id, medical_record_id, analysis_type, result, confidence, created_at";

/// Inserts a new analysis result. Returns the generated row id.
pub fn insert_analysis_result(
    conn: &Connection,
    entry: &NewAnalysisResult,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO analysis_results (medical_record_id, analysis_type, result,
         confidence, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.medical_record_id,
            entry.analysis_type,
            entry.result,
            entry.confidence,
            Utc::now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetches one analysis result by id.
pub fn fetch_analysis_result(conn: &Connection, id: i64) -> Result<AnalysisResult, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESULT_COLUMNS} FROM analysis_results WHERE id = ?1"
    ))?;
    stmt.query_row(params![id], |row| row_to_result(row))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "AnalysisResult".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Fetches all results for a medical record, in insertion order.
pub fn fetch_results_for_record(
    conn: &Connection,
    medical_record_id: i64,
) -> Result<Vec<AnalysisResult>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESULT_COLUMNS} FROM analysis_results
         WHERE medical_record_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![medical_record_id], |row| row_to_result(row))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
