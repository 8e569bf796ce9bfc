//! Analysis result endpoints (protected). The create payload is
//! camelCase — it is the wire format the analysis service posts.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{lock_db, RecordsApiContext};
use crate::db::repository::analysis_result;
use crate::db::repository::medical_record::medical_record_exists;
use crate::models::{AnalysisResult, AnalysisType};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnalysisResult {
    pub medical_record_id: i64,
    pub analysis_type: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub confidence: String,
}

/// `POST /api/analysisresults` — store one typed result for a record.
pub async fn create(
    State(ctx): State<RecordsApiContext>,
    Json(body): Json<CreateAnalysisResult>,
) -> Result<(StatusCode, Json<AnalysisResult>), ApiError> {
    AnalysisType::from_str(&body.analysis_type)?;

    let conn = lock_db(&ctx.db)?;
    if !medical_record_exists(&conn, body.medical_record_id)? {
        return Err(ApiError::NotFound(format!(
            "MedicalRecord {} not found",
            body.medical_record_id
        )));
    }

    let entry = analysis_result::NewAnalysisResult {
        medical_record_id: body.medical_record_id,
        analysis_type: body.analysis_type,
        result: body.result,
        confidence: body.confidence,
    };
    let id = analysis_result::insert_analysis_result(&conn, &entry)?;
    let created = analysis_result::fetch_analysis_result(&conn, id)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/analysisresults/:id` — one stored result.
pub async fn get(
    State(ctx): State<RecordsApiContext>,
    Path(id): Path<i64>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    Ok(Json(analysis_result::fetch_analysis_result(&conn, id)?))
}
