//! Note-analysis endpoints (all protected).
//!
//! `run-and-save` persists its three outputs by posting to the records
//! service with the caller's bearer token. Any persistence failure
//! fails the whole request; there is no partial-success reporting.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{AnalysisApiContext, DoctorContext};
use crate::models::AnalysisType;

#[derive(Deserialize)]
pub struct NotesRequest {
    pub patient_notes: String,
}

fn require_notes(patient_notes: &str) -> Result<(), ApiError> {
    if patient_notes.trim().is_empty() {
        return Err(ApiError::BadRequest("patient_notes must not be blank".into()));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// `POST /api/analysis/summarize`
pub async fn summarize(
    State(ctx): State<AnalysisApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Json(body): Json<NotesRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    require_notes(&body.patient_notes)?;
    let summary = ctx.engine.summarize(&body.patient_notes).await;
    Ok(Json(SummaryResponse { summary }))
}

#[derive(Serialize)]
pub struct MissingResponse {
    pub missing: Vec<String>,
}

/// `POST /api/analysis/detect-missing`
pub async fn detect_missing(
    State(ctx): State<AnalysisApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Json(body): Json<NotesRequest>,
) -> Result<Json<MissingResponse>, ApiError> {
    require_notes(&body.patient_notes)?;
    let missing = ctx.engine.detect_missing(&body.patient_notes);
    Ok(Json(MissingResponse { missing }))
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub patient_notes: String,
    #[serde(default)]
    pub assessment: String,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub suggestions: Vec<String>,
}

/// `POST /api/analysis/recommend`
pub async fn recommend(
    State(ctx): State<AnalysisApiContext>,
    Extension(_doctor): Extension<DoctorContext>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    require_notes(&body.patient_notes)?;
    let suggestions = ctx
        .engine
        .suggest(&body.patient_notes, &body.assessment)
        .await;
    Ok(Json(RecommendResponse { suggestions }))
}

#[derive(Deserialize)]
pub struct RunAndSaveRequest {
    pub medical_record_id: i64,
    pub patient_notes: String,
    #[serde(default)]
    pub assessment: String,
}

#[derive(Serialize)]
pub struct RunAndSaveResponse {
    pub saved: Vec<i64>,
    pub summary: String,
    pub missing: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Wire format for the records service's create endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistResult<'a> {
    medical_record_id: i64,
    analysis_type: &'a str,
    result: &'a str,
    confidence: &'a str,
}

#[derive(Deserialize)]
struct SavedResult {
    id: i64,
}

async fn persist_result(
    ctx: &AnalysisApiContext,
    token: &str,
    medical_record_id: i64,
    analysis_type: AnalysisType,
    result: &str,
) -> Result<i64, ApiError> {
    let url = format!("{}/api/analysisresults", ctx.records_base_url);
    let body = PersistResult {
        medical_record_id,
        analysis_type: analysis_type.as_str(),
        result,
        confidence: "N/A",
    };

    let response = ctx
        .http
        .post(&url)
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("records service unreachable: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Upstream(format!(
            "records service returned {status} for {} result",
            analysis_type.as_str()
        )));
    }

    let saved: SavedResult = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("records service response unreadable: {e}")))?;
    Ok(saved.id)
}

/// `POST /api/analysis/run-and-save` — run all three analyses and
/// persist each as a typed result on the medical record.
pub async fn run_and_save(
    State(ctx): State<AnalysisApiContext>,
    Extension(doctor): Extension<DoctorContext>,
    Json(body): Json<RunAndSaveRequest>,
) -> Result<Json<RunAndSaveResponse>, ApiError> {
    if body.medical_record_id <= 0 {
        return Err(ApiError::BadRequest("medical_record_id must be positive".into()));
    }
    require_notes(&body.patient_notes)?;

    let summary = ctx.engine.summarize(&body.patient_notes).await;
    let missing = ctx.engine.detect_missing(&body.patient_notes);
    let suggestions = ctx
        .engine
        .suggest(&body.patient_notes, &body.assessment)
        .await;

    let missing_joined = missing.join(", ");
    let suggestions_joined = suggestions.join("; ");

    let mut saved = Vec::with_capacity(3);
    for (analysis_type, result) in [
        (AnalysisType::Summary, summary.as_str()),
        (AnalysisType::MissingDetails, missing_joined.as_str()),
        (AnalysisType::Suggestions, suggestions_joined.as_str()),
    ] {
        let id = persist_result(
            &ctx,
            &doctor.token,
            body.medical_record_id,
            analysis_type,
            result,
        )
        .await?;
        saved.push(id);
    }

    tracing::info!(
        medical_record_id = body.medical_record_id,
        results = saved.len(),
        "analysis results persisted"
    );

    Ok(Json(RunAndSaveResponse {
        saved,
        summary,
        missing,
        suggestions,
    }))
}
