//! Authentication endpoints: register, login, refresh, logout, validate.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{lock_db, AuthApiContext, DoctorContext};
use crate::auth::{LoginOutcome, RegisterDoctor};
use crate::models::Doctor;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub specialization: String,
    pub license_number: String,
    #[serde(default)]
    pub hospital: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub doctor: Doctor,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.access_token,
            refresh_token: outcome.refresh_token,
            expires_at: outcome.expires_at,
            doctor: outcome.doctor,
        }
    }
}

/// `POST /api/auth/register` — create a doctor account and log it in.
pub async fn register(
    State(ctx): State<AuthApiContext>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    if body.email.trim().is_empty() || body.password.trim().is_empty() {
        return Err(ApiError::BadRequest("email and password are required".into()));
    }

    let input = RegisterDoctor {
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        password: body.password,
        specialization: body.specialization,
        license_number: body.license_number,
        hospital: body.hospital,
    };

    let conn = lock_db(&ctx.db)?;
    let outcome = ctx.auth.register(&conn, input)?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// `POST /api/auth/login` — verify credentials, issue a token pair.
pub async fn login(
    State(ctx): State<AuthApiContext>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    let outcome = ctx.auth.login(&conn, &body.email, &body.password)?;
    Ok(Json(outcome.into()))
}

/// `POST /api/auth/refresh` — rotate an unexpired refresh token.
pub async fn refresh(
    State(ctx): State<AuthApiContext>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = lock_db(&ctx.db)?;
    let outcome = ctx.auth.refresh(&conn, &body.refresh_token)?;
    Ok(Json(outcome.into()))
}

/// `POST /api/auth/logout` — revoke a refresh token.
pub async fn logout(
    State(ctx): State<AuthApiContext>,
    Json(body): Json<RefreshRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = lock_db(&ctx.db)?;
    if !ctx.auth.logout(&conn, &body.refresh_token)? {
        return Err(ApiError::BadRequest("unknown refresh token".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub doctor_id: i64,
    pub email: String,
    pub name: String,
}

/// `GET /api/auth/validate` — echo the authenticated claims.
pub async fn validate(
    Extension(doctor): Extension<DoctorContext>,
) -> Json<ValidateResponse> {
    Json(ValidateResponse {
        doctor_id: doctor.doctor_id,
        email: doctor.email,
        name: doctor.name,
    })
}
