//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, verifies it against the
//! `TokenVerifier` extension, and injects `DoctorContext` into request
//! extensions for downstream handlers.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{DoctorContext, TokenVerifier};
use crate::auth::AuthError;

/// Require a valid bearer token from an authenticated doctor.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let verifier = req
        .extensions()
        .get::<TokenVerifier>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("missing token verifier".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let claims = verifier.0.verify(&token).map_err(|e| match e {
        AuthError::TokenExpired => ApiError::TokenExpired,
        _ => ApiError::Unauthorized,
    })?;

    let doctor_id = claims.doctor_id().map_err(|_| ApiError::Unauthorized)?;
    req.extensions_mut().insert(DoctorContext {
        doctor_id,
        email: claims.email,
        name: claims.name,
        token,
    });

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("Cache-Control", HeaderValue::from_static("no-store"));
    Ok(response)
}
