//! Shared state types for the HTTP routers.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::analysis::{AnalysisEngine, TextAnalyticsClient};
use crate::auth::{AuthService, TokenSigner};

use super::error::ApiError;

/// Single SQLite connection shared across handlers. Handlers hold the
/// lock only for synchronous work and never across an await.
pub type Db = Arc<Mutex<Connection>>;

/// Lock the shared connection, mapping poisoning to a 500.
pub fn lock_db(db: &Db) -> Result<MutexGuard<'_, Connection>, ApiError> {
    db.lock().map_err(|_| ApiError::Internal("db lock poisoned".into()))
}

/// State for the authentication router.
#[derive(Clone)]
pub struct AuthApiContext {
    pub db: Db,
    pub auth: AuthService,
}

/// State for the patient-records router.
#[derive(Clone)]
pub struct RecordsApiContext {
    pub db: Db,
}

/// State for the analysis router. Persistence goes out over HTTP to the
/// records service.
#[derive(Clone)]
pub struct AnalysisApiContext {
    pub engine: Arc<AnalysisEngine<TextAnalyticsClient>>,
    pub http: reqwest::Client,
    pub records_base_url: String,
}

/// Authenticated doctor, injected into request extensions by the auth
/// middleware. Carries the raw bearer token so outbound calls to sibling
/// services can forward it.
#[derive(Debug, Clone)]
pub struct DoctorContext {
    pub doctor_id: i64,
    pub email: String,
    pub name: String,
    pub token: String,
}

/// The token verifier, injected as an Extension layer so the middleware
/// can reach it regardless of the router's state type.
#[derive(Clone)]
pub struct TokenVerifier(pub TokenSigner);
