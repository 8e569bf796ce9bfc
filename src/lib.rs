//! Healthcare copilot backend: three cooperating HTTP services over a
//! shared library.
//!
//! - `auth-api` — doctor accounts, login, token issuance.
//! - `records-api` — patients, doctors, medical records, stored
//!   analysis results.
//! - `analysis-api` — note summarization, missing-section detection,
//!   and follow-up suggestions, persisting through the records service.

pub mod analysis;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, defaulting to info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
