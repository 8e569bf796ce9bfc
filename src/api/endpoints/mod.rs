//! HTTP handlers, one module per resource.

pub mod analysis;
pub mod analysis_results;
pub mod auth;
pub mod doctors;
pub mod health;
pub mod medical_records;
pub mod patients;
