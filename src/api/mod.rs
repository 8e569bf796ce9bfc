//! HTTP layer shared by the three service binaries.
//!
//! Routes are nested under `/api/`. Protected routes sit behind a
//! bearer-token middleware that verifies the access token and injects
//! a `DoctorContext` extension for handlers.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::{analysis_router, auth_router, records_router};
pub use server::serve;
pub use types::{AnalysisApiContext, AuthApiContext, DoctorContext, RecordsApiContext};
