//! Router builders for the three services.
//!
//! Each builder takes its context plus the token signer shared by all
//! services. Protected route groups are layered with the bearer-token
//! middleware; the `TokenVerifier` extension must be outermost so the
//! middleware can reach it.

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::cors::CorsLayer;

use crate::auth::TokenSigner;

use super::endpoints::{
    analysis, analysis_results, auth, doctors, health, medical_records, patients,
};
use super::middleware;
use super::types::{AnalysisApiContext, AuthApiContext, RecordsApiContext, TokenVerifier};

fn protect(router: Router, signer: TokenSigner) -> Router {
    // route_layer keeps the fallback out of the middleware, so unknown
    // paths stay 404 after the merge instead of bouncing off auth.
    router
        .route_layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .route_layer(Extension(TokenVerifier(signer)))
}

/// Router for the authentication service.
pub fn auth_router(ctx: AuthApiContext, signer: TokenSigner) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/logout", post(auth::logout))
        .route("/health", get(health::check))
        .with_state(ctx.clone());

    let protected = protect(
        Router::new()
            .route("/api/auth/validate", get(auth::validate))
            .with_state(ctx),
        signer,
    );

    public.merge(protected).layer(CorsLayer::permissive())
}

/// Router for the patient-records service.
pub fn records_router(ctx: RecordsApiContext, signer: TokenSigner) -> Router {
    let public = Router::new()
        .route("/api/patients", get(patients::list).post(patients::create))
        .route("/api/patients/search", get(patients::search))
        .route(
            "/api/patients/:id",
            get(patients::get).put(patients::update).delete(patients::delete),
        )
        .route("/api/doctors", get(doctors::list).post(doctors::create))
        .route(
            "/api/doctors/:id",
            get(doctors::get).put(doctors::update).delete(doctors::delete),
        )
        .route("/health", get(health::check))
        .with_state(ctx.clone());

    let protected = protect(
        Router::new()
            .route(
                "/api/medicalrecords",
                get(medical_records::list).post(medical_records::create),
            )
            .route(
                "/api/medicalrecords/:id",
                get(medical_records::get)
                    .put(medical_records::update)
                    .delete(medical_records::delete),
            )
            .route("/api/analysisresults", post(analysis_results::create))
            .route("/api/analysisresults/:id", get(analysis_results::get))
            .with_state(ctx),
        signer,
    );

    public.merge(protected).layer(CorsLayer::permissive())
}

/// Router for the analysis service. Everything but the health check is
/// protected.
pub fn analysis_router(ctx: AnalysisApiContext, signer: TokenSigner) -> Router {
    let public = Router::new().route("/health", get(health::check));

    let protected = protect(
        Router::new()
            .route("/api/analysis/summarize", post(analysis::summarize))
            .route("/api/analysis/detect-missing", post(analysis::detect_missing))
            .route("/api/analysis/recommend", post(analysis::recommend))
            .route("/api/analysis/run-and-save", post(analysis::run_and_save))
            .with_state(ctx),
        signer,
    );

    public.merge(protected).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::AnalysisEngine;
    use crate::auth::AuthService;
    use crate::db::sqlite::open_memory_database;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", "copilot-auth", "copilot-services", 60)
    }

    fn auth_app() -> Router {
        let db = Arc::new(Mutex::new(open_memory_database().unwrap()));
        let ctx = AuthApiContext {
            db,
            auth: AuthService::new(signer()),
        };
        auth_router(ctx, signer())
    }

    fn records_app() -> Router {
        let db = Arc::new(Mutex::new(open_memory_database().unwrap()));
        records_router(RecordsApiContext { db }, signer())
    }

    fn analysis_app(records_base_url: &str) -> Router {
        let ctx = AnalysisApiContext {
            engine: Arc::new(AnalysisEngine::new(None)),
            http: reqwest::Client::new(),
            records_base_url: records_base_url.to_string(),
        };
        analysis_router(ctx, signer())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json_authed(uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn registration_body() -> Value {
        json!({
            "first_name": "Alex",
            "last_name": "Rivera",
            "email": "a@h.org",
            "password": "hunter2!",
            "specialization": "Cardiology",
            "license_number": "LIC-1",
            "hospital": "General Hospital"
        })
    }

    /// Registers a doctor through the auth router and returns a valid
    /// bearer token for use against any router.
    async fn register_and_token(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_json("/api/auth/register", registration_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["token"].as_str().unwrap().to_string()
    }

    // ───── auth ─────

    #[tokio::test]
    async fn health_is_public() {
        let response = auth_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_login_validate_flow() {
        let app = auth_app();
        let token = register_and_token(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/login",
                json!({"email": "a@h.org", "password": "hunter2!"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = body_json(response).await;
        assert!(login["doctor"]["password_hash"].is_null());
        assert_eq!(login["doctor"]["email"], "a@h.org");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/validate")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let claims = body_json(response).await;
        assert_eq!(claims["name"], "Alex Rivera");
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = auth_app();
        register_and_token(&app).await;

        let response = app
            .oneshot(post_json(
                "/api/auth/login",
                json!({"email": "a@h.org", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn duplicate_registration_is_409() {
        let app = auth_app();
        register_and_token(&app).await;

        let response = app
            .oneshot(post_json("/api/auth/register", registration_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn refresh_rotates_and_logout_revokes() {
        let app = auth_app();
        let response = app
            .clone()
            .oneshot(post_json("/api/auth/register", registration_body()))
            .await
            .unwrap();
        let registered = body_json(response).await;
        let refresh_token = registered["refresh_token"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/refresh",
                json!({"refresh_token": refresh_token}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rotated = body_json(response).await;
        let new_refresh = rotated["refresh_token"].as_str().unwrap().to_string();
        assert_ne!(new_refresh, refresh_token);

        // Old token is gone; logging it out is a 400.
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/auth/logout",
                json!({"refresh_token": refresh_token}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json(
                "/api/auth/logout",
                json!({"refresh_token": new_refresh}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn validate_without_token_is_401() {
        let response = auth_app()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/validate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tampered_token_is_401() {
        let app = auth_app();
        let token = register_and_token(&app).await;
        let tampered = format!("{}x", &token[..token.len() - 1]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/auth/validate")
                    .header("Authorization", format!("Bearer {tampered}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ───── records ─────

    fn patient_body(mrn: &str) -> Value {
        json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "date_of_birth": "1980-05-12",
            "gender": "F",
            "medical_record_number": mrn,
            "contact_info": "555-0100"
        })
    }

    async fn create_patient(app: &Router, mrn: &str) -> i64 {
        let response = app
            .clone()
            .oneshot(post_json("/api/patients", patient_body(mrn)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }

    async fn create_doctor(app: &Router) -> i64 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/doctors",
                json!({
                    "first_name": "Alex",
                    "last_name": "Rivera",
                    "email": "a@h.org",
                    "specialization": "Cardiology",
                    "license_number": "LIC-1",
                    "hospital": "General Hospital"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["id"].as_i64().unwrap()
    }

    fn record_body(patient_id: i64, doctor_id: i64) -> Value {
        json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "visit_date": "2026-08-20T09:30:00Z",
            "chief_complaint": "Headache",
            "notes": "Two days of frontal headache."
        })
    }

    #[tokio::test]
    async fn patient_crud_roundtrip() {
        let app = records_app();
        let id = create_patient(&app, "MRN-001").await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/patients/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let detail = body_json(response).await;
        assert_eq!(detail["medical_record_number"], "MRN-001");
        assert!(detail["medical_records"].as_array().unwrap().is_empty());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/patients/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/patients/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_mrn_is_409() {
        let app = records_app();
        create_patient(&app, "MRN-001").await;

        let response = app
            .oneshot(post_json("/api/patients", patient_body("MRN-001")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn blank_search_term_is_400() {
        let response = records_app()
            .oneshot(
                Request::builder()
                    .uri("/api/patients/search?term=%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_finds_by_name() {
        let app = records_app();
        create_patient(&app, "MRN-001").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/patients/search?term=jane")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let found = body_json(response).await;
        assert_eq!(found.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn medicalrecords_require_auth() {
        let response = records_app()
            .oneshot(
                Request::builder()
                    .uri("/api/medicalrecords")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn medical_record_create_validates_references() {
        let app = records_app();
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let patient_id = create_patient(&app, "MRN-001").await;
        let doctor_id = create_doctor(&app).await;

        let response = app
            .clone()
            .oneshot(post_json_authed(
                "/api/medicalrecords",
                &token,
                record_body(999, doctor_id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(post_json_authed(
                "/api/medicalrecords",
                &token,
                record_body(patient_id, doctor_id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn analysis_result_type_is_validated() {
        let app = records_app();
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let patient_id = create_patient(&app, "MRN-001").await;
        let doctor_id = create_doctor(&app).await;
        let response = app
            .clone()
            .oneshot(post_json_authed(
                "/api/medicalrecords",
                &token,
                record_body(patient_id, doctor_id),
            ))
            .await
            .unwrap();
        let record_id = body_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(post_json_authed(
                "/api/analysisresults",
                &token,
                json!({
                    "medicalRecordId": record_id,
                    "analysisType": "Sentiment",
                    "result": "?",
                    "confidence": "N/A"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json_authed(
                "/api/analysisresults",
                &token,
                json!({
                    "medicalRecordId": record_id,
                    "analysisType": "Summary",
                    "result": "Key points: headache",
                    "confidence": "N/A"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = body_json(response).await;
        assert_eq!(saved["analysis_type"], "Summary");
    }

    // ───── analysis ─────

    #[tokio::test]
    async fn analysis_routes_require_auth() {
        let response = analysis_app("http://127.0.0.1:1")
            .oneshot(post_json(
                "/api/analysis/summarize",
                json!({"patient_notes": "note"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn summarize_truncates_long_notes() {
        let app = analysis_app("http://127.0.0.1:1");
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let long = "x".repeat(201);
        let response = app
            .oneshot(post_json_authed(
                "/api/analysis/summarize",
                &token,
                json!({"patient_notes": long}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let summary = json["summary"].as_str().unwrap();
        assert_eq!(summary.chars().count(), 203);
        assert!(summary.ends_with("..."));
    }

    #[tokio::test]
    async fn detect_missing_on_complete_note_is_empty() {
        let app = analysis_app("http://127.0.0.1:1");
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let note = "CC: headache. HPI: 2 days. PMH: hypertension. \
                    Meds: lisinopril. Allergies: NKDA. BP 130/80. \
                    Exam: unremarkable. Assessment: tension headache. Plan: rest";
        let response = app
            .oneshot(post_json_authed(
                "/api/analysis/detect-missing",
                &token,
                json!({"patient_notes": note}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["missing"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn recommend_hypertension_advisories_come_first() {
        let app = analysis_app("http://127.0.0.1:1");
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let response = app
            .oneshot(post_json_authed(
                "/api/analysis/recommend",
                &token,
                json!({"patient_notes": "longstanding hypertension"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let suggestions = json["suggestions"].as_array().unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0]
            .as_str()
            .unwrap()
            .starts_with("Check recent BP trend"));
    }

    #[tokio::test]
    async fn analysis_endpoints_reject_blank_notes() {
        let app = analysis_app("http://127.0.0.1:1");
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        for uri in [
            "/api/analysis/summarize",
            "/api/analysis/detect-missing",
            "/api/analysis/recommend",
        ] {
            let response = app
                .clone()
                .oneshot(post_json_authed(uri, &token, json!({"patient_notes": "   "})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_routes_are_404_not_401() {
        // Routers with protected groups must not funnel their fallback
        // through the auth middleware.
        for app in [records_app(), analysis_app("http://127.0.0.1:1"), auth_app()] {
            let response = app
                .oneshot(
                    Request::builder()
                        .uri("/nonexistent")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn run_and_save_rejects_bad_input() {
        let app = analysis_app("http://127.0.0.1:1");
        let auth = auth_app();
        let token = register_and_token(&auth).await;

        let response = app
            .clone()
            .oneshot(post_json_authed(
                "/api/analysis/run-and-save",
                &token,
                json!({"medical_record_id": 0, "patient_notes": "note"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json_authed(
                "/api/analysis/run-and-save",
                &token,
                json!({"medical_record_id": 1, "patient_notes": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
