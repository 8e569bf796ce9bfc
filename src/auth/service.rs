//! Account lifecycle for doctors: register, login, refresh, logout.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;

use super::password::{hash_password, verify_password};
use super::token::{generate_refresh_token, TokenSigner};
use super::AuthError;
use crate::db::repository::doctor;
use crate::models::Doctor;

/// How much longer a refresh token outlives its access token.
const REFRESH_GRACE_DAYS: i64 = 7;

/// Registration input for a new doctor account.
#[derive(Debug, Clone)]
pub struct RegisterDoctor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub license_number: String,
    pub hospital: String,
}

/// A successful login, registration, or refresh.
#[derive(Debug)]
pub struct LoginOutcome {
    pub doctor: Doctor,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and rotates tokens against the doctors table.
#[derive(Clone)]
pub struct AuthService {
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    fn issue_tokens(&self, conn: &Connection, doctor: Doctor) -> Result<LoginOutcome, AuthError> {
        let (access_token, exp) = self.signer.sign(&doctor)?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::InvalidToken("expiry out of range".into()))?;

        let refresh_token = generate_refresh_token();
        let refresh_expiry = expires_at + Duration::days(REFRESH_GRACE_DAYS);
        doctor::set_refresh_token(conn, doctor.id, &refresh_token, refresh_expiry)?;

        Ok(LoginOutcome {
            doctor,
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Create an account and log it in. Duplicate email or license
    /// number maps to `AccountExists`.
    pub fn register(
        &self,
        conn: &Connection,
        input: RegisterDoctor,
    ) -> Result<LoginOutcome, AuthError> {
        let entry = doctor::NewDoctor {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash: hash_password(&input.password),
            specialization: input.specialization,
            license_number: input.license_number,
            hospital: input.hospital,
        };
        let id = doctor::insert_doctor(conn, &entry).map_err(|e| {
            if e.is_constraint_violation() {
                AuthError::AccountExists
            } else {
                AuthError::Database(e)
            }
        })?;

        let created = doctor::fetch_doctor(conn, id)?;
        tracing::info!(doctor_id = id, "doctor account registered");
        self.issue_tokens(conn, created)
    }

    /// Verify credentials and issue a fresh token pair. Unknown email
    /// and wrong password are indistinguishable to the caller.
    pub fn login(
        &self,
        conn: &Connection,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let doctor = doctor::find_doctor_by_email(conn, email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &doctor.password_hash)? {
            tracing::warn!(doctor_id = doctor.id, "failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(doctor_id = doctor.id, "doctor logged in");
        self.issue_tokens(conn, doctor)
    }

    /// Exchange an unexpired refresh token for a new token pair. The
    /// old refresh token is rotated out.
    pub fn refresh(&self, conn: &Connection, refresh_token: &str) -> Result<LoginOutcome, AuthError> {
        let doctor = doctor::find_doctor_by_refresh_token(conn, refresh_token)?
            .ok_or(AuthError::InvalidRefreshToken)?;
        self.issue_tokens(conn, doctor)
    }

    /// Invalidate a refresh token. Returns whether a stored token was
    /// actually cleared; handlers reject unknown tokens.
    pub fn logout(&self, conn: &Connection, refresh_token: &str) -> Result<bool, AuthError> {
        let cleared = doctor::clear_refresh_token(conn, refresh_token)?;
        if cleared {
            tracing::info!("refresh token revoked");
        }
        Ok(cleared)
    }
}
