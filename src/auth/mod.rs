//! Doctor authentication: password hashing, token issuance, and the
//! account lifecycle (register, login, refresh, logout).

pub mod password;
pub mod service;
pub mod token;

pub use service::{AuthService, LoginOutcome, RegisterDoctor};
pub use token::{Claims, TokenSigner};

use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    #[error("An account with this email or license number already exists")]
    AccountExists,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Stored password hash is malformed")]
    MalformedHash,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
