//! Environment-driven configuration shared by the three services.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::analysis::TextAnalyticsClient;
use crate::auth::TokenSigner;

pub const APP_NAME: &str = "healthcare-copilot";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default ports: analysis 7001, auth 7002, records 7003.
const DEFAULT_ANALYSIS_ADDR: &str = "127.0.0.1:7001";
const DEFAULT_AUTH_ADDR: &str = "127.0.0.1:7002";
const DEFAULT_RECORDS_ADDR: &str = "127.0.0.1:7003";

const DEFAULT_JWT_SECRET: &str = "development-secret-change-me";
const DEFAULT_JWT_ISSUER: &str = "copilot-auth";
const DEFAULT_JWT_AUDIENCE: &str = "copilot-services";
const DEFAULT_TOKEN_MINUTES: i64 = 60;

/// Application data directory: `~/.healthcare-copilot/`.
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".healthcare-copilot")
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub auth_addr: SocketAddr,
    pub records_addr: SocketAddr,
    pub analysis_addr: SocketAddr,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub token_minutes: i64,
    pub text_analytics_endpoint: Option<String>,
    pub text_analytics_key: Option<String>,
    pub records_base_url: String,
}

impl ServiceConfig {
    /// Load configuration from `COPILOT_*` environment variables,
    /// falling back to development defaults.
    pub fn from_env() -> Self {
        let jwt_secret = env_or("COPILOT_JWT_SECRET", DEFAULT_JWT_SECRET);
        if jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("COPILOT_JWT_SECRET not set, using the development default");
        }

        let records_addr: SocketAddr = env_or("COPILOT_RECORDS_ADDR", DEFAULT_RECORDS_ADDR)
            .parse()
            .unwrap_or_else(|_| DEFAULT_RECORDS_ADDR.parse().expect("valid default addr"));
        let auth_addr: SocketAddr = env_or("COPILOT_AUTH_ADDR", DEFAULT_AUTH_ADDR)
            .parse()
            .unwrap_or_else(|_| DEFAULT_AUTH_ADDR.parse().expect("valid default addr"));
        let analysis_addr: SocketAddr = env_or("COPILOT_ANALYSIS_ADDR", DEFAULT_ANALYSIS_ADDR)
            .parse()
            .unwrap_or_else(|_| DEFAULT_ANALYSIS_ADDR.parse().expect("valid default addr"));

        let database_path = std::env::var("COPILOT_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| app_data_dir().join("copilot.db"));

        let token_minutes = std::env::var("COPILOT_TOKEN_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_MINUTES);

        let records_base_url = env_or(
            "COPILOT_RECORDS_BASE_URL",
            &format!("http://{records_addr}"),
        );

        Self {
            auth_addr,
            records_addr,
            analysis_addr,
            database_path,
            jwt_secret,
            jwt_issuer: env_or("COPILOT_JWT_ISSUER", DEFAULT_JWT_ISSUER),
            jwt_audience: env_or("COPILOT_JWT_AUDIENCE", DEFAULT_JWT_AUDIENCE),
            token_minutes,
            text_analytics_endpoint: std::env::var("COPILOT_TEXT_ANALYTICS_ENDPOINT").ok(),
            text_analytics_key: std::env::var("COPILOT_TEXT_ANALYTICS_KEY").ok(),
            records_base_url: records_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Token signer configured from this config.
    pub fn signer(&self) -> TokenSigner {
        TokenSigner::new(
            &self.jwt_secret,
            &self.jwt_issuer,
            &self.jwt_audience,
            self.token_minutes,
        )
    }

    /// Key-phrase client when both endpoint and key are configured.
    pub fn text_analytics_client(&self) -> Option<TextAnalyticsClient> {
        match (&self.text_analytics_endpoint, &self.text_analytics_key) {
            (Some(endpoint), Some(key)) => Some(TextAnalyticsClient::new(endpoint, key)),
            _ => None,
        }
    }
}
