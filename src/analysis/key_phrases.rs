//! Key-phrase extraction behind a trait, with an Azure Text Analytics
//! HTTP client as the production implementation. The engine treats any
//! failure here as "no phrases" and falls back to its deterministic
//! paths.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyPhraseError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Key-phrase service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("Key-phrase response missing document")]
    EmptyResponse,
}

/// Extracts key phrases from free text. Implementations may call out
/// over the network.
pub trait KeyPhraseExtractor: Send + Sync {
    fn key_phrases(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<String>, KeyPhraseError>> + Send;
}

/// Azure Text Analytics v3.1 key-phrase client.
pub struct TextAnalyticsClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

#[derive(Serialize)]
struct KeyPhraseRequest<'a> {
    documents: Vec<KeyPhraseDocument<'a>>,
}

#[derive(Serialize)]
struct KeyPhraseDocument<'a> {
    id: &'a str,
    language: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct KeyPhraseResponse {
    documents: Vec<KeyPhraseResultDocument>,
}

#[derive(Deserialize)]
struct KeyPhraseResultDocument {
    #[serde(rename = "keyPhrases")]
    key_phrases: Vec<String>,
}

impl TextAnalyticsClient {
    pub fn new(endpoint: &str, key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
        }
    }
}

impl KeyPhraseExtractor for TextAnalyticsClient {
    async fn key_phrases(&self, text: &str) -> Result<Vec<String>, KeyPhraseError> {
        let url = format!("{}/text/analytics/v3.1/keyPhrases", self.endpoint);
        let body = KeyPhraseRequest {
            documents: vec![KeyPhraseDocument {
                id: "1",
                language: "en",
                text,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(KeyPhraseError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: KeyPhraseResponse = response.json().await?;
        let document = parsed
            .documents
            .into_iter()
            .next()
            .ok_or(KeyPhraseError::EmptyResponse)?;
        Ok(document.key_phrases)
    }
}
