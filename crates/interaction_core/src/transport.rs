use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ApiError,
    protocol::{ContactSubmission, SubmissionResponse},
};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submission endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error("submission transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("submission rejected: {}", .0.message)]
    Rejected(ApiError),
    #[error("submission endpoint answered HTTP {0}")]
    Status(u16),
}

impl SubmitError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::InvalidEndpoint { .. } => false,
            SubmitError::Transport(_) => true,
            SubmitError::Rejected(error) => error.is_retryable(),
            SubmitError::Status(code) => *code == 429 || *code >= 500,
        }
    }
}

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, submission: &ContactSubmission) -> Result<(), SubmitError>;
}

pub struct HttpSubmissionTransport {
    client: Client,
    endpoint: Url,
}

impl HttpSubmissionTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let endpoint = Url::parse(endpoint).map_err(|source| SubmitError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmissionTransport {
    async fn submit(&self, submission: &ContactSubmission) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Idempotency-Key", submission.submission_id.to_string())
            .json(submission)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return match serde_json::from_str::<SubmissionResponse>(&body) {
                Ok(SubmissionResponse::Rejected { error }) => Err(SubmitError::Rejected(error)),
                _ => Ok(()),
            };
        }

        match serde_json::from_str::<ApiError>(&body) {
            Ok(error) => Err(SubmitError::Rejected(error)),
            Err(_) => Err(SubmitError::Status(status.as_u16())),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
