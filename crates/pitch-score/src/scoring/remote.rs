use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::backend::{ScoringBackend, ScoringError};
use super::domain::{ScoreRequest, ScoreResponse};
use crate::config::RemoteScoringConfig;

/// Scoring backend that forwards requests to a model served over HTTP.
///
/// The remote service receives the [`ScoreRequest`] JSON unchanged and must
/// answer with a [`ScoreResponse`]; anything violating the response
/// invariants is rejected.
#[derive(Clone)]
pub struct RemoteScorer {
    config: RemoteScoringConfig,
    client: Client,
}

impl RemoteScorer {
    pub fn new(config: RemoteScoringConfig) -> Result<Self, ScoringError> {
        if config.endpoint.trim().is_empty() {
            return Err(ScoringError::Config(
                "remote scoring endpoint is empty".to_string(),
            ));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ScoringBackend for RemoteScorer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        let mut call = self.client.post(&self.config.endpoint).json(&request);
        if let Some(api_key) = &self.config.api_key {
            call = call.bearer_auth(api_key);
        }

        let res = call.send().await?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            warn!(status, endpoint = %self.config.endpoint, "remote scoring failed");
            return Err(ScoringError::Api { status, body });
        }

        let parsed: ScoreResponse = res.json().await?;
        parsed.validate()?;
        Ok(parsed)
    }
}
