use async_trait::async_trait;

use super::domain::{ScoreRequest, ScoreResponse};
use super::validation::InputValidationError;

/// The replaceable scoring boundary.
///
/// Consumers hold an `Arc<dyn ScoringBackend>` and treat the local heuristic
/// and a remote model identically.
#[async_trait]
pub trait ScoringBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError>;
}

/// Failure reported by a scoring backend.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scoring API error: status={status}, body={body}")]
    Api { status: u16, body: String },

    #[error("invalid scoring response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Validation(#[from] InputValidationError),
}

impl ScoringError {
    /// Whether the failure happened between us and the backend rather than
    /// in the request itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ScoringError::Transport(_) | ScoringError::Api { .. } | ScoringError::InvalidResponse(_)
        )
    }
}
