use std::sync::Arc;

use tracing::info;

use super::backend::{ScoringBackend, ScoringError};
use super::engine::HeuristicScorer;
use super::remote::RemoteScorer;
use crate::config::ScoringBackendConfig;

pub fn build_scoring_backend(
    cfg: &ScoringBackendConfig,
) -> Result<Arc<dyn ScoringBackend>, ScoringError> {
    let backend: Arc<dyn ScoringBackend> = match cfg {
        ScoringBackendConfig::Heuristic { latency } => Arc::new(HeuristicScorer::new(*latency)),
        ScoringBackendConfig::Remote(remote) => Arc::new(RemoteScorer::new(remote.clone())?),
    };
    info!(backend = backend.name(), "scoring backend configured");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteScoringConfig;
    use std::time::Duration;

    #[test]
    fn builds_heuristic_backend() {
        let backend = build_scoring_backend(&ScoringBackendConfig::Heuristic {
            latency: Duration::ZERO,
        })
        .expect("heuristic always builds");
        assert_eq!(backend.name(), "heuristic");
    }

    #[test]
    fn builds_remote_backend() {
        let backend = build_scoring_backend(&ScoringBackendConfig::Remote(
            RemoteScoringConfig::new("http://127.0.0.1:9/api/v1/pitch/score"),
        ))
        .expect("remote builds");
        assert_eq!(backend.name(), "remote");
    }

    #[test]
    fn remote_backend_requires_endpoint() {
        let result =
            build_scoring_backend(&ScoringBackendConfig::Remote(RemoteScoringConfig::new("  ")));
        assert!(matches!(result, Err(ScoringError::Config(_))));
    }
}
