use metrics_exporter_prometheus::PrometheusHandle;
use pitch_score::config::ScoringBackendConfig;
use pitch_score::error::AppError;
use pitch_score::scoring::build_scoring_backend;
use pitch_score::session::ScoringSession;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Operational state shared with the health and metrics endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the configured scoring backend into a fresh form session.
pub(crate) fn build_session(config: &ScoringBackendConfig) -> Result<Arc<ScoringSession>, AppError> {
    let backend = build_scoring_backend(config)?;
    Ok(Arc::new(ScoringSession::new(backend)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn session_uses_configured_backend() {
        let session = build_session(&ScoringBackendConfig::Heuristic {
            latency: Duration::ZERO,
        })
        .expect("session builds");

        assert_eq!(session.backend().name(), "heuristic");
        assert_eq!(session.latest_sequence(), 0);
    }
}
