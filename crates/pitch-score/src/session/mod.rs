//! Submission state for a single pitch form.
//!
//! A session owns the current [`SubmissionState`] and tags every submission
//! with a sequence number. Only the latest sequence may settle the state; a
//! result for anything older is dropped without touching what is displayed.

pub mod router;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::scoring::views::{ScoreDashboard, ScoreView};
use crate::scoring::{ScoreRequest, ScoreResponse, ScoringBackend, ScoringError};

pub use router::pitch_router;

/// Lifecycle of the form's current submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,
    Pending {
        sequence: u64,
        submitted_at: DateTime<Utc>,
    },
    Resolved {
        sequence: u64,
        response: ScoreResponse,
        resolved_at: DateTime<Utc>,
    },
    Failed {
        sequence: u64,
        message: String,
    },
}

impl SubmissionState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Pending { .. } => "pending",
            SubmissionState::Resolved { .. } => "resolved",
            SubmissionState::Failed { .. } => "failed",
        }
    }

    pub fn sequence(&self) -> Option<u64> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Pending { sequence, .. }
            | SubmissionState::Resolved { sequence, .. }
            | SubmissionState::Failed { sequence, .. } => Some(*sequence),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending { .. })
    }

    pub fn response(&self) -> Option<&ScoreResponse> {
        match self {
            SubmissionState::Resolved { response, .. } => Some(response),
            _ => None,
        }
    }

    pub fn view(&self) -> ScoreView {
        match self {
            SubmissionState::Idle => ScoreView::empty(),
            SubmissionState::Pending { sequence, .. } => ScoreView::Pending {
                sequence: *sequence,
            },
            SubmissionState::Resolved {
                sequence, response, ..
            } => ScoreView::Ready {
                sequence: *sequence,
                dashboard: ScoreDashboard::from_response(response),
            },
            SubmissionState::Failed { sequence, message } => ScoreView::Failed {
                sequence: *sequence,
                message: message.clone(),
            },
        }
    }
}

/// How a single submission ended from the submitter's point of view.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Resolved {
        sequence: u64,
        response: ScoreResponse,
    },
    Failed {
        sequence: u64,
        error: ScoringError,
    },
    /// A newer submission or a reset arrived first; the result was dropped.
    Superseded { sequence: u64 },
}

impl SubmissionOutcome {
    pub fn sequence(&self) -> u64 {
        match self {
            SubmissionOutcome::Resolved { sequence, .. }
            | SubmissionOutcome::Failed { sequence, .. }
            | SubmissionOutcome::Superseded { sequence } => *sequence,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Resolved { .. } => "resolved",
            SubmissionOutcome::Failed { .. } => "failed",
            SubmissionOutcome::Superseded { .. } => "superseded",
        }
    }
}

/// State container tying a scoring backend to the form it serves.
pub struct ScoringSession {
    backend: Arc<dyn ScoringBackend>,
    state: Mutex<SubmissionState>,
    latest: watch::Sender<u64>,
}

impl ScoringSession {
    pub fn new(backend: Arc<dyn ScoringBackend>) -> Self {
        let (latest, _) = watch::channel(0);
        Self {
            backend,
            state: Mutex::new(SubmissionState::Idle),
            latest,
        }
    }

    pub fn backend(&self) -> &Arc<dyn ScoringBackend> {
        &self.backend
    }

    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    pub fn view(&self) -> ScoreView {
        self.lock_state().view()
    }

    /// Highest sequence number issued so far; `0` before the first submission.
    pub fn latest_sequence(&self) -> u64 {
        *self.latest.borrow()
    }

    /// Scores `request` as the newest submission.
    ///
    /// Any submission still in flight is superseded immediately.
    pub async fn submit(&self, request: ScoreRequest) -> SubmissionOutcome {
        let sequence = self.begin();
        self.run(sequence, request).await
    }

    /// Issues the next sequence number and moves to `Pending`.
    pub fn begin(&self) -> u64 {
        let mut state = self.lock_state();
        let sequence = self.advance();
        *state = SubmissionState::Pending {
            sequence,
            submitted_at: Utc::now(),
        };
        info!(sequence, backend = self.backend.name(), "pitch submitted");
        sequence
    }

    /// Drives the submission tagged `sequence` to completion.
    ///
    /// The backend call is abandoned as soon as a newer sequence is issued,
    /// which also cancels the heuristic's artificial delay.
    ///
    /// Dropping the returned future before it finishes discards the
    /// submission: the state returns to `Idle` unless something newer has
    /// already replaced it.
    pub async fn run(&self, sequence: u64, request: ScoreRequest) -> SubmissionOutcome {
        let latest = self.latest.subscribe();
        let guard = AbandonGuard {
            session: self,
            sequence,
            armed: true,
        };

        let outcome = tokio::select! {
            biased;
            () = superseded(latest, sequence) => {
                debug!(sequence, "submission superseded before completion");
                SubmissionOutcome::Superseded { sequence }
            }
            result = self.backend.score(request) => self.settle(sequence, result),
        };
        guard.disarm();
        outcome
    }

    /// Drops a pending submission and returns to `Idle`.
    ///
    /// Returns `false` and leaves the state alone when nothing is pending.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock_state();
        if !state.is_pending() {
            return false;
        }
        let sequence = self.advance();
        *state = SubmissionState::Idle;
        info!(sequence, "pending submission cancelled");
        true
    }

    /// Clears the form's result, dropping anything still in flight.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        let sequence = self.advance();
        *state = SubmissionState::Idle;
        info!(sequence, "submission state reset");
    }

    fn settle(
        &self,
        sequence: u64,
        result: Result<ScoreResponse, ScoringError>,
    ) -> SubmissionOutcome {
        let mut state = self.lock_state();
        if self.latest_sequence() != sequence {
            debug!(sequence, "stale scoring result dropped");
            return SubmissionOutcome::Superseded { sequence };
        }

        match result {
            Ok(response) => {
                info!(
                    sequence,
                    probability = response.success_probability,
                    "pitch scored"
                );
                *state = SubmissionState::Resolved {
                    sequence,
                    response: response.clone(),
                    resolved_at: Utc::now(),
                };
                SubmissionOutcome::Resolved { sequence, response }
            }
            Err(error) => {
                warn!(sequence, %error, "pitch scoring failed");
                *state = SubmissionState::Failed {
                    sequence,
                    message: error.to_string(),
                };
                SubmissionOutcome::Failed { sequence, error }
            }
        }
    }

    fn abandon(&self, sequence: u64) {
        let mut state = self.lock_state();
        if state.is_pending() && state.sequence() == Some(sequence) {
            *state = SubmissionState::Idle;
            info!(sequence, "pending submission abandoned");
        }
    }

    /// Bumps the sequence; callers hold the state lock.
    fn advance(&self) -> u64 {
        let mut next = 0;
        self.latest.send_modify(|current| {
            *current += 1;
            next = *current;
        });
        next
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the session to `Idle` if a run is dropped mid-flight.
struct AbandonGuard<'a> {
    session: &'a ScoringSession,
    sequence: u64,
    armed: bool,
}

impl AbandonGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon(self.sequence);
        }
    }
}

async fn superseded(mut latest: watch::Receiver<u64>, sequence: u64) {
    let closed = latest
        .wait_for(|current| *current != sequence)
        .await
        .is_err();
    if closed {
        // sender lives as long as the session, so this only happens on teardown
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::HeuristicScorer;
    use std::time::Duration;

    fn session() -> ScoringSession {
        ScoringSession::new(Arc::new(HeuristicScorer::new(Duration::from_millis(600))))
    }

    #[test]
    fn starts_idle_with_empty_view() {
        let session = session();
        assert_eq!(session.state(), SubmissionState::Idle);
        assert_eq!(session.view(), ScoreView::empty());
        assert_eq!(session.latest_sequence(), 0);
    }

    #[test]
    fn begin_moves_to_pending_with_increasing_sequences() {
        let session = session();
        let first = session.begin();
        let second = session.begin();

        assert!(second > first);
        assert_eq!(session.state().sequence(), Some(second));
        assert!(session.state().is_pending());
    }

    #[test]
    fn cancel_only_applies_to_pending_submissions() {
        let session = session();
        assert!(!session.cancel());

        session.begin();
        assert!(session.cancel());
        assert_eq!(session.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_resolves_and_exposes_dashboard() {
        let session = session();

        let outcome = session.submit(ScoreRequest::new("Um circo em crise")).await;

        assert_eq!(outcome.label(), "resolved");
        let state = session.state();
        assert_eq!(state.label(), "resolved");
        assert!(state.response().is_some());
        assert!(matches!(session.view(), ScoreView::Ready { sequence: 1, .. }));
    }
}
