use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use super::{ScoringSession, SubmissionOutcome};
use crate::error::AppError;
use crate::scoring::views::{ScoreDashboard, ScoreView};
use crate::scoring::{PitchForm, ScoreRequest, ScoreResponse};

/// Receipt returned for a form submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub sequence: u64,
    pub outcome: &'static str,
    pub corrections: Vec<String>,
    pub view: ScoreView,
}

/// Router exposing the scoring boundary and the form's submission state.
pub fn pitch_router(session: Arc<ScoringSession>) -> Router {
    Router::new()
        .route("/api/v1/pitch/score", post(score_handler))
        .route(
            "/api/v1/pitch/submissions",
            post(submit_handler).delete(reset_handler),
        )
        .route("/api/v1/pitch/view", get(view_handler))
        .with_state(session)
}

pub(crate) async fn score_handler(
    State(session): State<Arc<ScoringSession>>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let response = session.backend().score(request).await?;
    Ok(Json(response))
}

pub(crate) async fn submit_handler(
    State(session): State<Arc<ScoringSession>>,
    Json(form): Json<PitchForm>,
) -> Result<Response, AppError> {
    let normalized = form.normalize()?;
    let corrections = normalized
        .corrections
        .iter()
        .map(ToString::to_string)
        .collect();

    let outcome = session.submit(normalized.request).await;
    let sequence = outcome.sequence();
    let label = outcome.label();

    let (status, view) = match outcome {
        SubmissionOutcome::Resolved { response, .. } => (
            StatusCode::OK,
            ScoreView::Ready {
                sequence,
                dashboard: ScoreDashboard::from_response(&response),
            },
        ),
        SubmissionOutcome::Failed { error, .. } => (
            StatusCode::BAD_GATEWAY,
            ScoreView::Failed {
                sequence,
                message: error.to_string(),
            },
        ),
        SubmissionOutcome::Superseded { .. } => (StatusCode::CONFLICT, session.view()),
    };

    let receipt = SubmissionReceipt {
        sequence,
        outcome: label,
        corrections,
        view,
    };
    Ok((status, Json(receipt)).into_response())
}

pub(crate) async fn view_handler(State(session): State<Arc<ScoringSession>>) -> Json<ScoreView> {
    Json(session.view())
}

pub(crate) async fn reset_handler(State(session): State<Arc<ScoringSession>>) -> Json<ScoreView> {
    session.reset();
    Json(session.view())
}
