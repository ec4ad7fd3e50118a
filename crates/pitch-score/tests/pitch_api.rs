use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use pitch_score::config::RemoteScoringConfig;
use pitch_score::scoring::{
    derive_score, Genre, HeuristicScorer, RemoteScorer, ScoreRequest, ScoreResponse,
    ScoringBackend, ScoringError,
};
use pitch_score::session::{pitch_router, ScoringSession};
use serde_json::{json, Value};
use tower::ServiceExt;

fn instant_session() -> Arc<ScoringSession> {
    Arc::new(ScoringSession::new(Arc::new(HeuristicScorer::new(
        Duration::ZERO,
    ))))
}

async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request builds");

    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener binds");
    let addr = listener.local_addr().expect("listener has address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn score_endpoint_returns_the_derived_report() {
    let request = ScoreRequest::new("Uma banda de rock perdida no sertão").with_genres([Genre::Musical]);

    let (status, body) = call(
        pitch_router(instant_session()),
        Method::POST,
        "/api/v1/pitch/score",
        Some(serde_json::to_value(&request).expect("request serializes")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ScoreResponse = serde_json::from_value(body).expect("response parses");
    assert_eq!(response, derive_score(&request));
}

#[tokio::test]
async fn submission_reports_corrections_and_ready_view() {
    let session = instant_session();
    let form = json!({
        "text": "Uma comédia romântica num casamento caótico",
        "genres": ["Comédia", "Mystery"],
        "rating": "PG-13",
        "budget": "a lot"
    });

    let (status, body) = call(
        pitch_router(session.clone()),
        Method::POST,
        "/api/v1/pitch/submissions",
        Some(form),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "resolved");
    assert_eq!(body["sequence"], 1);
    assert_eq!(body["corrections"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["view"]["state"], "ready");
    assert_eq!(body["view"]["dashboard"]["radar"].as_array().map(Vec::len), Some(5));

    let (status, view) = call(
        pitch_router(session),
        Method::GET,
        "/api/v1/pitch/view",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "ready");
    assert_eq!(view["sequence"], 1);
}

#[tokio::test]
async fn blank_pitch_is_rejected() {
    let session = instant_session();

    let (status, body) = call(
        pitch_router(session.clone()),
        Method::POST,
        "/api/v1/pitch/submissions",
        Some(json!({ "text": "   ", "genres": ["Drama"] })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().is_some());
    assert_eq!(session.latest_sequence(), 0);
}

#[tokio::test]
async fn delete_clears_the_view() {
    let session = instant_session();
    session.submit(ScoreRequest::new("Um detetive aposentado")).await;

    let (status, view) = call(
        pitch_router(session.clone()),
        Method::DELETE,
        "/api/v1/pitch/submissions",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "empty");
    assert_eq!(view["message"], "No result yet");
}

#[tokio::test]
async fn remote_scorer_round_trips_through_a_served_engine() {
    let base = spawn_server(pitch_router(instant_session())).await;
    let mut config = RemoteScoringConfig::new(format!("{base}/api/v1/pitch/score"));
    config.api_key = Some("local-token".to_string());
    let scorer = RemoteScorer::new(config).expect("scorer builds");

    let request = ScoreRequest::new("Uma invasão alienígena em Recife")
        .with_tone("sombrio")
        .with_budget_hint(25_000_000.0);
    let response = scorer.score(request.clone()).await.expect("remote scores");

    assert_eq!(response, derive_score(&request));
}

#[tokio::test]
async fn remote_scorer_rejects_out_of_range_reports() {
    let mut bogus = serde_json::to_value(derive_score(&ScoreRequest::new("x"))).expect("serializes");
    bogus["successProbability"] = json!(1.5);
    let router = Router::new().route(
        "/score",
        post(move || {
            let bogus = bogus.clone();
            async move { Json(bogus) }
        }),
    );
    let base = spawn_server(router).await;
    let scorer = RemoteScorer::new(RemoteScoringConfig::new(format!("{base}/score")))
        .expect("scorer builds");

    let result = scorer.score(ScoreRequest::new("Uma fuga")).await;

    assert!(matches!(result, Err(ScoringError::InvalidResponse(_))));
}

#[tokio::test]
async fn remote_scorer_surfaces_upstream_status() {
    let router = Router::new().route(
        "/score",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    );
    let base = spawn_server(router).await;
    let scorer = RemoteScorer::new(RemoteScoringConfig::new(format!("{base}/score")))
        .expect("scorer builds");

    let result = scorer.score(ScoreRequest::new("Uma fuga")).await;

    match result {
        Err(ScoringError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "model crashed");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}
