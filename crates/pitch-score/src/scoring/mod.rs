//! Pitch scoring: the heuristic engine, the backend boundary it sits behind,
//! and the views rendered from its reports.

pub mod backend;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod factory;
pub mod fingerprint;
pub mod inference;
pub mod remote;
pub mod validation;
pub mod views;

pub use backend::{ScoringBackend, ScoringError};
pub use domain::{
    Driver, Genre, NearestItem, RadarProfile, Rating, ScoreRequest, ScoreResponse, DRIVER_COUNT,
    NEAREST_ITEM_COUNT, SUCCESS_CEILING, SUCCESS_FLOOR,
};
pub use engine::{derive_score, DriverKind, HeuristicScorer, ScoreBreakdown};
pub use factory::build_scoring_backend;
pub use inference::{infer_genres, tally_genres, GenreTally};
pub use remote::RemoteScorer;
pub use validation::{InputValidationError, NormalizedForm, PitchForm};
pub use views::{ScoreDashboard, ScoreView};
