use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use super::backend::{ScoringBackend, ScoringError};
use super::catalog::{
    genre_adjustment, BIG_BUDGET_GENRES, BIG_PEER_BUDGET_USD, CROWD_PLEASER_GENRES,
    DEFAULT_BUDGET_USD, DEFAULT_PEER_BUDGET_USD, EPIC_BUDGET_USD, FALLBACK_GENRE,
    INFERRED_GENRE_LIMIT, REFERENCE_POOL,
};
use super::domain::{
    Driver, Genre, NearestItem, RadarProfile, ScoreRequest, ScoreResponse, NEAREST_ITEM_COUNT,
    SIMILARITY_RANGE, SUCCESS_CEILING, SUCCESS_FLOOR,
};
use super::fingerprint::content_hash;
use super::inference::{infer_genres, is_epic};
use super::validation::normalize_budget_hint;

/// Pitch length the base score is centred on, in characters.
const TARGET_LENGTH: f64 = 400.0;
const LENGTH_SCALE: f64 = 600.0;

const ORIGINALITY_WEIGHT: f64 = 0.15;
const AUDIENCE_APPEAL_WEIGHT: f64 = 0.12;
const BUDGET_FEASIBILITY_WEIGHT: f64 = 0.18;
const PRODUCTION_RISK_WEIGHT: f64 = 0.15;

const GENRE_COUNT_BONUS: f64 = 0.05;
const CROWD_PLEASER_BONUS: f64 = 0.08;

/// The five explanatory factors reported with every score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    GenreCombination,
    Originality,
    AudienceAppeal,
    BudgetVsPeers,
    ProductionRisk,
}

impl DriverKind {
    pub fn label(self) -> &'static str {
        match self {
            DriverKind::GenreCombination => "Genre combination",
            DriverKind::Originality => "Originality",
            DriverKind::AudienceAppeal => "Audience appeal",
            DriverKind::BudgetVsPeers => "Budget vs. peers",
            DriverKind::ProductionRisk => "Production risk",
        }
    }
}

/// Every intermediate value of a derivation, kept for audits and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub content_hash: u32,
    pub effective_genres: Vec<Genre>,
    pub genre_adjustment: f64,
    pub budget_usd: f64,
    pub peer_budget_usd: f64,
    pub radar: RadarProfile,
    pub success_probability: f64,
}

impl ScoreBreakdown {
    pub fn compute(request: &ScoreRequest) -> Self {
        let base = length_base(&request.text);
        let hash = content_hash(request);
        let effective_genres = resolve_genres(request);
        let genre_adjustment: f64 = effective_genres.iter().copied().map(genre_adjustment).sum();

        let budget_usd = resolve_budget(request);
        let peer_budget_usd = if effective_genres
            .iter()
            .any(|genre| BIG_BUDGET_GENRES.contains(genre))
        {
            BIG_PEER_BUDGET_USD
        } else {
            DEFAULT_PEER_BUDGET_USD
        };
        let budget_feasibility = clamp01(
            1.0 - (budget_usd - peer_budget_usd).abs() / (peer_budget_usd * 2.0).max(1.0),
        );

        let genre_bonus = GENRE_COUNT_BONUS * effective_genres.len().saturating_sub(1) as f64;
        let crowd_bonus = if effective_genres
            .iter()
            .any(|genre| CROWD_PLEASER_GENRES.contains(genre))
        {
            CROWD_PLEASER_BONUS
        } else {
            0.0
        };

        let radar = RadarProfile {
            originality: clamp01(0.35 + hash_unit(hash, 0) * 0.5 + genre_bonus),
            clarity: clamp01(0.4 + hash_unit(hash, 8) * 0.5),
            audience_appeal: clamp01(0.4 + hash_unit(hash, 16) * 0.45 + crowd_bonus),
            budget_feasibility,
            production_risk: clamp01(
                0.3 + hash_unit(hash, 24) * 0.4 + (1.0 - budget_feasibility) * 0.3,
            ),
        };

        let mut breakdown = Self {
            base,
            content_hash: hash,
            effective_genres,
            genre_adjustment,
            budget_usd,
            peer_budget_usd,
            radar,
            success_probability: 0.0,
        };
        let raw: f64 = breakdown.weighted_terms().iter().map(|(_, term)| term).sum();
        breakdown.success_probability = (base + raw).clamp(SUCCESS_FLOOR, SUCCESS_CEILING);
        breakdown
    }

    /// Signed contributions added to `base`, in fixed driver order.
    pub fn weighted_terms(&self) -> [(DriverKind, f64); 5] {
        let radar = &self.radar;
        [
            (DriverKind::GenreCombination, self.genre_adjustment),
            (
                DriverKind::Originality,
                (radar.originality - 0.5) * ORIGINALITY_WEIGHT,
            ),
            (
                DriverKind::AudienceAppeal,
                (radar.audience_appeal - 0.5) * AUDIENCE_APPEAL_WEIGHT,
            ),
            (
                DriverKind::BudgetVsPeers,
                (radar.budget_feasibility - 0.5) * BUDGET_FEASIBILITY_WEIGHT,
            ),
            (
                DriverKind::ProductionRisk,
                -(radar.production_risk - 0.5) * PRODUCTION_RISK_WEIGHT,
            ),
        ]
    }

    /// Drivers ordered by descending absolute impact; equal impacts keep the
    /// fixed driver order.
    pub fn drivers(&self) -> Vec<Driver> {
        let mut drivers: Vec<Driver> = self
            .weighted_terms()
            .into_iter()
            .map(|(kind, impact)| Driver {
                label: kind.label().to_string(),
                impact,
            })
            .collect();
        drivers.sort_by(|a, b| b.impact.abs().total_cmp(&a.impact.abs()));
        drivers
    }

    /// Top reference titles by hash-seeded similarity.
    pub fn nearest_items(&self) -> Vec<NearestItem> {
        let (low, high) = SIMILARITY_RANGE;
        let mut items: Vec<NearestItem> = REFERENCE_POOL
            .iter()
            .zip(0u32..)
            .map(|(reference, position)| {
                let slice = (self.content_hash >> (3 * position)) & 0x1F;
                let similarity = (low + f64::from(slice) / 31.0 * (high - low)).clamp(low, high);
                NearestItem {
                    title: reference.title.to_string(),
                    year: reference.year,
                    similarity,
                    return_multiple: reference.return_multiple,
                }
            })
            .collect();
        items.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        items.truncate(NEAREST_ITEM_COUNT);
        items
    }

    pub fn into_response(self) -> ScoreResponse {
        ScoreResponse {
            success_probability: self.success_probability,
            radar_profile: self.radar,
            drivers: self.drivers(),
            nearest_items: self.nearest_items(),
            inferred_genres: self.effective_genres,
        }
    }
}

/// Pure score derivation: identical requests always yield identical reports.
pub fn derive_score(request: &ScoreRequest) -> ScoreResponse {
    ScoreBreakdown::compute(request).into_response()
}

/// `min(0.4 + (tanh((len - 400) / 600) + 1) * 0.25, 0.95)` over the pitch's
/// character count.
pub fn length_base(text: &str) -> f64 {
    let length = text.chars().count() as f64;
    (0.4 + (((length - TARGET_LENGTH) / LENGTH_SCALE).tanh() + 1.0) * 0.25).min(SUCCESS_CEILING)
}

/// Chosen genres, else the top inferred ones, else the fallback genre.
pub fn resolve_genres(request: &ScoreRequest) -> Vec<Genre> {
    if !request.genres.is_empty() {
        return request.genres.iter().copied().collect();
    }

    let mut inferred = infer_genres(&request.text);
    inferred.truncate(INFERRED_GENRE_LIMIT);
    if inferred.is_empty() {
        inferred.push(FALLBACK_GENRE);
    }
    inferred
}

/// Budget hint if usable, else a default keyed on spectacle triggers.
pub fn resolve_budget(request: &ScoreRequest) -> f64 {
    match normalize_budget_hint(request.budget_hint_usd) {
        Some(budget) => budget,
        None if is_epic(&request.text) => EPIC_BUDGET_USD,
        None => DEFAULT_BUDGET_USD,
    }
}

fn hash_unit(hash: u32, shift: u32) -> f64 {
    f64::from((hash >> shift) & 0xFF) / 255.0
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Local stand-in for a scoring model: the heuristic behind an artificial
/// network delay.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    latency: Duration,
}

impl HeuristicScorer {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

#[async_trait]
impl ScoringBackend for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn score(&self, request: ScoreRequest) -> Result<ScoreResponse, ScoringError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let breakdown = ScoreBreakdown::compute(&request);
        debug!(
            hash = breakdown.content_hash,
            probability = breakdown.success_probability,
            genres = ?breakdown.effective_genres,
            "pitch scored"
        );
        Ok(breakdown.into_response())
    }
}
