use serde::Serialize;

use super::domain::{Driver, NearestItem, ScoreResponse};

/// Shown in place of a missing return multiple.
pub const EMPTY_VALUE_MARKER: &str = "—";
/// Smallest half-range of the driver chart's Y axis.
pub const MIN_DRIVER_DOMAIN: f64 = 0.2;
/// Sweep of the gauge at probability 1.
pub const GAUGE_SWEEP_DEGREES: f64 = 180.0;
/// Message for the neutral state before any score exists.
pub const NO_RESULT_MESSAGE: &str = "No result yet";

/// Half-circle gauge for the headline probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub probability: f64,
    pub percent: u8,
    pub sweep_degrees: f64,
}

impl GaugeView {
    pub fn new(probability: f64) -> Self {
        let probability = probability.clamp(0.0, 1.0);
        Self {
            probability,
            percent: (probability * 100.0).round() as u8,
            sweep_degrees: probability * GAUGE_SWEEP_DEGREES,
        }
    }
}

/// One spoke of the radar chart, oriented so that higher is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxisView {
    pub axis: &'static str,
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverBarView {
    pub label: String,
    pub impact: f64,
    pub positive: bool,
}

/// Driver bar chart with a Y domain symmetric around zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverChartView {
    pub bars: Vec<DriverBarView>,
    pub domain: [f64; 2],
}

impl DriverChartView {
    pub fn new(drivers: &[Driver]) -> Self {
        let extent = drivers
            .iter()
            .map(|driver| driver.impact.abs())
            .fold(MIN_DRIVER_DOMAIN, f64::max);
        Self {
            bars: drivers
                .iter()
                .map(|driver| DriverBarView {
                    label: driver.label.clone(),
                    impact: driver.impact,
                    positive: driver.impact >= 0.0,
                })
                .collect(),
            domain: [-extent, extent],
        }
    }
}

/// Row of the similar titles table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityRowView {
    pub title: String,
    pub year: u16,
    pub similarity: String,
    pub return_multiple: String,
}

impl From<&NearestItem> for SimilarityRowView {
    fn from(item: &NearestItem) -> Self {
        Self {
            title: item.title.clone(),
            year: item.year,
            similarity: format_similarity(item.similarity),
            return_multiple: format_return_multiple(item.return_multiple),
        }
    }
}

/// Everything the dashboard renders for one score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDashboard {
    pub gauge: GaugeView,
    pub radar: Vec<RadarAxisView>,
    pub drivers: DriverChartView,
    pub similar_titles: Vec<SimilarityRowView>,
    pub genres: Vec<&'static str>,
}

impl ScoreDashboard {
    pub fn from_response(response: &ScoreResponse) -> Self {
        let profile = &response.radar_profile;
        let radar = vec![
            RadarAxisView {
                axis: "originality",
                label: "Originality",
                value: profile.originality,
            },
            RadarAxisView {
                axis: "clarity",
                label: "Clarity",
                value: profile.clarity,
            },
            RadarAxisView {
                axis: "audienceAppeal",
                label: "Audience appeal",
                value: profile.audience_appeal,
            },
            RadarAxisView {
                axis: "budgetFeasibility",
                label: "Budget feasibility",
                value: profile.budget_feasibility,
            },
            RadarAxisView {
                axis: "productionRisk",
                label: "Low production risk",
                value: 1.0 - profile.production_risk,
            },
        ];

        Self {
            gauge: GaugeView::new(response.success_probability),
            radar,
            drivers: DriverChartView::new(&response.drivers),
            similar_titles: response
                .nearest_items
                .iter()
                .map(SimilarityRowView::from)
                .collect(),
            genres: response
                .inferred_genres
                .iter()
                .map(|genre| genre.label())
                .collect(),
        }
    }
}

/// What the presentation layer should show for the current submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScoreView {
    Empty {
        message: &'static str,
    },
    Pending {
        sequence: u64,
    },
    Ready {
        sequence: u64,
        dashboard: ScoreDashboard,
    },
    Failed {
        sequence: u64,
        message: String,
    },
}

impl ScoreView {
    pub fn empty() -> Self {
        ScoreView::Empty {
            message: NO_RESULT_MESSAGE,
        }
    }
}

pub fn format_similarity(similarity: f64) -> String {
    format!("{:.0}%", similarity * 100.0)
}

pub fn format_return_multiple(multiple: Option<f64>) -> String {
    match multiple {
        Some(value) => format!("{value:.1}x"),
        None => EMPTY_VALUE_MARKER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::ScoreRequest;
    use crate::scoring::engine::derive_score;

    #[test]
    fn gauge_maps_probability_to_half_circle() {
        let gauge = GaugeView::new(0.5);
        assert_eq!(gauge.sweep_degrees, 90.0);
        assert_eq!(gauge.percent, 50);
        assert!((GaugeView::new(0.95).sweep_degrees - 171.0).abs() < 1e-9);
        assert_eq!(GaugeView::new(1.4).sweep_degrees, GAUGE_SWEEP_DEGREES);
    }

    #[test]
    fn driver_domain_covers_at_least_point_two() {
        let small = [Driver {
            label: "Originality".to_string(),
            impact: 0.03,
        }];
        assert_eq!(DriverChartView::new(&small).domain, [-0.2, 0.2]);

        let large = [Driver {
            label: "Genre combination".to_string(),
            impact: -0.31,
        }];
        let chart = DriverChartView::new(&large);
        assert_eq!(chart.domain, [-0.31, 0.31]);
        assert!(!chart.bars[0].positive);
    }

    #[test]
    fn formats_table_cells() {
        assert_eq!(format_similarity(0.873), "87%");
        assert_eq!(format_return_multiple(Some(3.24)), "3.2x");
        assert_eq!(format_return_multiple(Some(0.8)), "0.8x");
        assert_eq!(format_return_multiple(None), EMPTY_VALUE_MARKER);
    }

    #[test]
    fn dashboard_inverts_production_risk() {
        let response = derive_score(&ScoreRequest::new("Uma batalha naval no Amazonas"));
        let dashboard = ScoreDashboard::from_response(&response);

        let risk = dashboard
            .radar
            .iter()
            .find(|axis| axis.axis == "productionRisk")
            .expect("risk axis present");
        assert!((risk.value - (1.0 - response.radar_profile.production_risk)).abs() < 1e-12);
        assert_eq!(dashboard.radar.len(), 5);
        assert_eq!(dashboard.similar_titles.len(), 5);
        assert_eq!(dashboard.drivers.bars.len(), 5);
    }

    #[test]
    fn empty_view_serializes_with_state_tag() {
        let value = serde_json::to_value(ScoreView::empty()).expect("view serializes");
        assert_eq!(value["state"], "empty");
        assert_eq!(value["message"], NO_RESULT_MESSAGE);
    }
}
