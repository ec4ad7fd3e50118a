use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::backend::ScoringError;

/// Lower clamp applied to the headline probability.
pub const SUCCESS_FLOOR: f64 = 0.05;
/// Upper clamp applied to the headline probability.
pub const SUCCESS_CEILING: f64 = 0.95;
/// Number of similar titles returned with every response.
pub const NEAREST_ITEM_COUNT: usize = 5;
/// Number of drivers returned with every response.
pub const DRIVER_COUNT: usize = 5;
/// Similarity range the reference pool is scaled into.
pub const SIMILARITY_RANGE: (f64, f64) = (0.6, 0.95);

/// Category labels understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Comedy,
    Crime,
    Documentary,
    Drama,
    Fantasy,
    Horror,
    Musical,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
    War,
}

impl Genre {
    pub const ALL: [Genre; 14] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Animation,
        Genre::Comedy,
        Genre::Crime,
        Genre::Documentary,
        Genre::Drama,
        Genre::Fantasy,
        Genre::Horror,
        Genre::Musical,
        Genre::Romance,
        Genre::SciFi,
        Genre::Thriller,
        Genre::War,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Animation => "Animation",
            Genre::Comedy => "Comedy",
            Genre::Crime => "Crime",
            Genre::Documentary => "Documentary",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasy",
            Genre::Horror => "Horror",
            Genre::Musical => "Musical",
            Genre::Romance => "Romance",
            Genre::SciFi => "Sci-Fi",
            Genre::Thriller => "Thriller",
            Genre::War => "War",
        }
    }

    /// Portuguese label as shown on the original form.
    fn local_label(self) -> &'static str {
        match self {
            Genre::Action => "Ação",
            Genre::Adventure => "Aventura",
            Genre::Animation => "Animação",
            Genre::Comedy => "Comédia",
            Genre::Crime => "Policial",
            Genre::Documentary => "Documentário",
            Genre::Drama => "Drama",
            Genre::Fantasy => "Fantasia",
            Genre::Horror => "Terror",
            Genre::Musical => "Musical",
            Genre::Romance => "Romance",
            Genre::SciFi => "Ficção Científica",
            Genre::Thriller => "Suspense",
            Genre::War => "Guerra",
        }
    }

    /// Parses a user-facing label, ignoring case, accents, spaces and dashes.
    ///
    /// Both the English labels and their Portuguese form-field equivalents are
    /// accepted, so `"sci fi"`, `"Sci-Fi"` and `"ficção científica"` all
    /// resolve to [`Genre::SciFi`].
    pub fn from_label(raw: &str) -> Option<Self> {
        let key = label_key(raw);
        if key.is_empty() {
            return None;
        }
        Genre::ALL
            .into_iter()
            .find(|genre| label_key(genre.label()) == key || label_key(genre.local_label()) == key)
    }
}

fn label_key(raw: &str) -> String {
    super::inference::fold_accents(raw)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Audience rating carried by the request contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    G,
    #[serde(rename = "PG")]
    Pg,
    #[default]
    #[serde(rename = "PG-13")]
    Pg13,
    R,
    #[serde(rename = "NC-17")]
    Nc17,
}

impl Rating {
    pub fn label(self) -> &'static str {
        match self {
            Rating::G => "G",
            Rating::Pg => "PG",
            Rating::Pg13 => "PG-13",
            Rating::R => "R",
            Rating::Nc17 => "NC-17",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match key.as_str() {
            "G" | "L" => Some(Rating::G),
            "PG" => Some(Rating::Pg),
            "PG13" => Some(Rating::Pg13),
            "R" => Some(Rating::R),
            "NC17" => Some(Rating::Nc17),
            _ => None,
        }
    }
}

/// Input to a scoring backend, built fresh for every submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub genres: BTreeSet<Genre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_hint_usd: Option<f64>,
}

impl ScoreRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = Genre>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_budget_hint(mut self, budget_usd: f64) -> Self {
        self.budget_hint_usd = Some(budget_usd);
        self
    }
}

/// Five quality axes, each normalized to `[0, 1]`.
///
/// `production_risk` is oriented so that lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarProfile {
    pub originality: f64,
    pub clarity: f64,
    pub audience_appeal: f64,
    pub budget_feasibility: f64,
    pub production_risk: f64,
}

impl RadarProfile {
    pub fn axes(&self) -> [(&'static str, f64); 5] {
        [
            ("originality", self.originality),
            ("clarity", self.clarity),
            ("audienceAppeal", self.audience_appeal),
            ("budgetFeasibility", self.budget_feasibility),
            ("productionRisk", self.production_risk),
        ]
    }
}

/// Labelled signed contribution to the headline score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub label: String,
    pub impact: f64,
}

/// Reference title judged similar to the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestItem {
    pub title: String,
    pub year: u16,
    pub similarity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_multiple: Option<f64>,
}

/// Score report returned across the scoring boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub success_probability: f64,
    pub radar_profile: RadarProfile,
    pub drivers: Vec<Driver>,
    pub nearest_items: Vec<NearestItem>,
    pub inferred_genres: Vec<Genre>,
}

impl ScoreResponse {
    /// Checks the response invariants a consumer relies on.
    ///
    /// The heuristic engine always satisfies these; remote backends are held
    /// to them before their output reaches the presentation layer.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let p = self.success_probability;
        if !(SUCCESS_FLOOR..=SUCCESS_CEILING).contains(&p) {
            return Err(invalid(format!(
                "successProbability {p} outside [{SUCCESS_FLOOR}, {SUCCESS_CEILING}]"
            )));
        }

        for (axis, value) in self.radar_profile.axes() {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("radar axis {axis} = {value} outside [0, 1]")));
            }
        }

        if self.drivers.len() != DRIVER_COUNT {
            return Err(invalid(format!(
                "expected {DRIVER_COUNT} drivers, got {}",
                self.drivers.len()
            )));
        }
        if self.drivers.iter().any(|driver| !driver.impact.is_finite()) {
            return Err(invalid("driver impact is not finite".to_string()));
        }
        if self
            .drivers
            .windows(2)
            .any(|pair| pair[0].impact.abs() < pair[1].impact.abs())
        {
            return Err(invalid("drivers are not sorted by absolute impact".to_string()));
        }

        if self.nearest_items.len() != NEAREST_ITEM_COUNT {
            return Err(invalid(format!(
                "expected {NEAREST_ITEM_COUNT} nearest items, got {}",
                self.nearest_items.len()
            )));
        }
        if let Some(item) = self
            .nearest_items
            .iter()
            .find(|item| !(0.0..=1.0).contains(&item.similarity))
        {
            return Err(invalid(format!(
                "similarity {} for '{}' outside [0, 1]",
                item.similarity, item.title
            )));
        }
        if self
            .nearest_items
            .windows(2)
            .any(|pair| pair[0].similarity < pair[1].similarity)
        {
            return Err(invalid("nearest items are not sorted by similarity".to_string()));
        }

        if self.inferred_genres.is_empty() {
            return Err(invalid("inferredGenres is empty".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ScoringError {
    ScoringError::InvalidResponse(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_labels_parse_in_both_languages() {
        assert_eq!(Genre::from_label("sci fi"), Some(Genre::SciFi));
        assert_eq!(Genre::from_label("Sci-Fi"), Some(Genre::SciFi));
        assert_eq!(Genre::from_label("ficção científica"), Some(Genre::SciFi));
        assert_eq!(Genre::from_label("COMÉDIA"), Some(Genre::Comedy));
        assert_eq!(Genre::from_label("guerra"), Some(Genre::War));
        assert_eq!(Genre::from_label("  "), None);
        assert_eq!(Genre::from_label("western"), None);
    }

    #[test]
    fn rating_defaults_to_pg13_and_parses_loosely() {
        assert_eq!(Rating::default(), Rating::Pg13);
        assert_eq!(Rating::from_label("pg-13"), Some(Rating::Pg13));
        assert_eq!(Rating::from_label("NC 17"), Some(Rating::Nc17));
        assert_eq!(Rating::from_label("X"), None);
    }

    #[test]
    fn request_uses_camel_case_on_the_wire() {
        let request = ScoreRequest::new("Um faroleiro")
            .with_genres([Genre::Drama, Genre::SciFi])
            .with_budget_hint(2_500_000.0);

        let value = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(value["budgetHintUsd"], 2_500_000.0);
        assert_eq!(value["genres"], serde_json::json!(["Drama", "Sci-Fi"]));
        assert_eq!(value["rating"], "PG-13");
        assert!(value.get("tone").is_none());
    }

    #[test]
    fn request_fields_default_when_missing() {
        let request: ScoreRequest =
            serde_json::from_str(r#"{"text":"só o texto"}"#).expect("request parses");

        assert_eq!(request.text, "só o texto");
        assert!(request.genres.is_empty());
        assert_eq!(request.rating, Rating::Pg13);
        assert_eq!(request.budget_hint_usd, None);
    }
}
