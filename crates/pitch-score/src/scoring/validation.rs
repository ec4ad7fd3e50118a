use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::warn;

use super::domain::{Genre, Rating, ScoreRequest};

/// Problems found while turning raw form input into a [`ScoreRequest`].
///
/// Apart from [`InputValidationError::MissingPitch`] these are corrections:
/// the offending field is defaulted and the submission proceeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputValidationError {
    #[error("pitch text is required")]
    MissingPitch,
    #[error("budget '{raw}' is not a number; ignoring it")]
    BudgetNotNumeric { raw: String },
    #[error("budget {value} is negative; ignoring it")]
    BudgetNegative { value: f64 },
    #[error("budget '{raw}' is not a finite number; ignoring it")]
    BudgetNotFinite { raw: String },
    #[error("unknown genre '{label}' was dropped")]
    UnknownGenre { label: String },
    #[error("unknown rating '{label}'; using {fallback}")]
    UnknownRating {
        label: String,
        fallback: &'static str,
    },
}

/// Treats negative and non-finite budget hints as absent.
pub fn normalize_budget_hint(hint: Option<f64>) -> Option<f64> {
    hint.filter(|value| value.is_finite() && *value >= 0.0)
}

/// Parses a budget field as typed by a user.
///
/// Blank input means "no hint". Currency signs, spaces and `_` separators are
/// ignored; anything else that is not a non-negative finite number is an
/// error.
pub fn parse_budget_hint(raw: &str) -> Result<Option<f64>, InputValidationError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| InputValidationError::BudgetNotNumeric {
            raw: raw.to_string(),
        })?;

    if !value.is_finite() {
        return Err(InputValidationError::BudgetNotFinite {
            raw: raw.to_string(),
        });
    }
    if value < 0.0 {
        return Err(InputValidationError::BudgetNegative { value });
    }
    Ok(Some(value))
}

/// Form state as submitted by the presentation layer: every field is the raw
/// string the user typed or picked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PitchForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub budget: String,
}

/// Request built from a form plus the corrections applied on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedForm {
    pub request: ScoreRequest,
    pub corrections: Vec<InputValidationError>,
}

impl PitchForm {
    /// Builds the scoring request, defaulting any malformed optional field.
    ///
    /// Only a blank pitch is rejected outright.
    pub fn normalize(self) -> Result<NormalizedForm, InputValidationError> {
        if self.text.trim().is_empty() {
            return Err(InputValidationError::MissingPitch);
        }

        let mut corrections = Vec::new();

        let mut genres = BTreeSet::new();
        for label in self.genres.iter().filter(|label| !label.trim().is_empty()) {
            match Genre::from_label(label) {
                Some(genre) => {
                    genres.insert(genre);
                }
                None => corrections.push(InputValidationError::UnknownGenre {
                    label: label.clone(),
                }),
            }
        }

        let rating = if self.rating.trim().is_empty() {
            Rating::default()
        } else {
            Rating::from_label(&self.rating).unwrap_or_else(|| {
                corrections.push(InputValidationError::UnknownRating {
                    label: self.rating.clone(),
                    fallback: Rating::default().label(),
                });
                Rating::default()
            })
        };

        let budget_hint_usd = parse_budget_hint(&self.budget).unwrap_or_else(|error| {
            corrections.push(error);
            None
        });

        let tone = Some(self.tone.trim().to_string()).filter(|tone| !tone.is_empty());

        for correction in &corrections {
            warn!(%correction, "pitch form input corrected");
        }

        Ok(NormalizedForm {
            request: ScoreRequest {
                text: self.text,
                genres,
                tone,
                rating,
                budget_hint_usd,
            },
            corrections,
        })
    }
}
