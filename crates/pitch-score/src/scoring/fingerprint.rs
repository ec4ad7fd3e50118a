//! Canonical request encoding and the content hash derived from it.
//!
//! Every implementation of the heuristic must agree on these bytes, so the
//! encoding is versioned and written out field by field rather than left to a
//! serializer's key ordering.

use serde_json::Value;

use super::domain::ScoreRequest;
use super::validation::normalize_budget_hint;

pub const ENCODING_VERSION: u32 = 1;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Key-sorted compact JSON encoding of everything in the request but the text.
///
/// Genres are written in vocabulary order, the budget hint after
/// normalization, and a blank tone as `null`.
pub fn canonical_options(request: &ScoreRequest) -> String {
    let budget = normalize_budget_hint(request.budget_hint_usd).map_or(Value::Null, Value::from);
    let genres = Value::from(
        request
            .genres
            .iter()
            .map(|genre| genre.label())
            .collect::<Vec<_>>(),
    );
    let rating = Value::from(request.rating.label());
    let tone = request
        .tone
        .as_deref()
        .map(str::trim)
        .filter(|tone| !tone.is_empty())
        .map_or(Value::Null, Value::from);

    format!(
        r#"{{"budgetHintUsd":{budget},"genres":{genres},"rating":{rating},"tone":{tone},"version":{ENCODING_VERSION}}}"#
    )
}

/// 32-bit FNV-1a over the text followed by [`canonical_options`].
pub fn content_hash(request: &ScoreRequest) -> u32 {
    let mut hasher = Fnv1a32::new();
    hasher.write(request.text.as_bytes());
    hasher.write(canonical_options(request).as_bytes());
    hasher.finish()
}

#[derive(Debug, Clone, Copy)]
pub struct Fnv1a32 {
    state: u32,
}

impl Fnv1a32 {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= u32::from(*byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn finish(&self) -> u32 {
        self.state
    }
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}
