use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::catalog::{EPIC_STEMS, KEYWORD_RULES};
use super::domain::Genre;

/// Keyword table compiled once; a rule whose pattern fails to compile
/// contributes no matches.
static KEYWORD_PATTERNS: LazyLock<Vec<(Genre, Option<Regex>)>> = LazyLock::new(|| {
    KEYWORD_RULES
        .iter()
        .map(|rule| (rule.genre, stem_pattern(rule.stems)))
        .collect()
});

static EPIC_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| stem_pattern(EPIC_STEMS));

fn stem_pattern(stems: &[&str]) -> Option<Regex> {
    Regex::new(&format!(r"\b(?:{})", stems.join("|"))).ok()
}

/// Lowercases `text` and strips Portuguese and Spanish diacritics.
///
/// Other accented letters pass through unchanged, which is enough for the
/// keyword stems.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Aggregate keyword hits for one genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenreTally {
    pub genre: Genre,
    pub matches: usize,
}

/// Counts keyword hits per genre, most hits first.
///
/// Genres with no hits are dropped. Ties keep the order in which the genre
/// first appears in the keyword table.
pub fn tally_genres(text: &str) -> Vec<GenreTally> {
    let folded = fold_accents(text);
    let mut tallies: Vec<GenreTally> = Vec::new();

    for (genre, pattern) in KEYWORD_PATTERNS.iter() {
        let matches = pattern
            .as_ref()
            .map(|regex| regex.find_iter(&folded).count())
            .unwrap_or(0);

        match tallies.iter_mut().find(|tally| tally.genre == *genre) {
            Some(tally) => tally.matches += matches,
            None => tallies.push(GenreTally {
                genre: *genre,
                matches,
            }),
        }
    }

    tallies.retain(|tally| tally.matches > 0);
    tallies.sort_by(|a, b| b.matches.cmp(&a.matches));
    tallies
}

/// Ranked genres inferred from free text; empty when nothing matches.
pub fn infer_genres(text: &str) -> Vec<Genre> {
    tally_genres(text)
        .into_iter()
        .map(|tally| tally.genre)
        .collect()
}

/// Whether the pitch reads as large-scale spectacle.
pub fn is_epic(text: &str) -> bool {
    let folded = fold_accents(text);
    EPIC_PATTERN
        .as_ref()
        .is_some_and(|regex| regex.is_match(&folded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_accents_and_case() {
        assert_eq!(fold_accents("AÇÃO e Comédia"), "acao e comedia");
        assert_eq!(fold_accents("Órbita"), "orbita");
    }

    #[test]
    fn every_keyword_pattern_compiles() {
        assert_eq!(KEYWORD_PATTERNS.len(), KEYWORD_RULES.len());
        for (genre, pattern) in KEYWORD_PATTERNS.iter() {
            assert!(pattern.is_some(), "{genre:?} stems do not compile");
        }
        assert!(EPIC_PATTERN.is_some());
    }

    #[test]
    fn empty_text_infers_nothing() {
        assert!(infer_genres("").is_empty());
        assert!(infer_genres("uma tarde tranquila").is_empty());
    }

    #[test]
    fn ranks_by_match_count() {
        let genres = infer_genres("Uma comédia romântica: amor, piadas e muito humor.");
        assert_eq!(genres, vec![Genre::Comedy, Genre::Romance]);
    }

    #[test]
    fn sums_counts_across_rules_for_the_same_genre() {
        let tallies = tally_genres("Zumbis e vampiros num terror de fantasmas");
        let horror = tallies
            .iter()
            .find(|tally| tally.genre == Genre::Horror)
            .expect("horror tallied");
        assert_eq!(horror.matches, 4);
        assert_eq!(tallies.len(), 1);
    }

    #[test]
    fn ties_follow_keyword_table_order() {
        // one hit each: Romance is listed before War in the table
        let genres = infer_genres("guerra e amor");
        assert_eq!(genres, vec![Genre::Romance, Genre::War]);
    }

    #[test]
    fn whole_word_stems_do_not_match_longer_words() {
        assert!(infer_genres("a warning about the software").is_empty());
    }

    #[test]
    fn detects_spectacle_triggers() {
        assert!(is_epic("Uma GUERRA entre irmãos"));
        assert!(is_epic("an epic space saga"));
        assert!(!is_epic("um jantar em família"));
    }
}
