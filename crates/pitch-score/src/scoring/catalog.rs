//! Fixed reference tables for the heuristic engine.
//!
//! These values are demo tuning rather than fitted parameters. They are part
//! of the scoring contract: changing any of them changes every derived score.

use super::domain::Genre;

/// Budget assumed for pitches that read as large-scale spectacle.
pub const EPIC_BUDGET_USD: f64 = 40_000_000.0;
/// Budget assumed when neither a hint nor a spectacle trigger is present.
pub const DEFAULT_BUDGET_USD: f64 = 8_000_000.0;
/// Typical budget for productions in a big-budget genre.
pub const BIG_PEER_BUDGET_USD: f64 = 30_000_000.0;
/// Typical budget for everything else.
pub const DEFAULT_PEER_BUDGET_USD: f64 = 8_000_000.0;

/// Genre used when nothing was chosen and nothing could be inferred.
pub const FALLBACK_GENRE: Genre = Genre::Drama;
/// Number of inferred genres kept when the request names none.
pub const INFERRED_GENRE_LIMIT: usize = 2;

pub const BIG_BUDGET_GENRES: [Genre; 6] = [
    Genre::Action,
    Genre::Adventure,
    Genre::Animation,
    Genre::Fantasy,
    Genre::SciFi,
    Genre::War,
];

/// Genres that earn the audience appeal bonus.
pub const CROWD_PLEASER_GENRES: [Genre; 2] = [Genre::Comedy, Genre::Horror];

pub fn genre_adjustment(genre: Genre) -> f64 {
    match genre {
        Genre::Action => 0.03,
        Genre::Adventure => 0.02,
        Genre::Animation => 0.04,
        Genre::Comedy => 0.02,
        Genre::Crime => 0.01,
        Genre::Documentary => -0.04,
        Genre::Drama => 0.0,
        Genre::Fantasy => 0.01,
        Genre::Horror => 0.05,
        Genre::Musical => -0.02,
        Genre::Romance => 0.01,
        Genre::SciFi => 0.02,
        Genre::Thriller => 0.03,
        Genre::War => -0.01,
    }
}

/// One row of the keyword table: word stems that vote for a genre.
///
/// Stems are regex fragments matched at a word start against lowercased,
/// accent-folded text. A trailing `\b` restricts a stem to the whole word.
pub struct KeywordRule {
    pub genre: Genre,
    pub stems: &'static [&'static str],
}

pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        genre: Genre::Action,
        stems: &[
            "acao", "action", "explos", "persegu", "chase", "tiroteio", "luta", "fight",
        ],
    },
    KeywordRule {
        genre: Genre::Comedy,
        stems: &[
            "comedi", "comedy", "engracad", "funny", "humor", "piada", "joke", "risad",
        ],
    },
    KeywordRule {
        genre: Genre::Horror,
        stems: &[
            "terror", "horror", "assombr", "haunt", "fantasma", "ghost", "monstr", "monster",
            "demoni", "demon",
        ],
    },
    KeywordRule {
        genre: Genre::Romance,
        stems: &[
            "amor\\b", "love", "romance", "romant", "paixao", "casamento", "wedding",
        ],
    },
    KeywordRule {
        genre: Genre::SciFi,
        stems: &[
            "espaco", "space", "alien", "robo", "futur", "ciencia", "science", "nave\\b",
            "planeta", "planet",
        ],
    },
    KeywordRule {
        genre: Genre::Fantasy,
        stems: &[
            "magia", "magic", "dragao", "dragon", "reino", "kingdom", "feiticeir", "wizard",
            "bruxa", "witch",
        ],
    },
    KeywordRule {
        genre: Genre::Crime,
        stems: &[
            "crime", "crimin", "assassin", "murder", "detetive", "detective", "policia",
            "police", "mafia", "roubo", "heist",
        ],
    },
    KeywordRule {
        genre: Genre::Thriller,
        stems: &[
            "suspense", "thriller", "conspira", "sequestr", "kidnap", "misteri", "myster",
        ],
    },
    KeywordRule {
        genre: Genre::War,
        stems: &[
            "guerra", "war\\b", "batalha", "battle", "soldad", "soldier", "exercito", "army",
        ],
    },
    KeywordRule {
        genre: Genre::Drama,
        stems: &[
            "famili", "family", "drama", "luto\\b", "grief", "perda", "loss\\b", "relacionament",
        ],
    },
    KeywordRule {
        genre: Genre::Musical,
        stems: &[
            "musica", "music", "cantor", "singer", "banda\\b", "band\\b", "danc", "dance",
        ],
    },
    KeywordRule {
        genre: Genre::Documentary,
        stems: &[
            "documentari", "documentary", "biografi", "biograph", "historia real", "true story",
        ],
    },
    KeywordRule {
        genre: Genre::Animation,
        stems: &["animacao", "animation", "animad", "animated", "cartoon", "desenho"],
    },
    KeywordRule {
        genre: Genre::Adventure,
        stems: &[
            "aventura", "adventure", "viagem", "journey", "tesouro", "treasure", "expedic",
            "expedition",
        ],
    },
    KeywordRule {
        genre: Genre::Horror,
        stems: &["zumbi", "zombie", "vampir", "slasher", "possess"],
    },
    KeywordRule {
        genre: Genre::Action,
        stems: &["tiro\\b", "arma\\b", "bomba", "bomb", "gun\\b", "mercenari"],
    },
];

/// Stems that mark a pitch as large-scale spectacle for the budget default.
pub const EPIC_STEMS: &[&str] = &[
    "guerra", "war\\b", "epic", "batalha", "battle", "imperio", "empire", "galax", "espaco",
    "space", "exercito", "army", "dragao", "dragon", "invas", "apocalip", "apocalyp",
];

/// A title in the similarity reference pool.
pub struct ReferenceTitle {
    pub title: &'static str,
    pub year: u16,
    pub return_multiple: Option<f64>,
}

/// Pool position determines which hash slice seeds each title's similarity.
pub const REFERENCE_POOL: [ReferenceTitle; 10] = [
    ReferenceTitle {
        title: "Sombras do Sertão",
        year: 2016,
        return_multiple: Some(3.2),
    },
    ReferenceTitle {
        title: "O Último Farol",
        year: 2019,
        return_multiple: None,
    },
    ReferenceTitle {
        title: "Maré Vermelha",
        year: 2012,
        return_multiple: Some(1.4),
    },
    ReferenceTitle {
        title: "Cidade dos Ecos",
        year: 2021,
        return_multiple: Some(2.7),
    },
    ReferenceTitle {
        title: "A Casa do Morro",
        year: 2008,
        return_multiple: Some(5.1),
    },
    ReferenceTitle {
        title: "Rota 116",
        year: 2015,
        return_multiple: None,
    },
    ReferenceTitle {
        title: "Noites de Carnaval",
        year: 2018,
        return_multiple: Some(0.8),
    },
    ReferenceTitle {
        title: "Órbita Baixa",
        year: 2023,
        return_multiple: Some(1.9),
    },
    ReferenceTitle {
        title: "Os Guardiões do Vale",
        year: 2010,
        return_multiple: Some(4.4),
    },
    ReferenceTitle {
        title: "Última Chamada",
        year: 2020,
        return_multiple: None,
    },
];
