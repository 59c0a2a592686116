//! Text normalization and lemmatization
//!
//! Normalized text is what the dictionaries are keyed by: lowercased and,
//! when configured, stripped of diacritics. The lemmatizer reduces plural
//! nouns to their singular form so "bananas" can still find "banana".

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Lowercase `text`, optionally removing diacritics (`é` -> `e`)
pub fn normalize(text: &str, strip_diacritics: bool) -> String {
    if strip_diacritics {
        text.nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect::<String>()
            .to_lowercase()
    } else {
        text.to_lowercase()
    }
}

/// Trim and collapse every whitespace run to a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces an inflected word to its base (singular) form
pub trait Lemmatizer: Send + Sync {
    fn singularize(&self, word: &str) -> String;
}

impl<F> Lemmatizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn singularize(&self, word: &str) -> String {
        self(word)
    }
}

/// Words identical in singular and plural
const INVARIANT_NOUNS: &[&str] = &[
    "aircraft", "bison", "cattle", "deer", "fish", "means", "moose", "news", "police", "salmon",
    "series", "sheep", "species", "swine", "trout",
];

/// Irregular plurals, and `-ses` plurals of nouns ending in a single `s`
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("atlases", "atlas"),
    ("bonuses", "bonus"),
    ("buses", "bus"),
    ("calves", "calf"),
    ("campuses", "campus"),
    ("canvases", "canvas"),
    ("censuses", "census"),
    ("children", "child"),
    ("circuses", "circus"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("feet", "foot"),
    ("gases", "gas"),
    ("geese", "goose"),
    ("halves", "half"),
    ("heroes", "hero"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lenses", "lens"),
    ("lives", "life"),
    ("loaves", "loaf"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("people", "person"),
    ("phenomena", "phenomenon"),
    ("potatoes", "potato"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("statuses", "status"),
    ("teeth", "tooth"),
    ("thieves", "thief"),
    ("tomatoes", "tomato"),
    ("viruses", "virus"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
];

/// Rule-based English noun singularizer.
///
/// Expects already lowercased input. Unknown shapes are returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishNounLemmatizer;

impl EnglishNounLemmatizer {
    pub fn new() -> Self {
        Self
    }
}

impl Lemmatizer for EnglishNounLemmatizer {
    fn singularize(&self, word: &str) -> String {
        if let Some((_, singular)) = IRREGULAR_NOUNS.iter().find(|(plural, _)| *plural == word) {
            return (*singular).to_string();
        }

        if word.chars().count() <= 3 || INVARIANT_NOUNS.contains(&word) {
            return word.to_string();
        }

        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }

        for suffix in ["sses", "shes", "ches", "xes", "zzes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }

        match word.strip_suffix('s') {
            Some(stem) => stem.to_string(),
            None => word.to_string(),
        }
    }
}
