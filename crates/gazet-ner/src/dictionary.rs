//! Entity dictionary
//!
//! Learned entities live in two indexes:
//! - the head index, keyed by a single normalized word. It holds single-word
//!   entities and, for multi-word entities, the first word together with the
//!   distinct phrase lengths starting with it (`word_counts`, longest first).
//! - the phrase index, keyed by the full normalized phrase.
//!
//! A head entry can be a complete entity and the start of longer phrases at
//! the same time; the matcher tries the phrases first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gazet_core::{collapse_whitespace, normalize, EntityDefinition, RecognizerConfig};

// ============================================================================
// Dictionary Entry
// ============================================================================

/// A learned entity, i.e. its definition without the `text`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Lengths of the phrases starting with this word, longest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_counts: Option<Vec<usize>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Serialized names of the typed entry fields; extras must not repeat them
const ENTRY_FIELDS: &[&str] = &["entityType", "uid", "value", "wordCounts"];

impl DictionaryEntry {
    fn from_definition(definition: &EntityDefinition) -> Self {
        let extra = definition
            .extra
            .iter()
            .filter(|(key, _)| !ENTRY_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            entity_type: definition.entity_type.clone(),
            uid: definition.uid.clone(),
            value: definition.value.clone(),
            word_counts: None,
            extra,
        }
    }

    /// Whether this word starts at least one multi-word entity
    pub fn starts_phrases(&self) -> bool {
        self.word_counts.as_ref().is_some_and(|counts| !counts.is_empty())
    }

    /// Whether this word is an entity on its own
    pub fn is_entity(&self) -> bool {
        self.entity_type.is_some()
    }

    fn add_word_count(&mut self, count: usize) {
        let counts = self.word_counts.get_or_insert_with(Vec::new);
        if !counts.contains(&count) {
            counts.push(count);
        }
    }
}

// ============================================================================
// Entity Dictionary
// ============================================================================

/// Head and phrase indexes populated by [`learn`](EntityDictionary::learn)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDictionary {
    head: BTreeMap<String, DictionaryEntry>,
    phrases: BTreeMap<String, DictionaryEntry>,
}

impl EntityDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a dictionary from previously exported indexes
    pub fn from_indexes(
        head: BTreeMap<String, DictionaryEntry>,
        phrases: BTreeMap<String, DictionaryEntry>,
    ) -> Self {
        Self { head, phrases }
    }

    /// Learn a batch of definitions, returning how many were accepted.
    ///
    /// Definitions without text or entity type are skipped. Later
    /// definitions override earlier ones for the same text, except that the
    /// phrase lengths recorded on a head word are always kept.
    pub fn learn<'a, I>(&mut self, definitions: I, config: &RecognizerConfig) -> usize
    where
        I: IntoIterator<Item = &'a EntityDefinition>,
    {
        let mut accepted = 0;

        for definition in definitions {
            if !definition.is_acceptable() {
                continue;
            }
            accepted += 1;

            let text = definition.text.as_deref().unwrap_or_default();
            let text = normalize(&collapse_whitespace(text), config.ignore_diacritics);
            let words: Vec<&str> = text.split_whitespace().collect();

            match words.as_slice() {
                [] => {}
                [word] => self.upsert_head(word, DictionaryEntry::from_definition(definition)),
                _ => self.add_phrase(&words, definition),
            }
        }

        // Longest phrase first during recognition.
        for entry in self.head.values_mut() {
            if let Some(counts) = entry.word_counts.as_mut() {
                counts.sort_unstable_by(|a, b| b.cmp(a));
            }
        }

        tracing::debug!(
            "Learned {} entities (head index: {}, phrase index: {})",
            accepted,
            self.head.len(),
            self.phrases.len()
        );

        accepted
    }

    /// Insert a single-word entry, keeping any phrase lengths already recorded
    fn upsert_head(&mut self, word: &str, mut entry: DictionaryEntry) {
        if let Some(previous) = self.head.remove(word) {
            if previous.word_counts.is_some() {
                entry.word_counts = previous.word_counts;
            }
        }
        self.head.insert(word.to_string(), entry);
    }

    fn add_phrase(&mut self, words: &[&str], definition: &EntityDefinition) {
        let entry = DictionaryEntry::from_definition(definition);
        let phrase = words.join(" ");

        self.head
            .entry(words[0].to_string())
            .or_default()
            .add_word_count(words.len());

        // Letter-spaced acronyms ("u s a") are also reachable as one word.
        if is_spelled_acronym(&phrase, words.len()) {
            let alias = words.concat();
            tracing::trace!("Registering acronym alias '{}' for '{}'", alias, phrase);
            self.upsert_head(&alias, entry.clone());
        }

        self.phrases.insert(phrase, entry);
    }

    /// Entry for a single normalized word
    pub fn head(&self, word: &str) -> Option<&DictionaryEntry> {
        self.head.get(word)
    }

    /// Entry for a normalized, single-space joined phrase
    pub fn phrase(&self, phrase: &str) -> Option<&DictionaryEntry> {
        self.phrases.get(phrase)
    }

    pub fn head_index(&self) -> &BTreeMap<String, DictionaryEntry> {
        &self.head
    }

    pub fn phrase_index(&self) -> &BTreeMap<String, DictionaryEntry> {
        &self.phrases
    }

    pub fn head_len(&self) -> usize {
        self.head.len()
    }

    pub fn phrase_len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.phrases.is_empty()
    }

    pub fn clear(&mut self) {
        self.head.clear();
        self.phrases.clear();
    }
}

/// Single letters separated by single spaces: `2 * words == chars + 1`
fn is_spelled_acronym(phrase: &str, word_count: usize) -> bool {
    2 * word_count == phrase.chars().count() + 1
}
