//! Greedy longest-match recognition
//!
//! Scans tokens left to right. A token whose normalized value (or its
//! singular form) is a head word either becomes a single-word entity or
//! starts a phrase attempt; phrase lengths are tried longest first and every
//! attempt rescans from the same start. Ignorable tokens inside a phrase are
//! skipped for lookup but kept in `original_seq`.

use serde_json::Map;

use gazet_core::{normalize, Lemmatizer, RecognizerConfig, Token, WORD_TAG};

use crate::dictionary::{DictionaryEntry, EntityDictionary};

/// Extra fields never copied onto tokens, they would shadow typed fields
const RESERVED_FIELDS: &[&str] = &["tag", "originalSeq"];

/// A phrase matched at some position
struct PhraseMatch {
    token: Token,
    /// Index just past the last consumed token
    next: usize,
}

/// Read-only view over a dictionary and configuration
pub struct Matcher<'a> {
    dictionary: &'a EntityDictionary,
    config: &'a RecognizerConfig,
    lemmatizer: &'a dyn Lemmatizer,
}

impl<'a> Matcher<'a> {
    pub fn new(
        dictionary: &'a EntityDictionary,
        config: &'a RecognizerConfig,
        lemmatizer: &'a dyn Lemmatizer,
    ) -> Self {
        Self {
            dictionary,
            config,
            lemmatizer,
        }
    }

    /// Recognize entities, merging multi-token matches into one token
    pub fn recognize(&self, tokens: &[Token]) -> Vec<Token> {
        let mut recognized = Vec::with_capacity(tokens.len());
        let mut entities = 0;
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];

            if self.config.ignores_tag(&token.tag) {
                recognized.push(token.clone());
                i += 1;
                continue;
            }

            let Some((key, entry)) = self.lookup_head(&token.value) else {
                recognized.push(token.clone());
                i += 1;
                continue;
            };

            let Some(word_counts) = entry.word_counts.as_deref() else {
                recognized.push(merge_single(token, entry, key));
                entities += 1;
                i += 1;
                continue;
            };

            match self.match_longest(tokens, i, word_counts) {
                Some(PhraseMatch { token: merged, next }) => {
                    recognized.push(merged);
                    entities += 1;
                    i = next;
                }
                None if entry.is_entity() => {
                    recognized.push(merge_single(token, entry, key));
                    entities += 1;
                    i += 1;
                }
                None => {
                    recognized.push(token.clone());
                    i += 1;
                }
            }
        }

        tracing::debug!(
            "Recognized {} entities in {} tokens ({} emitted)",
            entities,
            tokens.len(),
            recognized.len()
        );

        recognized
    }

    fn normalize(&self, value: &str) -> String {
        normalize(value, self.config.ignore_diacritics)
    }

    /// Head entry for a raw value, falling back to its singular form.
    /// Returns the key that matched.
    fn lookup_head(&self, raw: &str) -> Option<(String, &'a DictionaryEntry)> {
        let value = self.normalize(raw);
        if let Some(entry) = self.dictionary.head(&value) {
            return Some((value, entry));
        }

        let lemma = self.lemmatizer.singularize(&value);
        self.dictionary.head(&lemma).map(|entry| (lemma, entry))
    }

    /// First phrase length, in the given order, that yields a match
    fn match_longest(&self, tokens: &[Token], start: usize, word_counts: &[usize]) -> Option<PhraseMatch> {
        word_counts
            .iter()
            .find_map(|&length| self.match_phrase(tokens, start, length))
    }

    /// Try to match a phrase of `length` words starting at `start`
    fn match_phrase(&self, tokens: &[Token], start: usize, length: usize) -> Option<PhraseMatch> {
        // `length` can be any imported value
        let mut words = Vec::new();
        let mut original_seq = Vec::new();
        let mut next = start;

        while next < tokens.len() && words.len() < length {
            let token = &tokens[next];
            if !self.config.is_ignorable(&token.value, &token.tag) {
                words.push(self.normalize(&token.value));
            }
            original_seq.push(token.value.clone());
            next += 1;
        }

        if words.is_empty() {
            return None;
        }

        let entry = self.lookup_phrase(&mut words)?;
        tracing::trace!("Matched phrase '{}' at {}..{}", words.join(" "), start, next);

        let token = Token {
            value: entry.value.clone().unwrap_or_else(|| words.join(" ")),
            tag: WORD_TAG.to_string(),
            entity_type: entry.entity_type.clone(),
            uid: Some(entry.uid.clone().unwrap_or_else(|| words.join("_"))),
            original_seq: Some(original_seq),
            extra: copyable_fields(entry),
        };

        Some(PhraseMatch { token, next })
    }

    /// Phrase entry for `words`, retrying with the last word singularized.
    /// On a lemma hit `words` keeps the singular form.
    fn lookup_phrase(&self, words: &mut [String]) -> Option<&'a DictionaryEntry> {
        if let Some(entry) = self.dictionary.phrase(&words.join(" ")) {
            return Some(entry);
        }

        let last = words.last_mut()?;
        *last = self.lemmatizer.singularize(last);
        self.dictionary.phrase(&words.join(" "))
    }
}

/// Turn a token into a single-word entity
fn merge_single(token: &Token, entry: &DictionaryEntry, key: String) -> Token {
    let mut merged = token.clone();

    merged.original_seq = Some(vec![token.value.clone()]);
    if entry.entity_type.is_some() {
        merged.entity_type = entry.entity_type.clone();
    }
    merged.value = entry.value.clone().unwrap_or_else(|| key.clone());
    merged.uid = Some(entry.uid.clone().unwrap_or(key));
    merged.tag = WORD_TAG.to_string();
    merged.extra.extend(copyable_fields(entry));

    merged
}

fn copyable_fields(entry: &DictionaryEntry) -> Map<String, serde_json::Value> {
    entry
        .extra
        .iter()
        .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
