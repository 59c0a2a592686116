//! Gazet NER - Dictionary-based named entity recognition
//!
//! Recognizes learned entities (organizations, countries, products, ...) in
//! already tokenized text:
//! - Dictionary: two-level index learned from entity definitions
//! - Matcher: greedy longest-match over tokens, skipping ignorable tokens
//! - Snapshot: export/import of the learned state
//!
//! [`LookupNer`] ties the pieces together and owns all mutable state, so any
//! number of independent recognizers can coexist. It is not internally
//! synchronized; share it behind a lock if several threads need it.

use serde_json::Value;

use gazet_core::{
    ConfigError, ConfigOptions, ConfigSnapshot, EnglishNounLemmatizer, EntityDefinition,
    Lemmatizer, RecognizerConfig, SnapshotError, Token,
};

pub mod dictionary;
pub mod matcher;
pub mod snapshot;

pub use dictionary::{DictionaryEntry, EntityDictionary};
pub use matcher::Matcher;

/// Trait for pipeline stages that annotate tokens with entities
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, tokens: &[Token]) -> Vec<Token>;

    /// Alias of [`recognize`](Self::recognize)
    fn predict(&self, tokens: &[Token]) -> Vec<Token> {
        self.recognize(tokens)
    }
}

// ============================================================================
// Lookup NER
// ============================================================================

/// Named entity recognizer backed by a learned dictionary
pub struct LookupNer {
    config: RecognizerConfig,
    dictionary: EntityDictionary,
    lemmatizer: Box<dyn Lemmatizer>,
}

impl LookupNer {
    /// Create an empty recognizer with the default configuration
    pub fn new() -> Self {
        Self::with_lemmatizer(EnglishNounLemmatizer::new())
    }

    /// Create with a custom lemmatizer used for singular-form fallbacks
    pub fn with_lemmatizer(lemmatizer: impl Lemmatizer + 'static) -> Self {
        Self {
            config: RecognizerConfig::default(),
            dictionary: EntityDictionary::new(),
            lemmatizer: Box::new(lemmatizer),
        }
    }

    /// Configure from a JSON options object
    pub fn configure(&mut self, options: &Value) -> Result<ConfigSnapshot, ConfigError> {
        self.config.configure(options)
    }

    /// Configure from typed options
    pub fn apply_config(&mut self, options: ConfigOptions) -> ConfigSnapshot {
        self.config.apply(options)
    }

    pub fn config(&self) -> &RecognizerConfig {
        &self.config
    }

    pub fn dictionary(&self) -> &EntityDictionary {
        &self.dictionary
    }

    /// Learn entity definitions, returning how many were accepted
    pub fn learn(&mut self, definitions: &[EntityDefinition]) -> usize {
        self.dictionary.learn(definitions, &self.config)
    }

    /// Learn from untyped JSON records.
    ///
    /// Records that do not decode into an [`EntityDefinition`] are skipped
    /// like any other unacceptable definition.
    pub fn learn_values(&mut self, records: &[Value]) -> usize {
        let definitions: Vec<EntityDefinition> = records
            .iter()
            .filter(|record| record.is_object())
            .filter_map(|record| serde_json::from_value(record.clone()).ok())
            .collect();

        if definitions.len() < records.len() {
            tracing::debug!(
                "Skipped {} undecodable entity records",
                records.len() - definitions.len()
            );
        }

        self.learn(&definitions)
    }

    /// Recognize entities in a token sequence
    pub fn recognize(&self, tokens: &[Token]) -> Vec<Token> {
        self.matcher().recognize(tokens)
    }

    /// Alias of [`recognize`](Self::recognize)
    pub fn predict(&self, tokens: &[Token]) -> Vec<Token> {
        self.recognize(tokens)
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.dictionary, &self.config, &*self.lemmatizer)
    }

    /// Export configuration and dictionary as a snapshot string
    pub fn export_snapshot(&self) -> Result<String, SnapshotError> {
        snapshot::export(&self.config, &self.dictionary)
    }

    /// Replace the current state with a snapshot; untouched on error
    pub fn import_snapshot(&mut self, data: &str) -> Result<(), SnapshotError> {
        let decoded = snapshot::import(data);
        self.install(decoded)
    }

    /// Like [`import_snapshot`](Self::import_snapshot) for an untyped JSON value
    pub fn import_snapshot_value(&mut self, data: &Value) -> Result<(), SnapshotError> {
        let decoded = snapshot::import_value(data);
        self.install(decoded)
    }

    fn install(
        &mut self,
        decoded: Result<(RecognizerConfig, EntityDictionary), SnapshotError>,
    ) -> Result<(), SnapshotError> {
        let (config, dictionary) = decoded.map_err(|e| {
            tracing::warn!("Rejected snapshot import: {}", e);
            e
        })?;

        self.reset();
        self.config = config;
        self.dictionary = dictionary;

        tracing::debug!(
            "Imported snapshot: {} head entries, {} phrases",
            self.dictionary.head_len(),
            self.dictionary.phrase_len()
        );
        Ok(())
    }

    /// Restore the default configuration and forget every learned entity
    pub fn reset(&mut self) {
        self.config.reset();
        self.dictionary.clear();
    }
}

impl Default for LookupNer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LookupNer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupNer")
            .field("config", &self.config)
            .field("head_entries", &self.dictionary.head_len())
            .field("phrases", &self.dictionary.phrase_len())
            .finish()
    }
}

impl EntityRecognizer for LookupNer {
    fn recognize(&self, tokens: &[Token]) -> Vec<Token> {
        self.matcher().recognize(tokens)
    }
}

// ============================================================================
// Tests
// ============================================================================
