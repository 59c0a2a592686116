//! Gazet Core - Shared data model, errors and text utilities
//!
//! This crate defines the pieces shared by every gazet component:
//! - Token and entity definition models
//! - Common error types
//! - Recognition-time configuration
//! - Text normalization and lemmatization

pub mod config;
pub mod text;

pub use config::{ConfigError, ConfigOptions, ConfigSnapshot, RecognizerConfig, IGNORABLE_TAGS};
pub use text::{collapse_whitespace, normalize, EnglishNounLemmatizer, Lemmatizer};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while importing a serialized snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("missing data: nothing to import")]
    MissingData,

    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("invalid format: expected an array of 6 elements, found {found}")]
    InvalidFormat { found: String },

    #[error("invalid element at index {index}: expected {expected}")]
    InvalidElement { index: usize, expected: &'static str },

    #[error("failed to encode snapshot: {0}")]
    Encode(String),
}

/// Core error type for gazet operations
#[derive(Error, Debug)]
pub enum GazetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T> = std::result::Result<T, GazetError>;

// ============================================================================
// Tokens
// ============================================================================

/// Tag carried by tokens that form words
pub const WORD_TAG: &str = "word";

/// A token produced by an upstream tokenizer.
///
/// Recognized entities come back as tokens too: they carry `entity_type`,
/// `uid` and the raw values of the tokens they were merged from in
/// `original_seq`. Any custom field of the matched dictionary entry lands
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub value: String,

    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_seq: Option<Vec<String>>,

    /// Pass-through fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Token {
    /// Create a plain token
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: tag.into(),
            entity_type: None,
            uid: None,
            original_seq: None,
            extra: Map::new(),
        }
    }

    /// Create a `word` token
    pub fn word(value: impl Into<String>) -> Self {
        Self::new(value, WORD_TAG)
    }

    /// Create a `punctuation` token
    pub fn punctuation(value: impl Into<String>) -> Self {
        Self::new(value, "punctuation")
    }

    /// Whether this token was produced by entity recognition
    pub fn is_entity(&self) -> bool {
        self.entity_type.is_some()
    }
}

// ============================================================================
// Entity Definitions
// ============================================================================

/// A training record mapping a text span to an entity.
///
/// `text` and `entity_type` are mandatory for the record to be learned; the
/// fields are optional here so that incomplete records can be represented
/// and skipped instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Custom fields copied as-is onto recognized tokens
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityDefinition {
    pub fn new(text: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            entity_type: Some(entity_type.into()),
            ..Default::default()
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a custom pass-through field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// A definition is learnable when it has non-blank text and an entity type
    pub fn is_acceptable(&self) -> bool {
        let has_text = self
            .text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);

        has_text && self.entity_type.is_some()
    }
}
