//! Recognition-time configuration
//!
//! Controls which tokens may be skipped over inside a multi-word entity and
//! whether diacritics are ignored while matching. Options arrive either as a
//! JSON object (`configure`) or typed (`apply`); both validate completely
//! before touching the current settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token tags that may be placed in `tags_to_ignore`.
///
/// `word` and `number` are deliberately absent: they always form entities.
pub const IGNORABLE_TAGS: &[&str] = &[
    "punctuation",
    "emoticon",
    "email",
    "emoji",
    "hashtag",
    "mention",
    "quoted_phrase",
    "currency",
    "time",
    "url",
    "unknown",
    "symbol",
];

const DEFAULT_IGNORED_TAG: &str = "punctuation";

/// Whether `tag` belongs to the ignorable vocabulary
pub fn is_ignorable_tag(tag: &str) -> bool {
    IGNORABLE_TAGS.contains(&tag)
}

/// Recognition-time configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizerConfig {
    /// Tags of tokens skipped during entity detection
    #[serde(default, with = "flag_set")]
    pub tags_to_ignore: BTreeSet<String>,

    /// Values of tokens skipped during entity detection
    #[serde(default, with = "flag_set")]
    pub values_to_ignore: BTreeSet<String>,

    /// Strip diacritics while normalizing
    #[serde(default)]
    pub ignore_diacritics: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            tags_to_ignore: BTreeSet::from([DEFAULT_IGNORED_TAG.to_string()]),
            values_to_ignore: BTreeSet::new(),
            ignore_diacritics: true,
        }
    }
}

impl RecognizerConfig {
    /// Restore the default settings
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Configure from a JSON options object.
    ///
    /// An empty object restores the defaults. Otherwise `ignoreDiacritics`
    /// is updated when present and both ignore lists are replaced; unknown
    /// tags are dropped silently.
    pub fn configure(&mut self, options: &Value) -> Result<ConfigSnapshot, ConfigError> {
        let object = options.as_object().ok_or_else(|| ConfigError::NotAnObject {
            found: options.to_string(),
        })?;

        let tags_to_ignore = string_array(object, "tagsToIgnore")?;
        let values_to_ignore = string_array(object, "valuesToIgnore")?;

        if object.is_empty() {
            self.reset();
            return Ok(self.snapshot());
        }

        let options = ConfigOptions {
            tags_to_ignore,
            values_to_ignore,
            ignore_diacritics: object.get("ignoreDiacritics").map(is_truthy),
        };
        self.replace(options);

        Ok(self.snapshot())
    }

    /// Typed equivalent of [`configure`](Self::configure)
    pub fn apply(&mut self, options: ConfigOptions) -> ConfigSnapshot {
        if options == ConfigOptions::default() {
            self.reset();
        } else {
            self.replace(options);
        }
        self.snapshot()
    }

    fn replace(&mut self, options: ConfigOptions) {
        if let Some(flag) = options.ignore_diacritics {
            self.ignore_diacritics = flag;
        }

        let requested = options.tags_to_ignore.unwrap_or_default();
        let (accepted, dropped): (Vec<String>, Vec<String>) =
            requested.into_iter().partition(|tag| is_ignorable_tag(tag));
        if !dropped.is_empty() {
            tracing::debug!("Dropping non-ignorable tags: {:?}", dropped);
        }

        self.tags_to_ignore = accepted.into_iter().collect();
        self.values_to_ignore = options
            .values_to_ignore
            .unwrap_or_default()
            .into_iter()
            .collect();
    }

    /// Canonical view of the current settings
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            tags_to_ignore: self.tags_to_ignore.iter().cloned().collect(),
            values_to_ignore: self.values_to_ignore.iter().cloned().collect(),
            ignore_diacritics: self.ignore_diacritics,
        }
    }

    /// Whether a token may be skipped over inside a multi-word entity
    pub fn is_ignorable(&self, value: &str, tag: &str) -> bool {
        self.tags_to_ignore.contains(tag) || self.values_to_ignore.contains(value)
    }

    /// Whether a token is passed through without any lookup
    pub fn ignores_tag(&self, tag: &str) -> bool {
        self.tags_to_ignore.contains(tag)
    }
}

/// Typed configuration options; `None` means "not supplied"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOptions {
    pub tags_to_ignore: Option<Vec<String>>,
    pub values_to_ignore: Option<Vec<String>>,
    pub ignore_diacritics: Option<bool>,
}

impl ConfigOptions {
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags_to_ignore = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values_to_ignore = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_ignore_diacritics(mut self, flag: bool) -> Self {
        self.ignore_diacritics = Some(flag);
        self
    }
}

/// Canonical configuration as returned by `configure`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    pub tags_to_ignore: Vec<String>,
    pub values_to_ignore: Vec<String>,
    pub ignore_diacritics: bool,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config: expected an object, found {found}")]
    NotAnObject { found: String },

    #[error("Invalid value for {key}: expected an array of strings, found {value}")]
    NotStringArray { key: String, value: String },
}

fn string_array(object: &Map<String, Value>, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
    let Some(raw) = object.get(key) else {
        return Ok(None);
    };

    let invalid = || ConfigError::NotStringArray {
        key: key.to_string(),
        value: raw.to_string(),
    };

    raw.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Boolean coercion of a loosely typed JSON value
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Sets serialized as `{"member": true, ...}` objects
mod flag_set {
    use std::collections::BTreeSet;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Map, Value};

    pub fn serialize<S: Serializer>(set: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
        let flags: Map<String, Value> = set
            .iter()
            .map(|member| (member.clone(), Value::Bool(true)))
            .collect();
        flags.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
        let flags = Map::<String, Value>::deserialize(deserializer)?;
        Ok(flags
            .into_iter()
            .filter(|(_, flag)| super::is_truthy(flag))
            .map(|(member, _)| member)
            .collect())
    }
}
