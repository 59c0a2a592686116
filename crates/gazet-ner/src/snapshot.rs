//! Snapshot export and import
//!
//! A snapshot is a JSON array of exactly six elements:
//!
//! ```text
//! [config, headIndex, phraseIndex, {}, [], []]
//! ```
//!
//! The trailing three slots are reserved and always empty. Import validates
//! the whole structure before anything is decoded into live state.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use gazet_core::{RecognizerConfig, SnapshotError};

use crate::dictionary::{DictionaryEntry, EntityDictionary};

/// Number of elements in a snapshot
pub const SNAPSHOT_ARITY: usize = 6;

const CONFIG_SLOT: usize = 0;
const HEAD_SLOT: usize = 1;
const PHRASE_SLOT: usize = 2;

/// Borrowed view serialized as the six element array
#[derive(Serialize)]
struct SnapshotRef<'a>(
    &'a RecognizerConfig,
    &'a BTreeMap<String, DictionaryEntry>,
    &'a BTreeMap<String, DictionaryEntry>,
    Map<String, Value>,
    Vec<Value>,
    Vec<Value>,
);

/// Serialize configuration and dictionary into a snapshot string
pub fn export(config: &RecognizerConfig, dictionary: &EntityDictionary) -> Result<String, SnapshotError> {
    let snapshot = SnapshotRef(
        config,
        dictionary.head_index(),
        dictionary.phrase_index(),
        Map::new(),
        Vec::new(),
        Vec::new(),
    );

    let encoded =
        serde_json::to_string(&snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))?;
    tracing::debug!(
        "Exported snapshot: {} head entries, {} phrases, {} bytes",
        dictionary.head_len(),
        dictionary.phrase_len(),
        encoded.len()
    );

    Ok(encoded)
}

/// Decode a snapshot string into configuration and dictionary.
///
/// Checks run in order: presence, JSON syntax, arity, element kinds, then
/// element contents. Nothing is returned unless every check passes.
pub fn import(data: &str) -> Result<(RecognizerConfig, EntityDictionary), SnapshotError> {
    if data.is_empty() {
        return Err(SnapshotError::MissingData);
    }

    let parsed: Value =
        serde_json::from_str(data).map_err(|e| SnapshotError::InvalidStructure(e.to_string()))?;

    let elements = match parsed {
        Value::Array(elements) if elements.len() == SNAPSHOT_ARITY => elements,
        Value::Array(elements) => {
            return Err(SnapshotError::InvalidFormat {
                found: format!("{} elements", elements.len()),
            })
        }
        other => {
            return Err(SnapshotError::InvalidFormat {
                found: kind_of(&other).to_string(),
            })
        }
    };

    for (index, element) in elements.iter().enumerate() {
        let (valid, expected) = if index < 4 {
            (element.is_object(), "an object")
        } else {
            (element.is_array(), "an array")
        };
        if !valid {
            return Err(SnapshotError::InvalidElement { index, expected });
        }
    }

    let mut elements = elements.into_iter();
    let config: RecognizerConfig = decode_slot(elements.next(), CONFIG_SLOT, "a configuration object")?;
    let head: BTreeMap<String, DictionaryEntry> = decode_slot(elements.next(), HEAD_SLOT, "a head index")?;
    let phrases: BTreeMap<String, DictionaryEntry> =
        decode_slot(elements.next(), PHRASE_SLOT, "a phrase index")?;

    Ok((config, EntityDictionary::from_indexes(head, phrases)))
}

/// Decode a snapshot passed around as an untyped JSON value.
///
/// `null` is missing data and anything but a string is not a snapshot.
pub fn import_value(data: &Value) -> Result<(RecognizerConfig, EntityDictionary), SnapshotError> {
    match data {
        Value::Null => Err(SnapshotError::MissingData),
        Value::String(encoded) => import(encoded),
        other => Err(SnapshotError::InvalidStructure(format!(
            "expected a JSON string, found {}",
            kind_of(other)
        ))),
    }
}

fn decode_slot<T: DeserializeOwned>(
    element: Option<Value>,
    index: usize,
    expected: &'static str,
) -> Result<T, SnapshotError> {
    element
        .and_then(|value| serde_json::from_value(value).ok())
        .ok_or(SnapshotError::InvalidElement { index, expected })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
