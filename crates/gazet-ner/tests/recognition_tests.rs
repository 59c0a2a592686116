//! Recognition Integration Tests
//!
//! End-to-end behaviour of `LookupNer`: learning, longest-match recognition,
//! ignorable tokens, acronyms, configuration and snapshots.

use gazet_core::{EntityDefinition, SnapshotError, Token};
use gazet_ner::LookupNer;
use serde_json::{json, Value};

/// Helper to build tokens from `(value, tag)` pairs
fn tokens(pairs: &[(&str, &str)]) -> Vec<Token> {
    pairs
        .iter()
        .map(|(value, tag)| Token::new(*value, *tag))
        .collect()
}

fn seq(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

// =============================================================================
// Learning
// =============================================================================

#[test]
fn test_learn_returns_accepted_count() {
    let mut ner = LookupNer::new();
    let learned = ner.learn(&[
        EntityDefinition::new("India", "country"),
        EntityDefinition::new("", "country"),
        EntityDefinition {
            text: Some("Nowhere".to_string()),
            ..Default::default()
        },
        EntityDefinition {
            entity_type: Some("country".to_string()),
            ..Default::default()
        },
        EntityDefinition::new("New Zealand", "country"),
    ]);

    assert_eq!(learned, 2);
}

// =============================================================================
// Longest match
// =============================================================================

#[test]
fn test_longest_match_with_lemma() {
    let mut ner = LookupNer::new();
    ner.learn(&[
        EntityDefinition::new("raw banana", "veg"),
        EntityDefinition::new("banana", "fruit"),
    ]);

    let result = ner.recognize(&tokens(&[("raw", "word"), ("bananas", "word")]));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].entity_type.as_deref(), Some("veg"));
    assert_eq!(result[0].value, "raw banana");
    assert_eq!(result[0].uid.as_deref(), Some("raw_banana"));
    assert_eq!(result[0].original_seq, seq(&["raw", "bananas"]));
}

#[test]
fn test_single_word_still_found_alone() {
    let mut ner = LookupNer::new();
    ner.learn(&[
        EntityDefinition::new("raw banana", "veg"),
        EntityDefinition::new("banana", "fruit"),
    ]);

    let result = ner.recognize(&tokens(&[("ripe", "word"), ("bananas", "word")]));

    assert_eq!(result.len(), 2);
    assert!(!result[0].is_entity());
    assert_eq!(result[1].entity_type.as_deref(), Some("fruit"));
}

#[test]
fn test_manchester_walkthrough() {
    let mut ner = LookupNer::new();
    ner.learn(&[
        EntityDefinition::new("manchester united", "club").with_uid("manu"),
        EntityDefinition::new("manchester", "city"),
        EntityDefinition::new("U K", "country").with_uid("uk"),
    ]);

    let input = tokens(&[
        ("Manchester", "word"),
        ("United", "word"),
        ("is", "word"),
        ("a", "word"),
        ("football", "word"),
        ("club", "word"),
        ("based", "word"),
        ("in", "word"),
        ("Manchester", "word"),
        (",", "punctuation"),
        ("U", "word"),
        (".", "punctuation"),
        ("K", "word"),
        (".", "punctuation"),
    ]);
    let result = ner.recognize(&input);

    let entities: Vec<(&str, &str)> = result
        .iter()
        .filter(|t| t.is_entity())
        .map(|t| {
            (
                t.entity_type.as_deref().unwrap_or_default(),
                t.uid.as_deref().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        entities,
        vec![("club", "manu"), ("city", "manchester"), ("country", "uk")]
    );

    let uk = result.iter().find(|t| t.uid.as_deref() == Some("uk")).unwrap();
    assert_eq!(uk.original_seq, seq(&["U", ".", "K"]));
    assert_eq!(result.last(), Some(&Token::punctuation(".")));
    assert_eq!(result.len(), 11);
}

// =============================================================================
// Ignorable tokens
// =============================================================================

#[test]
fn test_punctuation_inside_phrase() {
    let mut ner = LookupNer::new();
    ner.learn(&[EntityDefinition::new("raw banana", "veg")]);

    let result = ner.recognize(&tokens(&[
        ("raw", "word"),
        ("-", "punctuation"),
        ("banana", "word"),
    ]));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].entity_type.as_deref(), Some("veg"));
    assert_eq!(result[0].original_seq, seq(&["raw", "-", "banana"]));
}

#[test]
fn test_punctuation_not_ignored_breaks_phrase() {
    let mut ner = LookupNer::new();
    ner.configure(&json!({ "tagsToIgnore": ["emoji"] })).unwrap();
    ner.learn(&[EntityDefinition::new("raw banana", "veg")]);

    let input = tokens(&[("raw", "word"), ("-", "punctuation"), ("banana", "word")]);
    let result = ner.recognize(&input);

    assert_eq!(result, input);
}

// =============================================================================
// Acronyms
// =============================================================================

#[test]
fn test_acronym_spaced_dotted_and_compact() {
    let mut ner = LookupNer::new();
    ner.learn(&[EntityDefinition::new("u s a", "country").with_uid("usa")]);

    let spaced = ner.recognize(&tokens(&[("U", "word"), ("S", "word"), ("A", "word")]));
    assert_eq!(spaced.len(), 1);
    assert_eq!(spaced[0].uid.as_deref(), Some("usa"));
    assert_eq!(spaced[0].original_seq, seq(&["U", "S", "A"]));

    let dotted = ner.recognize(&tokens(&[
        ("U", "word"),
        (".", "punctuation"),
        ("S", "word"),
        (".", "punctuation"),
        ("A", "word"),
        (".", "punctuation"),
    ]));
    assert_eq!(dotted.len(), 2);
    assert_eq!(dotted[0].uid.as_deref(), Some("usa"));
    assert_eq!(dotted[0].original_seq, seq(&["U", ".", "S", ".", "A"]));

    let compact = ner.recognize(&tokens(&[("USA", "word")]));
    assert_eq!(compact.len(), 1);
    assert_eq!(compact[0].entity_type.as_deref(), Some("country"));
    assert_eq!(compact[0].uid.as_deref(), Some("usa"));
    assert_eq!(compact[0].original_seq, seq(&["USA"]));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_configure_empty_resets() {
    let mut ner = LookupNer::new();
    ner.configure(&json!({
        "tagsToIgnore": ["emoji", "hashtag"],
        "valuesToIgnore": ["of"],
        "ignoreDiacritics": false
    }))
    .unwrap();

    let snapshot = ner.configure(&json!({})).unwrap();
    assert_eq!(
        serde_json::to_value(snapshot).unwrap(),
        json!({ "tagsToIgnore": ["punctuation"], "valuesToIgnore": [], "ignoreDiacritics": true })
    );
}

#[test]
fn test_configure_never_ignores_words() {
    let mut ner = LookupNer::new();
    let snapshot = ner.configure(&json!({ "tagsToIgnore": ["word"] })).unwrap();
    assert!(snapshot.tags_to_ignore.is_empty());

    ner.learn(&[EntityDefinition::new("india", "country")]);
    let result = ner.recognize(&tokens(&[("India", "word")]));
    assert!(result[0].is_entity());
}

#[test]
fn test_configure_errors_leave_state() {
    let mut ner = LookupNer::new();
    let before = ner.config().clone();

    assert!(ner.configure(&json!("punctuation")).is_err());
    assert!(ner.configure(&json!({ "tagsToIgnore": [1, 2] })).is_err());
    assert!(ner.configure(&json!({ "valuesToIgnore": "of" })).is_err());

    assert_eq!(ner.config(), &before);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_snapshot_roundtrip_into_fresh_instance() {
    let mut original = LookupNer::new();
    original
        .configure(&json!({ "tagsToIgnore": ["punctuation", "symbol"], "valuesToIgnore": ["of"] }))
        .unwrap();
    original.learn(&[
        EntityDefinition::new("bank of england", "org").with_field("founded", json!(1694)),
        EntityDefinition::new("u k", "country").with_uid("uk"),
        EntityDefinition::new("england", "country"),
    ]);

    let mut restored = LookupNer::new();
    restored
        .import_snapshot(&original.export_snapshot().unwrap())
        .unwrap();

    let input = tokens(&[
        ("The", "word"),
        ("Bank", "word"),
        ("of", "word"),
        ("England", "word"),
        ("&", "symbol"),
        ("UK", "word"),
        ("England", "word"),
    ]);
    assert_eq!(restored.recognize(&input), original.recognize(&input));
    assert_eq!(restored.config(), original.config());
}

#[test]
fn test_import_rejections_are_distinguishable() {
    let mut ner = LookupNer::new();
    ner.learn(&[EntityDefinition::new("india", "country")]);

    assert_eq!(
        ner.import_snapshot_value(&Value::Null),
        Err(SnapshotError::MissingData)
    );
    assert!(matches!(
        ner.import_snapshot_value(&json!(7)),
        Err(SnapshotError::InvalidStructure(_))
    ));
    assert!(matches!(
        ner.import_snapshot("not json"),
        Err(SnapshotError::InvalidStructure(_))
    ));
    assert!(matches!(
        ner.import_snapshot(r#"{"a": 1}"#),
        Err(SnapshotError::InvalidFormat { .. })
    ));
    assert!(matches!(
        ner.import_snapshot("[{}, {}, {}, {}, []]"),
        Err(SnapshotError::InvalidFormat { .. })
    ));
    assert_eq!(
        ner.import_snapshot("[{}, {}, [], {}, [], []]"),
        Err(SnapshotError::InvalidElement {
            index: 2,
            expected: "an object"
        })
    );

    assert!(ner.dictionary().head("india").is_some());
}

#[test]
fn test_import_replaces_previous_state() {
    let mut source = LookupNer::new();
    source.learn(&[EntityDefinition::new("france", "country")]);
    let snapshot = source.export_snapshot().unwrap();

    let mut target = LookupNer::new();
    target.configure(&json!({ "ignoreDiacritics": false })).unwrap();
    target.learn(&[EntityDefinition::new("india", "country")]);

    target.import_snapshot(&snapshot).unwrap();

    assert!(target.dictionary().head("india").is_none());
    assert!(target.dictionary().head("france").is_some());
    assert!(target.config().ignore_diacritics);
}

#[test]
fn test_imported_phrase_lengths_beyond_input() {
    let mut ner = LookupNer::new();
    ner.import_snapshot(
        r#"[{}, {"a": {"wordCounts": [18446744073709551615, 1000000000]}}, {}, {}, [], []]"#,
    )
    .unwrap();

    let input = tokens(&[("a", "word"), ("b", "word")]);
    assert_eq!(ner.recognize(&input), input);
}

#[test]
fn test_snapshot_roundtrip_with_word_counts_field() {
    let mut original = LookupNer::new();
    original.learn_values(&[
        json!({ "text": "manchester united", "entityType": "club" }),
        json!({ "text": "manchester", "entityType": "city", "wordCounts": [5] }),
    ]);

    let snapshot = original.export_snapshot().unwrap();
    assert_eq!(snapshot.matches("wordCounts").count(), 1);

    let mut restored = LookupNer::new();
    restored.import_snapshot(&snapshot).unwrap();

    for input in [
        tokens(&[("Manchester", "word")]),
        tokens(&[("Manchester", "word"), ("United", "word")]),
    ] {
        assert_eq!(restored.recognize(&input), original.recognize(&input));
    }
    assert!(original.recognize(&tokens(&[("Manchester", "word")]))[0]
        .extra
        .is_empty());
}

#[test]
fn test_tokens_from_json() {
    let mut ner = LookupNer::new();
    ner.learn_values(&[json!({ "text": "new york", "entityType": "city", "state": "NY" })]);

    let input: Vec<Token> = serde_json::from_value(json!([
        { "value": "New", "tag": "word", "index": 0 },
        { "value": "York", "tag": "word", "index": 1 }
    ]))
    .unwrap();

    let output = serde_json::to_value(ner.recognize(&input)).unwrap();
    assert_eq!(
        output,
        json!([{
            "value": "new york",
            "tag": "word",
            "entityType": "city",
            "uid": "new_york",
            "originalSeq": ["New", "York"],
            "state": "NY"
        }])
    );
}
