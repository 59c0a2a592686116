//! Recognize football clubs, cities and countries in a tokenized sentence.
//!
//! Usage:
//!   RUST_LOG=gazet_ner=debug cargo run -p gazet-ner --example clubs

use gazet_core::{EntityDefinition, Token};
use gazet_ner::LookupNer;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gazet_ner=info".into()),
        )
        .init();

    let mut ner = LookupNer::new();
    ner.learn(&[
        EntityDefinition::new("manchester united", "club").with_uid("manu"),
        EntityDefinition::new("manchester", "city"),
        EntityDefinition::new("U K", "country").with_uid("uk"),
    ]);

    // "Manchester United is a football club based in Manchester, U. K."
    let sentence = [
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
    ];
    let tokens: Vec<Token> = sentence
        .iter()
        .map(|(value, tag)| Token::new(*value, *tag))
        .collect();

    let recognized = ner.recognize(&tokens);
    println!("{}", serde_json::to_string_pretty(&recognized)?);

    let snapshot = ner.export_snapshot()?;
    println!("Snapshot: {}", snapshot);

    Ok(())
}
