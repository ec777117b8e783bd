pub mod config;
pub mod convert;
pub mod error;
pub mod grammar;
pub mod model;
pub mod nashville;
pub mod parser;
pub mod tokenizer;
pub mod transpose;

pub use config::{EngineConfig, OutputFormat};
pub use convert::{
    inline_to_stacked, should_skip_line, stacked_to_inline, transpose_content, Notation,
};
pub use error::*;
pub use model::*;
pub use nashville::{chord_to_degree, nashville_content};
pub use parser::{
    extract_metadata, parse_arrangement, parse_chart, parse_directives, parse_sections,
};
pub use transpose::{semitones_between, transpose_chord, transpose_key};

/// Key a chart is written in: its metadata key, when that parses.
pub fn chart_key(text: &str) -> Option<Key> {
    extract_metadata(text).key.as_deref().and_then(Key::parse)
}

/// Transpose a whole chart, spelling accidentals for the destination key.
/// This is the main entry point for transposition.
pub fn transpose_chart(text: &str, semitones: i32, spelling: Spelling) -> String {
    let destination = chart_key(text).map(|key| Key {
        root: key.root.transpose(semitones),
        mode: key.mode,
    });
    transpose_content(text, semitones, spelling.prefer_flats(destination.as_ref()))
}

/// Transpose a chart from its own key to `target`, by the shortest motion.
pub fn transpose_chart_to(text: &str, target: &str, spelling: Spelling) -> Result<String, ChartError> {
    let target_key = Key::parse(target).ok_or_else(|| ChartError::InvalidKey(target.to_string()))?;
    let source = chart_key(text).ok_or(ChartError::MissingKey)?;
    let semitones = source.root.shortest_motion_to(target_key.root);
    Ok(transpose_content(text, semitones, spelling.prefer_flats(Some(&target_key))))
}
