//! # Transposer
//!
//! Chord-symbol and key-label arithmetic: shift the root (and bass) by a signed number of
//! semitones and re-spell from the sharp or flat table. The quality suffix is never
//! touched.
//!
//! ## Rules
//! - `0` semitones returns the input unchanged, byte for byte.
//! - Anything that does not start with a pitch letter is returned unchanged.
//! - Roots follow the caller's sharp/flat preference.
//! - A bass written with a flat stays flat-spelled even when the caller prefers sharps
//!   (`Am/Bb` + 2 → `Bm/C`, `Am/Bb` + 1 → `A#m/B`, `D/Bb` + 1 → `D#/B`, `C/Bb` + 3 → `D#/Db`).
//!
//! ## Example
//! ```rust
//! use chordsheet::{transpose_chord, transpose_key};
//!
//! assert_eq!(transpose_chord("G7", 2, false), "A7");
//! assert_eq!(transpose_chord("F#m7", 1, false), "Gm7");
//! assert_eq!(transpose_chord("C", 1, true), "Db");
//! assert_eq!(transpose_key("G Major", 3), "Bb Major");
//! ```

use crate::grammar;
use crate::model::{mode_of, Accidental, Chord, Key, Note};
use tracing::trace;

/// Mode appended by `transpose_key` when the label names none.
pub const DEFAULT_MODE_SUFFIX: &str = " Major";

/// Transpose a parsed chord.
pub fn transpose_parsed(chord: &Chord, semitones: i32, prefer_flats: bool) -> Chord {
    let root = Note::spelled(chord.root.pitch.transpose(semitones), prefer_flats);
    let bass = chord.bass.map(|bass| {
        let bass_flats = prefer_flats || bass.accidental == Accidental::Flat;
        Note::spelled(bass.pitch.transpose(semitones), bass_flats)
    });
    Chord {
        root,
        quality: chord.quality.clone(),
        bass,
    }
}

/// Transpose a chord symbol by `semitones`.
///
/// Total over its input: unparseable symbols come back unchanged.
///
/// # Example
/// ```
/// use chordsheet::transpose_chord;
///
/// assert_eq!(transpose_chord("Bbmaj7", -3, false), "Gmaj7");
/// assert_eq!(transpose_chord("Am/Bb", 2, false), "Bm/C");
/// assert_eq!(transpose_chord("Am/Bb", 1, false), "A#m/B");
/// assert_eq!(transpose_chord("N.C.", 5, false), "N.C.");
/// ```
pub fn transpose_chord(symbol: &str, semitones: i32, prefer_flats: bool) -> String {
    if semitones == 0 {
        return symbol.to_string();
    }
    match Chord::parse(symbol) {
        Some(chord) => transpose_parsed(&chord, semitones, prefer_flats).to_string(),
        None => {
            trace!(symbol, "not a chord symbol, left unchanged");
            symbol.to_string()
        }
    }
}

/// Transpose a key label, keeping whatever mode text followed the root.
///
/// The new tonic is spelled the way the destination key is conventionally written.
/// A label with no mode text gets `DEFAULT_MODE_SUFFIX`.
///
/// # Example
/// ```
/// use chordsheet::transpose_key;
///
/// assert_eq!(transpose_key("Am", 3), "Cm");
/// assert_eq!(transpose_key("E minor", 1), "F minor");
/// assert_eq!(transpose_key("G", 2), "A Major");
/// assert_eq!(transpose_key("???", 2), "???");
/// ```
pub fn transpose_key(label: &str, semitones: i32) -> String {
    if semitones == 0 {
        return label.to_string();
    }
    let trimmed = label.trim();
    let Some(root_name) = grammar::leading_root(trimmed) else {
        trace!(label, "not a key label, left unchanged");
        return label.to_string();
    };
    let Some(key) = Key::parse(trimmed) else {
        return label.to_string();
    };
    let rest = &trimmed[root_name.len()..];
    let destination = Key {
        root: key.root.transpose(semitones),
        mode: mode_of(rest).unwrap_or_default(),
    };
    if rest.trim().is_empty() {
        format!("{}{}", destination.tonic_name(), DEFAULT_MODE_SUFFIX)
    } else {
        format!("{}{}", destination.tonic_name(), rest)
    }
}

/// Shortest signed distance in semitones from one key's tonic to another's (-5..=6).
///
/// # Example
/// ```
/// use chordsheet::transpose::semitones_between;
///
/// assert_eq!(semitones_between("G", "A"), Some(2));
/// assert_eq!(semitones_between("C Major", "Bb Major"), Some(-2));
/// assert_eq!(semitones_between("C", "F#"), Some(6));
/// assert_eq!(semitones_between("C", "nonsense"), None);
/// ```
pub fn semitones_between(from: &str, to: &str) -> Option<i32> {
    let from = Key::parse(from)?;
    let to = Key::parse(to)?;
    Some(from.root.shortest_motion_to(to.root))
}
