//! # Nashville Numbers
//!
//! Labels chords by scale degree relative to a key.
//!
//! Only diatonic triad families get a degree. In a major key the degrees are
//! `1 2 3 4 5 6 7°`; in a minor key `1 2° b3 4 5 b6 b7`, with the major V (harmonic
//! minor) also read as `5`. Anything else, including every augmented chord, has no
//! degree. Suspended chords count as major.

use crate::model::{Chord, Key, Mode, PitchClass, Triad};
use crate::tokenizer::{replace_chords, tokenize_line};
use tracing::trace;

/// Degree labels of a major key: (interval from tonic, triad, label).
const MAJOR_DEGREES: &[(u8, Triad, &str)] = &[
    (0, Triad::Major, "1"),
    (2, Triad::Minor, "2"),
    (4, Triad::Minor, "3"),
    (4, Triad::Major, "3"),
    (5, Triad::Major, "4"),
    (7, Triad::Major, "5"),
    (9, Triad::Minor, "6"),
    (11, Triad::Diminished, "7°"),
];

const MINOR_DEGREES: &[(u8, Triad, &str)] = &[
    (0, Triad::Minor, "1"),
    (2, Triad::Diminished, "2°"),
    (3, Triad::Major, "b3"),
    (5, Triad::Minor, "4"),
    (7, Triad::Minor, "5"),
    (7, Triad::Major, "5"),
    (8, Triad::Major, "b6"),
    (10, Triad::Major, "b7"),
];

/// Chromatic interval labels, used for slash basses.
const INTERVAL_LABELS: [&str; 12] = ["1", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7"];

fn degree_of(root: PitchClass, triad: Triad, key: &Key) -> Option<&'static str> {
    let table = match key.mode {
        Mode::Major => MAJOR_DEGREES,
        Mode::Minor => MINOR_DEGREES,
    };
    let interval = key.root.interval_to(root);
    table
        .iter()
        .find(|(i, t, _)| *i == interval && *t == triad)
        .map(|(_, _, label)| *label)
}

/// Scale-degree label of a chord in a key, or `None` when it is not diatonic.
///
/// # Example
/// ```
/// use chordsheet::chord_to_degree;
///
/// assert_eq!(chord_to_degree("Am", "C Major").as_deref(), Some("6"));
/// assert_eq!(chord_to_degree("Bdim", "C").as_deref(), Some("7°"));
/// assert_eq!(chord_to_degree("Eb", "C Major"), None);
/// assert_eq!(chord_to_degree("C", "A minor").as_deref(), Some("b3"));
/// ```
pub fn chord_to_degree(chord: &str, key: &str) -> Option<String> {
    let key = Key::parse(key)?;
    let chord = Chord::parse(chord.trim())?;
    degree_of(chord.root.pitch, chord.triad(), &key).map(str::to_string)
}

/// Degree label of a chord symbol with its slash bass labelled by interval (`G/B` in C →
/// `5/7`). Unlabelled chords come back unchanged.
pub fn chord_to_number(symbol: &str, key: &Key) -> String {
    let Some(chord) = Chord::parse(symbol) else {
        return symbol.to_string();
    };
    let Some(degree) = degree_of(chord.root.pitch, chord.triad(), key) else {
        trace!(symbol, "no diatonic degree, left unchanged");
        return symbol.to_string();
    };
    match chord.bass {
        Some(bass) => {
            let interval = key.root.interval_to(bass.pitch) as usize;
            format!("{}/{}", degree, INTERVAL_LABELS[interval])
        }
        None => degree.to_string(),
    }
}

/// Rewrite every chord of a chart as a Nashville number in `key`.
///
/// Uses the same tokens as transposition, so brackets, grid bars and chord-row columns
/// are kept. An unrecognized key leaves the text as it is.
///
/// # Example
/// ```
/// use chordsheet::nashville_content;
///
/// let chart = "[C]Hello [G/B]there [Am]friend\n| F | Eb | C |";
/// assert_eq!(
///     nashville_content(chart, "C"),
///     "[1]Hello [5/7]there [6]friend\n| 4 | Eb | 1 |"
/// );
/// ```
pub fn nashville_content(text: &str, key: &str) -> String {
    let Some(key) = Key::parse(key) else {
        trace!(key, "unrecognized key, chart left unchanged");
        return text.to_string();
    };
    text.split('\n')
        .map(|line| {
            let tokens = tokenize_line(line);
            if tokens.is_empty() {
                line.to_string()
            } else {
                replace_chords(line, &tokens, |chord| chord_to_number(chord, &key))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
