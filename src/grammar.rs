//! # Chord Grammar
//!
//! The single definition of what a chord symbol looks like. The transposer, the
//! tokenizer and the Nashville mapper all go through this module, so a symbol that one
//! of them accepts is accepted by all of them.
//!
//! ## Shape of a chord symbol
//! ```text
//! root      [A-G][#b]?                 C  F#  Bb
//! quality   keyword / degree, repeated  m7  maj7  sus4  add9  7b9  dim  +
//! bass      /[A-G][#b]?                /E  /Bb
//! ```
//!
//! Three views are offered:
//! - the **strict** view (`is_chord`, `match_chord_at`) used when scanning text, where a
//!   capital letter must be followed by a recognizable quality to count as a chord;
//! - the **extended** view (`is_extended_chord`) for symbols that are already delimited
//!   (in brackets or on a chord row), which also admits parenthesized groups like `(#11)`;
//! - the **lenient** view (`split_symbol`) used once a symbol is known to be a chord: the
//!   root is taken off the front, an optional `/bass` off the back, and everything in
//!   between is an opaque suffix that is copied verbatim.

use lazy_static::lazy_static;
use regex::Regex;

/// Pitch letter with an optional accidental.
pub const ROOT_PATTERN: &str = "[A-G][#b]?";

/// Quality keywords and degree numbers, in any sequence (`m7`, `maj7`, `7sus4`, `m7b5`).
/// Longer keywords come first so `maj` is not read as `m` + `aj`.
pub const QUALITY_PATTERN: &str = r"(?:maj|ma|min|dim|aug|sus|add|m|M|\+|°|ø|[#b]?\d+)*";

/// Optional slash bass.
pub const BASS_PATTERN: &str = "(?:/[A-G][#b]?)?";

lazy_static! {
    static ref CHORD_RE: Regex =
        Regex::new(&format!("^{}{}{}$", ROOT_PATTERN, QUALITY_PATTERN, BASS_PATTERN))
            .expect("invalid chord pattern");
    static ref CHORD_PREFIX_RE: Regex =
        Regex::new(&format!("^{}{}{}", ROOT_PATTERN, QUALITY_PATTERN, BASS_PATTERN))
            .expect("invalid chord prefix pattern");
    static ref EXTENDED_CHORD_RE: Regex = Regex::new(&format!(
        r"^{root}{q}(?:\([^()\s]+\){q})*{bass}$",
        root = ROOT_PATTERN,
        q = QUALITY_PATTERN,
        bass = BASS_PATTERN
    ))
    .expect("invalid extended chord pattern");
    static ref EXTENDED_PREFIX_RE: Regex = Regex::new(&format!(
        r"^{root}{q}(?:\([^()\s]+\){q})*{bass}",
        root = ROOT_PATTERN,
        q = QUALITY_PATTERN,
        bass = BASS_PATTERN
    ))
    .expect("invalid extended chord prefix pattern");
    static ref SYMBOL_PARTS_RE: Regex =
        Regex::new(&format!(r"^({})(.*?)(?:/({}))?$", ROOT_PATTERN, ROOT_PATTERN))
            .expect("invalid symbol pattern");
    static ref ROOT_RE: Regex =
        Regex::new(&format!("^({})", ROOT_PATTERN)).expect("invalid root pattern");
}

/// The pieces of a chord symbol, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolParts<'a> {
    pub root: &'a str,
    pub suffix: &'a str,
    pub bass: Option<&'a str>,
}

/// Split a symbol into root, verbatim suffix and optional bass.
///
/// Returns `None` when the symbol does not start with a pitch letter.
///
/// # Example
/// ```
/// use chordsheet::grammar::split_symbol;
///
/// let parts = split_symbol("Am7/G").unwrap();
/// assert_eq!(parts.root, "A");
/// assert_eq!(parts.suffix, "m7");
/// assert_eq!(parts.bass, Some("G"));
///
/// // Numbers after a slash are part of the suffix, not a bass
/// assert_eq!(split_symbol("C6/9").unwrap().suffix, "6/9");
/// ```
pub fn split_symbol(symbol: &str) -> Option<SymbolParts<'_>> {
    let caps = SYMBOL_PARTS_RE.captures(symbol)?;
    Some(SymbolParts {
        root: caps.get(1)?.as_str(),
        suffix: caps.get(2).map_or("", |m| m.as_str()),
        bass: caps.get(3).map(|m| m.as_str()),
    })
}

/// Leading root of a symbol or key label (`"C#m7"` → `"C#"`, `"Bb Major"` → `"Bb"`).
pub fn leading_root(text: &str) -> Option<&str> {
    ROOT_RE.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Whether the whole string is a chord symbol under the strict grammar.
pub fn is_chord(text: &str) -> bool {
    CHORD_RE.is_match(text)
}

/// Whether the whole string is a chord symbol, allowing parenthesized extensions
/// (`C7(#11)`, `Am(add9)`, `Cmaj7(9)/E`).
///
/// Used where the symbol is already delimited, in brackets or as a chord-row word.
///
/// # Example
/// ```
/// use chordsheet::grammar::is_extended_chord;
///
/// assert!(is_extended_chord("C7(#11)"));
/// assert!(is_extended_chord("G"));
/// assert!(!is_extended_chord("Chorus"));
/// assert!(!is_extended_chord("C(oh yeah)"));
/// ```
pub fn is_extended_chord(text: &str) -> bool {
    EXTENDED_CHORD_RE.is_match(text)
}

/// Length in bytes of the chord symbol starting at the beginning of `text`, if any.
pub fn match_chord_at(text: &str) -> Option<usize> {
    CHORD_PREFIX_RE.find(text).map(|m| m.end())
}

/// Like `match_chord_at`, also taking parenthesized extensions.
pub fn match_extended_chord_at(text: &str) -> Option<usize> {
    EXTENDED_PREFIX_RE.find(text).map(|m| m.end())
}
