//! # Format Converter
//!
//! Whole-chart rewrites: transposition, and conversion between the two chord layouts.
//!
//! ## Layouts
//! ```text
//! inline:   [G]Amazing [G7]grace how [C]sweet the [G]sound
//!
//! stacked:  G       G7        C         G
//!           Amazing grace how sweet the sound
//! ```
//! In the stacked layout each chord sits at the column where its syllable starts.
//! When a chord is wider than the text under it, the next chord is pushed right by
//! at least one space; converting back still yields the same chords in the same order
//! over the same lyric text, only their exact attachment points may move.
//!
//! ## Skipped lines
//! `should_skip_line` is the one definition of non-content lines, shared with the
//! section parser: blanks, metadata directives, the arrangement line, analysis
//! commentary, separator-only lines and code fences.

use crate::parser::arrangement::is_arrangement_line;
use crate::parser::directives::{is_content_start, is_directive_line};
use crate::parser::sections::section_start;
use crate::tokenizer::{
    column_of, is_chord_row, is_grid_line, replace_chords, tokenize_bracketed, tokenize_chord_row,
    tokenize_line,
};
use crate::transpose::{transpose_chord, transpose_key};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref KEY_DIRECTIVE_RE: Regex =
        Regex::new(r"(?i)(\{\s*key\s*:\s*)([^}]*?)(\s*\})").expect("invalid key directive pattern");
}

/// Chord layout of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// Chords in brackets inside the lyric line.
    #[default]
    Inline,
    /// Chord row above the lyric row.
    Stacked,
}

/// Whether a line carries no chart content.
///
/// # Example
/// ```
/// use chordsheet::should_skip_line;
///
/// assert!(should_skip_line("   "));
/// assert!(should_skip_line("{title: Something}"));
/// assert!(should_skip_line("(I) (V1)2x > (C)"));
/// assert!(should_skip_line("Analysis: the prevalence of IV chords"));
/// assert!(should_skip_line("-----"));
/// assert!(should_skip_line("```text"));
/// assert!(!should_skip_line("{c: Chorus}"));
/// assert!(!should_skip_line("[G]Amazing grace"));
/// ```
pub fn should_skip_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("```") {
        return true;
    }
    if is_directive_line(trimmed) && !is_content_start(trimmed) {
        return true;
    }
    if is_arrangement_line(trimmed) || is_analysis_line(trimmed) {
        return true;
    }
    !trimmed.chars().any(char::is_alphanumeric)
}

fn is_analysis_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("analysis:") || lower.contains("prevalence of")
}

fn map_lines<F>(text: &str, f: F) -> String
where
    F: FnMut(&str) -> String,
{
    text.split('\n').map(f).collect::<Vec<_>>().join("\n")
}

/// Transpose the chords of one line: bracketed, grid and chord-row tokens alike.
pub fn transpose_line(line: &str, semitones: i32, prefer_flats: bool) -> String {
    let tokens = tokenize_line(line);
    if tokens.is_empty() {
        return line.to_string();
    }
    replace_chords(line, &tokens, |chord| transpose_chord(chord, semitones, prefer_flats))
}

/// Transpose a whole chart.
///
/// Bracketed chords, bare chords on grid lines and chord rows are all shifted by the
/// same amount, and every `{key: ...}` directive is rewritten with `transpose_key`.
/// Everything else is left byte for byte.
///
/// # Example
/// ```
/// use chordsheet::transpose_content;
///
/// let chart = "{key: G}\n[G]Amazing [C]grace\n| G | D/F# | Em |";
/// assert_eq!(
///     transpose_content(chart, 2, false),
///     "{key: A Major}\n[A]Amazing [D]grace\n| A | E/G# | F#m |"
/// );
/// ```
pub fn transpose_content(text: &str, semitones: i32, prefer_flats: bool) -> String {
    if semitones == 0 {
        return text.to_string();
    }
    let body = map_lines(text, |line| transpose_line(line, semitones, prefer_flats));
    KEY_DIRECTIVE_RE
        .replace_all(&body, |caps: &Captures| {
            format!("{}{}{}", &caps[1], transpose_key(&caps[2], semitones), &caps[3])
        })
        .into_owned()
}

/// Lay chords out on a row, each at its column, at least one space apart.
fn build_chord_row(placed: &[(usize, &str)]) -> String {
    let mut row = String::new();
    let mut width = 0;
    for &(column, chord) in placed {
        let target = if row.is_empty() { column } else { column.max(width + 1) };
        row.extend(std::iter::repeat(' ').take(target - width));
        row.push_str(chord);
        width = target + chord.chars().count();
    }
    row
}

/// Split one inline line into a chord row and a lyric row.
///
/// Returns `None` for lines without bracketed chords (and for grid and directive lines,
/// which have no stacked form). The lyric row is `None` when the line holds only chords.
///
/// # Example
/// ```
/// use chordsheet::convert::inline_line_to_stacked;
///
/// let (chords, lyric) = inline_line_to_stacked("[G]Amazing [D]grace").unwrap();
/// assert_eq!(chords, "G       D");
/// assert_eq!(lyric.as_deref(), Some("Amazing grace"));
/// ```
pub fn inline_line_to_stacked(line: &str) -> Option<(String, Option<String>)> {
    if is_grid_line(line) || is_directive_line(line) {
        return None;
    }
    let tokens = tokenize_bracketed(line);
    if tokens.is_empty() {
        return None;
    }

    let mut lyric = String::with_capacity(line.len());
    let mut lyric_width = 0;
    let mut placed = Vec::with_capacity(tokens.len());
    let mut cursor = 0;
    for token in &tokens {
        let segment = &line[cursor..token.start];
        lyric.push_str(segment);
        lyric_width += segment.chars().count();
        placed.push((lyric_width, token.chord.as_str()));
        cursor = token.end();
    }
    lyric.push_str(&line[cursor..]);

    let chord_row = build_chord_row(&placed);
    let lyric = lyric.trim_end();
    if lyric.trim().is_empty() {
        Some((chord_row, None))
    } else {
        Some((chord_row, Some(lyric.to_string())))
    }
}

/// Convert a chart from inline to stacked notation. Lines without bracketed chords are
/// kept as they are.
pub fn inline_to_stacked(text: &str) -> String {
    let mut out = Vec::new();
    for line in text.split('\n') {
        match inline_line_to_stacked(line) {
            Some((chords, lyric)) => {
                out.push(chords);
                out.extend(lyric);
            }
            None => out.push(line.to_string()),
        }
    }
    out.join("\n")
}

/// Merge a chord row into the lyric row below it.
///
/// # Example
/// ```
/// use chordsheet::convert::merge_stacked;
///
/// assert_eq!(merge_stacked("G       D", "Amazing grace"), "[G]Amazing [D]grace");
/// assert_eq!(merge_stacked("    C         G", "Hi"), "Hi  [C]          [G]");
/// ```
pub fn merge_stacked(chord_row: &str, lyric: &str) -> String {
    let tokens = tokenize_chord_row(chord_row);
    let mut pending = tokens
        .iter()
        .map(|t| (column_of(chord_row, t.start), t.chord.as_str()))
        .peekable();

    let lyric = lyric.trim_end();
    let mut out = String::with_capacity(lyric.len() + tokens.len() * 4);
    let mut column = 0;
    for ch in lyric.chars() {
        while let Some((_, chord)) = pending.next_if(|&(c, _)| c <= column) {
            push_bracketed(&mut out, chord);
        }
        out.push(ch);
        column += 1;
    }
    for (chord_column, chord) in pending {
        while column < chord_column {
            out.push(' ');
            column += 1;
        }
        push_bracketed(&mut out, chord);
    }
    out
}

fn push_bracketed(out: &mut String, chord: &str) {
    out.push('[');
    out.push_str(chord);
    out.push(']');
}

/// Bracket every chord of a chord row in place (`G   C` → `[G]   [C]`).
fn bracket_row(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 8);
    let mut cursor = 0;
    for token in tokenize_chord_row(line) {
        out.push_str(&line[cursor..token.start]);
        push_bracketed(&mut out, &token.chord);
        cursor = token.end();
    }
    out.push_str(&line[cursor..]);
    out
}

fn is_lyric_line(line: &str) -> bool {
    !should_skip_line(line)
        && !is_chord_row(line)
        && !is_grid_line(line)
        && !is_content_start(line)
        && section_start(line).is_none()
}

/// Whether `next` is the lyric under chord row `row`, given the line after it.
///
/// A line whose words all read as chords (`A`, `Am E`) is still a lyric when nothing
/// lyric-like follows it and either it or the row above holds a single word. Two
/// multi-chord rows in a row stay two chord rows.
fn is_lyric_under(row: &str, next: &str, after: Option<&str>) -> bool {
    if is_lyric_line(next) {
        return true;
    }
    if !is_chord_row(next) || after.map_or(false, is_lyric_line) {
        return false;
    }
    let single_word = |line: &str| line.split_whitespace().count() == 1;
    single_word(next) || single_word(row)
}

/// Convert a chart from stacked to inline notation.
///
/// A chord row followed by a lyric line is merged into one line; a chord row with no
/// lyric under it becomes a line of bracketed chords.
pub fn stacked_to_inline(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = Vec::with_capacity(lines.len());
    let mut index = 0;
    while index < lines.len() {
        let line = lines[index];
        if is_chord_row(line) {
            let after = lines.get(index + 2).copied();
            if let Some(lyric) = lines
                .get(index + 1)
                .filter(|next| is_lyric_under(line, next, after))
            {
                out.push(merge_stacked(line, lyric));
                index += 2;
                continue;
            }
            out.push(bracket_row(line));
        } else {
            out.push(line.to_string());
        }
        index += 1;
    }
    out.join("\n")
}

/// Guess the layout of a chart from its first chord-bearing line.
pub fn detect_notation(text: &str) -> Option<Notation> {
    text.lines().find_map(|line| {
        if !tokenize_bracketed(line).is_empty() {
            Some(Notation::Inline)
        } else if is_chord_row(line) {
            Some(Notation::Stacked)
        } else {
            None
        }
    })
}

/// Convert a chart to the requested layout.
pub fn convert(text: &str, to: Notation) -> String {
    match to {
        Notation::Inline => stacked_to_inline(text),
        Notation::Stacked => inline_to_stacked(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_skip_predicate_keeps_content() {
        assert!(!should_skip_line("| G | C |"));
        assert!(!should_skip_line("Verse 1"));
        assert!(!should_skip_line("שלום"));
        assert!(should_skip_line("| | |"));
        assert!(should_skip_line("The PREVALENCE OF minor chords"));
        assert!(should_skip_line("{key: G}"));
    }

    #[test]
    fn test_transpose_content_zero_is_identity() {
        let chart = "{key: G}\n[G]one\n| G | C |\n";
        assert_eq!(transpose_content(chart, 0, true), chart);
    }

    #[test]
    fn test_transpose_content_grid_and_bracket_parity() {
        let grid = transpose_content("| G | Am |", 3, true);
        let inline = transpose_content("[G] [Am]", 3, true);
        assert_eq!(grid, "| Bb | Cm |");
        assert_eq!(inline, "[Bb] [Cm]");
    }

    #[test]
    fn test_transpose_content_key_directive_variants() {
        assert_eq!(transpose_content("{Key:Am}", -2, false), "{Key:Gm}");
        assert_eq!(transpose_content("{ key : E }", 1, false), "{ key : F Major }");
        assert_eq!(transpose_content("{key: unknown}", 1, false), "{key: unknown}");
    }

    #[test]
    fn test_transpose_content_leaves_prose_alone() {
        let chart = "Amazing Grace\n{c: Chorus}\nChorus\nA Day in the life\n(C) > (V1)";
        assert_eq!(transpose_content(chart, 5, false), chart);
    }

    #[test]
    fn test_transpose_content_keeps_stacked_columns() {
        let chart = "G       D/F#    Em\nAmazing grace how sweet";
        assert_eq!(
            transpose_content(chart, 1, true),
            "Ab      Eb/G    Fm\nAmazing grace how sweet"
        );
    }

    #[test]
    fn test_inline_to_stacked_aligns_columns() {
        let chart = "[G]Amazing [G7]grace how [C]sweet the [G]sound";
        assert_eq!(
            inline_to_stacked(chart),
            "G       G7        C         G\nAmazing grace how sweet the sound"
        );
    }

    #[test]
    fn test_inline_to_stacked_collisions_keep_a_space() {
        assert_eq!(inline_to_stacked("[Cmaj7]Hi [G]there"), "Cmaj7 G\nHi there");
        assert_eq!(inline_to_stacked("[G][C]Hey"), "G C\nHey");
    }

    #[test]
    fn test_inline_to_stacked_chord_only_line() {
        assert_eq!(inline_to_stacked("[G] [C] [D]"), "G C D");
        assert_eq!(inline_to_stacked("[G]    [C]"), "G   C");
    }

    #[test]
    fn test_inline_to_stacked_passes_other_lines() {
        let chart = "{title: X}\n{c: Verse}\n| G | C |\nno chords here\n";
        assert_eq!(inline_to_stacked(chart), chart);
    }

    #[test]
    fn test_stacked_to_inline_merges_pairs() {
        let chart = "{c: Verse}\nG       G7\nAmazing grace\n\nC   G\n";
        assert_eq!(stacked_to_inline(chart), "{c: Verse}\n[G]Amazing [G7]grace\n\n[C]   [G]\n");
    }

    #[test]
    fn test_stacked_to_inline_chord_beyond_lyric_end() {
        assert_eq!(stacked_to_inline("      G\nHello"), "Hello [G]");
    }

    #[test]
    fn test_stacked_row_followed_by_section_is_not_merged() {
        let chart = "G  C\nChorus\n[D]la";
        assert_eq!(stacked_to_inline(chart), "[G]  [C]\nChorus\n[D]la");
    }

    #[test]
    fn test_transpose_content_moves_extended_bracket_chords() {
        assert_eq!(
            transpose_content("[G]Hi [C7(#11)]there [Am(add9)]x", 2, false),
            "[A]Hi [D7(#11)]there [Bm(add9)]x"
        );
        assert_eq!(transpose_content("| Cmaj7(9) | G |", -2, true), "| Bbmaj7(9) | F |");
        assert_eq!(transpose_content("[Chorus] [C(oh)]", 2, false), "[Chorus] [D(oh)]");
    }

    #[test]
    fn test_chord_like_lyric_is_merged() {
        assert_eq!(inline_to_stacked("[G]A"), "G\nA");
        assert_eq!(stacked_to_inline("G\nA"), "[G]A");
        assert_eq!(stacked_to_inline("G      C\nAm I wrong"), "[G]Am I wr[C]ong");
        assert_eq!(stacked_to_inline("G\nA\n"), "[G]A\n");
    }

    #[test]
    fn test_consecutive_chord_rows_stay_chords() {
        assert_eq!(stacked_to_inline("G C D\nEm C D\n"), "[G] [C] [D]\n[Em] [C] [D]\n");
        assert_eq!(stacked_to_inline("G C\nD   Em\nHello there"), "[G] [C]\n[D]Hell[Em]o there");
    }

    #[test]
    fn test_round_trip_keeps_chords_and_lyrics() {
        let line = "[Cmaj7]Hi [G]there, [D/F#]friend";
        let back = stacked_to_inline(&inline_to_stacked(line));
        assert_eq!(back, "[Cmaj7]Hi the[G]re, [D/F#]friend");
    }

    #[test]
    fn test_detect_notation() {
        assert_eq!(detect_notation("Title\n[G]Hello"), Some(Notation::Inline));
        assert_eq!(detect_notation("Title\nG   C\nHello"), Some(Notation::Stacked));
        assert_eq!(detect_notation("just words"), None);
    }
}
