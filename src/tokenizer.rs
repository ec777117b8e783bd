//! # Chord Tokenizer
//!
//! Finds the chord symbols on a single line of chart text, with their byte spans.
//!
//! ## Token sources
//! - **Bracketed** (`[Am7]`): anywhere on a line, as long as the text between the brackets
//!   is a chord, parenthesized extensions included (`[C7(#11)]`). `[Verse]` or `[N.C.]`
//!   are not tokens.
//! - **Grid** (`| G | C . D |`): only on grid lines (the line starts with `|`, or contains
//!   `|` plus whitespace). A bare symbol counts only when it is preceded by `|`, `.`,
//!   whitespace or the start of the line, and followed by whitespace, `.`, `|` or the end
//!   of the line, so capital letters inside words never match.
//! - **Bare** (`G      D/F#   Em`): a stacked-notation chord row, where every
//!   whitespace-separated word on the line is a chord (extensions allowed, as in brackets).
//!
//! ## Example
//! ```rust
//! use chordsheet::tokenizer::{tokenize_line, TokenKind};
//!
//! let tokens = tokenize_line("A[G]mazing [D/F#]grace");
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].chord, "G");
//! assert_eq!(tokens[0].start, 1);
//! assert_eq!(tokens[0].length, 3);
//! assert_eq!(tokens[1].kind, TokenKind::Bracketed);
//! ```

use crate::grammar;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref BRACKET_RE: Regex = Regex::new(r"\[([^\[\]]+)\]").expect("invalid bracket pattern");
}

/// Where a chord token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Bracketed,
    Grid,
    Bare,
}

/// A chord symbol located on a line.
///
/// `start` and `length` are byte offsets of the whole token as written, brackets
/// included for bracketed tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordToken {
    pub chord: String,
    pub start: usize,
    pub length: usize,
    pub kind: TokenKind,
}

impl ChordToken {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Character scanner over one grid line.
struct GridScanner<'a> {
    line: &'a str,
    position: usize,
    prev: Option<char>,
}

impl<'a> GridScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            position: 0,
            prev: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.line[self.position..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        self.prev = Some(c);
        Some(c)
    }

    fn at_leading_boundary(&self) -> bool {
        match self.prev {
            None => true,
            Some(c) => c == '|' || c == '.' || c.is_whitespace(),
        }
    }

    fn is_trailing_boundary(c: Option<char>) -> bool {
        match c {
            None => true,
            Some(c) => c == '|' || c == '.' || c.is_whitespace(),
        }
    }

    fn tokenize(&mut self) -> Vec<ChordToken> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if matches!(c, 'A'..='G') && self.at_leading_boundary() {
                let rest = &self.line[self.position..];
                if let Some(len) = grammar::match_extended_chord_at(rest) {
                    if Self::is_trailing_boundary(rest[len..].chars().next()) {
                        let end = self.position + len;
                        tokens.push(ChordToken {
                            chord: rest[..len].to_string(),
                            start: self.position,
                            length: len,
                            kind: TokenKind::Grid,
                        });
                        // Land on the last char of the symbol so `prev` is not a boundary
                        while self.position < end {
                            self.advance();
                        }
                        continue;
                    }
                }
            }
            self.advance();
        }
        tokens
    }
}

/// Whether a line is a pipe-delimited chord grid.
pub fn is_grid_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') || (trimmed.contains('|') && trimmed.contains(char::is_whitespace))
}

/// Whether a line consists only of chord symbols (a stacked-notation chord row).
pub fn is_chord_row(line: &str) -> bool {
    let mut words = line.split_whitespace().peekable();
    words.peek().is_some() && words.all(grammar::is_extended_chord)
}

/// Bracketed chord tokens on a line.
pub fn tokenize_bracketed(line: &str) -> Vec<ChordToken> {
    BRACKET_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?.as_str();
            if grammar::is_extended_chord(inner) {
                Some(ChordToken {
                    chord: inner.to_string(),
                    start: whole.start(),
                    length: whole.len(),
                    kind: TokenKind::Bracketed,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Bare chord tokens on a grid line. Callers check `is_grid_line` first.
pub fn tokenize_grid(line: &str) -> Vec<ChordToken> {
    GridScanner::new(line).tokenize()
}

/// Chord tokens of a chord row. Empty unless `is_chord_row(line)`.
pub fn tokenize_chord_row(line: &str) -> Vec<ChordToken> {
    if !is_chord_row(line) {
        return Vec::new();
    }
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;
    for (i, c) in line.char_indices().chain(std::iter::once((line.len(), ' '))) {
        match (c.is_whitespace(), word_start) {
            (false, None) => word_start = Some(i),
            (true, Some(start)) => {
                tokens.push(ChordToken {
                    chord: line[start..i].to_string(),
                    start,
                    length: i - start,
                    kind: TokenKind::Bare,
                });
                word_start = None;
            }
            _ => {}
        }
    }
    tokens
}

/// All chord tokens on a line, in order of appearance.
pub fn tokenize_line(line: &str) -> Vec<ChordToken> {
    let mut tokens = tokenize_bracketed(line);
    if is_grid_line(line) {
        tokens.extend(tokenize_grid(line));
        tokens.sort_by_key(|t| t.start);
    } else if tokens.is_empty() {
        tokens = tokenize_chord_row(line);
    }
    tokens
}

/// Character column of a byte offset.
pub fn column_of(line: &str, byte: usize) -> usize {
    line[..byte].chars().count()
}

/// Rewrite every token on a line through `f`, keeping everything between tokens.
///
/// Bracketed tokens keep their brackets. On chord rows the columns of later chords are
/// preserved: a shorter replacement is padded, a longer one eats into the following
/// spaces (always leaving one), and when there is no room the rest of the row shifts.
pub fn replace_chords<F>(line: &str, tokens: &[ChordToken], mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(line.len() + 8);
    let mut cursor = 0;
    // Positive: columns written beyond the original layout. Negative: columns owed.
    let mut shift: i64 = 0;

    for token in tokens {
        let gap = &line[cursor..token.start];
        if token.kind == TokenKind::Bare && shift != 0 {
            if shift < 0 {
                out.push_str(gap);
                out.extend(std::iter::repeat(' ').take((-shift) as usize));
                shift = 0;
            } else {
                let keep = if cursor == 0 { 0 } else { 1 };
                let removable = gap.len().saturating_sub(keep) as i64;
                let take = shift.min(removable);
                out.push_str(&gap[take as usize..]);
                shift -= take;
            }
        } else {
            out.push_str(gap);
        }

        let replacement = f(&token.chord);
        match token.kind {
            TokenKind::Bracketed => {
                out.push('[');
                out.push_str(&replacement);
                out.push(']');
            }
            TokenKind::Grid => out.push_str(&replacement),
            TokenKind::Bare => {
                out.push_str(&replacement);
                shift += replacement.chars().count() as i64 - token.chord.chars().count() as i64;
            }
        }
        cursor = token.end();
    }
    out.push_str(&line[cursor..]);
    out
}
