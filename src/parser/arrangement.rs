//! # Arrangement Parser
//!
//! Reads the arrangement summary line, e.g. `(I) (V1)2x > (C) (B) (C)2x (O)`.
//!
//! ## Grammar
//! The whole trimmed line must be whitespace-separated tokens, each one of
//! - `>`: a flow arrow;
//! - `(LABEL)` or `(LABEL)Nx`: a badge, where LABEL is letters with an optional
//!   number (`V1`, `PC`, `Tag`) and `Nx` is a repeat count.
//!
//! Only the first such line in the document is used.
//!
//! ## Badge codes
//! | code | kind      |   | code | kind      |
//! |------|-----------|---|------|-----------|
//! | I    | intro     |   | INT  | interlude |
//! | V    | verse     |   | TAG  | tag       |
//! | PC   | prechorus |   | CODA | coda      |
//! | C    | chorus    |   | TURN | turn      |
//! | B    | bridge    |   | BRK  | break     |
//! | O    | outro     |   |      | other     |

use crate::model::{ArrangementItem, BadgeKind};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Flow arrow token.
pub const FLOW_ARROW: &str = ">";

lazy_static! {
    static ref BADGE_RE: Regex =
        Regex::new(r"^\(([A-Za-z]+\d*)\)(?:(\d+)[xX])?$").expect("invalid badge pattern");
    static ref TRAILING_NUMBER_RE: Regex =
        Regex::new(r"^(.*?)\s*(\d+)?$").expect("invalid trailing number pattern");
}

/// Section names and the badge code they abbreviate to.
const NAME_TO_CODE: &[(&str, &str)] = &[
    ("intro", "I"),
    ("verse", "V"),
    ("prechorus", "PC"),
    ("chorus", "C"),
    ("bridge", "B"),
    ("outro", "O"),
    ("interlude", "INT"),
    ("tag", "TAG"),
    ("coda", "CODA"),
    ("turnaround", "TURN"),
    ("turn", "TURN"),
    ("break", "BRK"),
];

fn parse_token(token: &str) -> Option<ArrangementItem> {
    if token == FLOW_ARROW {
        return Some(ArrangementItem::Flow);
    }
    let caps = BADGE_RE.captures(token)?;
    let repeat = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    Some(ArrangementItem::Badge {
        label: caps[1].to_uppercase(),
        repeat,
    })
}

fn parse_line(line: &str) -> Option<Vec<ArrangementItem>> {
    let items = line
        .split_whitespace()
        .map(parse_token)
        .collect::<Option<Vec<_>>>()?;
    if items.iter().any(|i| matches!(i, ArrangementItem::Badge { .. })) {
        Some(items)
    } else {
        None
    }
}

/// Whether a line is an arrangement summary line.
pub fn is_arrangement_line(line: &str) -> bool {
    parse_line(line).is_some()
}

/// Parse the first arrangement line of the document; empty when there is none.
///
/// # Example
/// ```
/// use chordsheet::{parse_arrangement, ArrangementItem};
///
/// let items = parse_arrangement("Title\n(I) (V1)2x > (C)\n(B) (C)");
/// assert_eq!(items, vec![
///     ArrangementItem::Badge { label: "I".into(), repeat: 1 },
///     ArrangementItem::Badge { label: "V1".into(), repeat: 2 },
///     ArrangementItem::Flow,
///     ArrangementItem::Badge { label: "C".into(), repeat: 1 },
/// ]);
/// ```
pub fn parse_arrangement(text: &str) -> Vec<ArrangementItem> {
    for (index, line) in text.lines().enumerate() {
        if let Some(items) = parse_line(line) {
            debug!(line = index + 1, items = items.len(), "arrangement line found");
            return items;
        }
    }
    Vec::new()
}

/// Kind of a badge label (`"V2"` → verse, `"brk"` → break).
pub fn badge_kind(label: &str) -> BadgeKind {
    let code = label.trim_end_matches(|c: char| c.is_ascii_digit()).to_uppercase();
    match code.as_str() {
        "I" => BadgeKind::Intro,
        "V" => BadgeKind::Verse,
        "PC" => BadgeKind::PreChorus,
        "C" => BadgeKind::Chorus,
        "B" => BadgeKind::Bridge,
        "O" => BadgeKind::Outro,
        "INT" => BadgeKind::Interlude,
        "TAG" => BadgeKind::Tag,
        "CODA" => BadgeKind::Coda,
        "TURN" => BadgeKind::Turn,
        "BRK" => BadgeKind::Break,
        _ => BadgeKind::Other,
    }
}

/// Badge code for a section name (`"Verse 2"` → `"V2"`, `"Pre-Chorus"` → `"PC"`).
///
/// # Example
/// ```
/// use chordsheet::parser::arrangement::section_badge;
///
/// assert_eq!(section_badge("Verse 2").as_deref(), Some("V2"));
/// assert_eq!(section_badge("pre chorus").as_deref(), Some("PC"));
/// assert_eq!(section_badge("Rap"), None);
/// ```
pub fn section_badge(name: &str) -> Option<String> {
    let caps = TRAILING_NUMBER_RE.captures(name.trim())?;
    let base: String = caps[1]
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    let number = caps.get(2).map_or("", |m| m.as_str());
    NAME_TO_CODE
        .iter()
        .find(|(section, _)| *section == base)
        .map(|(_, code)| format!("{}{}", code, number))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn badge(label: &str, repeat: u32) -> ArrangementItem {
        ArrangementItem::Badge {
            label: label.to_string(),
            repeat,
        }
    }

    #[test]
    fn test_arrangement_example() {
        assert_eq!(
            parse_arrangement("(I) (V1)2x > (C)"),
            vec![badge("I", 1), badge("V1", 2), ArrangementItem::Flow, badge("C", 1)]
        );
    }

    #[test]
    fn test_labels_are_uppercased_and_repeat_floor_is_one() {
        assert_eq!(parse_arrangement("(pc)3X (tag)0x"), vec![badge("PC", 3), badge("TAG", 1)]);
    }

    #[test]
    fn test_only_first_line_is_used() {
        let items = parse_arrangement("(V1) (C)\n(B) (O)");
        assert_eq!(items, vec![badge("V1", 1), badge("C", 1)]);
    }

    #[test]
    fn test_strict_grammar() {
        assert!(!is_arrangement_line("(V1) then (C)"));
        assert!(!is_arrangement_line("> >"));
        assert!(!is_arrangement_line(""));
        assert!(!is_arrangement_line("(V 1)"));
        assert!(!is_arrangement_line("(C) 2x"));
        assert!(is_arrangement_line("  (C)  "));
        assert!(parse_arrangement("lyrics (oh) yeah").is_empty());
    }

    #[test]
    fn test_badge_kinds() {
        assert_eq!(badge_kind("I"), BadgeKind::Intro);
        assert_eq!(badge_kind("V12"), BadgeKind::Verse);
        assert_eq!(badge_kind("PC"), BadgeKind::PreChorus);
        assert_eq!(badge_kind("int"), BadgeKind::Interlude);
        assert_eq!(badge_kind("CODA"), BadgeKind::Coda);
        assert_eq!(badge_kind("BRK"), BadgeKind::Break);
        assert_eq!(badge_kind("X"), BadgeKind::Other);
        assert_eq!(badge_kind("C2").css_class(), "badge-chorus");
    }

    #[test]
    fn test_section_badge() {
        assert_eq!(section_badge("Chorus").as_deref(), Some("C"));
        assert_eq!(section_badge("Pre-Chorus 1").as_deref(), Some("PC1"));
        assert_eq!(section_badge("Turnaround").as_deref(), Some("TURN"));
        assert_eq!(section_badge("Break").as_deref(), Some("BRK"));
        assert_eq!(section_badge("verse10").as_deref(), Some("V10"));
        assert_eq!(section_badge(""), None);
    }
}
