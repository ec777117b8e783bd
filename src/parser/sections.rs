//! # Section Parser
//!
//! Splits chart text into named sections.
//!
//! A section starts at either
//! - an explicit marker directive, `{c: Verse 1}`, or
//! - a clean label line whose whole content is a section keyword with an optional
//!   number and colon: `Chorus`, `Verse 2:`, `pre-chorus`, `Turnaround:`.
//!
//! Every following line that is not skipped by `should_skip_line` belongs to the open
//! section until the next start. Lines before the first start are the header; if chord
//! content shows up there, an untitled section of type `other` is opened for it.

use crate::convert::should_skip_line;
use crate::model::Section;
use crate::parser::directives::{is_content_start, is_header_line};
use crate::tokenizer::tokenize_line;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref SECTION_MARKER_RE: Regex =
        Regex::new(r"^\{\s*[cC]\s*:\s*(.*?)\s*\}$").expect("invalid section marker pattern");
    static ref SECTION_LABEL_RE: Regex = Regex::new(
        r"(?i)^((?:intro|verse|pre-?chorus|chorus|bridge|outro|interlude|tag|coda|turn(?:around)?|break|instrumental|solo|ending|vamp)(?:\s*\d+)?)\s*:?$"
    )
    .expect("invalid section label pattern");
}

/// Name of the section a line opens, if it is a marker or a clean label.
///
/// # Example
/// ```
/// use chordsheet::parser::sections::section_start;
///
/// assert_eq!(section_start("{c: Verse 1}").as_deref(), Some("Verse 1"));
/// assert_eq!(section_start("Chorus:").as_deref(), Some("Chorus"));
/// assert_eq!(section_start("Chorus of angels"), None);
/// ```
pub fn section_start(line: &str) -> Option<String> {
    let trimmed = line.trim();
    SECTION_MARKER_RE
        .captures(trimmed)
        .or_else(|| SECTION_LABEL_RE.captures(trimmed))
        .map(|caps| caps[1].to_string())
}

/// Segment a chart into sections.
///
/// # Example
/// ```
/// use chordsheet::{parse_sections, SectionType};
///
/// let sections = parse_sections("{c: Verse 1}\n[G]Amazing grace\n\nChorus:\n[C]How sweet");
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[0].name, "Verse 1");
/// assert_eq!(sections[0].kind, SectionType::Verse);
/// assert_eq!(sections[0].lines, vec!["[G]Amazing grace"]);
/// assert_eq!(sections[1].kind, SectionType::Chorus);
/// ```
pub fn parse_sections(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(name) = section_start(line) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            debug!(section = %name, "section opened");
            current = Some(Section::new(name));
            continue;
        }
        if should_skip_line(line) {
            continue;
        }
        match current.as_mut() {
            Some(section) => section.lines.push(line.to_string()),
            None if starts_content(line) => {
                debug!("content before any section marker, opening untitled section");
                let mut section = Section::new("");
                section.lines.push(line.to_string());
                current = Some(section);
            }
            None => {}
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }
    sections
}

fn starts_content(line: &str) -> bool {
    !is_header_line(line) && (is_content_start(line) || !tokenize_line(line).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionType;

    #[test]
    fn test_marker_and_label_recognizers() {
        assert_eq!(section_start("  {c:Bridge}  ").as_deref(), Some("Bridge"));
        assert_eq!(section_start("{C: Tag}").as_deref(), Some("Tag"));
        assert_eq!(section_start("Pre-Chorus 2:").as_deref(), Some("Pre-Chorus 2"));
        assert_eq!(section_start("PRECHORUS").as_deref(), Some("PRECHORUS"));
        assert_eq!(section_start("Turnaround").as_deref(), Some("Turnaround"));
        assert_eq!(section_start("verse3").as_deref(), Some("verse3"));
        assert_eq!(section_start("Verse one"), None);
        assert_eq!(section_start("{title: Verse}"), None);
    }

    #[test]
    fn test_sections_accumulate_lines_in_order() {
        let text = "{c: Intro}\n| G | C |\n{c: Verse 1}\n[G]line one\n[C]line two\nOutro\n[G]end";
        let sections = parse_sections(text);
        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Intro", "Verse 1", "Outro"]);
        assert_eq!(sections[1].lines, vec!["[G]line one", "[C]line two"]);
        assert_eq!(sections[2].kind, SectionType::Outro);
    }

    #[test]
    fn test_skippable_lines_are_dropped() {
        let text = "{c: Chorus}\n\n(C) > (V1)\n{capo: 2}\nAnalysis: mostly diatonic\n---\n```\n[F]sing";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].lines, vec!["[F]sing"]);
    }

    #[test]
    fn test_header_lines_are_not_content() {
        let text = "Amazing Grace\n{key: G}\nKey: G | BPM: 72 | Time: 3/4\n{c: Verse}\n[G]A";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Verse");
        assert_eq!(sections[0].lines, vec!["[G]A"]);
    }

    #[test]
    fn test_content_without_markers_opens_untitled_section() {
        let text = "My Song\nG    C\nHello there\n\nChorus\n[D]Loud";
        let sections = parse_sections(text);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "");
        assert_eq!(sections[0].kind, SectionType::Other);
        assert_eq!(sections[0].lines, vec!["G    C", "Hello there"]);
        assert_eq!(sections[1].name, "Chorus");
    }

    #[test]
    fn test_empty_section_is_kept() {
        let sections = parse_sections("{c: Intro}\n{c: Verse}\nwords");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].lines.is_empty());
        assert_eq!(sections[1].lines, vec!["words"]);
    }
}
