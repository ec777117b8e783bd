//! # Directive & Metadata Parser
//!
//! Reads `{name: value}` directives and assembles `SongMetadata` from the chart header.
//!
//! ## Metadata strategies
//! Applied in this order; each one only fills fields that are still empty:
//! 1. Directives: `title`/`t`, `subtitle`/`st`/`artist`, `key`, `tempo`, `time`, `capo`.
//! 2. Legacy lines: `Title: X`, `Artist: X`, and `Key: K | BPM: N | Time: T/T`.
//! 3. A comma-separated summary line within the first three lines that mentions `Key:`
//!    (`Hillsong, Key: G, 72 BPM, 4/4`): artist before the first comma, then key, BPM
//!    and time signature, each extracted on its own.
//! 4. The first plain header line, as the title.
//!
//! ## Header boundary
//! Metadata is only read before the content begins. The first line that starts with
//! `{c:`, `|` or `[` ends the header, so fields written after that point are not seen.

use crate::convert::should_skip_line;
use crate::model::{DirectiveSet, SongMetadata};
use crate::parser::arrangement::is_arrangement_line;
use crate::parser::sections::section_start;
use crate::tokenizer::is_chord_row;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Directive name reserved for section markers.
pub const SECTION_MARKER_DIRECTIVE: &str = "c";

/// Lines of a summary line candidate window.
const SUMMARY_WINDOW: usize = 3;

lazy_static! {
    static ref DIRECTIVE_RE: Regex =
        Regex::new(r"\{\s*([A-Za-z_][\w-]*)\s*:\s*([^}]*)\}").expect("invalid directive pattern");
    static ref DIRECTIVE_LINE_RE: Regex =
        Regex::new(r"^\{[^{}]*\}$").expect("invalid directive line pattern");
    static ref CONTENT_START_RE: Regex =
        Regex::new(r"^(?:\{\s*[cC]\s*:|\||\[)").expect("invalid content start pattern");
    static ref LEGACY_TITLE_RE: Regex =
        Regex::new(r"(?i)^title\s*:\s*(.+?)$").expect("invalid title pattern");
    static ref LEGACY_ARTIST_RE: Regex =
        Regex::new(r"(?i)^(?:artist|by)\s*:\s*(.+?)$").expect("invalid artist pattern");
    static ref LEGACY_KEY_LINE_RE: Regex = Regex::new(
        r"(?i)^key\s*:\s*([^|]+?)\s*\|\s*bpm\s*:\s*(\d+)\s*\|\s*time\s*:\s*(\d+/\d+)$"
    )
    .expect("invalid key line pattern");
    static ref META_LABEL_RE: Regex =
        Regex::new(r"(?i)^(?:title|subtitle|artist|by|key|tempo|bpm|time|capo)\s*:")
            .expect("invalid label pattern");
    static ref SUMMARY_KEY_RE: Regex = Regex::new(
        r"(?i:key)\s*:\s*([A-G][#b]?(?:\s*(?i:major|minor|maj|min)|m)?)"
    )
    .expect("invalid summary key pattern");
    static ref SUMMARY_BPM_RE: Regex =
        Regex::new(r"(?i)(?:(\d{2,3})\s*bpm|bpm\s*:?\s*(\d{2,3}))").expect("invalid bpm pattern");
    static ref SUMMARY_TIME_RE: Regex =
        Regex::new(r"\b(\d{1,2}/\d{1,2})\b").expect("invalid time pattern");
}

/// Collect every `{name: value}` directive in the text.
///
/// Names are lower-cased, values trimmed, and the last occurrence of a name wins.
/// Section markers (`{c: ...}`) are not metadata and are left out.
///
/// # Example
/// ```
/// use chordsheet::parse_directives;
///
/// let d = parse_directives("{title: Amazing Grace}\n{Key: G}\n{c: Verse 1}\n{key: A}");
/// assert_eq!(d.get("title").map(String::as_str), Some("Amazing Grace"));
/// assert_eq!(d.get("key").map(String::as_str), Some("A"));
/// assert!(!d.contains_key("c"));
/// ```
pub fn parse_directives(text: &str) -> DirectiveSet {
    let mut directives = DirectiveSet::new();
    for caps in DIRECTIVE_RE.captures_iter(text) {
        let name = caps[1].to_lowercase();
        if name == SECTION_MARKER_DIRECTIVE {
            continue;
        }
        directives.insert(name, caps[2].trim().to_string());
    }
    directives
}

/// Whether a line is nothing but one `{...}` directive.
pub fn is_directive_line(line: &str) -> bool {
    DIRECTIVE_LINE_RE.is_match(line.trim())
}

/// Whether a line marks the start of chart content (section marker, grid, inline chords).
pub fn is_content_start(line: &str) -> bool {
    CONTENT_START_RE.is_match(line.trim_start())
}

/// Whether a line carries header metadata in one of the recognized conventions.
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    (is_directive_line(trimmed) && !is_content_start(trimmed))
        || META_LABEL_RE.is_match(trimmed)
        || is_summary_line(trimmed)
}

fn is_summary_line(line: &str) -> bool {
    line.contains(',') && line.to_lowercase().contains("key:")
}

/// Lines before the content begins.
fn header_lines(text: &str) -> Vec<&str> {
    let mut header = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if is_content_start(line) {
            debug!(line = index + 1, "metadata scan stopped at content start");
            break;
        }
        header.push(line);
    }
    header
}

fn fill(slot: &mut Option<String>, value: &str) {
    let value = value.trim();
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Assemble song metadata from the chart header.
///
/// # Example
/// ```
/// use chordsheet::extract_metadata;
///
/// let meta = extract_metadata("{title: Amazing Grace}\nKey: G | BPM: 72 | Time: 3/4\n[G]Amazing grace");
/// assert_eq!(meta.title.as_deref(), Some("Amazing Grace"));
/// assert_eq!(meta.key.as_deref(), Some("G"));
/// assert_eq!(meta.tempo.as_deref(), Some("72"));
/// assert_eq!(meta.time.as_deref(), Some("3/4"));
/// ```
pub fn extract_metadata(text: &str) -> SongMetadata {
    let header = header_lines(text);
    let mut meta = SongMetadata::default();

    // Directives
    let directives = parse_directives(&header.join("\n"));
    let lookup = |names: &[&str]| {
        names
            .iter()
            .find_map(|n| directives.get(*n).filter(|v| !v.is_empty()))
            .cloned()
            .unwrap_or_default()
    };
    fill(&mut meta.title, &lookup(&["title", "t"]));
    fill(&mut meta.artist, &lookup(&["artist", "subtitle", "st"]));
    fill(&mut meta.key, &lookup(&["key"]));
    fill(&mut meta.tempo, &lookup(&["tempo"]));
    fill(&mut meta.time, &lookup(&["time"]));
    fill(&mut meta.capo, &lookup(&["capo"]));

    // Legacy single-line conventions
    for line in header.iter().map(|l| l.trim()) {
        if let Some(caps) = LEGACY_TITLE_RE.captures(line) {
            fill(&mut meta.title, &caps[1]);
        } else if let Some(caps) = LEGACY_ARTIST_RE.captures(line) {
            fill(&mut meta.artist, &caps[1]);
        } else if let Some(caps) = LEGACY_KEY_LINE_RE.captures(line) {
            fill(&mut meta.key, &caps[1]);
            fill(&mut meta.tempo, &caps[2]);
            fill(&mut meta.time, &caps[3]);
        }
    }

    // Comma-separated summary line near the top
    if let Some(line) = header
        .iter()
        .take(SUMMARY_WINDOW)
        .map(|l| l.trim())
        .find(|l| is_summary_line(l))
    {
        apply_summary_line(&mut meta, line);
    }

    if meta.title.is_none() {
        if let Some(line) = header.iter().map(|l| l.trim()).find(|l| is_plain_title(l)) {
            fill(&mut meta.title, line);
        }
    }

    meta
}

fn apply_summary_line(meta: &mut SongMetadata, line: &str) {
    if let Some((artist, _)) = line.split_once(',') {
        let artist = artist.trim();
        if !artist.eq_ignore_ascii_case("unknown") && !artist.to_lowercase().contains("key:") {
            fill(&mut meta.artist, artist);
        }
    }
    if let Some(caps) = SUMMARY_KEY_RE.captures(line) {
        fill(&mut meta.key, &caps[1]);
    }
    if let Some(caps) = SUMMARY_BPM_RE.captures(line) {
        if let Some(bpm) = caps.get(1).or_else(|| caps.get(2)) {
            fill(&mut meta.tempo, bpm.as_str());
        }
    }
    if let Some(caps) = SUMMARY_TIME_RE.captures(line) {
        fill(&mut meta.time, &caps[1]);
    }
}

fn is_plain_title(line: &str) -> bool {
    !line.is_empty()
        && !should_skip_line(line)
        && !is_header_line(line)
        && !is_arrangement_line(line)
        && section_start(line).is_none()
        && !is_chord_row(line)
}
