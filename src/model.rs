//! # Chart Model
//!
//! This module defines the value types produced and consumed by the engine.
//!
//! ## Type Hierarchy
//! ```text
//! Chart
//!   ├── SongMetadata (title, artist, key, tempo, time, capo)
//!   ├── DirectiveSet: BTreeMap<name, value>
//!   ├── Vec<Section>
//!   │     ├── name: String
//!   │     ├── kind: SectionType (intro, verse, prechorus, chorus, ...)
//!   │     └── lines: Vec<String>
//!   └── Vec<ArrangementItem> (Badge { label, repeat } | Flow)
//!
//! Chord
//!   ├── root: Note (PitchClass + Accidental as written)
//!   ├── quality: String (verbatim suffix: m7, sus4, maj7, ...)
//!   └── bass: Option<Note>
//!
//! Key
//!   ├── root: PitchClass
//!   └── mode: Mode (major | minor)
//! ```
//!
//! ## Key Concepts
//!
//! ### Pitch classes and spelling
//! A `PitchClass` is one of 12 values (0 = C). It carries no spelling; a `Note` pairs a
//! pitch class with the accidental it was written with, so rare spellings like `E#` or
//! `Fb` are read correctly. Re-spelling after transposition always picks from the plain
//! sharp or flat table.
//!
//! ### Quality is opaque
//! Everything between the root and the bass is kept as a string and never
//! interpreted by transposition. Only the Nashville mapper looks at it, and only to
//! tell major, minor and diminished apart.
//!
//! All types are plain values: a parse produces a snapshot and nothing refers back to
//! the source text.

use crate::error::ChartError;
use crate::grammar;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Sharp spellings indexed by pitch class, starting at C.
pub const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
/// Flat spellings indexed by pitch class, starting at C.
pub const FLAT_NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

const NATURAL_LETTERS: [Option<char>; 12] = [
    Some('C'), None, Some('D'), None, Some('E'), Some('F'),
    None, Some('G'), None, Some('A'), None, Some('B'),
];

lazy_static! {
    /// Every spelling the grammar can produce, mapped to its canonical index.
    static ref ENHARMONICS: HashMap<&'static str, u8> = {
        HashMap::from([
            ("C", 0), ("B#", 0),
            ("C#", 1), ("Db", 1),
            ("D", 2),
            ("D#", 3), ("Eb", 3),
            ("E", 4), ("Fb", 4),
            ("F", 5), ("E#", 5),
            ("F#", 6), ("Gb", 6),
            ("G", 7),
            ("G#", 8), ("Ab", 8),
            ("A", 9),
            ("A#", 10), ("Bb", 10),
            ("B", 11), ("Cb", 11),
        ])
    };
}

/// One of the 12 pitch classes, 0 = C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub fn new(index: u8) -> Self {
        Self(index % 12)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Look up a spelling (`"Db"`, `"E#"`, ...) in the enharmonic table.
    pub fn from_name(name: &str) -> Option<Self> {
        ENHARMONICS.get(name).map(|&i| Self(i))
    }

    /// Plain spelling of this pitch class from the sharp or flat table.
    pub fn name(self, prefer_flats: bool) -> &'static str {
        if prefer_flats {
            FLAT_NAMES[self.0 as usize]
        } else {
            SHARP_NAMES[self.0 as usize]
        }
    }

    /// Shift by a signed number of semitones, wrapping into 0..12.
    pub fn transpose(self, semitones: i32) -> Self {
        Self((self.0 as i32 + semitones).rem_euclid(12) as u8)
    }

    /// Upward distance in semitones from `self` to `other` (0..12).
    pub fn interval_to(self, other: PitchClass) -> u8 {
        (other.0 + 12 - self.0) % 12
    }

    /// Signed semitones of the shortest move to `other` (-5..=6, a tritone goes up).
    pub fn shortest_motion_to(self, other: PitchClass) -> i32 {
        let up = self.interval_to(other) as i32;
        if up > 6 {
            up - 12
        } else {
            up
        }
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(false))
    }
}

impl FromStr for PitchClass {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| ChartError::InvalidPitch(s.to_string()))
    }
}

/// Accidental a note was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A pitch class together with how it was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Note {
    pub pitch: PitchClass,
    pub accidental: Accidental,
}

impl Note {
    /// Parse a spelling such as `"F#"`, `"Bb"` or `"Cb"`.
    pub fn parse(name: &str) -> Option<Self> {
        let pitch = PitchClass::from_name(name)?;
        let accidental = match name.chars().nth(1) {
            Some('#') => Accidental::Sharp,
            Some('b') => Accidental::Flat,
            _ => Accidental::Natural,
        };
        Some(Self { pitch, accidental })
    }

    /// Plain spelling of a pitch class from the sharp or flat table.
    pub fn spelled(pitch: PitchClass, prefer_flats: bool) -> Self {
        let accidental = if NATURAL_LETTERS[pitch.index() as usize].is_some() {
            Accidental::Natural
        } else if prefer_flats {
            Accidental::Flat
        } else {
            Accidental::Sharp
        };
        Self { pitch, accidental }
    }

    fn letter(&self) -> char {
        // The letter sits one semitone away from the sounding pitch for sharps and flats
        let letter_pitch = match self.accidental {
            Accidental::Natural => self.pitch,
            Accidental::Sharp => self.pitch.transpose(-1),
            Accidental::Flat => self.pitch.transpose(1),
        };
        NATURAL_LETTERS[letter_pitch.index() as usize].unwrap_or('?')
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => f.write_str("#"),
            Accidental::Flat => f.write_str("b"),
        }
    }
}

/// A chord symbol: root, verbatim quality suffix, optional slash bass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chord {
    pub root: Note,
    pub quality: String,
    pub bass: Option<Note>,
}

impl Chord {
    /// Lenient parse: any suffix is accepted once the root is valid.
    pub fn parse(symbol: &str) -> Option<Self> {
        let parts = grammar::split_symbol(symbol)?;
        let root = Note::parse(parts.root)?;
        let bass = match parts.bass {
            Some(b) => Some(Note::parse(b)?),
            None => None,
        };
        Some(Self {
            root,
            quality: parts.suffix.to_string(),
            bass,
        })
    }

    /// Coarse triad family, read from the front of the quality suffix.
    pub fn triad(&self) -> Triad {
        let q = self.quality.as_str();
        if q.starts_with("dim") || q.starts_with('°') || q.starts_with('ø') || q.starts_with("m7b5") {
            Triad::Diminished
        } else if q.starts_with("aug") || q.starts_with('+') {
            Triad::Augmented
        } else if q.starts_with("maj")
            || (q.starts_with("ma") && !q.starts_with("madd"))
            || q.starts_with('M')
        {
            Triad::Major
        } else if q.starts_with("min") || q.starts_with('m') || q.starts_with('-') {
            Triad::Minor
        } else {
            Triad::Major
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = &self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

impl FromStr for Chord {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| ChartError::InvalidChord(s.to_string()))
    }
}

/// Triad family of a chord, as far as degree labelling cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triad {
    Major,
    Minor,
    Diminished,
    Augmented,
}

/// Mode of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// A key: tonic pitch class and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Key {
    pub root: PitchClass,
    pub mode: Mode,
}

impl Key {
    /// Parse a free-text key label: `"G"`, `"G Major"`, `"Am"`, `"F# minor"`, `"Bbmin"`.
    ///
    /// A label without a recognizable mode is major.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let root_name = grammar::leading_root(label)?;
        let root = PitchClass::from_name(root_name)?;
        let mode = mode_of(&label[root_name.len()..]).unwrap_or_default();
        Some(Self { root, mode })
    }

    /// Whether this key is conventionally written with flats.
    ///
    /// Flat majors: F, Bb, Eb, Ab, Db. Flat minors: D, G, C, F, Bb, Eb.
    pub fn prefers_flats(&self) -> bool {
        match self.mode {
            Mode::Major => matches!(self.root.index(), 1 | 3 | 5 | 8 | 10),
            Mode::Minor => matches!(self.root.index(), 0 | 2 | 3 | 5 | 7 | 10),
        }
    }

    /// The tonic spelled the way this key is conventionally written.
    pub fn tonic_name(&self) -> &'static str {
        self.root.name(self.prefers_flats())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{} Major", self.tonic_name()),
            Mode::Minor => write!(f, "{} Minor", self.tonic_name()),
        }
    }
}

impl FromStr for Key {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ChartError::InvalidKey(s.to_string()))
    }
}

/// Explicit mode named by the text after a key's root, if any.
pub(crate) fn mode_of(rest: &str) -> Option<Mode> {
    let rest = rest.trim();
    let lower = rest.to_lowercase();
    if rest.is_empty() {
        None
    } else if lower.starts_with("maj") {
        Some(Mode::Major)
    } else if lower.starts_with("min") || rest == "-" {
        Some(Mode::Minor)
    } else if let Some(after) = rest.strip_prefix('m') {
        // Chord-style labels: `m`, `m7`, `m(add9)`, `madd9`; but not `mixolydian`
        let quality_follows = after.starts_with("add")
            || !after.chars().next().map_or(false, char::is_alphabetic);
        quality_follows.then_some(Mode::Minor)
    } else {
        None
    }
}

/// Accidental preference when re-spelling transposed notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    Sharps,
    Flats,
    /// Follow the destination key's convention; sharps when no key is known.
    #[default]
    Auto,
}

impl Spelling {
    pub fn prefer_flats(self, destination: Option<&Key>) -> bool {
        match self {
            Spelling::Sharps => false,
            Spelling::Flats => true,
            Spelling::Auto => destination.map_or(false, Key::prefers_flats),
        }
    }
}

/// Directive name → trimmed value. Section markers (`c`) are never stored.
pub type DirectiveSet = BTreeMap<String, String>;

/// Closed set of section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Intro,
    Verse,
    PreChorus,
    Chorus,
    Bridge,
    Outro,
    Tag,
    Interlude,
    Other,
}

impl SectionType {
    /// Classify a section name by keyword.
    ///
    /// `Pre-Chorus` is checked before `Chorus`; endings and codas count as outros,
    /// instrumental passages as interludes, vamps as tags.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let squashed: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
        if squashed.starts_with("prechorus") || (squashed.starts_with("pre") && lower.contains("chorus")) {
            SectionType::PreChorus
        } else if lower.contains("intro") {
            SectionType::Intro
        } else if lower.contains("verse") {
            SectionType::Verse
        } else if lower.contains("chorus") {
            SectionType::Chorus
        } else if lower.contains("bridge") {
            SectionType::Bridge
        } else if lower.contains("outro") || lower.contains("ending") || lower.contains("coda") {
            SectionType::Outro
        } else if lower.contains("tag") || lower.contains("vamp") {
            SectionType::Tag
        } else if ["interlude", "instrumental", "solo", "break", "turn"]
            .iter()
            .any(|k| lower.contains(k))
        {
            SectionType::Interlude
        } else {
            SectionType::Other
        }
    }
}

/// A named block of chart lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = SectionType::from_name(&name);
        Self {
            name,
            kind,
            lines: Vec::new(),
        }
    }
}

/// Kind of an arrangement badge. Wider than `SectionType`: codas, turnarounds and
/// breaks get their own badge colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Intro,
    Verse,
    PreChorus,
    Chorus,
    Bridge,
    Outro,
    Interlude,
    Tag,
    Coda,
    Turn,
    Break,
    Other,
}

impl BadgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeKind::Intro => "intro",
            BadgeKind::Verse => "verse",
            BadgeKind::PreChorus => "prechorus",
            BadgeKind::Chorus => "chorus",
            BadgeKind::Bridge => "bridge",
            BadgeKind::Outro => "outro",
            BadgeKind::Interlude => "interlude",
            BadgeKind::Tag => "tag",
            BadgeKind::Coda => "coda",
            BadgeKind::Turn => "turn",
            BadgeKind::Break => "break",
            BadgeKind::Other => "other",
        }
    }

    /// Colour class used by renderers, e.g. `badge-chorus`.
    pub fn css_class(&self) -> String {
        format!("badge-{}", self.as_str())
    }
}

/// One entry of the arrangement summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ArrangementItem {
    Badge { label: String, repeat: u32 },
    Flow,
}

/// Song metadata assembled from directives and header conventions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SongMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub tempo: Option<String>,
    pub time: Option<String>,
    pub capo: Option<String>,
}

/// A fully parsed chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub metadata: SongMetadata,
    pub directives: DirectiveSet,
    pub sections: Vec<Section>,
    pub arrangement: Vec<ArrangementItem>,
}
