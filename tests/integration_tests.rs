//! Integration tests for the chordsheet engine
//!
//! Tests whole charts through parsing, transposition, notation conversion and
//! Nashville numbering.

use chordsheet::tokenizer::tokenize_line;
use chordsheet::{
    chord_to_degree, extract_metadata, inline_to_stacked, nashville_content, parse_arrangement,
    parse_chart, stacked_to_inline, transpose_chart, transpose_chord, transpose_content, ArrangementItem,
    Chord, PitchClass, SectionType, Spelling,
};
use pretty_assertions::assert_eq;

const AMAZING_GRACE: &str = r#"{title: Amazing Grace}
{artist: John Newton}
{key: G}
{tempo: 72}
{time: 3/4}
(I) (V1) (V2) > (C)2x

{c: Intro}
| G | G7 | C . G | D |

{c: Verse 1}
[G]Amazing [G7]grace how [C]sweet the [G]sound
That [G]saved a [Em]wretch like [D]me

Chorus:
[G]I once was [D/F#]lost but [Em]now am [C]found
"#;

const SYMBOLS: &[&str] = &[
    "C", "C#m7", "Db", "Ebmaj7", "F#", "Gsus4", "Ab7", "Am/Bb", "Bbadd9", "B/D#", "Cb", "E#", "Fm7b5",
    "G/B", "D7#9",
];

fn root_of(symbol: &str) -> PitchClass {
    Chord::parse(symbol).unwrap().root.pitch
}

#[test]
fn test_parse_full_chart() {
    let chart = parse_chart(AMAZING_GRACE);

    assert_eq!(chart.metadata.title.as_deref(), Some("Amazing Grace"));
    assert_eq!(chart.metadata.artist.as_deref(), Some("John Newton"));
    assert_eq!(chart.metadata.key.as_deref(), Some("G"));
    assert_eq!(chart.metadata.tempo.as_deref(), Some("72"));
    assert_eq!(chart.metadata.time.as_deref(), Some("3/4"));

    let names: Vec<&str> = chart.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Intro", "Verse 1", "Chorus"]);
    let kinds: Vec<SectionType> = chart.sections.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![SectionType::Intro, SectionType::Verse, SectionType::Chorus]);
    assert_eq!(chart.sections[1].lines.len(), 2);

    assert_eq!(chart.arrangement.len(), 5);
    assert_eq!(
        chart.arrangement[4],
        ArrangementItem::Badge {
            label: "C".to_string(),
            repeat: 2
        }
    );
}

#[test]
fn test_transposition_identity() {
    for symbol in SYMBOLS {
        assert_eq!(transpose_chord(symbol, 0, false), *symbol);
        assert_eq!(transpose_chord(symbol, 0, true), *symbol);
    }
    assert_eq!(transpose_content(AMAZING_GRACE, 0, true), AMAZING_GRACE);
}

#[test]
fn test_transposition_periodicity() {
    for symbol in SYMBOLS {
        for flats in [false, true] {
            let shifted = transpose_chord(symbol, 12, flats);
            assert_eq!(root_of(&shifted), root_of(symbol), "{}", symbol);
            let parsed = Chord::parse(&shifted).unwrap();
            assert_eq!(parsed.quality, Chord::parse(symbol).unwrap().quality);
        }
    }
}

#[test]
fn test_transposition_additivity() {
    for symbol in SYMBOLS {
        for (n, m) in [(1, 2), (5, -7), (-48, 11), (13, 47)] {
            let stepped = transpose_chord(&transpose_chord(symbol, n, true), m, true);
            let direct = transpose_chord(symbol, n + m, true);
            assert_eq!(root_of(&stepped), root_of(&direct), "{} by {} then {}", symbol, n, m);
        }
    }
}

#[test]
fn test_grid_and_bracket_parity() {
    for semitones in -6..=6 {
        let grid = transpose_content("| G | Am |", semitones, false);
        let inline = transpose_content("[G] [Am]", semitones, false);
        let from_grid: Vec<String> = tokenize_line(&grid).into_iter().map(|t| t.chord).collect();
        let from_inline: Vec<String> = tokenize_line(&inline).into_iter().map(|t| t.chord).collect();
        assert_eq!(from_grid, from_inline);
    }
}

#[test]
fn test_transpose_whole_chart() {
    let transposed = transpose_chart(AMAZING_GRACE, 2, Spelling::Auto);
    assert!(transposed.contains("{key: A Major}"));
    assert!(transposed.contains("| A | A7 | D . A | E |"));
    assert!(transposed.contains("[A]Amazing [A7]grace how [D]sweet the [A]sound"));
    assert!(transposed.contains("[A]I once was [E/G#]lost but [F#m]now am [D]found"));
    assert!(transposed.contains("(I) (V1) (V2) > (C)2x"));
    assert!(transposed.ends_with("found\n"));
}

#[test]
fn test_round_trip_preserves_chords_and_lyrics() {
    let lines = [
        "[G]Amazing [G7]grace how [C]sweet the [G]sound",
        "That [G]saved a [Em]wretch like [D]me",
        "[Cmaj7]Hi [G]there, [D/F#]friend",
        "Hello [G]",
        "[G] [C] [D]",
        "  [A]Indented [E]line",
        "[G]A",
        "[C7(#11)]x [G]y",
    ];
    for line in lines {
        let stacked = inline_to_stacked(line);
        let back = stacked_to_inline(&stacked);
        let chords = |text: &str| -> Vec<String> {
            tokenize_line(text).into_iter().map(|t| t.chord).collect()
        };
        let lyric = |text: &str| -> String {
            let mut out = String::new();
            let mut cursor = 0;
            for token in tokenize_line(text) {
                out.push_str(&text[cursor..token.start]);
                cursor = token.end();
            }
            out.push_str(&text[cursor..]);
            out.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        assert_eq!(chords(&back), chords(line), "{}", line);
        assert_eq!(lyric(&back), lyric(line), "{}", line);
    }
}

#[test]
fn test_stacked_chart_round_trip() {
    let stacked = inline_to_stacked(AMAZING_GRACE);
    assert!(stacked.contains("G       G7        C         G\nAmazing grace how sweet the sound"));
    assert!(stacked.contains("| G | G7 | C . G | D |"));
    assert_eq!(stacked_to_inline(&stacked), AMAZING_GRACE);
}

#[test]
fn test_directive_precedence() {
    let text = "Some Other Title\n{title: The Real Title}\n{c: Verse}\n[G]la";
    assert_eq!(extract_metadata(text).title.as_deref(), Some("The Real Title"));
    assert_eq!(extract_metadata("Plain Title\n{c: Verse}\n[G]la").title.as_deref(), Some("Plain Title"));
}

#[test]
fn test_arrangement_example() {
    assert_eq!(
        parse_arrangement("(I) (V1)2x > (C)"),
        vec![
            ArrangementItem::Badge {
                label: "I".to_string(),
                repeat: 1
            },
            ArrangementItem::Badge {
                label: "V1".to_string(),
                repeat: 2
            },
            ArrangementItem::Flow,
            ArrangementItem::Badge {
                label: "C".to_string(),
                repeat: 1
            },
        ]
    );
}

#[test]
fn test_nashville_examples() {
    assert_eq!(chord_to_degree("Am", "C Major").as_deref(), Some("6"));
    assert_eq!(chord_to_degree("Bdim", "C Major").as_deref(), Some("7°"));
    assert_eq!(chord_to_degree("Eb", "C Major"), None);
}

#[test]
fn test_nashville_chart() {
    let numbered = nashville_content(AMAZING_GRACE, "G");
    assert!(numbered.contains("| 1 | 1 | 4 . 1 | 5 |"));
    assert!(numbered.contains("[1]Amazing [1]grace how [4]sweet the [1]sound"));
    assert!(numbered.contains("[1]I once was [5/7]lost but [6]now am [4]found"));
    assert!(numbered.contains("{key: G}"));
}

#[test]
fn test_malformed_input_degrades() {
    let junk = "{{{ not: closed\n[H7] [ ] []\n| x | y |\n(V1) maybe > (C)";
    let chart = parse_chart(junk);
    assert!(chart.arrangement.is_empty());
    assert_eq!(transpose_content(junk, 3, false), junk);
    assert_eq!(inline_to_stacked(junk), junk);
}
