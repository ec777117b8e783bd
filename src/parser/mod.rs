//! # Parser Module
//!
//! Turns chart text into structure: metadata, directives, sections and the
//! arrangement line.
//!
//! ## Sub-modules
//! - `directives` - `{name: value}` directives and the layered metadata strategies
//! - `sections` - `{c: Name}` markers and clean `Label:` lines
//! - `arrangement` - the `(I) (V1)2x > (C)` summary line and badge tables
//!
//! The parsers never fail. A line that matches none of the recognized conventions is
//! plain content; a candidate that almost matches is treated the same way.
//!
//! ## Example
//! ```rust
//! use chordsheet::parse_chart;
//!
//! let source = r#"{title: Amazing Grace}
//! {key: G}
//! (V1) (V2) > (V3)
//! {c: Verse 1}
//! [G]Amazing [G7]grace how [C]sweet the [G]sound
//! "#;
//!
//! let chart = parse_chart(source);
//! assert_eq!(chart.metadata.title.as_deref(), Some("Amazing Grace"));
//! assert_eq!(chart.sections.len(), 1);
//! assert_eq!(chart.arrangement.len(), 4);
//! ```

pub mod arrangement;
pub mod directives;
pub mod sections;

pub use arrangement::{badge_kind, parse_arrangement, section_badge};
pub use directives::{extract_metadata, parse_directives};
pub use sections::parse_sections;

use crate::model::Chart;

/// Parse every structural part of a chart in one call.
pub fn parse_chart(text: &str) -> Chart {
    Chart {
        metadata: extract_metadata(text),
        directives: parse_directives(text),
        sections: parse_sections(text),
        arrangement: parse_arrangement(text),
    }
}
