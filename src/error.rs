//! # Error Types
//!
//! This module defines the error type for the chordsheet engine.
//!
//! The text-level operations (`transpose_chord`, `transpose_content`, `parse_sections`,
//! `extract_metadata`, ...) never fail: unrecognized input is passed through unchanged.
//! `ChartError` is only produced by the strict, typed constructors (`FromStr` for
//! `PitchClass`, `Chord` and `Key`) and by configuration / file handling.
//!
//! ## Usage
//! ```rust
//! use chordsheet::{Chord, ChartError};
//!
//! match "H7".parse::<Chord>() {
//!     Ok(chord) => println!("root is {}", chord.root),
//!     Err(ChartError::InvalidChord(symbol)) => eprintln!("not a chord: {}", symbol),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// A note name that is not a letter A-G with an optional `#` or `b`.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChartError;
    /// let err = ChartError::InvalidPitch("H".to_string());
    /// assert_eq!(err.to_string(), "Unrecognized pitch spelling 'H'");
    /// ```
    #[error("Unrecognized pitch spelling '{0}'")]
    InvalidPitch(String),

    /// A chord symbol that does not start with a valid root.
    #[error("Unrecognized chord symbol '{0}'")]
    InvalidChord(String),

    /// A key label that does not start with a valid root.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChartError;
    /// let err = ChartError::InvalidKey("Z Major".to_string());
    /// assert_eq!(err.to_string(), "Unrecognized key 'Z Major'");
    /// ```
    #[error("Unrecognized key '{0}'")]
    InvalidKey(String),

    /// Transposing to a named key needs the chart's own key, and none was found.
    #[error("Chart has no key to transpose from")]
    MissingKey,

    /// Configuration file could not be interpreted.
    #[error("Invalid configuration in '{path}': {message}")]
    Config { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
