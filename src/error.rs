//! # Error Types
//!
//! This module defines all error types for the chordmidi pipeline.
//!
//! Every failure is fatal for the single record or file being processed. Batch
//! conversion records the failure and moves on to the next independent file.
//!
//! ## Error Types
//! - `InvalidRoot` - A chord root outside 1-7 reached the chord table
//! - `UnknownChordQuality` - A quality tag outside the fixed nine
//! - `MalformedPitchName` - A note name that is not `[A-G](#|-)?[0-7]`
//! - `MissingInputResource` - A store row, file or directory that is not there
//! - `InvalidRecord` - A progression record field that fails validation
//! - `InvalidEvent` - An event table row that cannot become a MIDI note
//! - `ConfigError` - An unreadable or out-of-range settings file
//!
//! ## Usage
//! ```rust
//! use chordmidi::{to_midi_number, ChordMidiError};
//!
//! match to_midi_number("H4") {
//!     Ok(key) => println!("MIDI key {}", key),
//!     Err(ChordMidiError::MalformedPitchName(name)) => {
//!         eprintln!("cannot encode '{}'", name);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChordMidiError {
    /// Chord root outside the diatonic degrees 1 through 7.
    ///
    /// # Example
    /// ```
    /// # use chordmidi::ChordMidiError;
    /// let err = ChordMidiError::InvalidRoot(9);
    /// assert_eq!(err.to_string(), "Invalid chord root 9: expected a degree from 1 to 7");
    /// ```
    #[error("Invalid chord root {0}: expected a degree from 1 to 7")]
    InvalidRoot(i64),

    /// Chord quality tag outside `M m aug dim 7th M7th m7th sus2 sus4`.
    #[error("Unknown chord quality '{0}'")]
    UnknownChordQuality(String),

    /// Pitch name that does not match `[A-G](#|-)?[0-7]` or has no table entry.
    ///
    /// # Example
    /// ```
    /// # use chordmidi::ChordMidiError;
    /// let err = ChordMidiError::MalformedPitchName("C9".to_string());
    /// assert_eq!(err.to_string(), "Note not formatted correctly: 'C9'");
    /// ```
    #[error("Note not formatted correctly: '{0}'")]
    MalformedPitchName(String),

    /// A record row, file or directory the caller asked for does not exist.
    #[error("Missing input: {0}")]
    MissingInputResource(String),

    /// A progression record field failed validation.
    ///
    /// # Example
    /// ```
    /// # use chordmidi::ChordMidiError;
    /// let err = ChordMidiError::InvalidRecord {
    ///     field: "comfort".to_string(),
    ///     message: "7 is outside -5..=5".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Invalid record field 'comfort': 7 is outside -5..=5");
    /// ```
    #[error("Invalid record field '{field}': {message}")]
    InvalidRecord { field: String, message: String },

    /// An event table row (1-based, header excluded) that cannot be written as a note.
    #[error("Invalid event at row {row}: {message}")]
    InvalidEvent { row: usize, message: String },

    /// Settings file could not be parsed or holds out-of-range values.
    #[error("Invalid settings: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ChordMidiError {
    pub(crate) fn record(field: impl Into<String>, message: impl Into<String>) -> Self {
        ChordMidiError::InvalidRecord {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ChordMidiError>;
