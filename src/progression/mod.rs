//! # Progression Module
//!
//! Expand a numeric chord progression into a flat list of note events.
//!
//! ## Purpose
//! A progression is a short list of chord slots, each a diatonic root degree
//! (1 = C ... 7 = B) and a quality tag. The expander turns it into one
//! [`NoteEvent`] per chord tone, ready for the event table and the MIDI writer.
//!
//! ## Sub-modules
//! - `types` - ChordSlot, NoteEvent, ExpansionSettings
//! - `chord_table` - Root + quality to ordered pitch classes
//! - `engine` - Slot parsing and event generation
//!
//! ## Example
//! ```rust
//! use chordmidi::progression::{expand, parse_chord_slots};
//!
//! let slots = parse_chord_slots(&["1", "M", "2", "m", "0", "0", "0", "0"]).unwrap();
//! let events = expand(&slots).unwrap();
//!
//! assert_eq!(events.len(), 6);
//! assert_eq!(events[3].start_time, 4);
//! assert_eq!(events[0].note_name(Default::default()), "C4");
//! ```
//!
//! ## Timing
//! Every tone of a chord shares the chord's start time. The clock advances by
//! `duration_beats` once per chord, never per note:
//!
//! ```text
//! slot      1 M         2 m         0 (end)
//! start     0 0 0       4 4 4
//! tones     C E G       D F A
//! ```
//!
//! ## Sentinel
//! A slot whose root is 0 ends the progression. Nothing after it is read, and
//! a progression that starts with the sentinel expands to no events at all.

mod chord_table;
mod engine;
mod types;

#[cfg(test)]
mod tests;

pub use chord_table::{chord_names, chord_notes};
pub use engine::{expand, expand_record, parse_chord_slots, Expander};
pub use types::{ChordSlot, ExpansionSettings, NoteEvent, MAX_CHORD_SLOTS};
