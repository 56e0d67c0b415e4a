pub mod config;
pub mod convert;
pub mod error;
pub mod midi;
pub mod pitch;
pub mod progression;
pub mod record;
pub mod table;
pub mod theory;

pub use config::Settings;
pub use convert::{convert_directory, convert_file, expand_to_table, BatchReport};
pub use error::*;
pub use midi::{build_midi, MidiSettings};
pub use pitch::to_midi_number;
pub use progression::{chord_notes, expand, ChordSlot, ExpansionSettings, Expander, NoteEvent};
pub use record::ProgressionRecord;
pub use theory::{ChordQuality, PitchClass, Spelling};

/// Validate a record's text fields and expand its chords with default settings.
/// This is the main entry point for the library.
pub fn expand_fields<S: AsRef<str>>(fields: &[S]) -> Result<Vec<NoteEvent>> {
    let record = ProgressionRecord::from_fields(fields)?;
    progression::expand_record(&record)
}

/// Render an event table (CSV text) as MIDI file bytes with default settings
pub fn table_to_midi(csv: &str) -> Result<Vec<u8>> {
    let rows = table::read_event_table(csv.as_bytes())?;
    build_midi(&rows, &MidiSettings::default())
}
