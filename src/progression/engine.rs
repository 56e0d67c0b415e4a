//! Progression expansion engine
//!
//! Walks chord slots in order and lays out one event per chord tone.

use super::chord_table::chord_notes;
use super::types::{ChordSlot, ExpansionSettings, NoteEvent, MAX_CHORD_SLOTS};
use crate::error::{ChordMidiError, Result};
use crate::record::ProgressionRecord;
use crate::theory::ChordQuality;

impl ChordSlot {
    /// Parse a stored (root, quality) token pair.
    ///
    /// A root of `0` is the sentinel whatever the quality token says.
    pub fn parse(root: &str, quality: &str) -> Result<Self> {
        let root_value: i64 = root.trim().parse().map_err(|_| {
            ChordMidiError::record("root", format!("'{}' is not an integer", root.trim()))
        })?;

        if root_value == 0 {
            return Ok(ChordSlot::End);
        }
        if !(1..=7).contains(&root_value) {
            return Err(ChordMidiError::InvalidRoot(root_value));
        }

        let quality: ChordQuality = quality.trim().parse()?;
        Ok(ChordSlot::Chord {
            root: root_value as u8,
            quality,
        })
    }
}

/// Parse a flat root/quality token list two at a time.
///
/// The list may be shorter than eight pairs. A trailing root with no quality
/// token is only accepted when it is the sentinel.
pub fn parse_chord_slots<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<ChordSlot>> {
    if tokens.len() > MAX_CHORD_SLOTS * 2 {
        return Err(ChordMidiError::record(
            "chords",
            format!("{} tokens given, at most {} pairs allowed", tokens.len(), MAX_CHORD_SLOTS),
        ));
    }

    tokens
        .chunks(2)
        .map(|pair| match pair {
            [root, quality] => ChordSlot::parse(root.as_ref(), quality.as_ref()),
            [root] if root.as_ref().trim() == "0" => Ok(ChordSlot::End),
            [root] => Err(ChordMidiError::record(
                "quality",
                format!("root {} has no chord quality", root.as_ref().trim()),
            )),
            _ => unreachable!(),
        })
        .collect()
}

/// Expands chord slots with a fixed set of [`ExpansionSettings`]
#[derive(Debug, Clone, Default)]
pub struct Expander {
    settings: ExpansionSettings,
}

impl Expander {
    pub fn new(settings: ExpansionSettings) -> Self {
        Self { settings }
    }

    /// Lay out the slots as note events.
    ///
    /// Stops at the first [`ChordSlot::End`]. Each chord's tones share one start
    /// time; the clock advances by the chord duration after every chord.
    pub fn expand(&self, slots: &[ChordSlot]) -> Result<Vec<NoteEvent>> {
        let mut events = Vec::new();
        let mut start_time = 0;

        for slot in slots {
            let (root, quality) = match *slot {
                ChordSlot::Chord { root, quality } => (root, quality),
                ChordSlot::End => break,
            };

            let tones = chord_notes(root, quality)?;
            log::debug!("chord {}{} at beat {}: {} tones", root, quality, start_time, tones.len());

            events.extend(tones.into_iter().map(|pitch| NoteEvent {
                pitch,
                octave: self.settings.octave,
                start_time,
                duration: self.settings.duration_beats,
                velocity: self.settings.velocity,
                tempo: self.settings.tempo,
            }));

            start_time += self.settings.duration_beats;
        }

        Ok(events)
    }

    /// Expand the chord slots of a stored record
    pub fn expand_record(&self, record: &ProgressionRecord) -> Result<Vec<NoteEvent>> {
        self.expand(&record.chords)
    }
}

/// Expand with the default settings (octave 4, 4 beats, velocity 100, 120 BPM)
pub fn expand(slots: &[ChordSlot]) -> Result<Vec<NoteEvent>> {
    Expander::default().expand(slots)
}

/// Expand a record's chord slots with the default settings
pub fn expand_record(record: &ProgressionRecord) -> Result<Vec<NoteEvent>> {
    Expander::default().expand_record(record)
}
