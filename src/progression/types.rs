//! Progression type definitions

use crate::theory::{ChordQuality, PitchClass, Spelling};

/// Most chord slots a progression record carries
pub const MAX_CHORD_SLOTS: usize = 8;

/// One (root, quality) pair of a progression
///
/// A root of 0 in the stored form is the end-of-progression sentinel and
/// becomes [`ChordSlot::End`]; its quality token is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordSlot {
    Chord { root: u8, quality: ChordQuality },
    End,
}

impl ChordSlot {
    pub fn chord(root: u8, quality: ChordQuality) -> Self {
        ChordSlot::Chord { root, quality }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ChordSlot::End)
    }

    /// Root and quality tokens as stored in a record row (`"0", "0"` for the sentinel)
    pub fn to_tokens(&self) -> (String, String) {
        match self {
            ChordSlot::Chord { root, quality } => (root.to_string(), quality.tag().to_string()),
            ChordSlot::End => ("0".to_string(), "0".to_string()),
        }
    }
}

/// Fixed parameters applied to every note of an expanded progression
///
/// # Fields
/// - `octave`: Octave digit appended to every pitch name (default 4)
/// - `duration_beats`: Length of each chord, and the gap between chord starts (default 4)
/// - `velocity`: MIDI velocity of every note, 0-127 (default 100)
/// - `tempo`: Tempo in BPM written with every event (default 120)
/// - `spelling`: How black-key pitch classes are written in the event table (default sharp)
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionSettings {
    pub octave: u8,
    pub duration_beats: u32,
    pub velocity: u8,
    pub tempo: u16,
    pub spelling: Spelling,
}

impl Default for ExpansionSettings {
    fn default() -> Self {
        Self {
            octave: 4,
            duration_beats: 4,
            velocity: 100,
            tempo: 120,
            spelling: Spelling::Sharp,
        }
    }
}

/// A single note produced by the expander
///
/// `start_time` and `duration` are in beats.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub pitch: PitchClass,
    pub octave: u8,
    pub start_time: u32,
    pub duration: u32,
    pub velocity: u8,
    pub tempo: u16,
}

impl NoteEvent {
    /// Pitch name with octave, e.g. `C#4` or `D-4`
    pub fn note_name(&self, spelling: Spelling) -> String {
        format!("{}{}", self.pitch.name(spelling), self.octave)
    }
}
