//! # Settings
//!
//! Optional YAML file holding the expander and MIDI writer parameters. Every key
//! is optional; a missing key keeps its documented default.
//!
//! ```yaml
//! octave: 4             # octave digit given to every chord tone
//! duration: 4           # beats per chord
//! velocity: 100         # 0-127
//! tempo: 120            # BPM written into the event table
//! spelling: sharp       # sharp | flat
//! ticks-per-quarter: 480
//! offset: "1/2"         # beats added to every note start in the MIDI file
//! midi-tempo: 96        # BPM forced on every MIDI file, ignoring the table
//! ```

use crate::error::{ChordMidiError, Result};
use crate::midi::{parse_beats, MidiSettings};
use crate::progression::ExpansionSettings;
use crate::theory::Spelling;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Raw settings for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawSettings {
    pub octave: Option<u8>,
    pub duration: Option<u32>,
    pub velocity: Option<u8>,
    pub tempo: Option<u16>,
    pub spelling: Option<Spelling>,
    pub ticks_per_quarter: Option<u16>,
    pub offset: Option<String>,
    pub midi_tempo: Option<f64>,
}

/// Validated settings for the whole pipeline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub expansion: ExpansionSettings,
    pub midi: MidiSettings,
}

impl Settings {
    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawSettings =
            serde_yaml::from_str(content).map_err(|e| ChordMidiError::ConfigError(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Read a settings file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ChordMidiError::MissingInputResource(format!(
                "settings file {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    fn from_raw(raw: RawSettings) -> Result<Self> {
        let defaults = Settings::default();

        let octave = raw.octave.unwrap_or(defaults.expansion.octave);
        if octave > 7 {
            return Err(ChordMidiError::ConfigError(format!(
                "octave {} cannot be written as a pitch name (0-7)",
                octave
            )));
        }

        let duration_beats = raw.duration.unwrap_or(defaults.expansion.duration_beats);
        if duration_beats == 0 {
            return Err(ChordMidiError::ConfigError("duration must be at least 1 beat".to_string()));
        }

        let velocity = raw.velocity.unwrap_or(defaults.expansion.velocity);
        if velocity > 127 {
            return Err(ChordMidiError::ConfigError(format!("velocity {} is outside 0-127", velocity)));
        }

        let tempo = raw.tempo.unwrap_or(defaults.expansion.tempo);
        if tempo == 0 {
            return Err(ChordMidiError::ConfigError("tempo must be positive".to_string()));
        }

        let ticks_per_quarter = raw.ticks_per_quarter.unwrap_or(defaults.midi.ticks_per_quarter);
        if ticks_per_quarter == 0 || ticks_per_quarter > 0x7fff {
            return Err(ChordMidiError::ConfigError(format!(
                "ticks-per-quarter {} is outside 1-32767",
                ticks_per_quarter
            )));
        }

        let offset_beats = match raw.offset {
            Some(ref offset) => parse_beats(offset).ok_or_else(|| {
                ChordMidiError::ConfigError(format!("offset '{}' is not a beat count", offset))
            })?,
            None => defaults.midi.offset_beats,
        };

        if let Some(bpm) = raw.midi_tempo {
            if !bpm.is_finite() || bpm <= 0.0 {
                return Err(ChordMidiError::ConfigError(format!("midi-tempo {} is not a positive BPM", bpm)));
            }
        }

        Ok(Settings {
            expansion: ExpansionSettings {
                octave,
                duration_beats,
                velocity,
                tempo,
                spelling: raw.spelling.unwrap_or(defaults.expansion.spelling),
            },
            midi: MidiSettings {
                ticks_per_quarter,
                offset_beats,
                tempo_override: raw.midi_tempo,
            },
        })
    }
}
