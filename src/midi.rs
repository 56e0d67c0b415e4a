//! # MIDI Writer
//!
//! Turns an event table into a Standard MIDI File.
//!
//! ## Layout
//! - Format 1 (parallel tracks), metrical timing
//! - Track 0: tempo and a 4/4 time signature
//! - Track 1: every note on channel 0
//!
//! ## Timing
//! Start times and durations are rational beats (quarter notes) and are rounded
//! to ticks once: `ticks = round(beats * ticks_per_quarter)`. Each note's start
//! is shifted by `offset_beats`. Every tick must fit in `u32` and the gap between
//! consecutive events in a 28-bit delta.
//!
//! ## Tempo
//! The tempo override wins; otherwise the first row's `tempo` column; otherwise 120 BPM.
//! The tempo must fit the 24-bit microseconds-per-quarter field (about 3.58 BPM and up).
//!
//! ## Failure
//! A single bad row (unencodable pitch, velocity above 127, unreadable or
//! out-of-range time) fails the whole file. Nothing is written for it.

use crate::error::{ChordMidiError, Result};
use crate::pitch::to_midi_number;
use crate::table::EventRow;
use midly::num::{u24, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul};

pub const DEFAULT_TEMPO: f64 = 120.0;
pub const DEFAULT_TICKS_PER_QUARTER: u16 = 480;

/// Settings for the MIDI writer
///
/// # Fields
/// - `ticks_per_quarter`: Timing resolution (default 480)
/// - `offset_beats`: Added to every note's start time (default 0)
/// - `tempo_override`: BPM used instead of the table's own tempo column
#[derive(Debug, Clone, PartialEq)]
pub struct MidiSettings {
    pub ticks_per_quarter: u16,
    pub offset_beats: Rational64,
    pub tempo_override: Option<f64>,
}

impl Default for MidiSettings {
    fn default() -> Self {
        Self {
            ticks_per_quarter: DEFAULT_TICKS_PER_QUARTER,
            offset_beats: Rational64::from_integer(0),
            tempo_override: None,
        }
    }
}

/// A note placed on the tick grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiNote {
    pub key: u8,
    pub velocity: u8,
    pub start_tick: u32,
    pub duration_ticks: u32,
}

/// Parse a beat count written as an integer (`4`), a fraction (`1/2`) or a decimal (`0.5`).
///
/// Negative values are rejected.
///
/// # Examples
/// ```
/// use chordmidi::midi::parse_beats;
/// use num_rational::Rational64;
///
/// assert_eq!(parse_beats("1/3"), Some(Rational64::new(1, 3)));
/// assert_eq!(parse_beats("1.25"), Some(Rational64::new(5, 4)));
/// assert_eq!(parse_beats("-1"), None);
/// ```
pub fn parse_beats(raw: &str) -> Option<Rational64> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('-') {
        return None;
    }

    let beats = if let Some((whole, frac)) = raw.split_once('.') {
        if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let scale = 10i64.pow(frac.len() as u32);
        let frac: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
        Rational64::new(whole.checked_mul(scale)?.checked_add(frac)?, scale)
    } else {
        raw.parse().ok()?
    };

    if beats < Rational64::from_integer(0) {
        return None;
    }
    Some(beats)
}

fn beats_to_ticks(beats: Rational64, ticks_per_quarter: u16) -> Option<u32> {
    let ticks = beats.checked_mul(&Rational64::from_integer(ticks_per_quarter as i64))?;
    u32::try_from(ticks.round().to_integer()).ok()
}

/// Resolve the tempo for a table.
///
/// Only the first row's `tempo` is read, so a one-row table carries its own tempo.
pub fn table_tempo(rows: &[EventRow], settings: &MidiSettings) -> f64 {
    settings
        .tempo_override
        .or_else(|| rows.first().and_then(|row| row.tempo))
        .unwrap_or(DEFAULT_TEMPO)
}

/// Place every row of an event table on the tick grid
pub fn place_notes(rows: &[EventRow], settings: &MidiSettings) -> Result<Vec<MidiNote>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let invalid = |message: String| ChordMidiError::InvalidEvent { row: i + 1, message };

            let key = to_midi_number(&row.note_name)?;
            let velocity = u8::try_from(row.velocity)
                .ok()
                .filter(|v| *v <= 127)
                .ok_or_else(|| invalid(format!("velocity {} is outside 0-127", row.velocity)))?;
            let start = parse_beats(&row.start_time)
                .ok_or_else(|| invalid(format!("start time '{}' is not a beat count", row.start_time)))?;
            let duration = parse_beats(&row.duration)
                .ok_or_else(|| invalid(format!("duration '{}' is not a beat count", row.duration)))?;

            let start_tick = start
                .checked_add(&settings.offset_beats)
                .and_then(|beats| beats_to_ticks(beats, settings.ticks_per_quarter))
                .ok_or_else(|| invalid(format!("start time '{}' is out of range", row.start_time)))?;
            let duration_ticks = beats_to_ticks(duration, settings.ticks_per_quarter)
                .ok_or_else(|| invalid(format!("duration '{}' is out of range", row.duration)))?;
            start_tick
                .checked_add(duration_ticks)
                .ok_or_else(|| invalid("note ends out of range".to_string()))?;

            Ok(MidiNote {
                key,
                velocity,
                start_tick,
                duration_ticks,
            })
        })
        .collect()
}

/// Build a complete MIDI file from an event table
pub fn build_midi(rows: &[EventRow], settings: &MidiSettings) -> Result<Vec<u8>> {
    let tempo = table_tempo(rows, settings);
    let microseconds_per_quarter = tempo_to_microseconds(tempo).ok_or_else(|| {
        let message = format!("tempo {} BPM cannot be written to a MIDI file", tempo);
        match settings.tempo_override {
            Some(_) => ChordMidiError::ConfigError(message),
            None => ChordMidiError::InvalidEvent { row: 1, message },
        }
    })?;

    let notes = place_notes(rows, settings)?;
    log::debug!("{} notes at {} BPM", notes.len(), tempo);

    let smf = Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(settings.ticks_per_quarter.into()),
        },
        tracks: vec![build_conductor_track(microseconds_per_quarter), build_note_track(&notes)?],
    };

    let mut out = Vec::new();
    smf.write_std(&mut out)?;
    Ok(out)
}

/// Microseconds per quarter note, if it fits the 24-bit tempo field
fn tempo_to_microseconds(tempo: f64) -> Option<u24> {
    if !tempo.is_finite() || tempo <= 0.0 {
        return None;
    }
    let micros = (60_000_000.0 / tempo).round();
    if micros < 1.0 || micros > u24::max_value().as_int() as f64 {
        return None;
    }
    u24::try_from(micros as u32)
}

fn build_conductor_track<'a>(microseconds_per_quarter: u24) -> Track<'a> {
    vec![
        TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter)),
        },
        TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(4, 2, 24, 8)),
        },
        TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]
}

fn build_note_track<'a>(notes: &[MidiNote]) -> Result<Track<'a>> {
    // (absolute tick, note-off sorts first, row, message)
    let mut timed: Vec<(u32, u8, usize, MidiMessage)> = Vec::with_capacity(notes.len() * 2);
    for (i, note) in notes.iter().enumerate() {
        timed.push((
            note.start_tick,
            1,
            i + 1,
            MidiMessage::NoteOn {
                key: note.key.into(),
                vel: note.velocity.into(),
            },
        ));
        timed.push((
            note.start_tick.saturating_add(note.duration_ticks),
            0,
            i + 1,
            MidiMessage::NoteOff {
                key: note.key.into(),
                vel: 0.into(),
            },
        ));
    }
    timed.sort_by_key(|(tick, order, _, _)| (*tick, *order));

    let mut events = Vec::with_capacity(timed.len() + 2);
    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Progression")),
    });

    let mut prev_tick = 0u32;
    for (tick, _, row, message) in timed {
        let delta = u28::try_from(tick - prev_tick).ok_or_else(|| ChordMidiError::InvalidEvent {
            row,
            message: format!("{} ticks since the previous event do not fit a MIDI delta", tick - prev_tick),
        })?;
        events.push(TrackEvent {
            delta,
            kind: TrackEventKind::Midi {
                channel: 0.into(),
                message,
            },
        });
        prev_tick = tick;
    }

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    Ok(events)
}
