//! Pitch name to MIDI key encoding.
//!
//! Event tables name notes as `[A-G](#|-)?[0-7]`, e.g. `C4`, `F#3`, `B-2`.
//! Sharp spellings are first folded onto their flat synonyms, then looked up in
//! the flat-spelled note table that starts at C, so `C4` = 60.

use crate::error::{ChordMidiError, Result};
use crate::theory::{Letter, PitchClass, FLAT_NAMES};

/// Sharp spellings and the flat name they share a key with
const SHARP_SYNONYMS: [(&str, &str); 5] = [
    ("A#", "B-"),
    ("C#", "D-"),
    ("D#", "E-"),
    ("F#", "G-"),
    ("G#", "A-"),
];

/// Split a pitch name into its spelled note and octave digit
fn split_note(name: &str) -> Result<(&str, u8)> {
    let malformed = || ChordMidiError::MalformedPitchName(name.to_string());
    let bytes = name.as_bytes();

    let (note, octave) = match bytes {
        [letter, octave] => (letter, octave),
        [letter, accidental, octave] if matches!(*accidental, b'#' | b'-') => (letter, octave),
        _ => return Err(malformed()),
    };
    if Letter::from_char(*note as char).is_none() || !(b'0'..=b'7').contains(octave) {
        return Err(malformed());
    }

    Ok((&name[..name.len() - 1], octave - b'0'))
}

/// Parse a pitch name into its pitch class and octave.
///
/// # Examples
/// ```
/// use chordmidi::pitch::parse_pitch_name;
/// use chordmidi::theory::PitchClass;
///
/// assert_eq!(parse_pitch_name("G-3").unwrap(), (PitchClass::FSharp, 3));
/// ```
pub fn parse_pitch_name(name: &str) -> Result<(PitchClass, u8)> {
    let (note, octave) = split_note(name)?;
    let offset = semitone_offset(note).ok_or_else(|| ChordMidiError::MalformedPitchName(name.to_string()))?;
    Ok((PitchClass::from_index(offset as i32), octave))
}

fn semitone_offset(note: &str) -> Option<u8> {
    let flat = SHARP_SYNONYMS
        .iter()
        .find(|(sharp, _)| *sharp == note)
        .map(|(_, flat)| *flat)
        .unwrap_or(note);
    FLAT_NAMES.iter().position(|n| *n == flat).map(|i| i as u8)
}

/// Convert a pitch name with octave into a MIDI key number.
///
/// The result is `(octave + 1) * 12 + offset`, so the range is 12 (`C0`) to 107 (`B7`).
///
/// # Examples
/// ```
/// use chordmidi::to_midi_number;
///
/// assert_eq!(to_midi_number("C4").unwrap(), 60);
/// assert_eq!(to_midi_number("G-3").unwrap(), 54);
/// assert_eq!(to_midi_number("C#4").unwrap(), to_midi_number("D-4").unwrap());
/// assert!(to_midi_number("H4").is_err());
/// ```
pub fn to_midi_number(name: &str) -> Result<u8> {
    let (pitch, octave) = parse_pitch_name(name)?;
    Ok((octave + 1) * 12 + pitch.index())
}
