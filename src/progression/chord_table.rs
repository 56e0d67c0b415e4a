//! Chord table: diatonic root + quality to pitch classes.

use crate::error::{ChordMidiError, Result};
use crate::theory::{ChordQuality, Letter, PitchClass, Spelling};

/// Build the pitch classes of a chord.
///
/// The root degree picks a letter (1 = C ... 7 = B), the letter's place on the
/// chromatic cycle is found, and each of the quality's offsets is added mod 12.
/// Tones come back root first, without octaves.
///
/// # Examples
/// ```
/// use chordmidi::progression::chord_notes;
/// use chordmidi::theory::{ChordQuality, PitchClass};
///
/// assert_eq!(
///     chord_notes(6, ChordQuality::Minor).unwrap(),
///     vec![PitchClass::A, PitchClass::C, PitchClass::E]
/// );
/// ```
pub fn chord_notes(root: u8, quality: ChordQuality) -> Result<Vec<PitchClass>> {
    let letter = Letter::from_degree(root).ok_or(ChordMidiError::InvalidRoot(root as i64))?;
    let root_class = letter.pitch_class();

    Ok(quality
        .intervals()
        .iter()
        .map(|&offset| root_class.transpose(offset as i32))
        .collect())
}

/// Same as [`chord_notes`], spelled for display
pub fn chord_names(root: u8, quality: ChordQuality, spelling: Spelling) -> Result<Vec<&'static str>> {
    Ok(chord_notes(root, quality)?
        .into_iter()
        .map(|pc| pc.name(spelling))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_major() {
        assert_eq!(
            chord_names(1, ChordQuality::Major, Spelling::Sharp).unwrap(),
            vec!["C", "E", "G"]
        );
    }

    #[test]
    fn test_wraps_past_b() {
        // B dim: B D F
        assert_eq!(
            chord_names(7, ChordQuality::Diminished, Spelling::Sharp).unwrap(),
            vec!["B", "D", "F"]
        );
        // G7: G B D F
        assert_eq!(
            chord_names(5, ChordQuality::DominantSeventh, Spelling::Sharp).unwrap(),
            vec!["G", "B", "D", "F"]
        );
    }

    #[test]
    fn test_sharp_tones() {
        assert_eq!(
            chord_names(3, ChordQuality::Major, Spelling::Sharp).unwrap(),
            vec!["E", "G#", "B"]
        );
        assert_eq!(
            chord_names(4, ChordQuality::Augmented, Spelling::Flat).unwrap(),
            vec!["F", "A", "D-"]
        );
    }

    #[test]
    fn test_invalid_root() {
        assert!(matches!(chord_notes(0, ChordQuality::Major), Err(ChordMidiError::InvalidRoot(0))));
        assert!(matches!(chord_notes(8, ChordQuality::Sus2), Err(ChordMidiError::InvalidRoot(8))));
    }
}
