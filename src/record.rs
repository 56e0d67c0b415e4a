//! # Progression Records
//!
//! A progression record is one stored sketch: two mood scores, a song-section
//! label, a key and up to eight chord slots.
//!
//! ## Stored Row Layout
//! ```text
//! comfort, activity, structure, key,       root1, quality1, ..., root8, quality8
//! 3,       -2,       Verse,     C# Minor,  6,     m,        ..., 0,     0
//! ```
//!
//! Unused trailing slots are written as `0,0`. A root of 0 ends the progression.
//!
//! ## Validation Boundary
//! [`ProgressionRecord::from_fields`] is the one place raw text becomes a record.
//! Any transport (command line, stored row, another program) goes through it,
//! and the error names the field that failed.

use crate::error::{ChordMidiError, Result};
use crate::progression::{parse_chord_slots, ChordSlot, MAX_CHORD_SLOTS};
use crate::theory::{ChordQuality, Letter};
use std::fmt;
use std::str::FromStr;

/// Fields before the chord slots
const HEADER_FIELDS: usize = 4;

/// Song section a sketch belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Intro,
    Verse,
    Chorus,
    Bridge,
    Outro,
}

impl Structure {
    pub const ALL: [Structure; 5] = [
        Structure::Intro,
        Structure::Verse,
        Structure::Chorus,
        Structure::Bridge,
        Structure::Outro,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Structure::Intro => "Intro",
            Structure::Verse => "Verse",
            Structure::Chorus => "Chorus",
            Structure::Bridge => "Bridge",
            Structure::Outro => "Outro",
        }
    }
}

impl FromStr for Structure {
    type Err = ChordMidiError;

    fn from_str(s: &str) -> Result<Self> {
        Structure::ALL
            .iter()
            .copied()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                ChordMidiError::record(
                    "structure",
                    format!("'{}' is not one of Intro, Verse, Chorus, Bridge, Outro", s),
                )
            })
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// Key label: letter, optional sharp and mode, written `"C# Major"`
///
/// The key is descriptive only; chords are always built from C-based degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub letter: Letter,
    pub sharp: bool,
    pub mode: Mode,
}

impl FromStr for Key {
    type Err = ChordMidiError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            ChordMidiError::record(
                "key",
                format!("'{}' is not a key like 'C Major' or 'F# Minor'", s),
            )
        };

        let (note, mode) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let mode = match mode.trim() {
            "Major" => Mode::Major,
            "Minor" => Mode::Minor,
            _ => return Err(invalid()),
        };

        let mut chars = note.chars();
        let letter = chars.next().and_then(Letter::from_char).ok_or_else(invalid)?;
        let sharp = match chars.as_str() {
            "" => false,
            "#" => true,
            _ => return Err(invalid()),
        };

        Ok(Key { letter, sharp, mode })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Major => "Major",
            Mode::Minor => "Minor",
        };
        let sharp = if self.sharp { "#" } else { "" };
        write!(f, "{}{} {}", self.letter.as_char(), sharp, mode)
    }
}

/// One stored progression sketch
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionRecord {
    pub comfort: i8,
    pub activity: i8,
    pub structure: Structure,
    pub key: Key,
    pub chords: Vec<ChordSlot>,
}

impl ProgressionRecord {
    /// Build a freshly captured record.
    ///
    /// Capture takes either 4 or 8 chords, every root 1-7; the remaining slots
    /// are filled with the sentinel.
    pub fn new(
        comfort: i8,
        activity: i8,
        structure: Structure,
        key: Key,
        chords: &[(u8, ChordQuality)],
    ) -> Result<Self> {
        check_mood("comfort", comfort as i64)?;
        check_mood("activity", activity as i64)?;

        if chords.len() != 4 && chords.len() != MAX_CHORD_SLOTS {
            return Err(ChordMidiError::record(
                "chords",
                format!("expected 4 or 8 chords, got {}", chords.len()),
            ));
        }

        let mut slots = Vec::with_capacity(MAX_CHORD_SLOTS);
        for &(root, quality) in chords {
            if !(1..=7).contains(&root) {
                return Err(ChordMidiError::InvalidRoot(root as i64));
            }
            slots.push(ChordSlot::chord(root, quality));
        }
        slots.resize(MAX_CHORD_SLOTS, ChordSlot::End);

        Ok(Self {
            comfort,
            activity,
            structure,
            key,
            chords: slots,
        })
    }

    /// Parse and validate a record from its text fields.
    ///
    /// Missing trailing chord fields count as zero-filled.
    ///
    /// # Examples
    /// ```
    /// use chordmidi::record::{ProgressionRecord, Structure};
    ///
    /// let record = ProgressionRecord::from_fields(&["2", "-1", "Chorus", "G Major", "1", "M", "5", "7th"]).unwrap();
    /// assert_eq!(record.structure, Structure::Chorus);
    /// assert_eq!(record.chord_count(), 2);
    /// assert_eq!(record.event_table_name(), "2_-1_Chorus_G Major.csv");
    /// ```
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() < HEADER_FIELDS {
            return Err(ChordMidiError::record(
                "fields",
                format!("expected at least {} fields, got {}", HEADER_FIELDS, fields.len()),
            ));
        }
        if fields.len() > HEADER_FIELDS + MAX_CHORD_SLOTS * 2 {
            return Err(ChordMidiError::record(
                "fields",
                format!(
                    "expected at most {} fields, got {}",
                    HEADER_FIELDS + MAX_CHORD_SLOTS * 2,
                    fields.len()
                ),
            ));
        }

        let comfort = parse_mood("comfort", fields[0].as_ref())?;
        let activity = parse_mood("activity", fields[1].as_ref())?;
        let structure = fields[2].as_ref().trim().parse()?;
        let key = fields[3].as_ref().parse()?;
        let chords = parse_chord_slots(&fields[HEADER_FIELDS..])?;

        Ok(Self {
            comfort,
            activity,
            structure,
            key,
            chords,
        })
    }

    /// Chords before the first sentinel
    pub fn chord_count(&self) -> usize {
        self.chords.iter().take_while(|slot| !slot.is_end()).count()
    }

    /// The stored row, always 20 fields with unused slots zero-filled
    pub fn to_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.comfort.to_string(),
            self.activity.to_string(),
            self.structure.to_string(),
            self.key.to_string(),
        ];
        for i in 0..MAX_CHORD_SLOTS {
            let (root, quality) = self.chords.get(i).copied().unwrap_or(ChordSlot::End).to_tokens();
            fields.push(root);
            fields.push(quality);
        }
        fields
    }

    /// File name of the event table expanded from this record
    pub fn event_table_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.csv",
            self.comfort, self.activity, self.structure, self.key
        )
    }
}

fn check_mood(field: &str, value: i64) -> Result<()> {
    if !(-5..=5).contains(&value) {
        return Err(ChordMidiError::record(field, format!("{} is outside -5..=5", value)));
    }
    Ok(())
}

fn parse_mood(field: &str, raw: &str) -> Result<i8> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ChordMidiError::record(field, format!("'{}' is not an integer", raw.trim())))?;
    check_mood(field, value)?;
    Ok(value as i8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_row() -> Vec<&'static str> {
        vec![
            "3", "-2", "Verse", "C# Minor", "6", "m", "4", "M", "1", "M", "5", "7th", "0", "0", "0", "0",
            "0", "0", "0", "0",
        ]
    }

    #[test]
    fn test_parse_full_row() {
        let record = ProgressionRecord::from_fields(&full_row()).unwrap();
        assert_eq!(record.comfort, 3);
        assert_eq!(record.activity, -2);
        assert_eq!(record.structure, Structure::Verse);
        assert_eq!(
            record.key,
            Key {
                letter: Letter::C,
                sharp: true,
                mode: Mode::Minor
            }
        );
        assert_eq!(record.chord_count(), 4);
        assert_eq!(record.chords.len(), 8);
    }

    #[test]
    fn test_fields_round_trip() {
        let record = ProgressionRecord::from_fields(&full_row()).unwrap();
        assert_eq!(record.to_fields(), full_row());
    }

    #[test]
    fn test_short_row_is_zero_filled() {
        let record = ProgressionRecord::from_fields(&["0", "0", "Intro", "A Minor", "6", "m"]).unwrap();
        let fields = record.to_fields();
        assert_eq!(fields.len(), 20);
        assert_eq!(&fields[6..], vec!["0"; 14].as_slice());
    }

    #[test]
    fn test_mood_range() {
        let mut row = full_row();
        row[0] = "6";
        let err = ProgressionRecord::from_fields(&row).unwrap_err();
        assert!(matches!(err, ChordMidiError::InvalidRecord { ref field, .. } if field == "comfort"));

        row[0] = "-5";
        row[1] = "x";
        let err = ProgressionRecord::from_fields(&row).unwrap_err();
        assert!(matches!(err, ChordMidiError::InvalidRecord { ref field, .. } if field == "activity"));
    }

    #[test]
    fn test_bad_structure_and_key() {
        let mut row = full_row();
        row[2] = "Coda";
        assert!(ProgressionRecord::from_fields(&row).is_err());

        for key in ["H Major", "C Dorian", "Db Major", "C#Major", "C"] {
            let mut row = full_row();
            row[3] = key;
            let err = ProgressionRecord::from_fields(&row).unwrap_err();
            assert!(
                matches!(err, ChordMidiError::InvalidRecord { ref field, .. } if field == "key"),
                "key '{}' gave {:?}",
                key,
                err
            );
        }
    }

    #[test]
    fn test_key_display() {
        let key: Key = "F# Major".parse().unwrap();
        assert_eq!(key.to_string(), "F# Major");
        let key: Key = "E Minor".parse().unwrap();
        assert_eq!(key.to_string(), "E Minor");
    }

    #[test]
    fn test_field_count_limits() {
        assert!(ProgressionRecord::from_fields(&["1", "1", "Verse"]).is_err());
        let mut row = full_row();
        row.extend(["1", "M"]);
        assert!(ProgressionRecord::from_fields(&row).is_err());
    }

    #[test]
    fn test_new_requires_four_or_eight_chords() {
        let key: Key = "C Major".parse().unwrap();
        let four = [
            (1, ChordQuality::Major),
            (6, ChordQuality::Minor),
            (4, ChordQuality::Major),
            (5, ChordQuality::DominantSeventh),
        ];
        let record = ProgressionRecord::new(0, 0, Structure::Chorus, key, &four).unwrap();
        assert_eq!(record.chord_count(), 4);
        assert_eq!(record.chords.len(), 8);

        let three = &four[..3];
        assert!(ProgressionRecord::new(0, 0, Structure::Chorus, key, three).is_err());

        let bad_root = [(0, ChordQuality::Major); 4];
        assert!(matches!(
            ProgressionRecord::new(0, 0, Structure::Chorus, key, &bad_root),
            Err(ChordMidiError::InvalidRoot(0))
        ));
    }

    #[test]
    fn test_event_table_name() {
        let record = ProgressionRecord::from_fields(&full_row()).unwrap();
        assert_eq!(record.event_table_name(), "3_-2_Verse_C# Minor.csv");
    }
}
