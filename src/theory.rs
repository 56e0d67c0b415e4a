//! # Pitch Vocabulary
//!
//! Fixed lookup tables shared by the chord table, the expander and the pitch encoder.
//!
//! ## Canonical Pitch
//! Pitches are held as a [`PitchClass`] (one of 12 semitone classes, C = 0) and only
//! spelled when written out. The same class can be spelled two ways:
//!
//! ```text
//! index   0  1   2  3   4  5  6   7  8   9  10  11
//! sharp   C  C#  D  D#  E  F  F#  G  G#  A  A#  B
//! flat    C  D-  D  E-  E  F  G-  G  A-  A  B-  B
//! ```
//!
//! The flat sign is written `-` because that is the dialect of the event tables.
//!
//! ## Chord Qualities
//! Nine fixed shapes, each an ordered list of semitone offsets from the root.

use crate::error::{ChordMidiError, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Diatonic letter names, in scale-degree order starting at C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// Map a scale degree (1 = C ... 7 = B) to its letter
    pub fn from_degree(degree: u8) -> Option<Self> {
        match degree {
            1 => Some(Letter::C),
            2 => Some(Letter::D),
            3 => Some(Letter::E),
            4 => Some(Letter::F),
            5 => Some(Letter::G),
            6 => Some(Letter::A),
            7 => Some(Letter::B),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// The natural pitch class carrying this letter
    pub fn pitch_class(self) -> PitchClass {
        match self {
            Letter::C => PitchClass::C,
            Letter::D => PitchClass::D,
            Letter::E => PitchClass::E,
            Letter::F => PitchClass::F,
            Letter::G => PitchClass::G,
            Letter::A => PitchClass::A,
            Letter::B => PitchClass::B,
        }
    }
}

/// One of the 12 semitone classes, independent of octave and spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// The chromatic cycle in index order
pub const CHROMATIC: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
pub(crate) const FLAT_NAMES: [&str; 12] = ["C", "D-", "D", "E-", "E", "F", "G-", "G", "A-", "A", "B-", "B"];

impl PitchClass {
    /// Semitone index from C (0..=11)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class at `index`, wrapping around the 12-tone cycle
    pub fn from_index(index: i32) -> Self {
        CHROMATIC[index.rem_euclid(12) as usize]
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_index(self.index() as i32 + semitones)
    }

    /// Spell this class for presentation
    pub fn name(self, spelling: Spelling) -> &'static str {
        match spelling {
            Spelling::Sharp => SHARP_NAMES[self.index() as usize],
            Spelling::Flat => FLAT_NAMES[self.index() as usize],
        }
    }
}

/// Accidental preference used when a pitch class is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spelling {
    #[default]
    Sharp,
    Flat,
}

impl FromStr for Spelling {
    type Err = ChordMidiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sharp" => Ok(Spelling::Sharp),
            "flat" => Ok(Spelling::Flat),
            _ => Err(ChordMidiError::ConfigError(format!(
                "spelling must be 'sharp' or 'flat', got '{}'",
                s
            ))),
        }
    }
}

/// Named harmonic shape built on a root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Augmented,
    Diminished,
    DominantSeventh,
    MajorSeventh,
    MinorSeventh,
    Sus2,
    Sus4,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 9] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Augmented,
        ChordQuality::Diminished,
        ChordQuality::DominantSeventh,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
        ChordQuality::Sus2,
        ChordQuality::Sus4,
    ];

    /// Semitone offsets from the root, root first
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::DominantSeventh => &[0, 4, 7, 10],
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
        }
    }

    /// The tag used in records and on the command line
    pub fn tag(self) -> &'static str {
        match self {
            ChordQuality::Major => "M",
            ChordQuality::Minor => "m",
            ChordQuality::Augmented => "aug",
            ChordQuality::Diminished => "dim",
            ChordQuality::DominantSeventh => "7th",
            ChordQuality::MajorSeventh => "M7th",
            ChordQuality::MinorSeventh => "m7th",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
        }
    }
}

impl FromStr for ChordQuality {
    type Err = ChordMidiError;

    fn from_str(s: &str) -> Result<Self> {
        ChordQuality::ALL
            .iter()
            .copied()
            .find(|q| q.tag() == s)
            .ok_or_else(|| ChordMidiError::UnknownChordQuality(s.to_string()))
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
