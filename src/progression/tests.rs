use super::*;
use crate::error::ChordMidiError;
use crate::theory::{ChordQuality, Letter, PitchClass, Spelling};

#[test]
fn test_every_chord_starts_on_its_root() {
    for root in 1..=7u8 {
        let letter = Letter::from_degree(root).unwrap();
        for quality in ChordQuality::ALL {
            let tones = chord_notes(root, quality).unwrap();
            assert_eq!(tones[0], letter.pitch_class(), "root {} {}", root, quality);
            assert_eq!(tones.len(), quality.intervals().len());
        }
    }
}

#[test]
fn test_chord_names_carry_no_octave() {
    for root in 1..=7u8 {
        for quality in ChordQuality::ALL {
            for name in chord_names(root, quality, Spelling::Sharp).unwrap() {
                assert!(!name.chars().any(|c| c.is_ascii_digit()), "{} has an octave", name);
            }
        }
    }
}

#[test]
fn test_known_chords() {
    assert_eq!(chord_names(1, ChordQuality::Major, Spelling::Sharp).unwrap(), vec!["C", "E", "G"]);
    assert_eq!(chord_names(6, ChordQuality::Minor, Spelling::Sharp).unwrap(), vec!["A", "C", "E"]);
    assert_eq!(
        chord_names(2, ChordQuality::MinorSeventh, Spelling::Sharp).unwrap(),
        vec!["D", "F", "A", "C"]
    );
    assert_eq!(
        chord_names(4, ChordQuality::MajorSeventh, Spelling::Sharp).unwrap(),
        vec!["F", "A", "C", "E"]
    );
    assert_eq!(chord_names(5, ChordQuality::Sus4, Spelling::Sharp).unwrap(), vec!["G", "C", "D"]);
    assert_eq!(chord_names(1, ChordQuality::Sus2, Spelling::Sharp).unwrap(), vec!["C", "D", "G"]);
}

#[test]
fn test_expand_empty() {
    let events = expand(&[]).unwrap();
    assert!(events.is_empty());
}

#[test]
fn test_expand_sentinel_first() {
    let slots = parse_chord_slots(&["0", "M"]).unwrap();
    assert_eq!(slots, vec![ChordSlot::End]);
    assert!(expand(&slots).unwrap().is_empty());
}

#[test]
fn test_expand_two_chords() {
    let slots = parse_chord_slots(&["1", "M", "2", "m", "0", "0", "0", "0"]).unwrap();
    let events = expand(&slots).unwrap();

    assert_eq!(events.len(), 6);
    let names: Vec<String> = events.iter().map(|e| e.note_name(Spelling::Sharp)).collect();
    assert_eq!(names, vec!["C4", "E4", "G4", "D4", "F4", "A4"]);

    for event in &events[..3] {
        assert_eq!(event.start_time, 0);
    }
    for event in &events[3..] {
        assert_eq!(event.start_time, 4);
    }
    for event in &events {
        assert_eq!(event.duration, 4);
        assert_eq!(event.velocity, 100);
        assert_eq!(event.tempo, 120);
    }
}

#[test]
fn test_expand_stops_at_first_sentinel() {
    // Chords after the sentinel are never read
    let slots = vec![
        ChordSlot::chord(5, ChordQuality::DominantSeventh),
        ChordSlot::End,
        ChordSlot::chord(1, ChordQuality::Major),
    ];
    let events = expand(&slots).unwrap();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.start_time == 0));
}

#[test]
fn test_clock_advances_per_chord_not_per_note() {
    let slots = vec![
        ChordSlot::chord(2, ChordQuality::MinorSeventh),
        ChordSlot::chord(5, ChordQuality::DominantSeventh),
        ChordSlot::chord(1, ChordQuality::MajorSeventh),
    ];
    let events = expand(&slots).unwrap();
    let starts: Vec<u32> = events.iter().map(|e| e.start_time).collect();
    assert_eq!(starts, vec![0, 0, 0, 0, 4, 4, 4, 4, 8, 8, 8, 8]);
}

#[test]
fn test_custom_settings() {
    let expander = Expander::new(ExpansionSettings {
        octave: 3,
        duration_beats: 2,
        velocity: 80,
        tempo: 90,
        spelling: Spelling::Flat,
    });
    let slots = vec![
        ChordSlot::chord(3, ChordQuality::Major),
        ChordSlot::chord(4, ChordQuality::Minor),
    ];
    let events = expander.expand(&slots).unwrap();

    assert_eq!(events[1].pitch, PitchClass::GSharp);
    assert_eq!(events[1].note_name(Spelling::Flat), "A-3");
    assert_eq!(events[3].start_time, 2);
    assert!(events.iter().all(|e| e.velocity == 80 && e.tempo == 90 && e.duration == 2));
}

#[test]
fn test_parse_rejects_bad_tokens() {
    assert!(matches!(
        parse_chord_slots(&["8", "M"]),
        Err(ChordMidiError::InvalidRoot(8))
    ));
    assert!(matches!(
        parse_chord_slots(&["1", "maj"]),
        Err(ChordMidiError::UnknownChordQuality(_))
    ));
    assert!(matches!(
        parse_chord_slots(&["one", "M"]),
        Err(ChordMidiError::InvalidRecord { .. })
    ));
}

#[test]
fn test_parse_dangling_root() {
    assert_eq!(parse_chord_slots(&["1", "M", "0"]).unwrap().len(), 2);
    assert!(matches!(
        parse_chord_slots(&["1", "M", "4"]),
        Err(ChordMidiError::InvalidRecord { ref field, .. }) if field == "quality"
    ));
}

#[test]
fn test_parse_too_many_pairs() {
    let tokens: Vec<&str> = std::iter::repeat(["1", "M"]).take(9).flatten().collect();
    assert!(parse_chord_slots(&tokens).is_err());
}

#[test]
fn test_hand_built_invalid_root_reaches_chord_table() {
    let slots = vec![ChordSlot::Chord { root: 9, quality: ChordQuality::Major }];
    assert!(matches!(expand(&slots), Err(ChordMidiError::InvalidRoot(9))));
}
