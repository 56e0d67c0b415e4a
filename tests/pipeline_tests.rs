//! Integration tests for the chordmidi pipeline
//!
//! Store a record, expand it into an event table, then render MIDI files.

use chordmidi::record::ProgressionRecord;
use chordmidi::table::{append_record, load_records, read_event_table_file, record_at};
use chordmidi::{
    convert_directory, expand_fields, expand_to_table, table_to_midi, ChordMidiError, ExpansionSettings,
    MidiSettings, Spelling,
};
use midly::{MidiMessage, Smf, TrackEventKind};
use std::fs;

fn sample_record() -> ProgressionRecord {
    ProgressionRecord::from_fields(&[
        "3", "-2", "Verse", "A Minor", "6", "m", "4", "M", "1", "M", "5", "7th",
    ])
    .unwrap()
}

fn note_ons(bytes: &[u8]) -> Vec<(u32, u8)> {
    let smf = Smf::parse(bytes).unwrap();
    let mut tick = 0;
    let mut ons = Vec::new();
    for event in &smf.tracks[1] {
        tick += event.delta.as_int();
        if let TrackEventKind::Midi {
            message: MidiMessage::NoteOn { key, .. },
            ..
        } = event.kind
        {
            ons.push((tick, key.as_int()));
        }
    }
    ons
}

#[test]
fn test_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("music_data.csv");

    assert!(load_records(&store).unwrap().is_empty());

    append_record(&store, &sample_record()).unwrap();
    let second = ProgressionRecord::from_fields(&["0", "5", "Outro", "D# Major", "2", "m7th"]).unwrap();
    append_record(&store, &second).unwrap();

    let records = load_records(&store).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], sample_record());

    let text = fs::read_to_string(&store).unwrap();
    let first_line = text.lines().next().unwrap();
    assert_eq!(first_line, "3,-2,Verse,A Minor,6,m,4,M,1,M,5,7th,0,0,0,0,0,0,0,0");

    assert_eq!(record_at(&store, 2).unwrap().chord_count(), 1);
    assert!(matches!(
        record_at(&store, 3),
        Err(ChordMidiError::MissingInputResource(_))
    ));
    assert!(matches!(
        record_at(&store, 0),
        Err(ChordMidiError::MissingInputResource(_))
    ));
}

#[test]
fn test_record_at_missing_store() {
    let dir = tempfile::tempdir().unwrap();
    let result = record_at(&dir.path().join("nothing.csv"), 1);
    assert!(matches!(result, Err(ChordMidiError::MissingInputResource(_))));
}

#[test]
fn test_expand_then_convert() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("music_data.csv");
    let tables = dir.path().join("input");
    append_record(&store, &sample_record()).unwrap();

    let table = expand_to_table(&store, 1, &tables, &ExpansionSettings::default()).unwrap();
    assert_eq!(table.file_name().unwrap(), "3_-2_Verse_A Minor.csv");

    let rows = read_event_table_file(&table).unwrap();
    assert_eq!(rows.len(), 3 + 3 + 3 + 4);
    assert_eq!(rows[0].note_name, "A4");
    assert_eq!(rows[0].index, Some(0));
    assert_eq!(rows[12].note_name, "F4");
    assert_eq!(rows[12].start_time, "12");

    let report = convert_directory(&tables, None, &MidiSettings::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.output_dir, dir.path().join("input-output-midis"));
    assert_eq!(report.converted, vec![report.output_dir.join("3_-2_Verse_A Minor.mid")]);

    let bytes = fs::read(&report.converted[0]).unwrap();
    let ons = note_ons(&bytes);
    assert_eq!(ons.len(), 13);
    // A minor: A4 C4 E4, all at tick 0
    assert_eq!(&ons[..3], &[(0, 69), (0, 60), (0, 64)]);
    // G7 starts at beat 12
    assert_eq!(ons[9], (12 * 480, 67));
}

#[test]
fn test_flat_spelling_still_converts() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("music_data.csv");
    let tables = dir.path().join("input");
    let record = ProgressionRecord::from_fields(&["1", "1", "Bridge", "E Major", "3", "M"]).unwrap();
    append_record(&store, &record).unwrap();

    let settings = ExpansionSettings {
        spelling: Spelling::Flat,
        ..ExpansionSettings::default()
    };
    let table = expand_to_table(&store, 1, &tables, &settings).unwrap();
    let rows = read_event_table_file(&table).unwrap();
    assert_eq!(rows[1].note_name, "A-4");

    let report = convert_directory(&tables, None, &MidiSettings::default()).unwrap();
    let ons = note_ons(&fs::read(&report.converted[0]).unwrap());
    assert_eq!(ons, vec![(0, 64), (0, 68), (0, 71)]);
}

#[test]
fn test_batch_continues_past_a_bad_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tables");
    let output = dir.path().join("midis");
    fs::create_dir_all(&input).unwrap();

    fs::write(
        input.join("a_bad.csv"),
        "index,note_name,start_time,duration,velocity,tempo\n0,C9,0,4,100,120\n",
    )
    .unwrap();
    fs::write(
        input.join("b_good.csv"),
        "index,note_name,start_time,duration,velocity,tempo\n0,C4,0,4,100,120\n",
    )
    .unwrap();
    fs::write(input.join("notes.txt"), "not a table").unwrap();

    let report = convert_directory(&input, Some(&output), &MidiSettings::default()).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.converted, vec![output.join("b_good.mid")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, input.join("a_bad.csv"));
    assert!(matches!(report.failed[0].1, ChordMidiError::MalformedPitchName(_)));
    assert!(!output.join("a_bad.mid").exists());
}

#[test]
fn test_batch_continues_past_out_of_range_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tables");
    fs::create_dir_all(&input).unwrap();

    fs::write(
        input.join("a_far.csv"),
        "index,note_name,start_time,duration,velocity,tempo\n0,C4,9223372036854775807,4,100,120\n",
    )
    .unwrap();
    fs::write(
        input.join("b_slow.csv"),
        "index,note_name,start_time,duration,velocity,tempo\n0,C4,0,4,100,3\n",
    )
    .unwrap();
    fs::write(
        input.join("c_good.csv"),
        "index,note_name,start_time,duration,velocity,tempo\n0,C4,0,4,100,120\n",
    )
    .unwrap();

    let report = convert_directory(&input, None, &MidiSettings::default()).unwrap();

    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.failed.len(), 2);
    for (_, err) in &report.failed {
        assert!(matches!(err, ChordMidiError::InvalidEvent { row: 1, .. }));
    }
}

#[test]
fn test_convert_requires_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("table.csv");
    fs::write(&file, "").unwrap();
    let result = convert_directory(&file, None, &MidiSettings::default());
    assert!(matches!(result, Err(ChordMidiError::MissingInputResource(_))));
}

#[test]
fn test_library_entry_points() {
    let events = expand_fields(&["0", "0", "Intro", "C Major", "1", "M", "0", "0"]).unwrap();
    assert_eq!(events.len(), 3);

    let empty = expand_fields(&["0", "0", "Intro", "C Major", "0", "M"]).unwrap();
    assert!(empty.is_empty());

    let bytes = table_to_midi("note_name,start_time,duration,velocity,tempo\nG-3,0,1/2,90,100\n").unwrap();
    assert_eq!(note_ons(&bytes), vec![(0, 54)]);
}
