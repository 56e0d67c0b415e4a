//! # CSV Tables
//!
//! Two kinds of CSV file sit between the pipeline stages.
//!
//! ## Record Store
//! Headerless, one [`ProgressionRecord`] per row (default file `music_data.csv`).
//! Rows are appended as sketches are captured and addressed by 1-based row number.
//!
//! ## Event Table
//! One row per note, written by the expander and read by the MIDI writer:
//!
//! ```text
//! index,note_name,start_time,duration,velocity,tempo
//! 0,C4,0,4,100,120
//! 1,E4,0,4,100,120
//! ```
//!
//! The `index` column is optional on read. `start_time` and `duration` are kept as
//! text so hand-edited tables may use fractions (`1/2`) or decimals (`0.5`).

use crate::error::{ChordMidiError, Result};
use crate::progression::NoteEvent;
use crate::record::ProgressionRecord;
use crate::theory::Spelling;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// Default record store file name
pub const DEFAULT_STORE: &str = "music_data.csv";

fn store_reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?)
}

fn parse_row(row: &csv::ByteRecord) -> Result<ProgressionRecord> {
    let fields = row
        .iter()
        .map(|field| {
            std::str::from_utf8(field).map_err(|_| ChordMidiError::record("row", "field is not valid UTF-8"))
        })
        .collect::<Result<Vec<&str>>>()?;
    ProgressionRecord::from_fields(&fields)
}

/// Validate every row of the store independently.
///
/// A bad row yields its own error and does not hide the rows around it.
/// A store that does not exist yet holds no records.
pub fn scan_records(path: &Path) -> Result<Vec<Result<ProgressionRecord>>> {
    if !path.exists() {
        log::info!("record store {} does not exist yet", path.display());
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for (i, row) in store_reader(path)?.byte_records().enumerate() {
        let record = parse_row(&row?);
        if let Err(e) = &record {
            log::warn!("{} row {}: {}", path.display(), i + 1, e);
        }
        rows.push(record);
    }
    Ok(rows)
}

/// Read every record in the store, failing on the first invalid row.
///
/// A store that does not exist yet holds no records.
pub fn load_records(path: &Path) -> Result<Vec<ProgressionRecord>> {
    scan_records(path)?.into_iter().collect()
}

/// Fetch the record at a 1-based row number.
///
/// Only the requested row is validated.
pub fn record_at(path: &Path, row_number: usize) -> Result<ProgressionRecord> {
    if !path.exists() {
        return Err(ChordMidiError::MissingInputResource(format!(
            "record store {}",
            path.display()
        )));
    }

    let mut count = 0;
    for row in store_reader(path)?.byte_records() {
        let row = row?;
        count += 1;
        if count == row_number {
            return parse_row(&row);
        }
    }
    Err(ChordMidiError::MissingInputResource(format!(
        "row {} of {} ({} rows)",
        row_number,
        path.display(),
        count
    )))
}

/// Append one record to the store, creating the file if needed
pub fn append_record(path: &Path, record: &ProgressionRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(record.to_fields())?;
    writer.flush()?;
    log::debug!("appended {} to {}", record.event_table_name(), path.display());
    Ok(())
}

/// One event table row as written
#[derive(Debug, Serialize)]
struct EventRecord {
    index: usize,
    note_name: String,
    start_time: u32,
    duration: u32,
    velocity: u8,
    tempo: u16,
}

/// One event table row as read back
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventRow {
    #[serde(default)]
    pub index: Option<usize>,
    pub note_name: String,
    pub start_time: String,
    pub duration: String,
    pub velocity: i64,
    #[serde(default)]
    pub tempo: Option<f64>,
}

/// Write note events as an event table
pub fn write_event_table<W: io::Write>(writer: W, events: &[NoteEvent], spelling: Spelling) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (index, event) in events.iter().enumerate() {
        writer.serialize(EventRecord {
            index,
            note_name: event.note_name(spelling),
            start_time: event.start_time,
            duration: event.duration,
            velocity: event.velocity,
            tempo: event.tempo,
        })?;
    }
    if events.is_empty() {
        writer.write_record(["index", "note_name", "start_time", "duration", "velocity", "tempo"])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_event_table_file(path: &Path, events: &[NoteEvent], spelling: Spelling) -> Result<()> {
    let file = fs::File::create(path)?;
    write_event_table(file, events, spelling)
}

/// Read an event table
pub fn read_event_table<R: io::Read>(reader: R) -> Result<Vec<EventRow>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = reader.deserialize().collect::<std::result::Result<Vec<EventRow>, _>>()?;
    Ok(rows)
}

pub fn read_event_table_file(path: &Path) -> Result<Vec<EventRow>> {
    if !path.is_file() {
        return Err(ChordMidiError::MissingInputResource(format!(
            "event table {}",
            path.display()
        )));
    }
    read_event_table(fs::File::open(path)?)
}
