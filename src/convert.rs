//! # Conversion Pipeline
//!
//! File-level glue between the record store, event tables and MIDI files.
//!
//! ```text
//! music_data.csv --row--> expand_to_table --> {comfort}_{activity}_{structure}_{key}.csv
//! input_dir/*.csv ------> convert_directory --> {input_dir}-output-midis/{basename}.mid
//! ```
//!
//! Each event table is converted on its own. A table that fails is recorded in
//! the [`BatchReport`] and the rest of the directory is still converted.

use crate::error::{ChordMidiError, Result};
use crate::midi::{build_midi, MidiSettings};
use crate::progression::{ExpansionSettings, Expander};
use crate::table::{read_event_table_file, record_at, write_event_table_file};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Outcome of converting a directory of event tables
#[derive(Debug)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ChordMidiError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Expand one stored record into an event table inside `out_dir`.
///
/// Returns the path of the table written.
pub fn expand_to_table(
    store: &Path,
    row_number: usize,
    out_dir: &Path,
    settings: &ExpansionSettings,
) -> Result<PathBuf> {
    let record = record_at(store, row_number)?;
    let events = Expander::new(settings.clone()).expand_record(&record)?;

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(record.event_table_name());
    write_event_table_file(&path, &events, settings.spelling)?;

    log::info!(
        "row {}: {} chords, {} notes -> {}",
        row_number,
        record.chord_count(),
        events.len(),
        path.display()
    );
    Ok(path)
}

/// Default output directory for a batch: `{input_dir}-output-midis`
pub fn default_output_dir(input_dir: &Path) -> PathBuf {
    let mut name = input_dir.components().as_path().as_os_str().to_os_string();
    name.push("-output-midis");
    PathBuf::from(name)
}

/// Convert one event table into `{basename}.mid` inside `out_dir`
pub fn convert_file(table: &Path, out_dir: &Path, settings: &MidiSettings) -> Result<PathBuf> {
    let rows = read_event_table_file(table)?;
    let bytes = build_midi(&rows, settings)?;

    let stem = table
        .file_stem()
        .ok_or_else(|| ChordMidiError::MissingInputResource(format!("file name of {}", table.display())))?;
    let mut name = stem.to_os_string();
    name.push(".mid");
    let path = out_dir.join(name);
    fs::write(&path, bytes)?;

    log::info!("{} -> {}", table.display(), path.display());
    Ok(path)
}

/// Event tables directly inside `dir`, sorted by name
fn event_tables(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "csv"))
        .map(|e| e.into_path())
        .collect()
}

/// Convert every event table in `input_dir`.
///
/// The output directory defaults to [`default_output_dir`] and is created if missing.
pub fn convert_directory(
    input_dir: &Path,
    output_dir: Option<&Path>,
    settings: &MidiSettings,
) -> Result<BatchReport> {
    if !input_dir.is_dir() {
        return Err(ChordMidiError::MissingInputResource(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(input_dir));
    fs::create_dir_all(&output_dir)?;

    let mut report = BatchReport {
        output_dir,
        converted: Vec::new(),
        failed: Vec::new(),
    };

    for table in event_tables(input_dir) {
        match convert_file(&table, &report.output_dir, settings) {
            Ok(path) => report.converted.push(path),
            Err(e) => {
                log::error!("{}: {}", table.display(), e);
                report.failed.push((table, e));
            }
        }
    }

    log::info!(
        "converted {} of {} tables into {}",
        report.converted.len(),
        report.converted.len() + report.failed.len(),
        report.output_dir.display()
    );
    Ok(report)
}
