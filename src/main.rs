use anyhow::{bail, Context, Result};
use chordmidi::record::{Key, ProgressionRecord, Structure};
use chordmidi::table::{append_record, scan_records, DEFAULT_STORE};
use chordmidi::theory::{ChordQuality, Spelling};
use chordmidi::{convert_directory, expand_to_table, ChordSlot, Settings};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use std::path::{Path, PathBuf};

/// Turn mood-tagged chord progressions into event tables and MIDI files
#[derive(Parser, Debug)]
#[command(name = "chordmidi", version, about, long_about = None)]
struct Cli {
    /// YAML settings file (octave, duration, velocity, tempo, spelling, ...)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every chord and note batch
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a progression and append it to the record store
    Add(AddArgs),

    /// Print the records in the store
    List {
        /// Record store
        #[arg(short, long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },

    /// Expand one stored record into an event table
    Expand(ExpandArgs),

    /// Convert every event table in a directory into MIDI files
    Convert(ConvertArgs),

    /// Expand one stored record, then convert its event table directory
    Build {
        #[command(flatten)]
        expand: ExpandArgs,

        /// MIDI output directory (default: `<out-dir>-output-midis`)
        #[arg(short = 'o', long)]
        midi_dir: Option<PathBuf>,

        /// Tempo for every MIDI file, ignoring the table's tempo column
        #[arg(short, long)]
        tempo: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Record store
    #[arg(short, long, default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// Comfort, -5 to 5
    #[arg(long, allow_hyphen_values = true)]
    comfort: i8,

    /// Activity, -5 to 5
    #[arg(long, allow_hyphen_values = true)]
    activity: i8,

    /// Intro, Verse, Chorus, Bridge or Outro
    #[arg(long)]
    structure: Structure,

    /// Key such as "C Major" or "F# Minor"
    #[arg(long)]
    key: Key,

    /// Chord as ROOT:QUALITY, e.g. 1:M or 5:7th; give 4 or 8 of them
    #[arg(long = "chord", value_parser = parse_chord_spec, required = true)]
    chords: Vec<(u8, ChordQuality)>,
}

#[derive(Args, Debug)]
struct ExpandArgs {
    /// Record store
    #[arg(short, long, default_value = DEFAULT_STORE)]
    store: PathBuf,

    /// 1-based row of the record to expand
    #[arg(short, long)]
    row: usize,

    /// Directory the event table is written to
    #[arg(short = 'd', long, default_value = "data/input")]
    out_dir: PathBuf,

    /// Octave digit of every chord tone
    #[arg(long)]
    octave: Option<u8>,

    /// Beats per chord
    #[arg(long)]
    duration: Option<u32>,

    /// Velocity of every note
    #[arg(long)]
    velocity: Option<u8>,

    /// BPM written into the table
    #[arg(long)]
    bpm: Option<u16>,

    /// Accidental spelling of the note names: sharp or flat
    #[arg(long)]
    spelling: Option<Spelling>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Directory of event tables
    input_dir: PathBuf,

    /// Output directory (default: `<input-dir>-output-midis`)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Tempo for every MIDI file, ignoring the table's tempo column
    #[arg(short, long)]
    tempo: Option<f64>,
}

fn parse_chord_spec(spec: &str) -> std::result::Result<(u8, ChordQuality), String> {
    let (root, quality) = spec
        .split_once(':')
        .ok_or_else(|| format!("'{}' is not ROOT:QUALITY", spec))?;
    match ChordSlot::parse(root, quality).map_err(|e| e.to_string())? {
        ChordSlot::Chord { root, quality } => Ok((root, quality)),
        ChordSlot::End => Err("root 0 ends a progression and cannot be entered".to_string()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Add(args) => add(args),
        Command::List { store } => list(&store),
        Command::Expand(args) => {
            apply_expand_overrides(&mut settings, &args)?;
            expand_to_table(&args.store, args.row, &args.out_dir, &settings.expansion)
                .with_context(|| format!("Failed to expand row {} of {}", args.row, args.store.display()))?;
            Ok(())
        }
        Command::Convert(args) => {
            if args.tempo.is_some() {
                settings.midi.tempo_override = args.tempo;
            }
            convert(&args.input_dir, args.output_dir.as_deref(), &settings)
        }
        Command::Build {
            expand,
            midi_dir,
            tempo,
        } => {
            apply_expand_overrides(&mut settings, &expand)?;
            if tempo.is_some() {
                settings.midi.tempo_override = tempo;
            }
            expand_to_table(&expand.store, expand.row, &expand.out_dir, &settings.expansion)
                .with_context(|| format!("Failed to expand row {} of {}", expand.row, expand.store.display()))?;
            convert(&expand.out_dir, midi_dir.as_deref(), &settings)
        }
    }
}

fn add(args: AddArgs) -> Result<()> {
    let record = ProgressionRecord::new(args.comfort, args.activity, args.structure, args.key, &args.chords)?;
    append_record(&args.store, &record).with_context(|| format!("Failed to write {}", args.store.display()))?;
    info!("Saved {} to {}", record.to_fields().join(","), args.store.display());
    Ok(())
}

fn list(store: &Path) -> Result<()> {
    let rows = scan_records(store).with_context(|| format!("Failed to read {}", store.display()))?;
    for (i, row) in rows.iter().enumerate() {
        match row {
            Ok(record) => println!("{:>3}: {}", i + 1, record.to_fields().join(",")),
            Err(e) => println!("{:>3}: <{}>", i + 1, e),
        }
    }
    Ok(())
}

fn apply_expand_overrides(settings: &mut Settings, args: &ExpandArgs) -> Result<()> {
    let expansion = &mut settings.expansion;
    if let Some(octave) = args.octave {
        if octave > 7 {
            bail!("--octave must be 0-7, got {}", octave);
        }
        expansion.octave = octave;
    }
    if let Some(duration) = args.duration {
        if duration == 0 {
            bail!("--duration must be at least 1 beat");
        }
        expansion.duration_beats = duration;
    }
    if let Some(velocity) = args.velocity {
        if velocity > 127 {
            bail!("--velocity must be 0-127, got {}", velocity);
        }
        expansion.velocity = velocity;
    }
    if let Some(bpm) = args.bpm {
        if bpm == 0 {
            bail!("--bpm must be positive");
        }
        expansion.tempo = bpm;
    }
    if let Some(spelling) = args.spelling {
        expansion.spelling = spelling;
    }
    Ok(())
}

fn convert(input_dir: &Path, output_dir: Option<&Path>, settings: &Settings) -> Result<()> {
    if let Some(tempo) = settings.midi.tempo_override {
        if !tempo.is_finite() || tempo <= 0.0 {
            bail!("--tempo must be a positive BPM, got {}", tempo);
        }
    }

    let report = convert_directory(input_dir, output_dir, &settings.midi)
        .with_context(|| format!("Failed to convert {}", input_dir.display()))?;

    if !report.is_success() {
        bail!(
            "{} of {} event tables failed to convert",
            report.failed.len(),
            report.failed.len() + report.converted.len()
        );
    }
    Ok(())
}
