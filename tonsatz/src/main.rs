// Tonsatz CLI entry point.
//
// Analyzes chords by Hindemith's rules, enumerates and classifies chord
// ranges, stores them in SQLite and renders selections to MIDI.
//
// Usage:
//   tonsatz analyze 60 64 67
//   tonsatz generate --size 4 [--min 48] [--max 72] [--octaves 2] [--out table.json]
//   tonsatz find --group 8 --size 4 [--scale c-ionian]
//   tonsatz calculate [--replace] [--cache]
//   tonsatz query --root 60 [--group 1 --group 3] [--size 4]
//   tonsatz play --root 60 --group 1 [--out chords.mid | --live]
//   tonsatz delete (--id N | --all)
//   tonsatz scales
//
// Global flags: --config <file.json>, --db <file.sqlite>. Logging follows
// RUST_LOG (default: info).

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tonsatz::config::TonsatzConfig;
use tonsatz::midi::{MidiOutputPort, SmfRecorder, play_all};
use tonsatz::pipeline;
use tonsatz_store::{ChordId, ChordQuery, ChordRepository, ChordTable, SqliteChordRepository};
use tonsatz_theory::combinator::{generate_chords, restrict_span};
use tonsatz_theory::finder::ChordFinder;
use tonsatz_theory::scale::{ScaleCatalog, ScaleMembership};
use tonsatz_theory::{ChordAnalysis, GroupNumber, Pitch};

#[derive(Parser)]
#[command(name = "tonsatz", version, about = "Hindemith chord analysis and generation")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite chord database, overriding the configured one.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify one chord.
    Analyze {
        #[arg(required = true, num_args = 1..)]
        notes: Vec<Pitch>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Enumerate and classify every chord of one size in a range.
    Generate {
        #[arg(long, short)]
        size: usize,
        #[command(flatten)]
        range: RangeArgs,
        /// Write the chords as a JSON chord table instead of printing them.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Find every chord of a group, optionally inside a scale.
    Find {
        #[arg(long, short)]
        group: GroupNumber,
        #[arg(long, short)]
        size: usize,
        /// Scale name (see `tonsatz scales`).
        #[arg(long)]
        scale: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Classify the configured range and store it in the database.
    Calculate {
        /// Empty the database first.
        #[arg(long)]
        replace: bool,
        /// Also write (or reuse) the JSON chord table in the cache directory.
        #[arg(long)]
        cache: bool,
    },
    /// List stored chords.
    Query(Filter),
    /// Render stored chords to a MIDI file or device.
    Play {
        #[command(flatten)]
        filter: Filter,
        /// MIDI file to write (default chords.mid).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Play on a MIDI device instead of writing a file.
        #[arg(long)]
        live: bool,
        /// Play at most this many chords.
        #[arg(long)]
        limit: Option<usize>,
        /// Chord length in milliseconds.
        #[arg(long)]
        duration_ms: Option<u64>,
    },
    /// Remove stored chords.
    Delete {
        #[arg(long, conflicts_with = "all")]
        id: Option<i64>,
        #[arg(long)]
        all: bool,
    },
    /// List the built-in scales.
    Scales,
    /// List MIDI output ports.
    #[cfg(feature = "live-midi")]
    Ports,
}

#[derive(Args)]
struct RangeArgs {
    #[arg(long)]
    min: Option<Pitch>,
    #[arg(long)]
    max: Option<Pitch>,
    /// Outer notes stay less than this many octaves apart.
    #[arg(long)]
    octaves: Option<u32>,
}

impl RangeArgs {
    fn apply(&self, config: &mut TonsatzConfig) {
        if let Some(min) = self.min {
            config.min_note = min;
        }
        if let Some(max) = self.max {
            config.max_note = max;
        }
        if let Some(octaves) = self.octaves {
            config.max_octaves = octaves;
        }
    }
}

#[derive(Args)]
struct Filter {
    #[arg(long)]
    root: Option<Pitch>,
    #[arg(long = "group")]
    groups: Vec<GroupNumber>,
    #[arg(long = "size")]
    sizes: Vec<usize>,
    #[arg(long)]
    max_group: Option<GroupNumber>,
}

impl Filter {
    fn query(&self) -> ChordQuery {
        ChordQuery {
            root_note: self.root,
            groups: self.groups.clone(),
            sizes: self.sizes.clone(),
            max_group: self.max_group,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = TonsatzConfig::load_or_default(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    let analysis = ChordAnalysis::default();

    match cli.command {
        Command::Analyze { notes, json } => {
            let result = analysis.analyze(&notes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{result}");
                if let Some(spec) = analysis.table().get(result.group) {
                    println!("Hindemith: {}", spec.label);
                }
            }
        }

        Command::Generate { size, range, out } => {
            range.apply(&mut config);
            config.validate()?;
            let sequences = restrict_span(
                generate_chords(size, config.min_note, config.max_note),
                config.max_octaves,
            );
            let report = pipeline::classify_all(&analysis, &sequences);
            match out {
                Some(path) => {
                    let table = ChordTable::new(
                        config.min_note,
                        config.max_note,
                        config.max_octaves,
                        &[size],
                        report.classified,
                    );
                    table.save(&path)?;
                    println!("{} chords written to {}", table.chords.len(), path.display());
                }
                None => {
                    for chord in &report.classified {
                        println!("{chord}");
                    }
                    print_counts(&report.group_counts());
                }
            }
        }

        Command::Find {
            group,
            size,
            scale,
            range,
        } => {
            range.apply(&mut config);
            let catalog = ScaleCatalog::standard();
            let scale = match scale.as_deref() {
                Some(name) => Some(
                    catalog
                        .get(name)
                        .with_context(|| format!("unknown scale {name:?}"))?,
                ),
                None => None,
            };
            let finder = ChordFinder::new(analysis);
            let found = finder.find(
                group,
                size,
                config.min_note,
                config.max_note,
                scale.map(|s| s as &dyn ScaleMembership),
            )?;
            for chord in &found {
                println!("{chord}");
            }
            println!("{} chords in group {group}", found.len());
        }

        Command::Calculate { replace, cache } => {
            config.validate()?;
            let chords = if cache {
                pipeline::load_or_calculate(&config, &analysis)?.chords
            } else {
                pipeline::calculate(&config, &analysis).classified
            };
            let mut repo = SqliteChordRepository::open(&config.database_path)?;
            if replace {
                repo.truncate()?;
            }
            let ids = repo.save_all(&chords)?;
            println!(
                "{} chords stored in {}",
                ids.len(),
                config.database_path.display()
            );
        }

        Command::Query(filter) => {
            let repo = SqliteChordRepository::open(&config.database_path)?;
            let stored = repo.find(&filter.query())?;
            for chord in &stored {
                println!("{:>8}  {}", chord.id, chord.chord);
            }
            println!("{} chords", stored.len());
        }

        Command::Play {
            filter,
            out,
            live,
            limit,
            duration_ms,
        } => {
            let repo = SqliteChordRepository::open(&config.database_path)?;
            let mut stored = repo.find(&filter.query())?;
            if let Some(limit) = limit {
                stored.truncate(limit);
            }
            if stored.is_empty() {
                bail!("no stored chords match the filter");
            }
            let duration = duration_ms.unwrap_or(config.midi.chord_duration_ms);
            let chords = stored.iter().map(|s| s.chord.notes.as_slice());

            if live {
                let mut port = open_live_port(&config)?;
                let played = play_all(&mut *port, chords, duration)?;
                println!("played {played} chords");
            } else {
                let path = out.unwrap_or_else(|| PathBuf::from("chords.mid"));
                let mut recorder = SmfRecorder::new(config.midi.velocity, config.midi.tempo_bpm)?;
                let played = play_all(&mut recorder, chords, duration)?;
                recorder.write(&path)?;
                println!("{played} chords written to {}", path.display());
            }
        }

        Command::Delete { id, all } => {
            let mut repo = SqliteChordRepository::open(&config.database_path)?;
            match (id, all) {
                (Some(id), _) => {
                    if repo.delete_by_id(ChordId(id))? {
                        println!("deleted chord {}", ChordId(id));
                    } else {
                        bail!("no chord with id {id}");
                    }
                }
                (None, true) => {
                    repo.truncate()?;
                    println!("deleted all chords");
                }
                (None, false) => bail!("pass --id <N> or --all"),
            }
        }

        Command::Scales => {
            for scale in ScaleCatalog::standard().iter() {
                let notes: Vec<String> = (0..12)
                    .filter(|&pc| scale.pitch_classes[pc])
                    .map(|pc| pc.to_string())
                    .collect();
                println!("{:<16} {}", scale.name, notes.join(" "));
            }
        }

        #[cfg(feature = "live-midi")]
        Command::Ports => {
            for port in tonsatz::midi::list_output_ports()? {
                println!("{:>3}  {}", port.index, port.name);
            }
        }
    }
    Ok(())
}

fn print_counts(counts: &std::collections::BTreeMap<GroupNumber, usize>) {
    println!();
    for (group, n) in counts {
        println!("group {group:>2}: {n}");
    }
}

#[cfg(feature = "live-midi")]
fn open_live_port(config: &TonsatzConfig) -> anyhow::Result<Box<dyn MidiOutputPort>> {
    let port = tonsatz::midi::LiveMidiOutput::connect(
        config.midi.port_name.as_deref(),
        config.midi.velocity,
    )?;
    Ok(Box::new(port))
}

#[cfg(not(feature = "live-midi"))]
fn open_live_port(_config: &TonsatzConfig) -> anyhow::Result<Box<dyn MidiOutputPort>> {
    bail!("this build has no live MIDI output; rebuild with --features live-midi")
}
