// MIDI output for chords.
//
// Chords leave the process through the `MidiOutputPort` trait, which plays
// one chord for a duration. Two ports exist:
//
// - `SmfRecorder` appends each chord to a Standard MIDI File (format 0,
//   one track, piano) that can be written to disk. Uses the `midly` crate.
// - `LiveMidiOutput` (feature `live-midi`) sends note-on, waits, and sends
//   note-off on a real MIDI device through `midir`.
//
// This is also where the playable range is enforced: notes outside the
// piano's A0..=C8 are rejected before anything is written or sent.

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;
use tonsatz_theory::Pitch;

/// Lowest piano key (A0).
pub const PIANO_LOWEST: Pitch = 21;
/// Highest piano key (C8).
pub const PIANO_HIGHEST: Pitch = 108;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Slowest tempo whose quarter-note length (in microseconds) still fits the
/// 24-bit tempo meta event.
pub const MIN_TEMPO_BPM: u16 = 4;

/// Acoustic grand piano.
const PIANO_PROGRAM: u8 = 0;

#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("note {0} is outside the piano range 21..=108")]
    OutOfRange(Pitch),

    #[error("velocity {0} is above 127")]
    InvalidVelocity(u8),

    #[error("tempo {0} bpm is below the minimum of {MIN_TEMPO_BPM}")]
    InvalidTempo(u16),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize MIDI: {0}")]
    InitFailed(String),

    #[error("port not found: {0}")]
    PortNotFound(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Somewhere chords can be played.
pub trait MidiOutputPort {
    /// Sound `notes` together for `duration_ms` milliseconds.
    fn play_chord(&mut self, notes: &[Pitch], duration_ms: u64) -> Result<(), MidiError>;
}

/// Play a sequence of chords, one after another.
pub fn play_all<'a>(
    port: &mut dyn MidiOutputPort,
    chords: impl IntoIterator<Item = &'a [Pitch]>,
    duration_ms: u64,
) -> Result<usize, MidiError> {
    let mut played = 0;
    for notes in chords {
        port.play_chord(notes, duration_ms)?;
        played += 1;
    }
    Ok(played)
}

/// Checks every note against the piano range and converts to MIDI keys.
pub fn to_keys(notes: &[Pitch]) -> Result<Vec<u8>, MidiError> {
    notes
        .iter()
        .map(|&n| {
            if (PIANO_LOWEST..=PIANO_HIGHEST).contains(&n) {
                Ok(n as u8)
            } else {
                Err(MidiError::OutOfRange(n))
            }
        })
        .collect()
}

fn check_velocity(velocity: u8) -> Result<(), MidiError> {
    if velocity > 127 {
        Err(MidiError::InvalidVelocity(velocity))
    } else {
        Ok(())
    }
}

/// One chord in a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedChord {
    keys: Vec<u8>,
    ticks: u32,
}

/// Collects chords into an in-memory MIDI file.
#[derive(Debug, Clone)]
pub struct SmfRecorder {
    velocity: u8,
    tempo_bpm: u16,
    chords: Vec<RecordedChord>,
}

impl SmfRecorder {
    pub fn new(velocity: u8, tempo_bpm: u16) -> Result<Self, MidiError> {
        check_velocity(velocity)?;
        if tempo_bpm < MIN_TEMPO_BPM {
            return Err(MidiError::InvalidTempo(tempo_bpm));
        }
        Ok(SmfRecorder {
            velocity,
            tempo_bpm,
            chords: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Milliseconds to ticks at the recorder's tempo.
    fn ms_to_ticks(&self, ms: u64) -> u32 {
        let ticks = ms * TICKS_PER_QUARTER as u64 * self.tempo_bpm as u64 / 60_000;
        // Delta times are 28-bit.
        ticks.clamp(1, 0x0FFF_FFFF) as u32
    }

    /// The recording as a single-track SMF.
    pub fn to_smf(&self) -> Smf<'static> {
        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
        ));
        let channel = u4::new(0);
        let mut track: Track<'static> = Vec::new();

        let tempo_microseconds = 60_000_000 / self.tempo_bpm as u32;
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Chords")),
        });
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PIANO_PROGRAM),
                },
            },
        });

        for chord in &self.chords {
            for &key in &chord.keys {
                track.push(TrackEvent {
                    delta: u28::new(0),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOn {
                            key: u7::new(key),
                            vel: u7::new(self.velocity),
                        },
                    },
                });
            }
            // The first note-off carries the chord's length; the rest follow
            // at the same instant.
            for (i, &key) in chord.keys.iter().enumerate() {
                let delta = if i == 0 { chord.ticks } else { 0 };
                track.push(TrackEvent {
                    delta: u28::new(delta),
                    kind: TrackEventKind::Midi {
                        channel,
                        message: MidiMessage::NoteOff {
                            key: u7::new(key),
                            vel: u7::new(0),
                        },
                    },
                });
            }
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });
        smf.tracks.push(track);
        smf
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, MidiError> {
        let mut buf = Vec::new();
        self.to_smf().write_std(&mut buf)?;
        Ok(buf)
    }

    /// Write the recording as a .mid file.
    pub fn write(&self, path: &Path) -> Result<(), MidiError> {
        std::fs::write(path, self.to_bytes()?)?;
        log::info!("wrote {} chords to {}", self.chords.len(), path.display());
        Ok(())
    }
}

impl MidiOutputPort for SmfRecorder {
    fn play_chord(&mut self, notes: &[Pitch], duration_ms: u64) -> Result<(), MidiError> {
        let keys = to_keys(notes)?;
        let ticks = self.ms_to_ticks(duration_ms);
        self.chords.push(RecordedChord { keys, ticks });
        Ok(())
    }
}

#[cfg(feature = "live-midi")]
pub use live::{LiveMidiOutput, MidiPortInfo, list_output_ports};

#[cfg(feature = "live-midi")]
mod live {
    use super::{MidiError, MidiOutputPort, check_velocity, to_keys};
    use midir::{MidiOutput, MidiOutputConnection};
    use std::time::Duration;
    use tonsatz_theory::Pitch;

    /// A discovered output port.
    #[derive(Debug, Clone)]
    pub struct MidiPortInfo {
        pub index: usize,
        pub name: String,
    }

    pub fn list_output_ports() -> Result<Vec<MidiPortInfo>, MidiError> {
        let midi_out =
            MidiOutput::new("tonsatz-scan").map_err(|e| MidiError::InitFailed(e.to_string()))?;
        Ok(midi_out
            .ports()
            .iter()
            .enumerate()
            .filter_map(|(index, port)| {
                midi_out
                    .port_name(port)
                    .ok()
                    .map(|name| MidiPortInfo { index, name })
            })
            .collect())
    }

    /// Plays chords on a connected MIDI device in real time.
    pub struct LiveMidiOutput {
        connection: MidiOutputConnection,
        port_name: String,
        velocity: u8,
    }

    impl LiveMidiOutput {
        /// Connect to the first output port whose name contains
        /// `port_pattern` (any port when `None`).
        pub fn connect(port_pattern: Option<&str>, velocity: u8) -> Result<Self, MidiError> {
            check_velocity(velocity)?;
            let midi_out = MidiOutput::new("tonsatz-out")
                .map_err(|e| MidiError::InitFailed(e.to_string()))?;
            let ports = midi_out.ports();
            let port = ports
                .iter()
                .find(|p| match port_pattern {
                    Some(pattern) => midi_out
                        .port_name(p)
                        .map(|n| n.contains(pattern))
                        .unwrap_or(false),
                    None => true,
                })
                .ok_or_else(|| {
                    MidiError::PortNotFound(port_pattern.unwrap_or("<any>").to_string())
                })?;
            let port_name = midi_out
                .port_name(port)
                .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;
            let connection = midi_out
                .connect(port, "tonsatz-output")
                .map_err(|e| MidiError::ConnectionFailed(e.to_string()))?;
            log::info!("opened MIDI output: {port_name}");
            Ok(LiveMidiOutput {
                connection,
                port_name,
                velocity,
            })
        }

        pub fn port_name(&self) -> &str {
            &self.port_name
        }

        fn send(&mut self, message: &[u8]) -> Result<(), MidiError> {
            self.connection
                .send(message)
                .map_err(|e| MidiError::SendFailed(e.to_string()))
        }
    }

    impl MidiOutputPort for LiveMidiOutput {
        fn play_chord(&mut self, notes: &[Pitch], duration_ms: u64) -> Result<(), MidiError> {
            let keys = to_keys(notes)?;
            for &key in &keys {
                self.send(&[0x90, key, self.velocity])?;
            }
            std::thread::sleep(Duration::from_millis(duration_ms));
            for &key in &keys {
                self.send(&[0x80, key, 0])?;
            }
            Ok(())
        }
    }
}
