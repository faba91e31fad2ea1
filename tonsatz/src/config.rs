// Run configuration.
//
// Every tunable of the command-line tool lives in `TonsatzConfig`: the
// pitch range and chord sizes for batch generation, where chords are
// stored and cached, and how chords are rendered to MIDI. The config is
// loaded from a JSON file when one is given (`--config`), otherwise the
// defaults apply; any field missing from the file keeps its default.
// Command-line flags override individual fields after loading.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonsatz_theory::Pitch;
use tonsatz_theory::analysis::MIN_CHORD_NOTES;

use crate::midi::MIN_TEMPO_BPM;

/// A chord cannot have more notes than there are pitch classes.
pub const MAX_CHORD_NOTES: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonsatzConfig {
    /// Lowest note used when enumerating chords.
    pub min_note: Pitch,
    /// Highest note used when enumerating chords.
    pub max_note: Pitch,
    /// Outer notes of a generated chord stay less than this many octaves
    /// apart.
    pub max_octaves: u32,
    /// Chord sizes generated by `calculate`.
    pub chord_sizes: Vec<usize>,
    /// SQLite database holding classified chords.
    pub database_path: PathBuf,
    /// Directory for JSON chord tables.
    pub cache_dir: PathBuf,
    pub midi: MidiSettings,
}

/// How chords are rendered as MIDI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiSettings {
    /// How long each chord sounds, in milliseconds.
    pub chord_duration_ms: u64,
    /// Note-on velocity (0-127).
    pub velocity: u8,
    /// Tempo written into MIDI files.
    pub tempo_bpm: u16,
    /// Substring of the output port name for live playback.
    pub port_name: Option<String>,
}

impl Default for TonsatzConfig {
    fn default() -> Self {
        TonsatzConfig {
            min_note: 48,
            max_note: 72,
            max_octaves: 2,
            chord_sizes: vec![3, 4, 5],
            database_path: PathBuf::from("tonsatz.sqlite"),
            cache_dir: PathBuf::from("cache"),
            midi: MidiSettings::default(),
        }
    }
}

impl Default for MidiSettings {
    fn default() -> Self {
        MidiSettings {
            chord_duration_ms: 1000,
            velocity: 32,
            tempo_bpm: 60,
            port_name: None,
        }
    }
}

impl TonsatzConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TonsatzConfig =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_note > self.max_note {
            return Err(ConfigError::Invalid(format!(
                "min_note {} is above max_note {}",
                self.min_note, self.max_note
            )));
        }
        if self.max_octaves == 0 {
            return Err(ConfigError::Invalid("max_octaves must be at least 1".into()));
        }
        if let Some(&size) = self.chord_sizes.iter().find(|&&s| s < MIN_CHORD_NOTES) {
            return Err(ConfigError::Invalid(format!(
                "chord size {size} is below the minimum of {MIN_CHORD_NOTES}"
            )));
        }
        if let Some(&size) = self.chord_sizes.iter().find(|&&s| s > MAX_CHORD_NOTES) {
            return Err(ConfigError::Invalid(format!(
                "chord size {size} is above the maximum of {MAX_CHORD_NOTES}"
            )));
        }
        if self.midi.velocity > 127 {
            return Err(ConfigError::Invalid(format!(
                "velocity {} is above 127",
                self.midi.velocity
            )));
        }
        if self.midi.tempo_bpm < MIN_TEMPO_BPM {
            return Err(ConfigError::Invalid(format!(
                "tempo_bpm {} is below the minimum of {MIN_TEMPO_BPM}",
                self.midi.tempo_bpm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TonsatzConfig::default();
        config.validate().unwrap();
        assert_eq!(config.chord_sizes, vec![3, 4, 5]);
        assert_eq!(config.midi.velocity, 32);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tonsatz.json");
        std::fs::write(&path, r#"{"min_note": 36, "midi": {"velocity": 90}}"#).unwrap();
        let config = TonsatzConfig::load(&path).unwrap();
        assert_eq!(config.min_note, 36);
        assert_eq!(config.max_note, 72);
        assert_eq!(config.midi.velocity, 90);
        assert_eq!(config.midi.chord_duration_ms, 1000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = TonsatzConfig {
            chord_sizes: vec![2, 3],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = TonsatzConfig {
            min_note: 80,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = TonsatzConfig::default();
        config.midi.velocity = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_size_and_tempo_bounds() {
        let config = TonsatzConfig {
            chord_sizes: vec![3, 13],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = TonsatzConfig {
            chord_sizes: vec![MAX_CHORD_NOTES],
            ..Default::default()
        };
        config.validate().unwrap();

        let mut config = TonsatzConfig::default();
        config.midi.tempo_bpm = 2;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.midi.tempo_bpm = MIN_TEMPO_BPM;
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file() {
        let err = TonsatzConfig::load(Path::new("/nonexistent/tonsatz.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(
            TonsatzConfig::load_or_default(None).unwrap(),
            TonsatzConfig::default()
        );
    }
}
