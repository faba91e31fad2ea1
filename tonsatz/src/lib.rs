// Tonsatz application layer
//
// Glue between the chord theory engine (`tonsatz_theory`), chord storage
// (`tonsatz_store`) and the outside world.
//
// Architecture:
// - config.rs: TonsatzConfig (pitch range, chord sizes, paths, MIDI
//   settings), loaded from JSON
// - pipeline.rs: parallel batch enumeration + classification, persistence
//   and JSON table caching
// - midi.rs: MidiOutputPort with a Standard MIDI File recorder and, behind
//   the `live-midi` feature, real-time device output
//
// The `tonsatz` binary (main.rs) exposes all of it as subcommands.

pub mod config;
pub mod midi;
pub mod pipeline;
