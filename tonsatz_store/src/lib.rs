// Tonsatz chord storage
//
// Persists classified chords so that large precomputed chord sets can be
// queried by root note, group and size without re-enumerating them.
//
// Architecture:
// - repository.rs: the `ChordRepository` port, `ChordQuery` and
//   `StoredChord`
// - memory.rs: in-memory repository with a (root, group, size) index
// - sqlite.rs: SQLite repository (rusqlite), one `chords` table
// - cache.rs: JSON chord tables for a pitch range, written once and
//   reloaded instead of regenerating
// - error.rs: StoreError
//
// See also: `tonsatz_theory` for `ClassificationResult`, the record type
// everything here stores.

pub mod cache;
pub mod error;
pub mod memory;
pub mod repository;
pub mod sqlite;

pub use cache::ChordTable;
pub use error::StoreError;
pub use memory::MemoryChordRepository;
pub use repository::{ChordId, ChordQuery, ChordRepository, StoredChord};
pub use sqlite::SqliteChordRepository;
