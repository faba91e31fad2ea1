// SQLite chord repository.
//
// One table, `chords`, holds a row per classified chord. The note list is
// stored as a JSON array; size, outer notes, root, group and column get
// their own columns so queries can filter in SQL. An index on
// (root_note, chord_group, num_notes) serves the root/group/size lookups.
//
// File databases run in WAL mode; bulk saves go through one transaction.

use crate::StoreError;
use crate::repository::{ChordId, ChordQuery, ChordRepository, StoredChord};
use rusqlite::{Connection, Row, params, params_from_iter};
use std::path::Path;
use tonsatz_theory::{ClassificationResult, Column};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS chords (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    notes TEXT NOT NULL,
    num_notes INTEGER NOT NULL,
    min_note INTEGER NOT NULL,
    max_note INTEGER NOT NULL,
    root_note INTEGER NOT NULL,
    chord_group INTEGER NOT NULL,
    chord_column TEXT NOT NULL CHECK (chord_column IN ('A', 'B')),
    frame_interval INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS chords_root_group_size
    ON chords (root_note, chord_group, num_notes);
";

const INSERT_SQL: &str = "INSERT INTO chords
    (notes, num_notes, min_note, max_note, root_note, chord_group, chord_column, frame_interval)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const SELECT_COLUMNS: &str =
    "SELECT id, notes, root_note, chord_group, chord_column, frame_interval FROM chords";

pub struct SqliteChordRepository {
    conn: Connection,
}

impl SqliteChordRepository {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        log::info!("opened chord database {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(SqliteChordRepository { conn })
    }

    fn insert(conn: &Connection, chord: &ClassificationResult) -> Result<ChordId, StoreError> {
        let notes = serde_json::to_string(&chord.notes)?;
        let min_note = chord.notes.iter().min().copied().unwrap_or(chord.root_note);
        let max_note = chord.notes.iter().max().copied().unwrap_or(chord.root_note);
        let mut stmt = conn.prepare_cached(INSERT_SQL)?;
        stmt.execute(params![
            notes,
            chord.notes.len() as i64,
            min_note,
            max_note,
            chord.root_note,
            chord.group,
            chord.column.letter().to_string(),
            chord.frame_interval,
        ])?;
        Ok(ChordId(conn.last_insert_rowid()))
    }

    fn query(&self, sql: &str, args: Vec<i64>) -> Result<Vec<StoredChord>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(args), RawRow::read)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }
}

/// A row as read from SQLite, before the JSON note list is decoded.
struct RawRow {
    id: i64,
    notes: String,
    root_note: i32,
    group: u8,
    column: String,
    frame_interval: i32,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawRow {
            id: row.get(0)?,
            notes: row.get(1)?,
            root_note: row.get(2)?,
            group: row.get(3)?,
            column: row.get(4)?,
            frame_interval: row.get(5)?,
        })
    }

    fn decode(self) -> Result<StoredChord, StoreError> {
        let notes = serde_json::from_str(&self.notes).map_err(|e| StoreError::Corrupt {
            id: self.id,
            reason: format!("notes {:?}: {e}", self.notes),
        })?;
        let column = match self.column.as_str() {
            "A" => Column::TritoneFree,
            "B" => Column::WithTritone,
            other => {
                return Err(StoreError::Corrupt {
                    id: self.id,
                    reason: format!("unknown column {other:?}"),
                });
            }
        };
        Ok(StoredChord {
            id: ChordId(self.id),
            chord: ClassificationResult {
                notes,
                column,
                root_note: self.root_note,
                group: self.group,
                frame_interval: self.frame_interval,
            },
        })
    }
}

/// `?, ?, ?` for an IN list.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl ChordRepository for SqliteChordRepository {
    fn save(&mut self, chord: &ClassificationResult) -> Result<ChordId, StoreError> {
        Self::insert(&self.conn, chord)
    }

    fn save_all(&mut self, chords: &[ClassificationResult]) -> Result<Vec<ChordId>, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = chords
            .iter()
            .map(|c| Self::insert(&tx, c))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        log::debug!("saved {} chords", ids.len());
        Ok(ids)
    }

    fn find_by_id(&self, id: ChordId) -> Result<Option<StoredChord>, StoreError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        Ok(self.query(&sql, vec![id.0])?.into_iter().next())
    }

    fn find_all(&self) -> Result<Vec<StoredChord>, StoreError> {
        self.query(&format!("{SELECT_COLUMNS} ORDER BY id"), Vec::new())
    }

    fn delete_by_id(&mut self, id: ChordId) -> Result<bool, StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM chords WHERE id = ?1", params![id.0])?;
        Ok(removed > 0)
    }

    fn truncate(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("DELETE FROM chords")?;
        Ok(())
    }

    fn find(&self, query: &ChordQuery) -> Result<Vec<StoredChord>, StoreError> {
        let mut clauses = Vec::new();
        let mut args: Vec<i64> = Vec::new();
        if let Some(root) = query.root_note {
            clauses.push("root_note = ?".to_string());
            args.push(root as i64);
        }
        if !query.groups.is_empty() {
            clauses.push(format!("chord_group IN ({})", placeholders(query.groups.len())));
            args.extend(query.groups.iter().map(|&g| g as i64));
        }
        if !query.sizes.is_empty() {
            clauses.push(format!("num_notes IN ({})", placeholders(query.sizes.len())));
            args.extend(query.sizes.iter().map(|&s| s as i64));
        }
        if let Some(max_group) = query.max_group {
            clauses.push("chord_group <= ?".to_string());
            args.push(max_group as i64);
        }

        let mut sql = SELECT_COLUMNS.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");
        self.query(&sql, args)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chords", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
