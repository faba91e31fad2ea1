// Errors from chord storage: database, file and JSON failures, plus rows
// that cannot be decoded back into a chord.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored chord {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
}
