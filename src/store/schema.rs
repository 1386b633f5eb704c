//! Database schema for the document store.

use rusqlite::{Connection, Result};

/// The complete SQL schema for the document database.
pub const SCHEMA_SQL: &str = r"
    -- Collections
    -- One row per project namespace. Documents reference the namespace by
    -- rowid so renames never touch document rows.
    CREATE TABLE IF NOT EXISTS collections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    );

    -- Documents
    -- Bodies are stored as JSON text. `seq` preserves insertion order,
    -- which is the order reads return documents in.
    CREATE TABLE IF NOT EXISTS documents (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        collection_id INTEGER NOT NULL REFERENCES collections(id),
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        UNIQUE (collection_id, id)
    );

    CREATE INDEX IF NOT EXISTS idx_documents_collection_id ON documents(collection_id);
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(())
}
