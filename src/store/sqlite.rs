//! `SQLite` document store implementation.

use crate::error::Result;
use crate::store::schema::apply_schema;
use crate::store::{Document, DocumentId, DocumentStore, Fields};
use async_trait::async_trait;
use dashmap::DashMap;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tokio::sync::Mutex;

/// SQLite-backed document store.
///
/// One connection guarded by an async mutex; every operation is a single
/// short statement or transaction, so requests serialize on the lock.
/// Collection handles are cached in a name -> rowid map after first
/// resolution.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    collections: DashMap<String, i64>,
}

impl SqliteStore {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            collections: DashMap::new(),
        })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            collections: DashMap::new(),
        })
    }

    /// Resolve a collection name to its rowid, creating the collection on
    /// first use and caching the handle for subsequent calls.
    fn collection_id(&self, conn: &Connection, name: &str) -> Result<i64> {
        if let Some(id) = self.collections.get(name) {
            return Ok(*id);
        }

        conn.execute(
            "INSERT INTO collections (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        let id: i64 = conn.query_row(
            "SELECT id FROM collections WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        self.collections.insert(name.to_string(), id);
        Ok(id)
    }

    fn row_to_document(id: &str, body: &str) -> Result<Document> {
        Ok(Document {
            id: id.parse()?,
            fields: serde_json::from_str(body)?,
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document> {
        let conn = self.conn.lock().await;
        let collection_id = self.collection_id(&conn, collection)?;

        let id = DocumentId::generate();
        let body = serde_json::to_string(&fields)?;
        conn.execute(
            "INSERT INTO documents (collection_id, id, body) VALUES (?1, ?2, ?3)",
            params![collection_id, id.to_string(), body],
        )?;

        Ok(Document { id, fields })
    }

    async fn find(&self, collection: &str, filter: &Fields) -> Result<Vec<Document>> {
        let conn = self.conn.lock().await;
        let collection_id = self.collection_id(&conn, collection)?;

        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents WHERE collection_id = ?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![collection_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, body) = row?;
            let document = Self::row_to_document(&id, &body)?;
            if document.matches(filter) {
                documents.push(document);
            }
        }
        Ok(documents)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        patch: Fields,
    ) -> Result<Option<Document>> {
        let mut conn = self.conn.lock().await;
        let collection_id = self.collection_id(&conn, collection)?;

        let tx = conn.transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection_id = ?1 AND id = ?2",
                params![collection_id, id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(body) = existing else {
            return Ok(None);
        };

        let mut fields: Fields = serde_json::from_str(&body)?;
        for (key, value) in patch {
            fields.insert(key, value);
        }

        tx.execute(
            "UPDATE documents SET body = ?1 WHERE collection_id = ?2 AND id = ?3",
            params![serde_json::to_string(&fields)?, collection_id, id.to_string()],
        )?;
        tx.commit()?;

        Ok(Some(Document { id, fields }))
    }

    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
        let mut conn = self.conn.lock().await;
        let collection_id = self.collection_id(&conn, collection)?;

        let tx = conn.transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT body FROM documents WHERE collection_id = ?1 AND id = ?2",
                params![collection_id, id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(body) = existing else {
            return Ok(None);
        };

        tx.execute(
            "DELETE FROM documents WHERE collection_id = ?1 AND id = ?2",
            params![collection_id, id.to_string()],
        )?;
        tx.commit()?;

        Ok(Some(Document {
            id,
            fields: serde_json::from_str(&body)?,
        }))
    }
}
