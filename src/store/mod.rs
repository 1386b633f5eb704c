//! Document store access for `issue_tracker`.
//!
//! Persistence is reached through the [`DocumentStore`] trait: schemaless
//! JSON documents grouped into named collections, one collection per project
//! namespace. Collections come into existence the first time a name is used.
//! The concrete backend is SQLite ([`SqliteStore`]).

mod id;
mod schema;
mod sqlite;

pub use id::DocumentId;
pub use sqlite::SqliteStore;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A JSON object mapping field names to values.
///
/// Used for document bodies, query filters, and update patches alike.
pub type Fields = serde_json::Map<String, Value>;

/// A stored document: its identifier plus the persisted field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

impl Document {
    /// True if every `(key, value)` pair in `filter` is present in the
    /// document's fields with an equal value.
    #[must_use]
    pub fn matches(&self, filter: &Fields) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.fields.get(key) == Some(value))
    }

    /// Project the document into a single JSON object with the identifier
    /// under `_id`.
    #[must_use]
    pub fn into_json(self) -> Value {
        let mut map = self.fields;
        map.insert("_id".to_string(), Value::String(self.id.to_string()));
        Value::Object(map)
    }
}

/// Generic create/read/update/delete access to named document collections.
///
/// All operations resolve the collection for `collection` lazily, creating
/// it on first use. Identifiers are assigned by the store at insert time and
/// never change.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document and return it with its assigned identifier.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document>;

    /// Return the documents matching `filter`, in insertion order.
    ///
    /// An empty filter matches every document in the collection.
    async fn find(&self, collection: &str, filter: &Fields) -> Result<Vec<Document>>;

    /// Merge `patch` into the document with the given identifier.
    ///
    /// Returns the updated document, or `None` if no document has that
    /// identifier in this collection.
    async fn update_by_id(
        &self,
        collection: &str,
        id: DocumentId,
        patch: Fields,
    ) -> Result<Option<Document>>;

    /// Remove the document with the given identifier.
    ///
    /// Returns the removed document, or `None` if no document has that
    /// identifier in this collection.
    async fn delete_by_id(&self, collection: &str, id: DocumentId) -> Result<Option<Document>>;
}
