//! Capability interface for the document store.
//!
//! The registry and entity layers only talk to the store through these
//! traits. The `mongo` module implements them over the official driver;
//! tests implement them over in-memory doubles.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document};

use crate::config::StoreConfig;
use crate::error::RecordResult;

/// Opens connections to a document store.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establish a connection and select the configured database.
    async fn connect(&self, config: &StoreConfig) -> RecordResult<Arc<dyn Database>>;
}

/// A connected database handle.
pub trait Database: Send + Sync + 'static {
    /// Get a handle to the named collection.
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}

impl std::fmt::Debug for dyn Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Database")
    }
}

/// A bound collection handle.
///
/// Every method is a direct forward to the store: no caching, no retries,
/// no client-side filtering. Single-match methods act on the first match in
/// the store's natural order.
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    /// Find the first document matching the filter.
    async fn find_one(&self, filter: Document) -> RecordResult<Option<Document>>;

    /// Find matching documents, capped at `limit` when given.
    async fn find(&self, filter: Document, limit: Option<u64>) -> RecordResult<Vec<Document>>;

    /// Insert one document and return its assigned id.
    async fn insert_one(&self, document: Document) -> RecordResult<Bson>;

    /// Insert all documents in one call.
    async fn insert_many(&self, documents: Vec<Document>) -> RecordResult<InsertedMany>;

    /// Set fields on the first match. No upsert.
    async fn update_one(
        &self,
        filter: Document,
        set_fields: Document,
    ) -> RecordResult<WriteOutcome>;

    /// Replace the first match wholesale.
    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> RecordResult<WriteOutcome>;

    /// Remove the first match.
    async fn delete_one(&self, filter: Document) -> RecordResult<DeleteOutcome>;

    /// Remove every match.
    async fn delete_many(&self, filter: Document) -> RecordResult<DeleteOutcome>;

    /// Count matching documents.
    async fn count_documents(&self, filter: Document) -> RecordResult<u64>;

    /// List unique values of a field across the collection.
    async fn distinct(&self, field: &str) -> RecordResult<Vec<Bson>>;

    /// Request index creation and return the index name.
    async fn create_index(&self, keys: Document) -> RecordResult<String>;

    /// Execute a batch of write descriptors.
    async fn bulk_write(&self, operations: Vec<WriteOp>) -> RecordResult<BulkOutcome>;

    /// Remove the entire collection.
    async fn drop(&self) -> RecordResult<()>;
}

/// Result of a bulk insert: assigned ids in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InsertedMany {
    /// Ids assigned by the store, in the order the documents were given.
    pub inserted_ids: Vec<Bson>,
}

impl InsertedMany {
    /// Number of documents inserted.
    pub fn inserted_count(&self) -> u64 {
        self.inserted_ids.len() as u64
    }
}

/// Result of an update or replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// Documents that matched the filter.
    pub matched: u64,
    /// Documents actually modified.
    pub modified: u64,
}

/// Result of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOutcome {
    /// Documents removed.
    pub deleted: u64,
}

/// Aggregated result of a bulk write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkOutcome {
    /// Documents inserted.
    pub inserted: u64,
    /// Documents matched by update/replace descriptors.
    pub matched: u64,
    /// Documents modified by update/replace descriptors.
    pub modified: u64,
    /// Documents deleted.
    pub deleted: u64,
}

/// A single descriptor in a bulk write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert one document.
    InsertOne(Document),
    /// Set fields on the first match of the filter.
    UpdateOne {
        /// Filter selecting the document.
        filter: Document,
        /// Fields to set.
        set_fields: Document,
    },
    /// Replace the first match of the filter wholesale.
    ReplaceOne {
        /// Filter selecting the document.
        filter: Document,
        /// Full replacement document.
        replacement: Document,
    },
    /// Remove the first match of the filter.
    DeleteOne(Document),
}
