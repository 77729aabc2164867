//! Entity types and their bound collection handles.

use std::marker::PhantomData;
use std::sync::Arc;

use bson::{Bson, Document};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::RecordResult;
use crate::registry::Registry;
use crate::store::{
    BulkOutcome, Collection, DeleteOutcome, InsertedMany, WriteOp, WriteOutcome,
};

/// An entity type bound 1:1 to a collection.
///
/// Implementors declare a connection target and a collection name; both
/// have defaults, so the minimal entity is a unit struct:
///
/// ```rust,ignore
/// use mongo_record::{Entity, Model};
///
/// struct Product;
/// impl Model for Product {}
///
/// // Binds to the "product" collection on localhost:27017/mongo_record.
/// let products = Entity::<Product>::bind_default().await?;
/// ```
pub trait Model: Send + Sync + 'static {
    /// Connection target for this entity type.
    fn store_config() -> StoreConfig {
        StoreConfig::default()
    }

    /// Collection name, defaulted to the type name lower-cased.
    fn collection_name() -> String {
        type_collection_name::<Self>()
    }
}

/// Derive a collection name from a type: last path segment, lower-cased.
pub fn type_collection_name<M: ?Sized>() -> String {
    let full = std::any::type_name::<M>();
    let base = full.split('<').next().unwrap_or(full);
    let base = base.rsplit("::").next().unwrap_or(base);
    base.to_lowercase()
}

/// The result of [`Entity::get_or_create`].
#[derive(Debug, Clone, PartialEq)]
pub enum GetOrCreate {
    /// An existing document matched the filter.
    Found(Document),
    /// No match existed; the filter was inserted and assigned this id.
    Created(Bson),
}

/// A collection handle bound to an entity type.
///
/// Created by [`Entity::bind`], which resolves the entity's connection
/// target through a registry; the underlying connection is opened lazily on
/// the first bind for a given target. All operations forward directly to
/// the store and classify failures into [`RecordError`] kinds.
///
/// Single-match operations (`get`, `update`, `delete`, `replace`) act on
/// the first match in the store's natural order.
///
/// [`RecordError`]: crate::error::RecordError
pub struct Entity<M: Model> {
    collection: Arc<dyn Collection>,
    _model: PhantomData<M>,
}

impl<M: Model> std::fmt::Debug for Entity<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("collection_name", &M::collection_name())
            .finish_non_exhaustive()
    }
}

impl<M: Model> Clone for Entity<M> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> Entity<M> {
    /// Bind this entity's collection through the given registry.
    pub async fn bind(registry: &Registry) -> RecordResult<Self> {
        let config = M::store_config();
        let name = M::collection_name();
        debug!(collection = %name, database = %config.database, "binding entity");

        let collection = registry.collection(&config, &name).await?;
        Ok(Self {
            collection,
            _model: PhantomData,
        })
    }

    /// Bind through the process-wide default registry.
    pub async fn bind_default() -> RecordResult<Self> {
        Self::bind(Registry::global()).await
    }

    /// Retrieve the first document matching the filter, or `None`.
    pub async fn get(&self, filter: Document) -> RecordResult<Option<Document>> {
        self.collection.find_one(filter).await
    }

    /// Retrieve the first match, or insert the filter as a new document.
    pub async fn get_or_create(&self, filter: Document) -> RecordResult<GetOrCreate> {
        if let Some(existing) = self.collection.find_one(filter.clone()).await? {
            return Ok(GetOrCreate::Found(existing));
        }
        let id = self.collection.insert_one(filter).await?;
        Ok(GetOrCreate::Created(id))
    }

    /// Retrieve every document in the collection, in natural order.
    pub async fn all(&self) -> RecordResult<Vec<Document>> {
        self.collection.find(Document::new(), None).await
    }

    /// Insert a new document and return its assigned id.
    pub async fn create(&self, document: Document) -> RecordResult<Bson> {
        self.collection.insert_one(document).await
    }

    /// Insert multiple documents in one call.
    pub async fn create_many(&self, documents: Vec<Document>) -> RecordResult<InsertedMany> {
        self.collection.insert_many(documents).await
    }

    /// Create an index from a key document (field name → direction).
    pub async fn create_index(&self, keys: Document) -> RecordResult<String> {
        self.collection.create_index(keys).await
    }

    /// Create an ascending index over multiple fields.
    pub async fn create_compound_index(&self, fields: &[&str]) -> RecordResult<String> {
        let mut keys = Document::new();
        for field in fields {
            keys.insert(*field, 1_i32);
        }
        self.collection.create_index(keys).await
    }

    /// Set fields on the first match. No upsert.
    pub async fn update(
        &self,
        filter: Document,
        set_fields: Document,
    ) -> RecordResult<WriteOutcome> {
        self.collection.update_one(filter, set_fields).await
    }

    /// Remove the first match.
    pub async fn delete(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        self.collection.delete_one(filter).await
    }

    /// Remove every match.
    pub async fn delete_many(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        self.collection.delete_many(filter).await
    }

    /// Count matching documents; no filter counts everything.
    pub async fn count(&self, filter: Option<Document>) -> RecordResult<u64> {
        self.collection
            .count_documents(filter.unwrap_or_default())
            .await
    }

    /// Retrieve matching documents, capped at `limit` when given.
    pub async fn find(
        &self,
        filter: Option<Document>,
        limit: Option<u64>,
    ) -> RecordResult<Vec<Document>> {
        self.collection
            .find(filter.unwrap_or_default(), limit)
            .await
    }

    /// Execute a batch of mixed write descriptors.
    pub async fn bulk_write(&self, operations: Vec<WriteOp>) -> RecordResult<BulkOutcome> {
        self.collection.bulk_write(operations).await
    }

    /// Remove the entire collection.
    pub async fn drop(&self) -> RecordResult<()> {
        Collection::drop(&*self.collection).await
    }

    /// Replace the first match wholesale.
    pub async fn replace(
        &self,
        filter: Document,
        replacement: Document,
    ) -> RecordResult<WriteOutcome> {
        self.collection.replace_one(filter, replacement).await
    }

    /// List the unique values of a field across the collection.
    pub async fn distinct(&self, field: &str) -> RecordResult<Vec<Bson>> {
        self.collection.distinct(field).await
    }
}
