//! MongoDB implementation of the store capability traits.

use std::sync::Arc;

use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::{Client, IndexModel};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{RecordError, RecordResult};
use crate::store::{
    BulkOutcome, Collection, Connector, Database, DeleteOutcome, InsertedMany, WriteOp,
    WriteOutcome,
};

/// Connector backed by the official MongoDB driver.
///
/// The driver handles connection pooling internally; one [`Client`] per
/// connection target is all that is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

#[async_trait]
impl Connector for MongoConnector {
    async fn connect(&self, config: &StoreConfig) -> RecordResult<Arc<dyn Database>> {
        let options = config.to_client_options().await?;

        let client = Client::with_options(options)
            .map_err(|e| RecordError::connection(format!("failed to create client: {}", e)))?;

        let database = client.database(&config.database);

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "MongoDB connection established"
        );

        Ok(Arc::new(MongoDatabase {
            _client: client,
            database,
        }))
    }
}

/// A selected MongoDB database.
pub struct MongoDatabase {
    // Keeps the client alive for as long as any collection handle is held.
    _client: Client,
    database: mongodb::Database,
}

impl Database for MongoDatabase {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        Arc::new(MongoCollection {
            inner: self.database.collection::<Document>(name),
        })
    }
}

/// A bound MongoDB collection.
pub struct MongoCollection {
    inner: mongodb::Collection<Document>,
}

#[async_trait]
impl Collection for MongoCollection {
    async fn find_one(&self, filter: Document) -> RecordResult<Option<Document>> {
        let doc = self.inner.find_one(filter, None).await?;
        Ok(doc)
    }

    async fn find(&self, filter: Document, limit: Option<u64>) -> RecordResult<Vec<Document>> {
        let options = limit.map(|l| FindOptions::builder().limit(l as i64).build());
        let cursor = self.inner.find(filter, options).await?;
        let docs = cursor.try_collect().await?;
        Ok(docs)
    }

    async fn insert_one(&self, document: Document) -> RecordResult<Bson> {
        let result = self.inner.insert_one(document, None).await?;
        Ok(result.inserted_id)
    }

    async fn insert_many(&self, documents: Vec<Document>) -> RecordResult<InsertedMany> {
        let result = self.inner.insert_many(documents, None).await?;

        // The driver reports ids keyed by input position.
        let mut ids: Vec<(usize, Bson)> = result.inserted_ids.into_iter().collect();
        ids.sort_by_key(|(index, _)| *index);

        Ok(InsertedMany {
            inserted_ids: ids.into_iter().map(|(_, id)| id).collect(),
        })
    }

    async fn update_one(
        &self,
        filter: Document,
        set_fields: Document,
    ) -> RecordResult<WriteOutcome> {
        let result = self
            .inner
            .update_one(filter, doc! { "$set": set_fields }, None)
            .await?;
        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn replace_one(
        &self,
        filter: Document,
        replacement: Document,
    ) -> RecordResult<WriteOutcome> {
        let result = self.inner.replace_one(filter, replacement, None).await?;
        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        let result = self.inner.delete_one(filter, None).await?;
        Ok(DeleteOutcome {
            deleted: result.deleted_count,
        })
    }

    async fn delete_many(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        let result = self.inner.delete_many(filter, None).await?;
        Ok(DeleteOutcome {
            deleted: result.deleted_count,
        })
    }

    async fn count_documents(&self, filter: Document) -> RecordResult<u64> {
        let count = self.inner.count_documents(filter, None).await?;
        Ok(count)
    }

    async fn distinct(&self, field: &str) -> RecordResult<Vec<Bson>> {
        let values = self.inner.distinct(field, None, None).await?;
        Ok(values)
    }

    async fn create_index(&self, keys: Document) -> RecordResult<String> {
        let model = IndexModel::builder().keys(keys).build();
        let result = self.inner.create_index(model, None).await?;
        Ok(result.index_name)
    }

    async fn bulk_write(&self, operations: Vec<WriteOp>) -> RecordResult<BulkOutcome> {
        debug!(operations = operations.len(), "executing bulk write");

        // The 2.x driver has no collection-level batched write, so the
        // descriptors run in order against the same collection.
        let mut outcome = BulkOutcome::default();
        for op in operations {
            match op {
                WriteOp::InsertOne(document) => {
                    self.inner.insert_one(document, None).await?;
                    outcome.inserted += 1;
                }
                WriteOp::UpdateOne { filter, set_fields } => {
                    let result = self
                        .inner
                        .update_one(filter, doc! { "$set": set_fields }, None)
                        .await?;
                    outcome.matched += result.matched_count;
                    outcome.modified += result.modified_count;
                }
                WriteOp::ReplaceOne {
                    filter,
                    replacement,
                } => {
                    let result = self.inner.replace_one(filter, replacement, None).await?;
                    outcome.matched += result.matched_count;
                    outcome.modified += result.modified_count;
                }
                WriteOp::DeleteOne(filter) => {
                    let result = self.inner.delete_one(filter, None).await?;
                    outcome.deleted += result.deleted_count;
                }
            }
        }
        Ok(outcome)
    }

    async fn drop(&self) -> RecordResult<()> {
        debug!(collection = %self.inner.name(), "dropping collection");
        self.inner.drop(None).await?;
        Ok(())
    }
}
