//! In-memory test double of the store capability traits.
//!
//! Keeps documents in insertion order so natural-order semantics are
//! observable, counts connection opens, and can be poisoned to make every
//! operation fail with a given message.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongo_record::prelude::*;

pub struct MemoryConnector {
    opened: AtomicUsize,
    databases: Mutex<Vec<Arc<MemoryDatabase>>>,
}

impl MemoryConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            opened: AtomicUsize::new(0),
            databases: Mutex::new(Vec::new()),
        })
    }

    /// Number of connections opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// The nth database handed out, in connect order.
    pub fn database(&self, index: usize) -> Arc<MemoryDatabase> {
        self.databases.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self, _config: &StoreConfig) -> RecordResult<Arc<dyn Database>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let database = Arc::new(MemoryDatabase::default());
        self.databases.lock().unwrap().push(database.clone());
        Ok(database)
    }
}

#[derive(Default)]
pub struct MemoryDatabase {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryDatabase {
    /// Get the concrete collection double, creating it on first access.
    pub fn open(&self, name: &str) -> Arc<MemoryCollection> {
        self.collections
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

impl Database for MemoryDatabase {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        self.open(name)
    }
}

#[derive(Default)]
pub struct MemoryCollection {
    documents: Mutex<Vec<Document>>,
    fault: Mutex<Option<String>>,
}

impl MemoryCollection {
    /// Make every subsequent operation fail with this message.
    pub fn poison(&self, message: &str) {
        *self.fault.lock().unwrap() = Some(message.to_string());
    }

    fn check_fault(&self) -> RecordResult<()> {
        match self.fault.lock().unwrap().as_ref() {
            Some(message) => Err(RecordError::store(message.clone())),
            None => Ok(()),
        }
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn assign_id(doc: &mut Document) -> Bson {
    if let Some(id) = doc.get("_id") {
        return id.clone();
    }
    let id = Bson::ObjectId(ObjectId::new());
    doc.insert("_id", id.clone());
    id
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn find_one(&self, filter: Document) -> RecordResult<Option<Document>> {
        self.check_fault()?;
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().find(|doc| matches(doc, &filter)).cloned())
    }

    async fn find(&self, filter: Document, limit: Option<u64>) -> RecordResult<Vec<Document>> {
        self.check_fault()?;
        let documents = self.documents.lock().unwrap();
        let mut found: Vec<Document> = documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect();
        if let Some(limit) = limit {
            found.truncate(limit as usize);
        }
        Ok(found)
    }

    async fn insert_one(&self, mut document: Document) -> RecordResult<Bson> {
        self.check_fault()?;
        let id = assign_id(&mut document);
        self.documents.lock().unwrap().push(document);
        Ok(id)
    }

    async fn insert_many(&self, documents: Vec<Document>) -> RecordResult<InsertedMany> {
        self.check_fault()?;
        let mut stored = self.documents.lock().unwrap();
        let mut inserted_ids = Vec::with_capacity(documents.len());
        for mut document in documents {
            inserted_ids.push(assign_id(&mut document));
            stored.push(document);
        }
        Ok(InsertedMany { inserted_ids })
    }

    async fn update_one(
        &self,
        filter: Document,
        set_fields: Document,
    ) -> RecordResult<WriteOutcome> {
        self.check_fault()?;
        let mut documents = self.documents.lock().unwrap();
        let Some(doc) = documents.iter_mut().find(|doc| matches(doc, &filter)) else {
            return Ok(WriteOutcome::default());
        };
        let mut modified = false;
        for (key, value) in set_fields {
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(WriteOutcome {
            matched: 1,
            modified: modified as u64,
        })
    }

    async fn replace_one(
        &self,
        filter: Document,
        mut replacement: Document,
    ) -> RecordResult<WriteOutcome> {
        self.check_fault()?;
        let mut documents = self.documents.lock().unwrap();
        let Some(doc) = documents.iter_mut().find(|doc| matches(doc, &filter)) else {
            return Ok(WriteOutcome::default());
        };
        if let Some(id) = doc.get("_id") {
            if replacement.get("_id").is_none() {
                replacement.insert("_id", id.clone());
            }
        }
        let modified = *doc != replacement;
        *doc = replacement;
        Ok(WriteOutcome {
            matched: 1,
            modified: modified as u64,
        })
    }

    async fn delete_one(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        self.check_fault()?;
        let mut documents = self.documents.lock().unwrap();
        match documents.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(DeleteOutcome { deleted: 1 })
            }
            None => Ok(DeleteOutcome::default()),
        }
    }

    async fn delete_many(&self, filter: Document) -> RecordResult<DeleteOutcome> {
        self.check_fault()?;
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|doc| !matches(doc, &filter));
        Ok(DeleteOutcome {
            deleted: (before - documents.len()) as u64,
        })
    }

    async fn count_documents(&self, filter: Document) -> RecordResult<u64> {
        self.check_fault()?;
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().filter(|doc| matches(doc, &filter)).count() as u64)
    }

    async fn distinct(&self, field: &str) -> RecordResult<Vec<Bson>> {
        self.check_fault()?;
        let documents = self.documents.lock().unwrap();
        let mut values: Vec<Bson> = Vec::new();
        for doc in documents.iter() {
            if let Some(value) = doc.get(field) {
                if !values.contains(value) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }

    async fn create_index(&self, keys: Document) -> RecordResult<String> {
        self.check_fault()?;
        // Mirrors the server's default index naming: field_direction pairs.
        let name = keys
            .iter()
            .map(|(key, value)| format!("{}_{}", key, value))
            .collect::<Vec<_>>()
            .join("_");
        Ok(name)
    }

    async fn bulk_write(&self, operations: Vec<WriteOp>) -> RecordResult<BulkOutcome> {
        self.check_fault()?;
        let mut outcome = BulkOutcome::default();
        for op in operations {
            match op {
                WriteOp::InsertOne(document) => {
                    self.insert_one(document).await?;
                    outcome.inserted += 1;
                }
                WriteOp::UpdateOne { filter, set_fields } => {
                    let result = self.update_one(filter, set_fields).await?;
                    outcome.matched += result.matched;
                    outcome.modified += result.modified;
                }
                WriteOp::ReplaceOne {
                    filter,
                    replacement,
                } => {
                    let result = self.replace_one(filter, replacement).await?;
                    outcome.matched += result.matched;
                    outcome.modified += result.modified;
                }
                WriteOp::DeleteOne(filter) => {
                    let result = self.delete_one(filter).await?;
                    outcome.deleted += result.deleted;
                }
            }
        }
        Ok(outcome)
    }

    async fn drop(&self) -> RecordResult<()> {
        self.check_fault()?;
        self.documents.lock().unwrap().clear();
        Ok(())
    }
}
