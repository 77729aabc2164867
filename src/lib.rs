//! # mongo-record
//!
//! Active-record style document mapping over MongoDB.
//!
//! This crate provides:
//! - An entity trait binding a type to a collection named after it
//! - A connection registry that opens one connection per distinct target
//! - A schemaless CRUD/query surface forwarding directly to the driver
//! - Error classification into a small closed set of kinds
//!
//! ## Example
//!
//! ```rust,ignore
//! use mongo_record::prelude::*;
//!
//! struct User;
//!
//! impl Model for User {
//!     fn store_config() -> StoreConfig {
//!         StoreConfig::builder().database("app").build()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Binds the "user" collection; the connection opens on first bind.
//!     let users = Entity::<User>::bind_default().await?;
//!
//!     let id = users.create(doc! { "name": "Alice", "age": 30 }).await?;
//!     let alice = users.get(doc! { "name": "Alice" }).await?;
//!
//!     users.update(doc! { "name": "Alice" }, doc! { "age": 31 }).await?;
//!     users.delete(doc! { "_id": id }).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Documents are raw BSON mappings; no schema is enforced. For typed
//! access, [`document::DocumentExt`] and the `to_document`/`from_document`
//! helpers map documents to serde types.

pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod mongo;
pub mod registry;
pub mod store;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{RecordError, RecordResult};
pub use model::{Entity, GetOrCreate, Model};
pub use registry::{ConnectionKey, Registry};
pub use store::{
    BulkOutcome, Collection, Connector, Database, DeleteOutcome, InsertedMany, WriteOp,
    WriteOutcome,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{StoreConfig, StoreConfigBuilder};
    pub use crate::document::{DocumentExt, from_document, to_document};
    pub use crate::error::{RecordError, RecordResult};
    pub use crate::model::{Entity, GetOrCreate, Model};
    pub use crate::mongo::MongoConnector;
    pub use crate::registry::Registry;
    pub use crate::store::{
        BulkOutcome, Collection, Connector, Database, DeleteOutcome, InsertedMany, WriteOp,
        WriteOutcome,
    };
    pub use bson::oid::ObjectId;
    pub use bson::{Bson, Document, doc};
}
