//! Document mapping and conversion utilities.

use bson::{Document, oid::ObjectId};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{RecordError, RecordResult};

/// Extension trait for BSON documents.
pub trait DocumentExt {
    /// Get a string value from the document.
    fn get_str(&self, key: &str) -> RecordResult<&str>;

    /// Get an i32 value.
    fn get_i32(&self, key: &str) -> RecordResult<i32>;

    /// Get an i64 value.
    fn get_i64(&self, key: &str) -> RecordResult<i64>;

    /// Get a bool value.
    fn get_bool(&self, key: &str) -> RecordResult<bool>;

    /// Get an ObjectId value.
    fn get_object_id(&self, key: &str) -> RecordResult<ObjectId>;

    /// Get the `_id` field as ObjectId.
    fn id(&self) -> RecordResult<ObjectId>;

    /// Convert to a typed struct.
    fn to_struct<T: DeserializeOwned>(&self) -> RecordResult<T>;
}

impl DocumentExt for Document {
    fn get_str(&self, key: &str) -> RecordResult<&str> {
        self.get_str(key)
            .map_err(|_| RecordError::validation(format!("field '{}' is not a string", key)))
    }

    fn get_i32(&self, key: &str) -> RecordResult<i32> {
        self.get_i32(key)
            .map_err(|_| RecordError::validation(format!("field '{}' is not an i32", key)))
    }

    fn get_i64(&self, key: &str) -> RecordResult<i64> {
        self.get_i64(key)
            .map_err(|_| RecordError::validation(format!("field '{}' is not an i64", key)))
    }

    fn get_bool(&self, key: &str) -> RecordResult<bool> {
        self.get_bool(key)
            .map_err(|_| RecordError::validation(format!("field '{}' is not a bool", key)))
    }

    fn get_object_id(&self, key: &str) -> RecordResult<ObjectId> {
        self.get_object_id(key)
            .map_err(|_| RecordError::validation(format!("field '{}' is not an ObjectId", key)))
    }

    fn id(&self) -> RecordResult<ObjectId> {
        DocumentExt::get_object_id(self, "_id")
    }

    fn to_struct<T: DeserializeOwned>(&self) -> RecordResult<T> {
        bson::from_document(self.clone()).map_err(RecordError::from)
    }
}

/// Convert a struct to a BSON document.
pub fn to_document<T: Serialize>(value: &T) -> RecordResult<Document> {
    bson::to_document(value).map_err(RecordError::from)
}

/// Convert a BSON document to a struct.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> RecordResult<T> {
    bson::from_document(doc).map_err(RecordError::from)
}

/// Parse an ObjectId from a string.
pub fn parse_object_id(s: &str) -> RecordResult<ObjectId> {
    ObjectId::parse_str(s).map_err(RecordError::from)
}

/// Create a new ObjectId.
pub fn new_object_id() -> ObjectId {
    ObjectId::new()
}
