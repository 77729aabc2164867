//! Error types for record operations.

use thiserror::Error;

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

// Server error codes that indicate a conflicting write (duplicate key).
const DUPLICATE_KEY_CODES: &[i32] = &[11000, 11001, 12582];

/// Errors that can occur while binding entities or talking to the store.
///
/// The kinds form a small closed set so callers can tell a conflicting
/// write from a transport failure without parsing message text. The
/// original driver message is always embedded.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection establishment failure.
    #[error("connection error: {0}")]
    Connection(String),

    /// Network, io, or server-selection failure during an operation.
    #[error("transport error: {0}")]
    Transport(String),

    /// Write conflict, typically a duplicate key.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Document not found.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Malformed filter, document, or operation rejected by the store.
    #[error("validation error: {0}")]
    Validation(String),

    /// BSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other failure reported by the store.
    #[error("store error: {0}")]
    Store(String),
}

impl RecordError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Check if this is a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<mongodb::error::Error> for RecordError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        let message = err.to_string();
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(we))
                if DUPLICATE_KEY_CODES.contains(&we.code) =>
            {
                Self::Conflict(message)
            }
            ErrorKind::BulkWrite(failure)
                if failure
                    .write_errors
                    .iter()
                    .flatten()
                    .any(|we| DUPLICATE_KEY_CODES.contains(&we.code)) =>
            {
                Self::Conflict(message)
            }
            ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => Self::Transport(message),
            ErrorKind::InvalidArgument { .. } => Self::Validation(message),
            // Server code 2 is BadValue: a filter or operation the server rejects.
            ErrorKind::Command(c) if c.code == 2 => Self::Validation(message),
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                Self::Serialization(message)
            }
            _ => Self::Store(message),
        }
    }
}

impl From<bson::ser::Error> for RecordError {
    fn from(err: bson::ser::Error) -> Self {
        RecordError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for RecordError {
    fn from(err: bson::de::Error) -> Self {
        RecordError::Serialization(err.to_string())
    }
}

impl From<bson::oid::Error> for RecordError {
    fn from(err: bson::oid::Error) -> Self {
        RecordError::Validation(err.to_string())
    }
}
