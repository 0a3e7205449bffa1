use thiserror::Error;

use crate::store::Collection;

/// Convenience alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The crate-wide error taxonomy
///
/// Store-level failures propagate through the repository unchanged; no
/// layer retries. Absence is an error only where an operation demands
/// presence (chat rewind and streaming targets); plain updates and
/// deletes of unknown ids are upserts and no-ops respectively.
#[derive(Error, Debug)]
pub enum Error {
    /// A data operation was issued before `LocalStore::open` succeeded
    #[error("store has not been opened yet")]
    NotReady,

    /// An `add` collided with an id already present in the collection
    #[error("record {id} already exists in {collection}")]
    DuplicateKey { collection: Collection, id: String },

    /// The storage engine rejected the operation
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),

    /// A stored payload no longer decodes as its entity type
    #[error("corrupt record {id} in {collection}: {source}")]
    Corrupt {
        collection: Collection,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// An entity failed to encode to its JSON payload form
    #[error("failed to encode record payload: {0}")]
    Codec(#[source] serde_json::Error),

    /// A lookup that requires an existing record found none
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// A CSV or JSON import payload failed to parse or lacks required fields
    #[error("malformed import: {0}")]
    MalformedImport(String),
}

/// Failures raised by the storage layer itself
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("migration error: {0}")]
    Migration(String),
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Storage(StorageError::Database(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Storage(StorageError::Pool(err))
    }
}

impl Error {
    /// Builds a `NotFound` error for the given record kind and id
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Builds a `MalformedImport` error from any displayable reason
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedImport(reason.into())
    }
}
