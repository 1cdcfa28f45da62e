//! Error types for nebula-dump.
//!
//! One enum covers every layer (codec, schema cache, storage engine, parsers)
//! so callers can match on the failure kind without downcasting. Decode errors
//! raised while walking a scan are wrapped in [`DumpError::Record`], which
//! carries the raw key/value bytes so a failure can be diagnosed without
//! re-running the scan.

use thiserror::Error;

/// Result type for nebula-dump operations.
pub type DumpResult<T> = Result<T, DumpError>;

/// Errors produced while inspecting a NebulaGraph data directory.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The raw key does not start with the literal marker of the record kind
    /// being decoded (e.g. a `__parts__` key handed to the space decoder).
    #[error("Key does not match record marker '{expected}': {key:?}")]
    KeyMismatch {
        /// Expected literal marker, e.g. `__spaces__`.
        expected: String,
        /// The offending key bytes.
        key: Vec<u8>,
    },

    /// Key or value is shorter than the declared layout requires, or a field
    /// holds an impossible value.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// A column or index field uses a property type the decoder cannot read.
    #[error("Unsupported property type: {0}")]
    UnsupportedType(String),

    /// No schema matches the (space, tag/edge, version) triple of a row.
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// Required [`DumpOptions`](crate::DumpOptions) fields are missing or
    /// inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// RocksDB failed to open the store or an iterator reported an error.
    #[error("Storage engine error at '{path}': {message}")]
    Engine {
        /// Path of the RocksDB directory.
        path: String,
        /// Underlying RocksDB message.
        message: String,
    },

    /// The metadata service call failed or answered with an error code.
    #[error("Meta RPC error: {0}")]
    Rpc(String),

    /// The caller cancelled the operation before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Reading or writing the persisted schema cache failed.
    #[error("Schema cache error at '{path}': {message}")]
    CacheIo {
        /// Path of the cache file.
        path: String,
        /// Underlying I/O or YAML message.
        message: String,
    },

    /// A decode error annotated with the record it happened on.
    #[error("Failed to decode {kind} record (key: {key:?}, value: {value:?}): {source}")]
    Record {
        /// Record kind name, e.g. `tags`.
        kind: String,
        /// Raw key bytes.
        key: Vec<u8>,
        /// Raw value bytes.
        value: Vec<u8>,
        /// The underlying failure.
        #[source]
        source: Box<DumpError>,
    },

    /// A background task failed to complete (panicked or was aborted).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DumpError {
    /// Create a malformed record error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an engine error for the store at `path`.
    pub fn engine(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Engine {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create an RPC error.
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Wrap `self` with the record it was raised on.
    pub fn in_record(self, kind: &str, key: &[u8], value: &[u8]) -> Self {
        Self::Record {
            kind: kind.to_string(),
            key: key.to_vec(),
            value: value.to_vec(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`DumpError::Record`] wrappers.
    pub fn root(&self) -> &DumpError {
        match self {
            Self::Record { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this is a key marker mismatch.
    pub fn is_key_mismatch(&self) -> bool {
        matches!(self.root(), Self::KeyMismatch { .. })
    }

    /// Check if the data itself is bad (as opposed to the environment).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self.root(),
            Self::KeyMismatch { .. }
                | Self::MalformedRecord(_)
                | Self::UnsupportedType(_)
                | Self::SchemaNotFound(_)
        )
    }

    /// Check if the caller cancelled the operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), Self::Cancelled)
    }
}

impl From<rocksdb::Error> for DumpError {
    fn from(e: rocksdb::Error) -> Self {
        Self::Engine {
            path: String::new(),
            message: e.into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_key_mismatch_message() {
        let error = DumpError::KeyMismatch {
            expected: "__spaces__".to_string(),
            key: b"__parts__".to_vec(),
        };
        let msg = error.to_string();
        assert!(msg.contains("__spaces__"));
        assert!(error.is_key_mismatch());
        assert!(error.is_malformed());
    }

    #[test]
    fn test_error_engine_message() {
        let error = DumpError::engine("/data/storage", "IO error: lock held");
        let msg = error.to_string();
        assert!(msg.contains("/data/storage"));
        assert!(msg.contains("lock held"));
        assert!(!error.is_malformed());
    }

    #[test]
    fn test_record_wrapper_keeps_root() {
        let error = DumpError::malformed("value too short").in_record("tags", &[1, 0], &[7]);
        let msg = error.to_string();
        assert!(msg.contains("tags"));
        assert!(msg.contains("[1, 0]"));
        assert!(msg.contains("value too short"));
        assert!(matches!(error.root(), DumpError::MalformedRecord(_)));
        assert!(error.is_malformed());
    }

    #[test]
    fn test_cancelled() {
        let error = DumpError::Cancelled.in_record("edges", &[], &[]);
        assert!(error.is_cancelled());
        assert!(!error.is_key_mismatch());
    }
}
