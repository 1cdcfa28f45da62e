//! RocksDB access: lazily opened handle, prefix/range scans, partition
//! counts, export and ingest.

mod config;
mod core;
mod dumper;
mod export;
mod kv;

pub use self::config::{EngineConfig, DEFAULT_MAX_OPEN_FILES};
pub use self::core::{Engine, Predicate};
pub use self::dumper::Dumper;
pub use self::export::{export_part, export_parts, export_path, EXPORT_BATCH_SIZE, EXPORT_KINDS};
pub use self::kv::{KVString, KV};
