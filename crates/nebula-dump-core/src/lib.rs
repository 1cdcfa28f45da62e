//! nebula-dump core
//!
//! Decodes the on-disk RocksDB layout of a NebulaGraph cluster without going
//! through its query layer.
//!
//! # Architecture
//! - `codec`: fixed-width integers with explicit byte order, MurmurHash64A
//! - `partition`: partition routing and the per-partition key word
//! - `thrift`: schema entities and their compact/binary protocol codecs
//! - `schema`: schema sources (metadata RPC, persisted YAML cache, in-memory)
//! - `engine`: read-only RocksDB handle, scans, partition counts, export/ingest
//! - `keys`: scan prefix builders and key decoders per record kind
//! - `row`: row blob and index value decoding
//! - `parser`: per record kind `prefix()` / `parse()` / `parse_all()`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nebula_dump_core::{ByteOrder, DumpOptions, Engine, MetaKind, MetaParser};
//!
//! let engine = Arc::new(Engine::read_only("/data/meta/nebula/0/data"));
//! let opts = DumpOptions { space_id: 1, ..DumpOptions::default() };
//! let parser = MetaParser::new(MetaKind::Tags, engine, opts, ByteOrder::native());
//! for record in parser.parse_all().unwrap() {
//!     println!("{}", record);
//! }
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod keys;
pub mod parser;
pub mod partition;
pub mod row;
pub mod schema;
pub mod thrift;

pub use codec::ByteOrder;
pub use engine::{Dumper, Engine, EngineConfig, KVString, KV};
pub use error::{DumpError, DumpResult};
pub use keys::DumpOptions;
pub use parser::{MetaKind, MetaParser, StorageKind, StorageParser};
pub use partition::{get_partition_id, KeyType};
pub use schema::{
    FileSchemaCache, MetaClientConfig, MetaSchemaCache, SchemaCacheConfig, SchemaSnapshot,
    SchemaSource,
};
pub use crate::thrift::{ColumnDef, EdgeItem, IndexItem, PropertyType, Schema, SpaceItem, TagItem};
