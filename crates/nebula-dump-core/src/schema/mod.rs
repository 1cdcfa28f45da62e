//! Schema sources: where space, tag, edge and index definitions come from.
//!
//! Decoders depend only on the [`SchemaSource`] trait. Three implementations
//! exist:
//!
//! - [`MetaSchemaCache`]: fetched from the metadata service over RPC and
//!   persisted to `<home>/.meta_cache/<address>/cache.yaml`
//! - [`FileSchemaCache`]: loaded from that file only, no network
//! - [`SchemaSnapshot`]: plain in-memory maps, also the state both caches
//!   hold behind their lock
//!
//! Lookups for unknown spaces return `None` or an empty list. They never
//! fail.

mod cache_file;
mod client;
mod file_cache;
mod meta_cache;

use std::collections::HashMap;

pub use cache_file::{CacheData, SchemaCacheConfig, CACHE_DIR_NAME, CACHE_FILE_NAME};
pub use client::{MetaClient, MetaClientConfig, DEFAULT_META_TIMEOUT, E_LEADER_CHANGED};
pub use file_cache::FileSchemaCache;
pub use meta_cache::MetaSchemaCache;

use crate::error::{DumpError, DumpResult};
use crate::thrift::{EdgeItem, IndexItem, Schema, SpaceItem, TagItem};

/// Read access to cluster schema definitions.
pub trait SchemaSource: Send + Sync {
    /// Refresh from the backing store. A no-op for static sources.
    fn update(&self) -> DumpResult<()>;

    /// Ids of all known spaces, ascending.
    fn list_spaces(&self) -> Vec<i32>;

    fn space(&self, space_id: i32) -> Option<SpaceItem>;

    /// Every known version of every tag in the space.
    fn tags(&self, space_id: i32) -> Vec<TagItem>;

    /// Every known version of every edge type in the space.
    fn edges(&self, space_id: i32) -> Vec<EdgeItem>;

    /// Tag and edge indexes of the space.
    fn indexes(&self, space_id: i32) -> Vec<IndexItem>;

    /// The space, or a configuration error naming it.
    fn require_space(&self, space_id: i32) -> DumpResult<SpaceItem> {
        self.space(space_id)
            .ok_or_else(|| DumpError::config(format!("space {} not found in schema", space_id)))
    }

    /// Schema of `tag_id` at exactly `version`.
    fn tag_schema(&self, space_id: i32, tag_id: i32, version: i64) -> Option<Schema> {
        self.tags(space_id)
            .into_iter()
            .find(|t| t.tag_id == tag_id && t.version == version)
            .map(|t| t.schema)
    }

    /// Schema of `edge_type` (positive) at exactly `version`.
    fn edge_schema(&self, space_id: i32, edge_type: i32, version: i64) -> Option<Schema> {
        self.edges(space_id)
            .into_iter()
            .find(|e| e.edge_type == edge_type && e.version == version)
            .map(|e| e.schema)
    }

    fn index(&self, space_id: i32, index_id: i32) -> Option<IndexItem> {
        self.indexes(space_id)
            .into_iter()
            .find(|i| i.index_id == index_id)
    }
}

/// In-memory schema maps keyed by space id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSnapshot {
    spaces: HashMap<i32, SpaceItem>,
    tags: HashMap<i32, Vec<TagItem>>,
    edges: HashMap<i32, Vec<EdgeItem>>,
    indexes: HashMap<i32, Vec<IndexItem>>,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn insert_space(&mut self, space: SpaceItem) {
        self.spaces.insert(space.space_id, space);
    }

    pub fn insert_tag(&mut self, space_id: i32, tag: TagItem) {
        self.tags.entry(space_id).or_default().push(tag);
    }

    pub fn insert_edge(&mut self, space_id: i32, edge: EdgeItem) {
        self.edges.entry(space_id).or_default().push(edge);
    }

    pub fn insert_index(&mut self, space_id: i32, index: IndexItem) {
        self.indexes.entry(space_id).or_default().push(index);
    }

    pub fn with_space(mut self, space: SpaceItem) -> Self {
        self.insert_space(space);
        self
    }

    pub fn with_tag(mut self, space_id: i32, tag: TagItem) -> Self {
        self.insert_tag(space_id, tag);
        self
    }

    pub fn with_edge(mut self, space_id: i32, edge: EdgeItem) -> Self {
        self.insert_edge(space_id, edge);
        self
    }

    pub fn with_index(mut self, space_id: i32, index: IndexItem) -> Self {
        self.insert_index(space_id, index);
        self
    }
}

impl SchemaSource for SchemaSnapshot {
    fn update(&self) -> DumpResult<()> {
        Ok(())
    }

    fn list_spaces(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.spaces.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn space(&self, space_id: i32) -> Option<SpaceItem> {
        self.spaces.get(&space_id).cloned()
    }

    fn tags(&self, space_id: i32) -> Vec<TagItem> {
        self.tags.get(&space_id).cloned().unwrap_or_default()
    }

    fn edges(&self, space_id: i32) -> Vec<EdgeItem> {
        self.edges.get(&space_id).cloned().unwrap_or_default()
    }

    fn indexes(&self, space_id: i32) -> Vec<IndexItem> {
        self.indexes.get(&space_id).cloned().unwrap_or_default()
    }
}
