use std::sync::Arc;

use tracing::debug;

use super::{parse_each, StorageKind};
use crate::codec::ByteOrder;
use crate::engine::{Engine, KVString, KV};
use crate::error::{DumpError, DumpResult};
use crate::keys::storage::{edge_scan, index_scan, tag_scan, EdgeKey, IndexKey, ScanPlan, TagKey};
use crate::keys::{decode_vid, DumpOptions};
use crate::row::{decode_index_values, decode_row, RowHeader, Value, INDEX_NULL};
use crate::schema::SchemaSource;
use crate::thrift::{IndexItem, SpaceItem};

/// Scans and decodes one kind of storage record against a schema source.
pub struct StorageParser {
    kind: StorageKind,
    engine: Arc<Engine>,
    opts: DumpOptions,
    schema: Arc<dyn SchemaSource>,
    order: ByteOrder,
}

impl StorageParser {
    pub fn new(
        kind: StorageKind,
        engine: Arc<Engine>,
        opts: DumpOptions,
        schema: Arc<dyn SchemaSource>,
        order: ByteOrder,
    ) -> Self {
        Self {
            kind,
            engine,
            opts,
            schema,
            order,
        }
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Validate the options, refresh the schema source and build the scan.
    ///
    /// # Errors
    ///
    /// * `DumpError::Configuration` - missing space, meta address, part/vid
    ///   or index id, or the space is not in the schema
    /// * `DumpError::SchemaNotFound` - the index is not defined in the space
    /// * `DumpError::Rpc` / `DumpError::CacheIo` - the schema refresh failed
    pub fn plan(&self) -> DumpResult<ScanPlan> {
        self.opts.verify_storage()?;
        if self.kind == StorageKind::Indexes && self.opts.index_id == -1 {
            return Err(DumpError::config("must provide a valid index id"));
        }
        self.schema.update()?;
        let space = self.schema.require_space(self.opts.space_id)?;

        match self.kind {
            StorageKind::Tags => tag_scan(&self.opts, &space, self.order),
            StorageKind::Edges => edge_scan(&self.opts, &space, self.order),
            StorageKind::Indexes => {
                let index = self.require_index(self.opts.index_id)?;
                index_scan(&self.opts, &space, &index, self.order)
            }
        }
    }

    /// Raw records, at most `opts.limit`, after key filtering.
    pub fn prefix(&self) -> DumpResult<Vec<KV>> {
        let plan = self.plan()?;
        debug!(kind = %self.kind, prefix = ?plan.prefix, filter = ?plan.filter, "storage prefix scan");
        match &plan.filter {
            Some(filter) => {
                let key_filter = |key: &[u8]| filter.matches(key);
                self.engine
                    .prefix_with_condition(&plan.prefix, self.opts.limit, Some(&key_filter), None)
            }
            None => self.engine.prefix(&plan.prefix, self.opts.limit),
        }
    }

    /// Decode one record.
    ///
    /// # Errors
    ///
    /// * `DumpError::MalformedRecord` - truncated key or value
    /// * `DumpError::SchemaNotFound` - no schema for the row version or index
    /// * `DumpError::UnsupportedType` - a column type cannot be decoded
    pub fn parse(&self, kv: &KV) -> DumpResult<KVString> {
        let space = self.schema.require_space(self.opts.space_id)?;
        self.parse_in(&space, kv)
    }

    /// [`prefix`](Self::prefix) then [`parse`](Self::parse) on every record.
    pub fn parse_all(&self) -> DumpResult<Vec<KVString>> {
        let kvs = self.prefix()?;
        let space = self.schema.require_space(self.opts.space_id)?;
        parse_each(self.kind.name(), &kvs, |kv| self.parse_in(&space, kv))
    }

    fn parse_in(&self, space: &SpaceItem, kv: &KV) -> DumpResult<KVString> {
        match self.kind {
            StorageKind::Tags => self.parse_tag(space, kv),
            StorageKind::Edges => self.parse_edge(space, kv),
            StorageKind::Indexes => self.parse_index(space, kv),
        }
    }

    fn parse_tag(&self, space: &SpaceItem, kv: &KV) -> DumpResult<KVString> {
        let key = TagKey::decode(&kv.key, space.vid_len(), self.order)?;
        let header = RowHeader::parse(&kv.value, self.order)?;
        let schema = self
            .schema
            .tag_schema(space.space_id, key.tag_id, header.version)
            .ok_or_else(|| {
                DumpError::SchemaNotFound(format!(
                    "space {}, tag {}, version {}",
                    space.space_id, key.tag_id, header.version
                ))
            })?;
        let row = decode_row(&kv.value, &schema, header, self.order)?;
        Ok(KVString::new(key.render(space, self.order), row.to_string()))
    }

    fn parse_edge(&self, space: &SpaceItem, kv: &KV) -> DumpResult<KVString> {
        let key = EdgeKey::decode(&kv.key, space.vid_len(), self.order)?;
        let header = RowHeader::parse(&kv.value, self.order)?;
        let edge_type = key.edge_type.wrapping_abs();
        let schema = self
            .schema
            .edge_schema(space.space_id, edge_type, header.version)
            .ok_or_else(|| {
                DumpError::SchemaNotFound(format!(
                    "space {}, edge {}, version {}",
                    space.space_id, edge_type, header.version
                ))
            })?;
        let row = decode_row(&kv.value, &schema, header, self.order)?;
        Ok(KVString::new(key.render(space, self.order), row.to_string()))
    }

    fn parse_index(&self, space: &SpaceItem, kv: &KV) -> DumpResult<KVString> {
        let key = IndexKey::decode(&kv.key, space.vid_len(), self.order)?;
        let index = self.require_index(key.index_id)?;
        let fields: Vec<String> = decode_index_values(&key.values, &index, self.order)?
            .into_iter()
            .map(|(name, value)| match value {
                Value::Null => format!("{}:{}", name, INDEX_NULL),
                value => format!("{}:{}", name, value),
            })
            .collect();
        let rendered = format!(
            "part:{}, index:{}, {}, vid:{}",
            key.part_id,
            key.index_id,
            fields.join(","),
            decode_vid(&key.vid, space, self.order)
        );
        Ok(KVString::new(rendered, ""))
    }

    fn require_index(&self, index_id: i32) -> DumpResult<IndexItem> {
        self.schema
            .index(self.opts.space_id, index_id)
            .ok_or_else(|| {
                DumpError::SchemaNotFound(format!(
                    "space {}, index {}",
                    self.opts.space_id, index_id
                ))
            })
    }
}
