use std::sync::Arc;

use tracing::debug;

use super::{parse_each, MetaKind};
use crate::codec::ByteOrder;
use crate::engine::{Engine, KVString, KV};
use crate::error::DumpResult;
use crate::keys::meta::{
    decode_index_value, decode_space_value, edge_prefix, index_prefix, part_prefix,
    render_index, render_space, space_prefix, tag_prefix, HostKey, HostValue, IndexKey,
    PartKey, PartValue, SchemaKey, SchemaKind, SchemaValue, SpaceKey, HOSTS, MACHINES,
};
use crate::keys::DumpOptions;

/// Scans and decodes one kind of metadata record. Needs no schema.
pub struct MetaParser {
    kind: MetaKind,
    engine: Arc<Engine>,
    opts: DumpOptions,
    order: ByteOrder,
}

impl MetaParser {
    pub fn new(kind: MetaKind, engine: Arc<Engine>, opts: DumpOptions, order: ByteOrder) -> Self {
        Self {
            kind,
            engine,
            opts,
            order,
        }
    }

    pub fn kind(&self) -> MetaKind {
        self.kind
    }

    /// The scan prefix for the current options.
    pub fn scan_prefix(&self) -> Vec<u8> {
        let (opts, order) = (&self.opts, self.order);
        match self.kind {
            MetaKind::Spaces => space_prefix(opts, order),
            MetaKind::Parts => part_prefix(opts, order),
            MetaKind::Tags => tag_prefix(opts, order),
            MetaKind::Edges => edge_prefix(opts, order),
            MetaKind::Hosts => HOSTS.to_vec(),
            MetaKind::Machines => MACHINES.to_vec(),
            MetaKind::Indexes => index_prefix(opts, order),
        }
    }

    /// Raw records, at most `opts.limit`.
    pub fn prefix(&self) -> DumpResult<Vec<KV>> {
        let prefix = self.scan_prefix();
        debug!(kind = %self.kind, prefix = ?prefix, "meta prefix scan");
        self.engine.prefix(&prefix, self.opts.limit)
    }

    /// Decode one record.
    ///
    /// # Errors
    ///
    /// * `DumpError::KeyMismatch` - the key belongs to another record kind
    /// * `DumpError::MalformedRecord` - truncated key or value
    pub fn parse(&self, kv: &KV) -> DumpResult<KVString> {
        let order = self.order;
        let out = match self.kind {
            MetaKind::Spaces => KVString::new(
                SpaceKey::decode(&kv.key, order)?.to_string(),
                render_space(&decode_space_value(&kv.value)?),
            ),
            MetaKind::Parts => KVString::new(
                PartKey::decode(&kv.key, order)?.to_string(),
                PartValue::decode(&kv.value, order)?.to_string(),
            ),
            MetaKind::Tags => self.parse_schema(SchemaKind::Tag, kv)?,
            MetaKind::Edges => self.parse_schema(SchemaKind::Edge, kv)?,
            MetaKind::Hosts => KVString::new(
                HostKey::decode(HOSTS, &kv.key, order)?.to_string(),
                HostValue::decode(&kv.value, order)?.to_string(),
            ),
            MetaKind::Machines => {
                KVString::new(HostKey::decode(MACHINES, &kv.key, order)?.to_string(), "")
            }
            MetaKind::Indexes => KVString::new(
                IndexKey::decode(&kv.key, order)?.to_string(),
                render_index(&decode_index_value(&kv.value)?),
            ),
        };
        Ok(out)
    }

    fn parse_schema(&self, kind: SchemaKind, kv: &KV) -> DumpResult<KVString> {
        Ok(KVString::new(
            SchemaKey::decode(kind, &kv.key, self.order)?.to_string(),
            SchemaValue::decode(&kv.value, self.order)?.to_string(),
        ))
    }

    /// [`prefix`](Self::prefix) then [`parse`](Self::parse) on every record.
    pub fn parse_all(&self) -> DumpResult<Vec<KVString>> {
        let kvs = self.prefix()?;
        parse_each(self.kind.name(), &kvs, |kv| self.parse(kv))
    }
}
