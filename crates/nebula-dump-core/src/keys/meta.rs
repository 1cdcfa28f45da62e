//! Metadata service records.
//!
//! ```text
//! __spaces__   + space(4)                         -> compact SpaceDesc
//! __parts__    + space(4) + part(4)               -> version(4) + hosts
//! __tags__     + space(4) + tag(4)  + ver(8)      -> nameLen(4) + name + compact Schema
//! __edges__    + space(4) + edge(4) + ver(8)      -> nameLen(4) + name + compact Schema
//! __hosts__    + hostLen(8) + host + port(4)      -> dataVer(1) + hb ms(8) + role(4) + shaLen(8) + sha
//! __machines__ + hostLen(8) + host + port(4)      -> (empty)
//! __indexes__  + space(4) + index(4)              -> compact IndexItem
//! ```
//!
//! Integers use the host byte order. Schema versions are stored as
//! `i64::MAX - version` so the newest version sorts first.

use std::fmt;

use chrono::{TimeZone, Utc};

use super::DumpOptions;
use crate::codec::{int_to_bytes, ByteCursor, ByteOrder};
use crate::error::{DumpError, DumpResult};
use crate::thrift::{compact_deserialize, IndexItem, Schema, SpaceDesc};

pub const SPACES: &[u8] = b"__spaces__";
pub const PARTS: &[u8] = b"__parts__";
pub const TAGS: &[u8] = b"__tags__";
pub const EDGES: &[u8] = b"__edges__";
pub const HOSTS: &[u8] = b"__hosts__";
pub const MACHINES: &[u8] = b"__machines__";
pub const INDEXES: &[u8] = b"__indexes__";

/// Host value layout version understood by [`decode_host_value`].
pub const HOST_DATA_VERSION: u8 = 2;

/// Strip `marker` from the front of `key`.
///
/// # Errors
///
/// * `DumpError::KeyMismatch` - the key does not start with `marker`
pub fn strip_marker<'a>(key: &'a [u8], marker: &[u8]) -> DumpResult<&'a [u8]> {
    key.strip_prefix(marker).ok_or_else(|| DumpError::KeyMismatch {
        expected: String::from_utf8_lossy(marker).to_string(),
        key: key.to_vec(),
    })
}

/// Stored form of a schema version, and back. The mapping is its own
/// inverse.
pub fn invert_version(version: i64) -> i64 {
    i64::MAX - version
}

// ===== Prefixes =====

/// `marker [+ space [+ id]]`, stopping at the first unset field.
fn scoped_prefix(marker: &[u8], space_id: i32, sub_id: Option<i32>, order: ByteOrder) -> Vec<u8> {
    let mut prefix = marker.to_vec();
    if space_id != -1 {
        prefix.extend_from_slice(&int_to_bytes(space_id, order));
        if let Some(id) = sub_id {
            prefix.extend_from_slice(&int_to_bytes(id, order));
        }
    }
    prefix
}

fn set(id: i32, unset: i32) -> Option<i32> {
    (id != unset).then_some(id)
}

pub fn space_prefix(opts: &DumpOptions, order: ByteOrder) -> Vec<u8> {
    scoped_prefix(SPACES, opts.space_id, None, order)
}

pub fn part_prefix(opts: &DumpOptions, order: ByteOrder) -> Vec<u8> {
    scoped_prefix(PARTS, opts.space_id, set(opts.part_id, -1), order)
}

pub fn tag_prefix(opts: &DumpOptions, order: ByteOrder) -> Vec<u8> {
    scoped_prefix(TAGS, opts.space_id, set(opts.tag_id, -1), order)
}

pub fn edge_prefix(opts: &DumpOptions, order: ByteOrder) -> Vec<u8> {
    scoped_prefix(EDGES, opts.space_id, set(opts.edge_id, 0), order)
}

pub fn index_prefix(opts: &DumpOptions, order: ByteOrder) -> Vec<u8> {
    scoped_prefix(INDEXES, opts.space_id, set(opts.index_id, -1), order)
}

// ===== Keys =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceKey {
    pub space_id: i32,
}

impl SpaceKey {
    pub fn decode(key: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(strip_marker(key, SPACES)?, "space key");
        Ok(Self {
            space_id: c.read(order)?,
        })
    }
}

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space: {}", self.space_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartKey {
    pub space_id: i32,
    pub part_id: i32,
}

impl PartKey {
    pub fn decode(key: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(strip_marker(key, PARTS)?, "part key");
        Ok(Self {
            space_id: c.read(order)?,
            part_id: c.read(order)?,
        })
    }
}

impl fmt::Display for PartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space:{}, part:{}", self.space_id, self.part_id)
    }
}

/// Tag or edge schema definitions share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    Tag,
    Edge,
}

impl SchemaKind {
    pub fn marker(self) -> &'static [u8] {
        match self {
            SchemaKind::Tag => TAGS,
            SchemaKind::Edge => EDGES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SchemaKind::Tag => "tag",
            SchemaKind::Edge => "edge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaKey {
    pub kind: SchemaKind,
    pub space_id: i32,
    /// Tag id or edge type.
    pub id: i32,
    /// Logical version, already un-inverted.
    pub version: i64,
}

impl SchemaKey {
    pub fn decode(kind: SchemaKind, key: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(strip_marker(key, kind.marker())?, "schema key");
        let space_id = c.read(order)?;
        let id = c.read(order)?;
        let stored: i64 = c.read(order)?;
        Ok(Self {
            kind,
            space_id,
            id,
            version: invert_version(stored),
        })
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "space:{}, {}:{}, version:{}",
            self.space_id,
            self.kind.label(),
            self.id,
            self.version
        )
    }
}

/// Key of a `__hosts__` or `__machines__` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKey {
    pub host: String,
    pub port: i32,
}

impl HostKey {
    pub fn decode(marker: &[u8], key: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(strip_marker(key, marker)?, "host key");
        let len: i64 = c.read(order)?;
        let len = usize::try_from(len)
            .map_err(|_| DumpError::malformed(format!("negative host length {}", len)))?;
        let host = String::from_utf8_lossy(c.take(len)?).to_string();
        let port = c.read(order)?;
        Ok(Self { host, port })
    }
}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host:{}, port:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexKey {
    pub space_id: i32,
    pub index_id: i32,
}

impl IndexKey {
    pub fn decode(key: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(strip_marker(key, INDEXES)?, "index key");
        Ok(Self {
            space_id: c.read(order)?,
            index_id: c.read(order)?,
        })
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space:{}, index:{}", self.space_id, self.index_id)
    }
}

// ===== Values =====

/// Render a space descriptor.
pub fn render_space(desc: &SpaceDesc) -> String {
    format!(
        "name:{}, partition_num:{}, replica_factor:{}, vid_type:{}({})",
        String::from_utf8_lossy(&desc.space_name),
        desc.partition_num,
        desc.replica_factor,
        desc.vid_type.type_,
        desc.vid_type.type_length
    )
}

pub fn decode_space_value(value: &[u8]) -> DumpResult<SpaceDesc> {
    compact_deserialize(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartValue {
    pub version: i32,
    /// Comma separated `host:port` list as stored.
    pub hosts: String,
}

impl PartValue {
    pub fn decode(value: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(value, "part value");
        let version = c.read(order)?;
        let hosts = String::from_utf8_lossy(c.rest()).to_string();
        Ok(Self { version, hosts })
    }
}

impl fmt::Display for PartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version:{}, hosts are {}", self.version, self.hosts)
    }
}

/// Value of a tag or edge schema record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValue {
    pub name: String,
    pub schema: Schema,
}

impl SchemaValue {
    pub fn decode(value: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(value, "schema value");
        let len: i32 = c.read(order)?;
        let len = usize::try_from(len)
            .map_err(|_| DumpError::malformed(format!("negative schema name length {}", len)))?;
        let name = String::from_utf8_lossy(c.take(len)?).to_string();
        let schema = compact_deserialize(c.rest())?;
        Ok(Self { name, schema })
    }
}

impl fmt::Display for SchemaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name:{}, columns:{}",
            self.name,
            self.schema.column_names().join(",")
        )
    }
}

/// Heartbeat record of a cluster host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostValue {
    pub last_heartbeat_ms: i64,
    pub role: i32,
    pub git_sha: String,
}

impl HostValue {
    /// # Errors
    ///
    /// * `DumpError::MalformedRecord` - the data version byte is not
    ///   [`HOST_DATA_VERSION`] or the value is truncated
    pub fn decode(value: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(value, "host value");
        let data_version: u8 = c.read(order)?;
        if data_version != HOST_DATA_VERSION {
            return Err(DumpError::malformed(format!(
                "host data version is {}, expected {}",
                data_version, HOST_DATA_VERSION
            )));
        }
        let last_heartbeat_ms = c.read(order)?;
        let role = c.read(order)?;
        let sha_len: i64 = c.read(order)?;
        let sha_len = usize::try_from(sha_len)
            .map_err(|_| DumpError::malformed(format!("negative sha length {}", sha_len)))?;
        let git_sha = String::from_utf8_lossy(c.take(sha_len)?).to_string();
        Ok(Self {
            last_heartbeat_ms,
            role,
            git_sha,
        })
    }

    /// Heartbeat time as `YYYY-MM-DDTHH:MM:SS.mmmZ` (UTC).
    pub fn heartbeat_time(&self) -> String {
        match Utc.timestamp_millis_opt(self.last_heartbeat_ms).single() {
            Some(t) => t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            None => self.last_heartbeat_ms.to_string(),
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time:{}, role:{}, sha: {}",
            self.heartbeat_time(),
            self.role,
            self.git_sha
        )
    }
}

pub fn decode_index_value(value: &[u8]) -> DumpResult<IndexItem> {
    compact_deserialize(value)
}

/// Render an index definition.
pub fn render_index(index: &IndexItem) -> String {
    format!(
        "name:{}, fields:{}",
        String::from_utf8_lossy(&index.index_name),
        index.field_names().join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LE: ByteOrder = ByteOrder::Little;

    #[test]
    fn test_prefix_truncates_at_first_unset_field() {
        let opts = DumpOptions::default();
        assert_eq!(tag_prefix(&opts, LE), TAGS.to_vec());

        // Tag id without a space does not narrow the scan.
        let opts = DumpOptions {
            tag_id: 5,
            ..DumpOptions::default()
        };
        assert_eq!(tag_prefix(&opts, LE), TAGS.to_vec());

        let opts = DumpOptions {
            space_id: 1,
            tag_id: 5,
            ..DumpOptions::default()
        };
        let mut expected = TAGS.to_vec();
        expected.extend_from_slice(&[1, 0, 0, 0, 5, 0, 0, 0]);
        assert_eq!(tag_prefix(&opts, LE), expected);
    }

    #[test]
    fn test_edge_prefix_uses_zero_as_unset() {
        let opts = DumpOptions {
            space_id: 1,
            ..DumpOptions::default()
        };
        assert_eq!(edge_prefix(&opts, LE).len(), EDGES.len() + 4);
        let opts = DumpOptions {
            space_id: 1,
            edge_id: -3,
            ..DumpOptions::default()
        };
        assert_eq!(edge_prefix(&opts, LE).len(), EDGES.len() + 8);
    }

    #[test]
    fn test_marker_mismatch() {
        let err = SpaceKey::decode(b"__parts__\x01\x00\x00\x00", LE).unwrap_err();
        assert!(err.is_key_mismatch());
        // Shorter than the marker.
        let err = PartKey::decode(b"__pa", LE).unwrap_err();
        assert!(err.is_key_mismatch());
    }

    #[test]
    fn test_truncated_key_is_malformed() {
        let err = PartKey::decode(b"__parts__\x01\x00\x00\x00\x01", LE).unwrap_err();
        assert!(matches!(err, DumpError::MalformedRecord(_)));
    }

    #[test]
    fn test_host_round_trip() {
        let mut key = HOSTS.to_vec();
        key.extend_from_slice(&9i64.to_le_bytes());
        key.extend_from_slice(b"storaged0");
        key.extend_from_slice(&9779i32.to_le_bytes());
        let host = HostKey::decode(HOSTS, &key, LE).unwrap();
        assert_eq!(host.to_string(), "host:storaged0, port:9779");

        let mut value = vec![HOST_DATA_VERSION];
        value.extend_from_slice(&1_650_000_000_123i64.to_le_bytes());
        value.extend_from_slice(&2i32.to_le_bytes());
        value.extend_from_slice(&3i64.to_le_bytes());
        value.extend_from_slice(b"abc");
        let v = HostValue::decode(&value, LE).unwrap();
        assert_eq!(
            v.to_string(),
            "time:2022-04-15T05:20:00.123Z, role:2, sha: abc"
        );

        value[0] = 1;
        assert!(HostValue::decode(&value, LE).unwrap_err().is_malformed());
    }

    #[test]
    fn test_version_inversion() {
        assert_eq!(invert_version(i64::MAX), 0);
        assert_eq!(invert_version(invert_version(7)), 7);
    }
}
