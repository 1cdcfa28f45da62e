//! Storage daemon records.
//!
//! ```text
//! tag   : word(4) + vid(L) + tag(4)
//! edge  : word(4) + src(L) + edgeType(4) + rank(8, BE, sign flipped) + dst(L) + reserved(1)
//! index : word(4) + index(4) + field values + [nullable bitmap(2)] + vid(L)
//! ```
//!
//! `word` is `(part << 8) | kind` in the host byte order and `L` is the
//! space's vid length. A negative edge type is the reverse copy of an edge,
//! stored under its destination vertex.

use tracing::trace;

use super::{encode_vid, DumpOptions};
use crate::codec::{bytes_to_int, int_to_bytes, slice, ByteCursor, ByteOrder};
use crate::error::{DumpError, DumpResult};
use crate::partition::{get_partition_id, part_prefix, KeyType};
use crate::row::index_key_width;
use crate::thrift::{IndexItem, SpaceItem};

const WORD: usize = 4;
const RANK_SIGN: u64 = 1 << 63;

/// Encode an edge rank: big-endian with the sign bit flipped.
pub fn encode_rank(rank: i64) -> [u8; 8] {
    ((rank as u64) ^ RANK_SIGN).to_be_bytes()
}

pub fn decode_rank(bytes: &[u8]) -> i64 {
    (bytes_to_int::<u64>(bytes, ByteOrder::Big) ^ RANK_SIGN) as i64
}

fn decode_part(word: i32) -> i32 {
    word >> 8
}

// ===== Keys =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagKey {
    pub part_id: i32,
    pub vid: Vec<u8>,
    pub tag_id: i32,
}

impl TagKey {
    pub fn decode(key: &[u8], vid_len: usize, order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(key, "tag key");
        let word: i32 = c.read(order)?;
        let vid = c.take(vid_len)?.to_vec();
        let tag_id = c.read(order)?;
        Ok(Self {
            part_id: decode_part(word),
            vid,
            tag_id,
        })
    }

    pub fn encode(&self, order: ByteOrder) -> Vec<u8> {
        let mut key = part_prefix(self.part_id, KeyType::Tag, order);
        key.extend_from_slice(&self.vid);
        key.extend_from_slice(&int_to_bytes(self.tag_id, order));
        key
    }

    pub fn render(&self, space: &SpaceItem, order: ByteOrder) -> String {
        format!(
            "part:{}, vid:{}, tag:{}",
            self.part_id,
            super::decode_vid(&self.vid, space, order),
            self.tag_id
        )
    }
}

/// An edge key as stored. `src`/`dst` are the stored order; for reverse
/// edges (`edge_type < 0`) the logical source is `dst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeKey {
    pub part_id: i32,
    pub src: Vec<u8>,
    pub edge_type: i32,
    pub rank: i64,
    pub dst: Vec<u8>,
}

impl EdgeKey {
    pub fn decode(key: &[u8], vid_len: usize, order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(key, "edge key");
        let word: i32 = c.read(order)?;
        let src = c.take(vid_len)?.to_vec();
        let edge_type = c.read(order)?;
        let rank = decode_rank(c.take(8)?);
        let dst = c.take(vid_len)?.to_vec();
        // Reserved trailing byte.
        c.take(1)?;
        Ok(Self {
            part_id: decode_part(word),
            src,
            edge_type,
            rank,
            dst,
        })
    }

    pub fn encode(&self, order: ByteOrder) -> Vec<u8> {
        let mut key = part_prefix(self.part_id, KeyType::Edge, order);
        key.extend_from_slice(&self.src);
        key.extend_from_slice(&int_to_bytes(self.edge_type, order));
        key.extend_from_slice(&encode_rank(self.rank));
        key.extend_from_slice(&self.dst);
        key.push(0);
        key
    }

    pub fn is_reverse(&self) -> bool {
        self.edge_type < 0
    }

    /// `(src, dst)` in edge direction.
    pub fn logical_ends(&self) -> (&[u8], &[u8]) {
        if self.is_reverse() {
            (&self.dst, &self.src)
        } else {
            (&self.src, &self.dst)
        }
    }

    pub fn render(&self, space: &SpaceItem, order: ByteOrder) -> String {
        let (src, dst) = self.logical_ends();
        format!(
            "part:{}, src:{}, edge:{}, dst:{}, rank:{}",
            self.part_id,
            super::decode_vid(src, space, order),
            self.edge_type,
            super::decode_vid(dst, space, order),
            self.rank
        )
    }
}

/// An index key split into its regions. `values` still holds the nullable
/// bitmap when the index has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub part_id: i32,
    pub index_id: i32,
    pub values: Vec<u8>,
    pub vid: Vec<u8>,
}

impl IndexKey {
    pub fn decode(key: &[u8], vid_len: usize, order: ByteOrder) -> DumpResult<Self> {
        let mut c = ByteCursor::new(key, "index key");
        let word: i32 = c.read(order)?;
        let index_id = c.read(order)?;
        let values_len = c.remaining().checked_sub(vid_len).ok_or_else(|| {
            DumpError::malformed(format!(
                "index key too short for a {} byte vid: {} bytes",
                vid_len,
                key.len()
            ))
        })?;
        let values = c.take(values_len)?.to_vec();
        let vid = c.rest().to_vec();
        Ok(Self {
            part_id: decode_part(word),
            index_id,
            values,
            vid,
        })
    }

    pub fn encode(&self, order: ByteOrder) -> Vec<u8> {
        let mut key = part_prefix(self.part_id, KeyType::Index, order);
        key.extend_from_slice(&int_to_bytes(self.index_id, order));
        key.extend_from_slice(&self.values);
        key.extend_from_slice(&self.vid);
        key
    }
}

// ===== Scan plans =====

/// Key predicate applied during a storage prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    /// Tag keys whose trailing tag id equals these bytes.
    TagId(Vec<u8>),
    /// Edge keys with this exact edge type and/or far end vid.
    Edge {
        vid_len: usize,
        edge: Option<Vec<u8>>,
        right: Option<Vec<u8>>,
    },
    /// Edge keys whose edge type sign matches the scan direction.
    Direction {
        vid_len: usize,
        forward: bool,
        order: ByteOrder,
    },
    /// Index keys whose trailing vid equals these bytes.
    IndexVid { offset: usize, vid: Vec<u8> },
}

impl KeyFilter {
    /// Whether `key` passes. Keys too short for the layout never pass.
    pub fn matches(&self, key: &[u8]) -> bool {
        let pass = match self {
            KeyFilter::TagId(tag) => key.ends_with(tag),
            KeyFilter::Edge {
                vid_len,
                edge,
                right,
            } => {
                let edge_ok = edge.as_ref().map_or(true, |e| {
                    slice(key, WORD + vid_len, 4, "edge type").is_ok_and(|b| b == e.as_slice())
                });
                let right_ok = right.as_ref().map_or(true, |r| {
                    key.len()
                        .checked_sub(1 + vid_len)
                        .and_then(|start| key.get(start..key.len() - 1))
                        .is_some_and(|b| b == r.as_slice())
                });
                edge_ok && right_ok
            }
            KeyFilter::Direction {
                vid_len,
                forward,
                order,
            } => match slice(key, WORD + vid_len, 4, "edge type") {
                Ok(b) => {
                    let edge: i32 = bytes_to_int(b, *order);
                    if *forward {
                        edge >= 0
                    } else {
                        edge <= 0
                    }
                }
                Err(_) => false,
            },
            KeyFilter::IndexVid { offset, vid } => key.get(*offset..) == Some(vid.as_slice()),
        };
        if !pass {
            trace!(key = ?key, filter = ?self, "key filtered out");
        }
        pass
    }
}

/// Prefix and optional key predicate for one storage scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub prefix: Vec<u8>,
    pub filter: Option<KeyFilter>,
}

fn route(vid: &[u8], space: &SpaceItem, order: ByteOrder) -> DumpResult<i32> {
    get_partition_id(vid, space.partition_num(), space.vid_len(), order)
}

/// Tag scan: `word(part) [+ vid]`, optionally filtered by tag id.
///
/// The partition comes from the vid when one is given, else from
/// `opts.part_id`.
///
/// # Errors
///
/// * `DumpError::Configuration` - neither part nor vid is set, or the vid
///   does not fit the space
pub fn tag_scan(opts: &DumpOptions, space: &SpaceItem, order: ByteOrder) -> DumpResult<ScanPlan> {
    if opts.part_id == -1 && opts.vid.is_empty() {
        return Err(DumpError::config("must provide a valid part or a valid vid"));
    }

    let vid = if opts.vid.is_empty() {
        None
    } else {
        Some(encode_vid(&opts.vid, space, order)?)
    };
    let part = match &vid {
        Some(v) => route(v, space, order)?,
        None => opts.part_id,
    };

    let mut prefix = part_prefix(part, KeyType::Tag, order);
    if let Some(v) = &vid {
        prefix.extend_from_slice(v);
    }
    let filter = (opts.tag_id != -1).then(|| KeyFilter::TagId(int_to_bytes(opts.tag_id, order)));
    Ok(ScanPlan { prefix, filter })
}

/// Edge scan.
///
/// A negative `edge_id`, or only `dst` given without an edge type, scans
/// the reverse copies stored under the destination vertex. The near end
/// vid (src forward, dst reverse) narrows the prefix; the edge type and far
/// end vid become a key filter. With neither, only edges of the scan
/// direction are kept.
///
/// # Errors
///
/// * `DumpError::Configuration` - no partition can be determined
pub fn edge_scan(opts: &DumpOptions, space: &SpaceItem, order: ByteOrder) -> DumpResult<ScanPlan> {
    if opts.part_id == -1 && opts.src.is_empty() && opts.dst.is_empty() {
        return Err(DumpError::config("must provide a valid part or a valid src/dst"));
    }

    let forward = if opts.edge_id != 0 {
        opts.edge_id > 0
    } else {
        !(opts.src.is_empty() && !opts.dst.is_empty())
    };
    let (left, right) = if forward {
        (&opts.src, &opts.dst)
    } else {
        (&opts.dst, &opts.src)
    };

    let left = if left.is_empty() {
        None
    } else {
        Some(encode_vid(left, space, order)?)
    };
    let part = match &left {
        Some(v) => route(v, space, order)?,
        None if opts.part_id != -1 => opts.part_id,
        None => {
            return Err(DumpError::config(format!(
                "must provide a valid part or the {} vid",
                if forward { "src" } else { "dst" }
            )))
        }
    };

    let mut prefix = part_prefix(part, KeyType::Edge, order);
    if let Some(v) = &left {
        prefix.extend_from_slice(v);
    }

    let vid_len = space.vid_len();
    let filter = if opts.edge_id != 0 || !right.is_empty() {
        let right = if right.is_empty() {
            None
        } else {
            Some(encode_vid(right, space, order)?)
        };
        KeyFilter::Edge {
            vid_len,
            edge: (opts.edge_id != 0).then(|| int_to_bytes(opts.edge_id, order)),
            right,
        }
    } else {
        KeyFilter::Direction {
            vid_len,
            forward,
            order,
        }
    };
    Ok(ScanPlan {
        prefix,
        filter: Some(filter),
    })
}

/// Index scan: `word(part) + index id`, optionally filtered by the trailing
/// vid.
///
/// # Errors
///
/// * `DumpError::Configuration` - neither part nor vid is set
/// * `DumpError::UnsupportedType` - an index field has no fixed key width
pub fn index_scan(
    opts: &DumpOptions,
    space: &SpaceItem,
    index: &IndexItem,
    order: ByteOrder,
) -> DumpResult<ScanPlan> {
    if opts.part_id == -1 && opts.vid.is_empty() {
        return Err(DumpError::config("must provide a valid part or vid"));
    }

    let vid = if opts.vid.is_empty() {
        None
    } else {
        Some(encode_vid(&opts.vid, space, order)?)
    };
    let part = match &vid {
        Some(v) => route(v, space, order)?,
        None => opts.part_id,
    };

    let mut prefix = part_prefix(part, KeyType::Index, order);
    prefix.extend_from_slice(&int_to_bytes(index.index_id, order));

    let filter = match vid {
        Some(vid) => Some(KeyFilter::IndexVid {
            offset: prefix.len() + index_key_width(index)?,
            vid,
        }),
        None => None,
    };
    Ok(ScanPlan { prefix, filter })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::{ColumnDef, ColumnTypeDef, PropertyType, SchemaId};

    const LE: ByteOrder = ByteOrder::Little;

    fn int_space() -> SpaceItem {
        SpaceItem::new(1, "nba", 10, ColumnTypeDef::new(PropertyType::Int64, 8))
    }

    fn str_space() -> SpaceItem {
        SpaceItem::new(2, "ldbc", 4, ColumnTypeDef::new(PropertyType::FixedString, 4))
    }

    // ===== Rank =====

    #[test]
    fn test_rank_orders_negative_before_positive() {
        assert!(encode_rank(-1) < encode_rank(0));
        assert!(encode_rank(0) < encode_rank(1));
        assert_eq!(encode_rank(0), [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(decode_rank(&encode_rank(-42)), -42);
    }

    // ===== Decode =====

    #[test]
    fn test_tag_key() {
        let key = TagKey {
            part_id: 3,
            vid: 100i64.to_le_bytes().to_vec(),
            tag_id: 7,
        };
        let bytes = key.encode(LE);
        assert_eq!(bytes[..4], [0x01, 0x03, 0x00, 0x00]);
        let decoded = TagKey::decode(&bytes, 8, LE).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(decoded.render(&int_space(), LE), "part:3, vid:100, tag:7");

        assert!(TagKey::decode(&bytes[..10], 8, LE).unwrap_err().is_malformed());
    }

    #[test]
    fn test_reverse_edge_swaps_ends() {
        let key = EdgeKey {
            part_id: 1,
            src: b"bob\0".to_vec(),
            edge_type: -5,
            rank: -2,
            dst: b"amy\0".to_vec(),
        };
        let bytes = key.encode(LE);
        let decoded = EdgeKey::decode(&bytes, 4, LE).unwrap();
        assert_eq!(decoded, key);
        assert_eq!(
            decoded.render(&str_space(), LE),
            "part:1, src:amy, edge:-5, dst:bob, rank:-2"
        );
        // Missing reserved byte.
        assert!(EdgeKey::decode(&bytes[..bytes.len() - 1], 4, LE).is_err());
    }

    #[test]
    fn test_index_key_splits_tail_vid() {
        let key = IndexKey {
            part_id: 2,
            index_id: 9,
            values: vec![1, 2, 3],
            vid: 5i64.to_le_bytes().to_vec(),
        };
        let decoded = IndexKey::decode(&key.encode(LE), 8, LE).unwrap();
        assert_eq!(decoded, key);
        assert!(IndexKey::decode(&[3, 2, 0, 0, 9, 0, 0, 0, 1], 8, LE).is_err());
    }

    // ===== Plans =====

    #[test]
    fn test_tag_scan_requires_part_or_vid() {
        let opts = DumpOptions::default();
        assert!(matches!(
            tag_scan(&opts, &int_space(), LE).unwrap_err(),
            DumpError::Configuration(_)
        ));
    }

    #[test]
    fn test_tag_scan_by_vid_routes_partition() {
        let opts = DumpOptions {
            vid: "13".to_string(),
            tag_id: 4,
            ..DumpOptions::default()
        };
        let plan = tag_scan(&opts, &int_space(), LE).unwrap();
        // 13 % 10 + 1
        let mut expected = part_prefix(4, KeyType::Tag, LE);
        expected.extend_from_slice(&13i64.to_le_bytes());
        assert_eq!(plan.prefix, expected);

        let filter = plan.filter.unwrap();
        let hit = TagKey { part_id: 4, vid: 13i64.to_le_bytes().to_vec(), tag_id: 4 };
        let miss = TagKey { tag_id: 5, ..hit.clone() };
        assert!(filter.matches(&hit.encode(LE)));
        assert!(!filter.matches(&miss.encode(LE)));
    }

    #[test]
    fn test_edge_scan_direction() {
        let space = str_space();
        let edge = |src: &[u8], edge_type: i32, dst: &[u8]| {
            EdgeKey {
                part_id: 1,
                src: src.to_vec(),
                edge_type,
                rank: 0,
                dst: dst.to_vec(),
            }
            .encode(LE)
        };

        // Part only: forward edges.
        let opts = DumpOptions {
            part_id: 1,
            ..DumpOptions::default()
        };
        let plan = edge_scan(&opts, &space, LE).unwrap();
        assert_eq!(plan.prefix, part_prefix(1, KeyType::Edge, LE));
        let f = plan.filter.unwrap();
        assert!(f.matches(&edge(b"a\0\0\0", 3, b"b\0\0\0")));
        assert!(!f.matches(&edge(b"a\0\0\0", -3, b"b\0\0\0")));

        // Dst only: reverse copies stored under dst.
        let opts = DumpOptions {
            dst: "b".to_string(),
            ..DumpOptions::default()
        };
        let plan = edge_scan(&opts, &space, LE).unwrap();
        assert!(plan.prefix.ends_with(b"b\0\0\0"));
        let f = plan.filter.unwrap();
        assert!(f.matches(&edge(b"b\0\0\0", -3, b"a\0\0\0")));
        assert!(!f.matches(&edge(b"b\0\0\0", 3, b"a\0\0\0")));

        // Explicit edge type and far end.
        let opts = DumpOptions {
            src: "a".to_string(),
            dst: "b".to_string(),
            edge_id: 3,
            ..DumpOptions::default()
        };
        let f = edge_scan(&opts, &space, LE).unwrap().filter.unwrap();
        assert!(f.matches(&edge(b"a\0\0\0", 3, b"b\0\0\0")));
        assert!(!f.matches(&edge(b"a\0\0\0", 4, b"b\0\0\0")));
        assert!(!f.matches(&edge(b"a\0\0\0", 3, b"c\0\0\0")));
        assert!(!f.matches(b"short"));
    }

    #[test]
    fn test_edge_scan_needs_near_end_or_part() {
        let opts = DumpOptions {
            dst: "b".to_string(),
            edge_id: 3,
            ..DumpOptions::default()
        };
        assert!(edge_scan(&opts, &str_space(), LE).is_err());
    }

    #[test]
    fn test_index_scan_vid_filter_offset() {
        let index = IndexItem {
            index_id: 9,
            schema_id: SchemaId::Tag(2),
            fields: vec![
                ColumnDef::new("age", PropertyType::Int64, 0, false),
                ColumnDef::new("name", PropertyType::FixedString, 4, true),
            ],
            ..IndexItem::default()
        };
        let opts = DumpOptions {
            vid: "7".to_string(),
            ..DumpOptions::default()
        };
        let plan = index_scan(&opts, &int_space(), &index, LE).unwrap();
        assert_eq!(plan.prefix.len(), 8);
        // word + index + 8 + 4 + bitmap(2)
        match plan.filter.clone().unwrap() {
            KeyFilter::IndexVid { offset, .. } => assert_eq!(offset, 22),
            other => panic!("unexpected filter {:?}", other),
        }

        let key = IndexKey {
            part_id: 8,
            index_id: 9,
            values: vec![0; 14],
            vid: 7i64.to_le_bytes().to_vec(),
        };
        assert!(plan.filter.unwrap().matches(&key.encode(LE)));
    }
}
