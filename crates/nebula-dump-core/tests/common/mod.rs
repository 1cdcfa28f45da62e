//! Shared fixtures: real RocksDB stores in temp directories and an in-memory
//! schema for the `nba` space.

#![allow(dead_code)]

use std::sync::Arc;

use nebula_dump_core::keys::storage::{EdgeKey, IndexKey, TagKey};
use nebula_dump_core::thrift::{ColumnTypeDef, SchemaId};
use nebula_dump_core::{
    ByteOrder, ColumnDef, EdgeItem, Engine, IndexItem, PropertyType, Schema, SchemaSnapshot,
    SpaceItem, TagItem,
};
use rocksdb::DB;
use tempfile::TempDir;

pub const LE: ByteOrder = ByteOrder::Little;
pub const SPACE_ID: i32 = 1;
pub const PARTS: i32 = 10;
pub const PLAYER: i32 = 2;
pub const FOLLOW: i32 = 5;
pub const PLAYER_AGE_INDEX: i32 = 9;
pub const META_ADDRESS: &str = "127.0.0.1:9559";

/// Write `kvs` into a fresh store and return a read-only engine on it.
pub fn store(kvs: &[(Vec<u8>, Vec<u8>)]) -> (TempDir, Arc<Engine>) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    {
        let db = DB::open_default(dir.path()).expect("Failed to open rocksdb");
        for (k, v) in kvs {
            db.put(k, v).expect("put failed");
        }
    }
    let engine = Arc::new(Engine::read_only(dir.path()));
    (dir, engine)
}

pub fn player_v0() -> Schema {
    Schema::new(vec![
        ColumnDef::new("name", PropertyType::String, 0, false),
        ColumnDef::new("age", PropertyType::Int64, 0, false),
    ])
}

pub fn player_v1() -> Schema {
    Schema::new(vec![
        ColumnDef::new("name", PropertyType::String, 0, false),
        ColumnDef::new("age", PropertyType::Int64, 0, false),
        ColumnDef::new("retired", PropertyType::Bool, 0, true),
    ])
}

pub fn follow_schema() -> Schema {
    Schema::new(vec![ColumnDef::new("degree", PropertyType::Int64, 0, false)])
}

pub fn age_index() -> IndexItem {
    IndexItem {
        index_id: PLAYER_AGE_INDEX,
        index_name: b"player_by_age".to_vec(),
        schema_id: SchemaId::Tag(PLAYER),
        schema_name: b"player".to_vec(),
        fields: vec![ColumnDef::new("age", PropertyType::Int64, 0, true)],
        comment: None,
    }
}

/// `nba`: integer vids, 10 partitions, one tag in two versions, one edge,
/// one index.
pub fn nba_schema() -> SchemaSnapshot {
    SchemaSnapshot::new()
        .with_space(SpaceItem::new(
            SPACE_ID,
            "nba",
            PARTS,
            ColumnTypeDef::new(PropertyType::Int64, 8),
        ))
        .with_tag(
            SPACE_ID,
            TagItem {
                tag_id: PLAYER,
                tag_name: b"player".to_vec(),
                version: 0,
                schema: player_v0(),
            },
        )
        .with_tag(
            SPACE_ID,
            TagItem {
                tag_id: PLAYER,
                tag_name: b"player".to_vec(),
                version: 1,
                schema: player_v1(),
            },
        )
        .with_edge(
            SPACE_ID,
            EdgeItem {
                edge_type: FOLLOW,
                edge_name: b"follow".to_vec(),
                version: 0,
                schema: follow_schema(),
            },
        )
        .with_index(SPACE_ID, age_index())
}

pub fn vid(v: i64) -> Vec<u8> {
    v.to_le_bytes().to_vec()
}

/// Partition of an integer vid in `nba`.
pub fn part_of(v: i64) -> i32 {
    (v % PARTS as i64) as i32 + 1
}

/// Row blob: version header, `fixed` slots, `tail` (string payloads), then
/// the write timestamp.
pub fn row(version: u8, fixed: &[u8], tail: &[u8], ts: i64) -> Vec<u8> {
    let mut out = if version == 0 {
        vec![0x08]
    } else {
        vec![0x09, version]
    };
    out.extend_from_slice(fixed);
    out.extend_from_slice(tail);
    out.extend_from_slice(&ts.to_le_bytes());
    out
}

/// `player` v0 row with its name stored after the fixed slots.
pub fn player_row_v0(name: &str, age: i64, ts: i64) -> Vec<u8> {
    // header(1) + string slot(8) + age(8)
    let offset = 1 + 8 + 8;
    let mut fixed = (offset as i32).to_le_bytes().to_vec();
    fixed.extend_from_slice(&(name.len() as i32).to_le_bytes());
    fixed.extend_from_slice(&age.to_le_bytes());
    row(0, &fixed, name.as_bytes(), ts)
}

/// `player` v1 row; `retired = None` sets its null bit.
pub fn player_row_v1(name: &str, age: i64, retired: Option<bool>, ts: i64) -> Vec<u8> {
    // header(2) + null bitmap(1) + string slot(8) + age(8) + retired(1)
    let offset = 2 + 1 + 8 + 8 + 1;
    let mut fixed = vec![if retired.is_none() { 0x80 } else { 0x00 }];
    fixed.extend_from_slice(&(offset as i32).to_le_bytes());
    fixed.extend_from_slice(&(name.len() as i32).to_le_bytes());
    fixed.extend_from_slice(&age.to_le_bytes());
    fixed.push(retired.unwrap_or(false) as u8);
    row(1, &fixed, name.as_bytes(), ts)
}

pub fn tag_kv(v: i64, value: Vec<u8>) -> (Vec<u8>, Vec<u8>) {
    let key = TagKey {
        part_id: part_of(v),
        vid: vid(v),
        tag_id: PLAYER,
    };
    (key.encode(LE), value)
}

/// Forward copy under `src` and reverse copy under `dst`.
pub fn follow_kvs(src: i64, dst: i64, rank: i64, degree: i64) -> Vec<(Vec<u8>, Vec<u8>)> {
    let value = row(0, &degree.to_le_bytes(), &[], 7);
    let out = EdgeKey {
        part_id: part_of(src),
        src: vid(src),
        edge_type: FOLLOW,
        rank,
        dst: vid(dst),
    };
    let inbound = EdgeKey {
        part_id: part_of(dst),
        src: vid(dst),
        edge_type: -FOLLOW,
        rank,
        dst: vid(src),
    };
    vec![(out.encode(LE), value.clone()), (inbound.encode(LE), value)]
}

/// Index entry for `player_by_age`; `age = None` is a null field.
pub fn age_index_kv(v: i64, age: Option<i64>) -> (Vec<u8>, Vec<u8>) {
    let mut values = ((age.unwrap_or(0) as u64) ^ (1 << 63)).to_be_bytes().to_vec();
    let bitmap: u16 = if age.is_none() { 0x8000 } else { 0 };
    values.extend_from_slice(&bitmap.to_le_bytes());
    let key = IndexKey {
        part_id: part_of(v),
        index_id: PLAYER_AGE_INDEX,
        values,
        vid: vid(v),
    };
    (key.encode(LE), Vec::new())
}
