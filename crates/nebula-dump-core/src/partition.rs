//! Partition routing for vertex ids and the per-partition key prefix.
//!
//! Every storage record key starts with a 4-byte word `(part_id << 8) | kind`
//! written in the host byte order. [`part_prefix`] builds that word and
//! [`get_partition_id`] decides which partition owns a vid.

use crate::codec::{bytes_to_int, int_to_bytes, murmur_hash64, ByteOrder};
use crate::error::{DumpError, DumpResult};

/// Record kind stored in the low byte of the partition word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    Tag = 1,
    Edge = 2,
    Index = 3,
    System = 4,
    Operation = 5,
    KeyValue = 6,
    Vertex = 7,
}

impl KeyType {
    /// The numeric tag written into keys.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short lowercase name, used for export file names and logs.
    pub fn name(self) -> &'static str {
        match self {
            KeyType::Tag => "tag",
            KeyType::Edge => "edge",
            KeyType::Index => "index",
            KeyType::System => "system",
            KeyType::Operation => "operation",
            KeyType::KeyValue => "kv",
            KeyType::Vertex => "vertex",
        }
    }
}

/// Encode the partition word `(part_id << 8) | kind` as 4 bytes.
pub fn part_prefix(part_id: i32, kind: KeyType, order: ByteOrder) -> Vec<u8> {
    part_prefix_raw(part_id, kind.as_u8(), order)
}

/// Like [`part_prefix`] with an arbitrary kind byte.
pub fn part_prefix_raw(part_id: i32, kind: u8, order: ByteOrder) -> Vec<u8> {
    let word = (part_id << 8) | kind as i32;
    int_to_bytes(word, order)
}

/// Compute the 1-based partition owning `vid`.
///
/// `vid` is padded with zero bytes to `vid_len`. An 8-byte vid is read as a
/// signed integer and routed by truncating modulo; every other width is
/// hashed with [`murmur_hash64`] over the vid bytes up to the first NUL.
///
/// # Errors
///
/// * `DumpError::Configuration` - `vid` is longer than `vid_len` or
///   `part_count` is not positive
pub fn get_partition_id(
    vid: &[u8],
    part_count: i32,
    vid_len: usize,
    order: ByteOrder,
) -> DumpResult<i32> {
    if vid_len < vid.len() {
        return Err(DumpError::config(format!(
            "vid is {} bytes, longer than the space vid length {}",
            vid.len(),
            vid_len
        )));
    }
    if part_count < 1 {
        return Err(DumpError::config(format!(
            "partition count must be positive, got {}",
            part_count
        )));
    }

    let mut padded = vid.to_vec();
    padded.resize(vid_len, 0);

    if vid_len == 8 {
        let v: i64 = bytes_to_int(&padded, order);
        Ok((v % part_count as i64) as i32 + 1)
    } else {
        let end = padded.iter().position(|b| *b == 0).unwrap_or(padded.len());
        let hash = murmur_hash64(&padded[..end]);
        Ok((hash % part_count as u64) as i32 + 1)
    }
}
