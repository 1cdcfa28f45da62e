//! Binary key layouts: scan prefix builders and key decoders.
//!
//! [`meta`] covers the `__marker__`-prefixed records of the metadata
//! service store; [`storage`] covers the partition-word-prefixed records of
//! a storage daemon store.

pub mod meta;
pub mod storage;

use crate::codec::{bytes_to_int, int_to_bytes, ByteOrder};
use crate::error::{DumpError, DumpResult};
use crate::thrift::SpaceItem;

/// Default number of records returned by a prefix scan.
pub const DEFAULT_LIMIT: i64 = 20;

/// Filter for a dump request.
///
/// Id fields use `-1` for "unset", except `edge_id`, which uses `0` because
/// the sign of an edge type encodes direction. An unset field truncates the
/// scan prefix at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    pub space_id: i32,
    pub part_id: i32,
    pub tag_id: i32,
    pub edge_id: i32,
    pub index_id: i32,
    /// Maximum records returned (values below 1 return nothing).
    pub limit: i64,
    /// `host:port` of the metadata service, also the schema cache key.
    pub meta_address: String,
    pub vid: String,
    pub src: String,
    pub dst: String,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            space_id: -1,
            part_id: -1,
            tag_id: -1,
            edge_id: 0,
            index_id: -1,
            limit: DEFAULT_LIMIT,
            meta_address: String::new(),
            vid: String::new(),
            src: String::new(),
            dst: String::new(),
        }
    }
}

impl DumpOptions {
    /// Storage record scans need a space and a metadata address.
    ///
    /// # Errors
    ///
    /// * `DumpError::Configuration` - `space_id` is unset or `meta_address`
    ///   is empty
    pub fn verify_storage(&self) -> DumpResult<()> {
        if self.space_id == -1 {
            return Err(DumpError::config("must provide a valid space id"));
        }
        if self.meta_address.is_empty() {
            return Err(DumpError::config("must provide a valid meta address"));
        }
        Ok(())
    }
}

/// Encode a user supplied vid the way the space stores it.
///
/// Integer vids are parsed as decimal `i64`; string vids are padded with
/// zero bytes to the space's vid length.
///
/// # Errors
///
/// * `DumpError::Configuration` - an integer vid does not parse, or a string
///   vid is longer than the vid length
pub fn encode_vid(vid: &str, space: &SpaceItem, order: ByteOrder) -> DumpResult<Vec<u8>> {
    if space.is_int_vid() {
        let v: i64 = vid
            .trim()
            .parse()
            .map_err(|e| DumpError::config(format!("invalid integer vid '{}': {}", vid, e)))?;
        return Ok(int_to_bytes(v, order));
    }

    let vid_len = space.vid_len();
    if vid.len() > vid_len {
        return Err(DumpError::config(format!(
            "invalid vid length, vid is {}, length is {}",
            vid, vid_len
        )));
    }
    let mut out = vid.as_bytes().to_vec();
    out.resize(vid_len, 0);
    Ok(out)
}

/// Render stored vid bytes: decimal for integer vids, text with the zero
/// padding removed otherwise.
pub fn decode_vid(bytes: &[u8], space: &SpaceItem, order: ByteOrder) -> String {
    if space.is_int_vid() {
        return bytes_to_int::<i64>(bytes, order).to_string();
    }
    let end = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |p| p + 1);
    String::from_utf8_lossy(&bytes[..end]).to_string()
}
