//! Copy whole partitions of a store into per-partition destination stores.
//!
//! ```text
//! <out>/<part>/tag.sst
//! <out>/<part>/edge.sst
//! <out>/<part>/vertex.sst
//! <out>/<part>/index.sst
//! ```
//!
//! Each destination is a full RocksDB directory, openable with
//! [`Engine::read_only`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{Direction, IteratorMode, WriteBatch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::config::EngineConfig;
use super::core::Engine;
use crate::codec::ByteOrder;
use crate::error::{DumpError, DumpResult};
use crate::partition::{part_prefix, KeyType};

/// Records written per batch.
pub const EXPORT_BATCH_SIZE: usize = 100;

/// Record kinds copied by [`export_parts`].
pub const EXPORT_KINDS: [KeyType; 4] = [
    KeyType::Tag,
    KeyType::Edge,
    KeyType::Vertex,
    KeyType::Index,
];

/// Destination directory for one partition and record kind.
pub fn export_path(out_dir: &Path, part_id: i32, kind: KeyType) -> PathBuf {
    out_dir
        .join(part_id.to_string())
        .join(format!("{}.sst", kind.name()))
}

/// Spawn one blocking export unit per partition.
///
/// Returns immediately with the join handles; nothing is awaited. Each
/// handle resolves to the number of records that partition wrote. Must be
/// called from within a Tokio runtime.
pub fn export_parts(
    engine: Arc<Engine>,
    out_dir: PathBuf,
    parts: &[i32],
    order: ByteOrder,
) -> Vec<JoinHandle<DumpResult<u64>>> {
    parts
        .iter()
        .map(|&part_id| {
            let engine = Arc::clone(&engine);
            let out_dir = out_dir.clone();
            tokio::task::spawn_blocking(move || export_part(&engine, &out_dir, part_id, order))
        })
        .collect()
}

/// Export every kind of one partition. Blocking.
pub fn export_part(engine: &Engine, out_dir: &Path, part_id: i32, order: ByteOrder) -> DumpResult<u64> {
    let mut total = 0;
    for kind in EXPORT_KINDS {
        total += export_kind(engine, out_dir, part_id, kind, order)?;
    }
    info!(part_id, records = total, "exported partition");
    Ok(total)
}

fn export_kind(
    engine: &Engine,
    out_dir: &Path,
    part_id: i32,
    kind: KeyType,
    order: ByteOrder,
) -> DumpResult<u64> {
    let dest_path = export_path(out_dir, part_id, kind);
    if let Some(parent) = dest_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DumpError::engine(parent.display().to_string(), e))?;
    }
    let dest = Engine::new(&dest_path, EngineConfig::writable());
    let dest_db = dest.open()?;
    let src_db = engine.open()?;

    let prefix = part_prefix(part_id, kind, order);
    debug!(part_id, kind = kind.name(), dest = %dest_path.display(), "exporting");

    let mut batch = WriteBatch::default();
    let mut written = 0u64;
    for item in src_db.iterator(IteratorMode::From(&prefix, Direction::Forward)) {
        let (key, value) = item.map_err(|e| DumpError::engine(engine.path(), e))?;
        if !key.starts_with(&prefix) {
            break;
        }
        batch.put(&key, &value);
        written += 1;
        if batch.len() >= EXPORT_BATCH_SIZE {
            dest_db
                .write(std::mem::take(&mut batch))
                .map_err(|e| DumpError::engine(dest.path(), e))?;
        }
    }
    if !batch.is_empty() {
        dest_db
            .write(batch)
            .map_err(|e| DumpError::engine(dest.path(), e))?;
    }
    Ok(written)
}
