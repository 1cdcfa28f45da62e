//! The storage engine handle and its blocking scan primitives.
//!
//! ```text
//! Engine
//! ├── path    - RocksDB data directory
//! ├── config  - read-only / writable, open files
//! └── db      - Arc<DB>, opened lazily on first use, never reopened
//! ```
//!
//! All scans copy keys and values out of the iterator into owned [`KV`]s.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use rocksdb::{Direction, IteratorMode, DB};
use tracing::{debug, info, trace};

use super::config::EngineConfig;
use super::kv::KV;
use crate::codec::ByteOrder;
use crate::error::{DumpError, DumpResult};
use crate::partition::part_prefix_raw;

/// Filter over a raw key or value. Returning `false` skips the record.
pub type Predicate<'a> = &'a (dyn Fn(&[u8]) -> bool + Sync);

/// Handle to one RocksDB data directory.
///
/// # Thread Safety
///
/// `DB` supports concurrent readers, and every scan opens its own iterator.
/// The handle is shared as `Arc<Engine>`; all methods take `&self`.
///
/// # Example
///
/// ```rust
/// use nebula_dump_core::{Engine, EngineConfig};
/// use tempfile::TempDir;
///
/// let tmp = TempDir::new().unwrap();
/// let engine = Engine::new(tmp.path(), EngineConfig::writable());
/// engine.open().unwrap();
/// assert!(engine.is_open());
/// assert!(engine.prefix(b"__spaces__", 20).unwrap().is_empty());
/// ```
pub struct Engine {
    path: String,
    config: EngineConfig,
    db: Mutex<Option<Arc<DB>>>,
}

impl Engine {
    /// Create a handle. Nothing is opened until the first operation.
    pub fn new<P: AsRef<Path>>(path: P, config: EngineConfig) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
            config,
            db: Mutex::new(None),
        }
    }

    /// Read-only handle with default options.
    pub fn read_only<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, EngineConfig::default())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.db.lock().is_some()
    }

    /// Open the store, or return the already open handle.
    ///
    /// # Errors
    ///
    /// * `DumpError::Configuration` - the path is empty
    /// * `DumpError::Engine` - RocksDB cannot open the directory
    pub fn open(&self) -> DumpResult<Arc<DB>> {
        let mut guard = self.db.lock();
        if let Some(db) = guard.as_ref() {
            return Ok(Arc::clone(db));
        }
        if self.path.is_empty() {
            return Err(DumpError::config("must provide a valid rocksdb path"));
        }

        let opts = self.config.db_options();
        let db = if self.config.read_only {
            DB::open_for_read_only(&opts, &self.path, false)
        } else {
            DB::open(&opts, &self.path)
        }
        .map_err(|e| DumpError::engine(&self.path, e))?;

        info!(path = %self.path, read_only = self.config.read_only, "opened rocksdb");
        let db = Arc::new(db);
        *guard = Some(Arc::clone(&db));
        Ok(db)
    }

    /// Point lookup.
    pub fn get(&self, key: &[u8]) -> DumpResult<Option<KV>> {
        let db = self.open()?;
        let value = db.get(key).map_err(|e| DumpError::engine(&self.path, e))?;
        Ok(value.map(|v| KV::new(key, &v)))
    }

    /// Up to `limit` records whose key starts with `prefix`, in key order.
    pub fn prefix(&self, prefix: &[u8], limit: i64) -> DumpResult<Vec<KV>> {
        self.prefix_with_condition(prefix, limit, None, None)
    }

    /// Prefix scan with optional key and value filters.
    ///
    /// Filtered records do not count against `limit`. The scan ends at the
    /// first key without `prefix`, or once `limit` records are collected.
    /// `limit < 1` returns nothing without opening the store.
    pub fn prefix_with_condition(
        &self,
        prefix: &[u8],
        limit: i64,
        key_filter: Option<Predicate<'_>>,
        value_filter: Option<Predicate<'_>>,
    ) -> DumpResult<Vec<KV>> {
        if limit < 1 {
            return Ok(Vec::new());
        }
        debug!(prefix = ?prefix, limit, "prefix scan");
        let db = self.open()?;

        let mut out = Vec::new();
        for item in db.iterator(IteratorMode::From(prefix, Direction::Forward)) {
            let (key, value) = item.map_err(|e| DumpError::engine(&self.path, e))?;
            if !key.starts_with(prefix) || out.len() as i64 >= limit {
                break;
            }
            if key_filter.is_some_and(|f| !f(&key)) {
                trace!(key = ?key, "key filtered out");
                continue;
            }
            if value_filter.is_some_and(|f| !f(&value)) {
                trace!(key = ?key, "value filtered out");
                continue;
            }
            out.push(KV::new(&key, &value));
        }
        Ok(out)
    }

    /// Records with `start <= key < end`.
    ///
    /// An empty `start` begins at the first key; an empty `end` is unbounded.
    pub fn scan_by_range(&self, start: &[u8], end: &[u8]) -> DumpResult<Vec<KV>> {
        let db = self.open()?;
        let mode = if start.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(start, Direction::Forward)
        };

        let mut out = Vec::new();
        for item in db.iterator(mode) {
            let (key, value) = item.map_err(|e| DumpError::engine(&self.path, e))?;
            if !end.is_empty() && &*key >= end {
                break;
            }
            out.push(KV::new(&key, &value));
        }
        Ok(out)
    }

    /// The first `count` records from `start` (or from the first key when
    /// `start` is empty), regardless of prefix.
    pub fn scan_by_count(&self, start: &[u8], count: usize) -> DumpResult<Vec<KV>> {
        let db = self.open()?;
        let mode = if start.is_empty() {
            IteratorMode::Start
        } else {
            IteratorMode::From(start, Direction::Forward)
        };

        let mut out = Vec::with_capacity(count.min(1024));
        for item in db.iterator(mode).take(count) {
            let (key, value) = item.map_err(|e| DumpError::engine(&self.path, e))?;
            out.push(KV::new(&key, &value));
        }
        Ok(out)
    }

    /// Number of keys starting with `prefix`.
    pub fn count_prefix(&self, prefix: &[u8]) -> DumpResult<u64> {
        let db = self.open()?;
        count_with(&db, &self.path, prefix)
    }

    /// Sum of [`count_prefix`](Self::count_prefix) over the partition words
    /// `(p << 8) | kind` for every `p` in `0..part_count`, each followed by
    /// `extra`.
    ///
    /// Partitions are counted in parallel on the rayon pool, each with its
    /// own iterator; the total is only returned once all have finished.
    pub fn count_by_partition_prefix(
        &self,
        part_count: i32,
        kind: u8,
        extra: &[u8],
        order: ByteOrder,
    ) -> DumpResult<u64> {
        let db = self.open()?;
        let total = AtomicU64::new(0);

        (0..part_count.max(0)).into_par_iter().try_for_each(|part| {
            let mut prefix = part_prefix_raw(part, kind, order);
            prefix.extend_from_slice(extra);
            let n = count_with(&db, &self.path, &prefix)?;
            total.fetch_add(n, Ordering::Relaxed);
            Ok::<(), DumpError>(())
        })?;

        let total = total.into_inner();
        debug!(part_count, kind, total, "count by partition prefix");
        Ok(total)
    }

    /// Ingest every file in `sst_dir` into this store.
    ///
    /// Requires a writable handle. Returns the number of files ingested.
    pub fn ingest_dir<P: AsRef<Path>>(&self, sst_dir: P) -> DumpResult<usize> {
        if self.config.read_only {
            return Err(DumpError::config("ingest requires a writable engine"));
        }
        let dir = sst_dir.as_ref();
        let mut files = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|e| DumpError::engine(dir.display().to_string(), e))?;
        for entry in entries {
            let entry = entry.map_err(|e| DumpError::engine(dir.display().to_string(), e))?;
            files.push(entry.path());
        }
        files.sort();
        if files.is_empty() {
            return Ok(0);
        }

        let db = self.open()?;
        let n = files.len();
        db.ingest_external_file(files)
            .map_err(|e| DumpError::engine(&self.path, e))?;
        info!(path = %self.path, files = n, "ingested sst files");
        Ok(n)
    }
}

fn count_with(db: &DB, path: &str, prefix: &[u8]) -> DumpResult<u64> {
    let mut n = 0u64;
    for item in db.iterator(IteratorMode::From(prefix, Direction::Forward)) {
        let (key, _) = item.map_err(|e| DumpError::engine(path, e))?;
        if !key.starts_with(prefix) {
            break;
        }
        n += 1;
    }
    Ok(n)
}
