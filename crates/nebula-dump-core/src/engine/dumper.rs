//! Cancellable, schema-free access to a store.
//!
//! Each operation moves the blocking RocksDB work onto Tokio's blocking pool
//! and races it against a caller supplied [`CancellationToken`]. When the
//! token fires first the call returns [`DumpError::Cancelled`]; the blocking
//! unit keeps running to completion and its result is dropped.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::core::Engine;
use super::kv::KV;
use crate::codec::ByteOrder;
use crate::error::{DumpError, DumpResult};
use crate::partition::KeyType;

/// Point-get, range scans and partition counts over one shared [`Engine`].
#[derive(Clone)]
pub struct Dumper {
    engine: Arc<Engine>,
    order: ByteOrder,
}

impl Dumper {
    pub fn new(engine: Arc<Engine>, order: ByteOrder) -> Self {
        Self { engine, order }
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Look up one key.
    ///
    /// # Errors
    ///
    /// * `DumpError::Cancelled` - `cancel` fired first
    /// * `DumpError::Engine` - the store could not be opened or read
    pub async fn get(&self, key: Vec<u8>, cancel: &CancellationToken) -> DumpResult<Option<KV>> {
        self.run(cancel, move |engine| engine.get(&key)).await
    }

    /// Records in `[start, end)`; see [`Engine::scan_by_range`].
    pub async fn scan_by_range(
        &self,
        start: Vec<u8>,
        end: Vec<u8>,
        cancel: &CancellationToken,
    ) -> DumpResult<Vec<KV>> {
        self.run(cancel, move |engine| engine.scan_by_range(&start, &end))
            .await
    }

    /// First `count` records from `start`; see [`Engine::scan_by_count`].
    pub async fn scan_by_count(
        &self,
        start: Vec<u8>,
        count: usize,
        cancel: &CancellationToken,
    ) -> DumpResult<Vec<KV>> {
        self.run(cancel, move |engine| engine.scan_by_count(&start, count))
            .await
    }

    /// Count records of `kind` across partitions `0..part_count`, each
    /// partition prefix followed by `extra`.
    pub async fn count(
        &self,
        part_count: i32,
        kind: KeyType,
        extra: Vec<u8>,
        cancel: &CancellationToken,
    ) -> DumpResult<u64> {
        self.count_raw(part_count, kind.as_u8(), extra, cancel).await
    }

    /// As [`count`](Self::count) with a raw record-kind byte.
    pub async fn count_raw(
        &self,
        part_count: i32,
        kind: u8,
        extra: Vec<u8>,
        cancel: &CancellationToken,
    ) -> DumpResult<u64> {
        let order = self.order;
        self.run(cancel, move |engine| {
            engine.count_by_partition_prefix(part_count, kind, &extra, order)
        })
        .await
    }

    async fn run<T, F>(&self, cancel: &CancellationToken, work: F) -> DumpResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Engine) -> DumpResult<T> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(DumpError::Cancelled);
        }
        let engine = Arc::clone(&self.engine);
        let handle = tokio::task::spawn_blocking(move || work(&engine));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(path = %self.engine.path(), "operation cancelled, abandoning blocking task");
                Err(DumpError::Cancelled)
            }
            joined = handle => {
                joined.map_err(|e| DumpError::Internal(format!("spawn_blocking failed: {}", e)))?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::partition::part_prefix;
    use rocksdb::DB;
    use tempfile::TempDir;

    fn dumper(tmp: &TempDir) -> Dumper {
        let order = ByteOrder::Little;
        {
            let db = DB::open_default(tmp.path()).unwrap();
            for part in 0..3 {
                let mut key = part_prefix(part, KeyType::Vertex, order);
                key.extend_from_slice(b"v1");
                db.put(&key, b"").unwrap();
            }
            db.put(b"a", b"1").unwrap();
        }
        let engine = Arc::new(Engine::new(tmp.path(), EngineConfig::default()));
        Dumper::new(engine, order)
    }

    #[tokio::test]
    async fn test_get_and_count() {
        let tmp = TempDir::new().unwrap();
        let d = dumper(&tmp);
        let cancel = CancellationToken::new();

        let kv = d.get(b"a".to_vec(), &cancel).await.unwrap().unwrap();
        assert_eq!(kv.value, b"1");
        assert!(d.get(b"b".to_vec(), &cancel).await.unwrap().is_none());

        let n = d.count(3, KeyType::Vertex, vec![], &cancel).await.unwrap();
        assert_eq!(n, 3);
        let n = d.count(3, KeyType::Tag, vec![], &cancel).await.unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_scans() {
        let tmp = TempDir::new().unwrap();
        let d = dumper(&tmp);
        let cancel = CancellationToken::new();

        let all = d.scan_by_range(vec![], vec![], &cancel).await.unwrap();
        assert_eq!(all.len(), 4);
        let first = d.scan_by_count(vec![], 1, &cancel).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].key, all[0].key);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let tmp = TempDir::new().unwrap();
        let d = dumper(&tmp);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = d.get(b"a".to_vec(), &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
        let err = d.count(3, KeyType::Vertex, vec![], &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_while_running_abandons_work() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::mpsc;
        use tokio::sync::oneshot;

        let tmp = TempDir::new().unwrap();
        let d = dumper(&tmp);
        let cancel = CancellationToken::new();

        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));

        let trigger = cancel.clone();
        tokio::spawn(async move {
            if started_rx.await.is_ok() {
                trigger.cancel();
            }
        });

        let done = Arc::clone(&finished);
        let err = d
            .run(&cancel, move |engine| {
                let _ = started_tx.send(());
                // Held until the caller has already seen the cancellation.
                let _ = release_rx.recv();
                let n = engine.count_prefix(b"a");
                done.store(true, Ordering::SeqCst);
                n
            })
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(!finished.load(Ordering::SeqCst));
        release_tx.send(()).unwrap();
    }
}
