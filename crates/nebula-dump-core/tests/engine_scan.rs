//! Engine and dumper behavior against real stores: counting, cancellation
//! and the export / ingest round trip.

mod common;

use std::sync::Arc;

use common::*;
use nebula_dump_core::engine::{export_parts, export_path};
use nebula_dump_core::partition::part_prefix;
use nebula_dump_core::{Dumper, Engine, EngineConfig, KeyType};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Eight vertex records and four tag records spread over partitions 0..4,
/// plus one key outside any partition word.
fn mixed_store() -> (TempDir, Arc<Engine>) {
    let mut kvs = Vec::new();
    for part in 0..4 {
        for n in 0..2u8 {
            let mut key = part_prefix(part, KeyType::Vertex, LE);
            key.push(n);
            kvs.push((key, Vec::new()));
        }
        let mut key = part_prefix(part, KeyType::Tag, LE);
        key.extend_from_slice(b"tag");
        kvs.push((key, b"row".to_vec()));
    }
    kvs.push((b"__spaces__".to_vec(), Vec::new()));
    store(&kvs)
}

// =========================================================================
// Counting
// =========================================================================

#[test]
fn test_partition_count_matches_prefix_scans() {
    let (_dir, engine) = mixed_store();

    let mut expected = 0u64;
    for part in 0..4 {
        expected += engine
            .count_prefix(&part_prefix(part, KeyType::Vertex, LE))
            .expect("count_prefix failed");
    }
    let total = engine
        .count_by_partition_prefix(4, KeyType::Vertex.as_u8(), &[], LE)
        .expect("count failed");
    assert_eq!(total, expected);
    assert_eq!(total, 8);

    // Partitions past the requested count are not visited.
    let partial = engine
        .count_by_partition_prefix(2, KeyType::Vertex.as_u8(), &[], LE)
        .expect("count failed");
    assert_eq!(partial, 4);
}

#[test]
fn test_count_with_extra_prefix_bytes() {
    let (_dir, engine) = mixed_store();
    let total = engine
        .count_by_partition_prefix(4, KeyType::Tag.as_u8(), b"tag", LE)
        .expect("count failed");
    assert_eq!(total, 4);
    let none = engine
        .count_by_partition_prefix(4, KeyType::Tag.as_u8(), b"nope", LE)
        .expect("count failed");
    assert_eq!(none, 0);
}

#[test]
fn test_rejecting_predicate_yields_nothing() {
    let (_dir, engine) = mixed_store();
    let reject = |_: &[u8]| false;
    let kvs = engine
        .prefix_with_condition(&part_prefix(0, KeyType::Vertex, LE), 100, Some(&reject), None)
        .expect("scan failed");
    assert!(kvs.is_empty());
}

// =========================================================================
// Dumper
// =========================================================================

#[tokio::test]
async fn test_dumper_get_and_count() {
    let (_dir, engine) = mixed_store();
    let dumper = Dumper::new(engine, LE);
    let cancel = CancellationToken::new();

    let kv = dumper
        .get(b"__spaces__".to_vec(), &cancel)
        .await
        .expect("get failed");
    assert!(kv.is_some());

    let n = dumper
        .count(4, KeyType::Vertex, Vec::new(), &cancel)
        .await
        .expect("count failed");
    assert_eq!(n, 8);

    let first = dumper
        .scan_by_count(Vec::new(), 3, &cancel)
        .await
        .expect("scan failed");
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_dumper_cancelled_before_start() {
    let (_dir, engine) = mixed_store();
    let dumper = Dumper::new(engine, LE);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = dumper
        .scan_by_range(Vec::new(), Vec::new(), &cancel)
        .await
        .expect_err("cancelled scan must fail");
    assert!(err.is_cancelled());
}

// =========================================================================
// Export and ingest
// =========================================================================

#[tokio::test]
async fn test_export_then_ingest() {
    let (_src_dir, engine) = mixed_store();
    let out = TempDir::new().expect("Failed to create temp dir");

    let handles = export_parts(Arc::clone(&engine), out.path().to_path_buf(), &[1, 3], LE);
    let mut exported = 0;
    for handle in handles {
        exported += handle
            .await
            .expect("export task panicked")
            .expect("export failed");
    }
    // Two vertices and one tag record per partition.
    assert_eq!(exported, 6);
    assert!(export_path(out.path(), 1, KeyType::Vertex).is_dir());
    assert!(!out.path().join("2").exists());

    // A partition's vertex store now holds exactly that partition's vertices.
    let part_one = Engine::read_only(export_path(out.path(), 1, KeyType::Vertex));
    let kvs = part_one.scan_by_range(&[], &[]).expect("scan failed");
    assert_eq!(kvs.len(), 2);
    assert!(kvs
        .iter()
        .all(|kv| kv.key.starts_with(&part_prefix(1, KeyType::Vertex, LE))));
}

#[test]
fn test_ingest_requires_writable_engine() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let engine = Engine::read_only(dir.path());
    let err = engine.ingest_dir(dir.path()).expect_err("read-only ingest must fail");
    assert!(err.to_string().contains("writable"));
}

#[test]
fn test_ingest_empty_directory() {
    let target = TempDir::new().expect("Failed to create temp dir");
    let ssts = TempDir::new().expect("Failed to create temp dir");
    let engine = Engine::new(target.path(), EngineConfig::writable());
    assert_eq!(engine.ingest_dir(ssts.path()).expect("ingest failed"), 0);
}
