//! Offline dumps driven by a persisted schema cache.

mod common;

use std::fs;
use std::sync::Arc;

use common::*;
use nebula_dump_core::schema::CacheData;
use nebula_dump_core::{
    DumpOptions, FileSchemaCache, MetaClientConfig, MetaSchemaCache, SchemaCacheConfig,
    SchemaSource, StorageKind, StorageParser,
};
use tempfile::TempDir;

/// Persist `nba_schema()` the way a previous online run would have.
fn persisted_cache() -> (TempDir, SchemaCacheConfig) {
    let root = TempDir::new().expect("Failed to create temp dir");
    let config = SchemaCacheConfig::with_root(root.path());
    let path = config.cache_file(META_ADDRESS);
    fs::create_dir_all(path.parent().expect("cache file has a parent"))
        .expect("Failed to create cache dir");

    let data = CacheData::from_snapshot(&nba_schema()).expect("Failed to encode snapshot");
    let text = serde_yaml::to_string(&data).expect("Failed to render yaml");
    fs::write(&path, text).expect("Failed to write cache");
    (root, config)
}

#[test]
fn test_file_cache_loads_all_entities() {
    let (_root, config) = persisted_cache();
    let cache = FileSchemaCache::new(META_ADDRESS, &config);
    assert!(cache.list_spaces().is_empty(), "nothing is read before update");

    cache.update().expect("update failed");
    assert_eq!(cache.list_spaces(), vec![SPACE_ID]);
    let space = cache.space(SPACE_ID).expect("space missing");
    assert_eq!(space.partition_num(), PARTS);
    assert!(space.is_int_vid());
    assert_eq!(cache.tags(SPACE_ID).len(), 2);
    assert!(cache.tag_schema(SPACE_ID, PLAYER, 1).is_some());
    assert!(cache.edge_schema(SPACE_ID, FOLLOW, 0).is_some());
    assert_eq!(
        cache
            .index(SPACE_ID, PLAYER_AGE_INDEX)
            .expect("index missing")
            .field_names(),
        vec!["age".to_string()]
    );
}

#[test]
fn test_meta_cache_starts_from_persisted_file() {
    let (_root, config) = persisted_cache();
    let cache = MetaSchemaCache::new(META_ADDRESS, MetaClientConfig::default(), &config);
    assert_eq!(cache.list_spaces(), vec![SPACE_ID]);
    assert_eq!(cache.cache_file(), config.cache_file(META_ADDRESS).as_path());
}

#[test]
fn test_missing_cache_is_empty_not_error() {
    let root = TempDir::new().expect("Failed to create temp dir");
    let cache = FileSchemaCache::new("10.0.0.1:9559", &SchemaCacheConfig::with_root(root.path()));
    cache.update().expect("update failed");
    assert!(cache.list_spaces().is_empty());
    assert!(cache.require_space(SPACE_ID).is_err());
}

#[test]
fn test_offline_tag_dump() {
    let (_root, config) = persisted_cache();
    let (_dir, engine) = store(&[tag_kv(13, player_row_v0("Tim", 42, 1000))]);

    let schema: Arc<dyn SchemaSource> = Arc::new(FileSchemaCache::new(META_ADDRESS, &config));
    let opts = DumpOptions {
        space_id: SPACE_ID,
        vid: "13".to_string(),
        meta_address: META_ADDRESS.to_string(),
        ..DumpOptions::default()
    };
    let parser = StorageParser::new(StorageKind::Tags, engine, opts, schema, LE);
    let records = parser.parse_all().expect("parse_all failed");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, "part:4, vid:13, tag:2");
    assert_eq!(
        records[0].value,
        "version:0, name:\"Tim\", age:42, timestamp:1000"
    );
}
