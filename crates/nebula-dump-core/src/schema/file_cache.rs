//! Offline schema source reading only the persisted cache file.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::info;

use super::cache_file::{read_cache_file, SchemaCacheConfig};
use super::{SchemaSnapshot, SchemaSource};
use crate::error::DumpResult;
use crate::thrift::{EdgeItem, IndexItem, SpaceItem, TagItem};

/// Schema loaded from `<cache_root>/<address>/cache.yaml`.
///
/// A missing file yields an empty cache, not an error.
pub struct FileSchemaCache {
    path: PathBuf,
    state: RwLock<SchemaSnapshot>,
}

impl FileSchemaCache {
    /// Cache for `address`; nothing is read until [`update`](SchemaSource::update).
    pub fn new(address: &str, config: &SchemaCacheConfig) -> Self {
        Self::from_path(config.cache_file(address))
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RwLock::new(SchemaSnapshot::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SchemaSource for FileSchemaCache {
    fn update(&self) -> DumpResult<()> {
        let mut state = self.state.write();
        *state = read_cache_file(&self.path)?;
        info!(
            path = %self.path.display(),
            spaces = state.list_spaces().len(),
            "schema cache loaded from file"
        );
        Ok(())
    }

    fn list_spaces(&self) -> Vec<i32> {
        self.state.read().list_spaces()
    }

    fn space(&self, space_id: i32) -> Option<SpaceItem> {
        self.state.read().space(space_id)
    }

    fn tags(&self, space_id: i32) -> Vec<TagItem> {
        self.state.read().tags(space_id)
    }

    fn edges(&self, space_id: i32) -> Vec<EdgeItem> {
        self.state.read().edges(space_id)
    }

    fn indexes(&self, space_id: i32) -> Vec<IndexItem> {
        self.state.read().indexes(space_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::cache_file::write_cache_file;
    use crate::thrift::{ColumnTypeDef, PropertyType};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let tmp = TempDir::new().unwrap();
        let cache = FileSchemaCache::new("nowhere:9559", &SchemaCacheConfig::with_root(tmp.path()));
        cache.update().unwrap();
        assert!(cache.list_spaces().is_empty());
        assert!(cache.space(1).is_none());
    }

    #[test]
    fn test_update_reloads_file() {
        let tmp = TempDir::new().unwrap();
        let config = SchemaCacheConfig::with_root(tmp.path());
        let cache = FileSchemaCache::new("meta:9559", &config);
        cache.update().unwrap();
        assert!(cache.list_spaces().is_empty());

        let snapshot = SchemaSnapshot::new().with_space(SpaceItem::new(
            1,
            "s",
            4,
            ColumnTypeDef::new(PropertyType::FixedString, 16),
        ));
        write_cache_file(cache.path(), &snapshot).unwrap();
        cache.update().unwrap();
        assert_eq!(cache.list_spaces(), vec![1]);
        assert_eq!(cache.space(1).unwrap().vid_len(), 16);
    }
}
