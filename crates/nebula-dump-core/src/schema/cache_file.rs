//! On-disk format of the persisted schema cache.
//!
//! ```yaml
//! last_update_time: "2024-05-01T10:00:00Z"
//! spaces:
//!   - id: 1
//!     space: <base64 compact SpaceItem>
//!     tags:
//!       - tag: <base64 compact TagItem>
//!     edges:
//!       - edge: <base64 compact EdgeItem>
//!     indexes:
//!       - index: <base64 compact IndexItem>
//! ```
//!
//! `last_update_time` is informational only; nothing expires the cache.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{SchemaSnapshot, SchemaSource};
use crate::error::{DumpError, DumpResult};
use crate::thrift::{compact_deserialize, compact_serialize, ThriftStruct};

/// Directory under the home directory holding all caches.
pub const CACHE_DIR_NAME: &str = ".meta_cache";

/// File name of a cache inside its per-address directory.
pub const CACHE_FILE_NAME: &str = "cache.yaml";

/// Where schema caches live.
#[derive(Debug, Clone)]
pub struct SchemaCacheConfig {
    /// Root directory; one subdirectory per meta address.
    pub cache_root: PathBuf,
}

impl Default for SchemaCacheConfig {
    /// `<home>/.meta_cache`, or `.meta_cache` relative to the working
    /// directory when the home directory cannot be resolved.
    fn default() -> Self {
        let cache_root = dirs::home_dir()
            .map(|home| home.join(CACHE_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(CACHE_DIR_NAME));
        Self { cache_root }
    }
}

impl SchemaCacheConfig {
    pub fn with_root(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    /// Cache file for the meta service at `address`.
    pub fn cache_file(&self, address: &str) -> PathBuf {
        self.cache_root.join(address).join(CACHE_FILE_NAME)
    }
}

/// Top-level YAML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_update_time: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spaces: Vec<SpaceData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceData {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub space: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagData {
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeData {
    pub edge: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexData {
    pub index: String,
}

fn encode<T: ThriftStruct>(value: &T) -> DumpResult<String> {
    Ok(STANDARD.encode(compact_serialize(value)?))
}

fn decode<T: ThriftStruct>(blob: &str, path: &Path) -> DumpResult<T> {
    let bytes = STANDARD.decode(blob).map_err(|e| DumpError::CacheIo {
        path: path.display().to_string(),
        message: format!("invalid base64 blob: {}", e),
    })?;
    compact_deserialize(&bytes).map_err(|e| DumpError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

impl CacheData {
    /// Serialize every entity of `snapshot`.
    pub fn from_snapshot(snapshot: &SchemaSnapshot) -> DumpResult<Self> {
        let mut spaces = Vec::new();
        for id in snapshot.list_spaces() {
            let Some(space) = snapshot.space(id) else {
                continue;
            };
            spaces.push(SpaceData {
                id,
                space: encode(&space)?,
                tags: snapshot
                    .tags(id)
                    .iter()
                    .map(|t| Ok(TagData { tag: encode(t)? }))
                    .collect::<DumpResult<_>>()?,
                edges: snapshot
                    .edges(id)
                    .iter()
                    .map(|e| Ok(EdgeData { edge: encode(e)? }))
                    .collect::<DumpResult<_>>()?,
                indexes: snapshot
                    .indexes(id)
                    .iter()
                    .map(|i| Ok(IndexData { index: encode(i)? }))
                    .collect::<DumpResult<_>>()?,
            });
        }
        Ok(Self {
            last_update_time: chrono::Utc::now().to_rfc3339(),
            spaces,
        })
    }

    /// Decode back into maps. `path` is only used in error messages.
    pub fn into_snapshot(self, path: &Path) -> DumpResult<SchemaSnapshot> {
        let mut snapshot = SchemaSnapshot::new();
        for space_data in self.spaces {
            let id = space_data.id;
            let mut space: crate::thrift::SpaceItem = decode(&space_data.space, path)?;
            space.space_id = id;
            snapshot.insert_space(space);
            for t in &space_data.tags {
                snapshot.insert_tag(id, decode(&t.tag, path)?);
            }
            for e in &space_data.edges {
                snapshot.insert_edge(id, decode(&e.edge, path)?);
            }
            for i in &space_data.indexes {
                snapshot.insert_index(id, decode(&i.index, path)?);
            }
        }
        Ok(snapshot)
    }
}

/// Load the cache at `path`. A missing file is an empty snapshot.
pub(crate) fn read_cache_file(path: &Path) -> DumpResult<SchemaSnapshot> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SchemaSnapshot::new()),
        Err(e) => {
            return Err(DumpError::CacheIo {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let data: CacheData = serde_yaml::from_str(&text).map_err(|e| DumpError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    data.into_snapshot(path)
}

/// Write `snapshot` to `path`, creating parent directories.
pub(crate) fn write_cache_file(path: &Path, snapshot: &SchemaSnapshot) -> DumpResult<()> {
    let io_err = |e: &dyn std::fmt::Display| DumpError::CacheIo {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| io_err(&e))?;
    }
    let data = CacheData::from_snapshot(snapshot)?;
    let text = serde_yaml::to_string(&data).map_err(|e| io_err(&e))?;
    fs::write(path, text).map_err(|e| io_err(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::{
        ColumnDef, ColumnTypeDef, EdgeItem, IndexItem, PropertyType, Schema, SchemaId, SpaceItem,
        TagItem,
    };
    use tempfile::TempDir;

    fn sample() -> SchemaSnapshot {
        SchemaSnapshot::new()
            .with_space(SpaceItem::new(
                5,
                "social",
                16,
                ColumnTypeDef::new(PropertyType::FixedString, 32),
            ))
            .with_tag(
                5,
                TagItem {
                    tag_id: 10,
                    tag_name: b"person".to_vec(),
                    version: 0,
                    schema: Schema::new(vec![ColumnDef::new(
                        "name",
                        PropertyType::String,
                        0,
                        false,
                    )]),
                },
            )
            .with_edge(
                5,
                EdgeItem {
                    edge_type: 11,
                    edge_name: b"knows".to_vec(),
                    version: 0,
                    schema: Schema::default(),
                },
            )
            .with_index(
                5,
                IndexItem {
                    index_id: 12,
                    index_name: b"person_name".to_vec(),
                    schema_id: SchemaId::Tag(10),
                    schema_name: b"person".to_vec(),
                    fields: vec![ColumnDef::new("name", PropertyType::String, 20, false)],
                    comment: None,
                },
            )
    }

    #[test]
    fn test_cache_file_path() {
        let config = SchemaCacheConfig::with_root("/tmp/cache");
        assert_eq!(
            config.cache_file("127.0.0.1:9559"),
            PathBuf::from("/tmp/cache/127.0.0.1:9559/cache.yaml")
        );
    }

    #[test]
    fn test_default_root_ends_with_meta_cache() {
        assert!(SchemaCacheConfig::default().cache_root.ends_with(CACHE_DIR_NAME));
    }

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("meta:9559").join(CACHE_FILE_NAME);
        let snapshot = sample();
        write_cache_file(&path, &snapshot).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("last_update_time"));
        assert!(text.contains("id: 5"));

        let loaded = read_cache_file(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loaded = read_cache_file(&tmp.path().join("absent.yaml")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_garbage_blob_is_cache_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CACHE_FILE_NAME);
        fs::write(&path, "spaces:\n  - id: 1\n    space: \"!!not base64!!\"\n").unwrap();
        let err = read_cache_file(&path).unwrap_err();
        assert!(matches!(err, DumpError::CacheIo { .. }));
    }
}
