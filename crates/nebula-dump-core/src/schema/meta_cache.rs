//! Schema cache backed by the metadata service.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{debug, info, warn};

use super::cache_file::{read_cache_file, write_cache_file, SchemaCacheConfig};
use super::client::{MetaClient, MetaClientConfig};
use super::{SchemaSnapshot, SchemaSource};
use crate::error::DumpResult;
use crate::thrift::{EdgeItem, IndexItem, SpaceItem, TagItem};

/// Schema fetched over RPC and persisted per meta address.
///
/// The connection is opened on the first [`update`](SchemaSource::update).
/// Readers share the maps under a read lock; `update` holds the write lock
/// for the whole refresh, so a reader never sees a half-built cache.
pub struct MetaSchemaCache {
    address: String,
    client_config: MetaClientConfig,
    cache_file: PathBuf,
    client: Mutex<Option<MetaClient>>,
    state: RwLock<SchemaSnapshot>,
}

impl MetaSchemaCache {
    /// Create a cache for the meta service at `address` (`host:port`).
    ///
    /// Does not touch the network. A persisted cache for the same address,
    /// if present and readable, is loaded as the initial state.
    pub fn new(
        address: &str,
        client_config: MetaClientConfig,
        cache_config: &SchemaCacheConfig,
    ) -> Self {
        let cache_file = cache_config.cache_file(address);
        let state = match read_cache_file(&cache_file) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(path = %cache_file.display(), error = %e, "ignoring unreadable schema cache");
                SchemaSnapshot::new()
            }
        };
        Self {
            address: address.to_string(),
            client_config,
            cache_file,
            client: Mutex::new(None),
            state: RwLock::new(state),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Path the cache is persisted to.
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    fn fetch(&self) -> DumpResult<SchemaSnapshot> {
        let mut guard = self.client.lock();
        if guard.is_none() {
            *guard = Some(MetaClient::connect(&self.address, self.client_config.clone())?);
        }
        let Some(client) = guard.as_mut() else {
            return Ok(SchemaSnapshot::new());
        };

        let mut snapshot = SchemaSnapshot::new();
        for id_name in client.list_spaces()? {
            let id = id_name.id;
            let Some(mut space) = client.get_space(&id_name.name)? else {
                debug!(space_id = id, "space listed but not described, skipping");
                continue;
            };
            space.space_id = id;
            snapshot.insert_space(space);

            for tag in client.list_tags(id)? {
                snapshot.insert_tag(id, tag);
            }
            for edge in client.list_edges(id)? {
                snapshot.insert_edge(id, edge);
            }
            for index in client.list_tag_indexes(id)? {
                snapshot.insert_index(id, index);
            }
            for index in client.list_edge_indexes(id)? {
                snapshot.insert_index(id, index);
            }
        }
        Ok(snapshot)
    }
}

impl SchemaSource for MetaSchemaCache {
    fn update(&self) -> DumpResult<()> {
        let mut state = self.state.write();
        *state = self.fetch()?;
        info!(
            address = %self.address,
            spaces = state.list_spaces().len(),
            "schema cache refreshed"
        );

        let state = RwLockWriteGuard::downgrade(state);
        if let Err(e) = write_cache_file(&self.cache_file, &state) {
            warn!(path = %self.cache_file.display(), error = %e, "failed to persist schema cache");
        }
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
