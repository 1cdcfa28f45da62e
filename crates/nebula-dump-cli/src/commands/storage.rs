//! `storage <kind>`: decode tag, edge and index records of a storage store.
//!
//! Needs the space schema, fetched from `--meta` (and cached under
//! `~/.meta_cache/<meta>/cache.yaml`), or read only from that cache with
//! `--offline`.
//!
//! ```bash
//! nebula-dump storage tags --path nebula/data/storage/nebula/1/data \
//!     --meta 192.168.8.6:9559 --space 1 --vid player100
//! nebula-dump storage edges --path nebula/data/storage/nebula/1/data \
//!     --meta 192.168.8.6:9559 --space 1 --src player100 --edge 5
//! ```

use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{
    ByteOrder, Engine, FileSchemaCache, MetaClientConfig, MetaSchemaCache, SchemaCacheConfig,
    SchemaSource, StorageKind, StorageParser,
};
use tracing::{debug, info};

use super::{print_raw, print_records, run_blocking, FilterArgs, PathArgs};
use crate::error::report;

#[derive(Args, Debug)]
pub struct StorageArgs {
    /// Record kind: tags, edges or indexes
    pub kind: StorageKind,

    #[command(flatten)]
    pub store: PathArgs,

    /// Meta service address, e.g. 192.168.8.6:9559
    #[arg(long)]
    pub meta: String,

    /// Use only the persisted schema cache, no RPC
    #[arg(long)]
    pub offline: bool,

    /// Vertex id of tag or index records
    #[arg(long, default_value = "")]
    pub vid: String,

    /// Source vertex id of edge records
    #[arg(long, default_value = "")]
    pub src: String,

    /// Destination vertex id of edge records
    #[arg(long, default_value = "")]
    pub dst: String,

    /// Print raw key and value bytes instead of decoding
    #[arg(long)]
    pub raw: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

fn schema_source(args: &StorageArgs) -> Arc<dyn SchemaSource> {
    let cache_config = SchemaCacheConfig::default();
    if args.offline {
        info!(meta = %args.meta, "using persisted schema cache only");
        Arc::new(FileSchemaCache::new(&args.meta, &cache_config))
    } else {
        Arc::new(MetaSchemaCache::new(
            &args.meta,
            MetaClientConfig::default(),
            &cache_config,
        ))
    }
}

pub async fn handle_storage(args: StorageArgs) -> i32 {
    debug!(?args, "storage command");
    let mut opts = args.filter.to_options();
    opts.meta_address = args.meta.clone();
    opts.vid = args.vid.clone();
    opts.src = args.src.clone();
    opts.dst = args.dst.clone();

    let engine = Arc::new(Engine::read_only(&args.store.path));
    let parser = StorageParser::new(
        args.kind,
        engine,
        opts,
        schema_source(&args),
        ByteOrder::native(),
    );

    if args.raw {
        match run_blocking(move || parser.prefix()).await {
            Ok(kvs) => print_raw(&kvs),
            Err(e) => return report("storage scan failed", &e),
        }
    } else {
        match run_blocking(move || parser.parse_all()).await {
            Ok(records) => print_records(&records),
            Err(e) => return report("storage decode failed", &e),
        }
    }
    0
}
