//! CLI command handlers
//!
//! # Modules
//!
//! - `meta`: decode metadata records
//! - `storage`: decode tag, edge and index records
//! - `get`, `scan`, `count`: raw access to any store
//! - `export`: copy partitions into per-partition stores
//! - `util`: partition lookup, key conversion, SST ingest, raw prefix scan
//!
//! Every handler returns a process exit code (see [`crate::error`]).

pub mod count;
pub mod export;
pub mod get;
pub mod meta;
pub mod scan;
pub mod storage;
pub mod util;

use std::path::PathBuf;

use clap::Args;
use nebula_dump_core::{DumpError, DumpOptions, DumpResult, KVString, KV};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Record filters shared by `meta` and `storage`.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Space id
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub space: i32,

    /// Partition id
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub part: i32,

    /// Tag id
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub tag: i32,

    /// Edge type; negative selects reverse edges
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub edge: i32,

    /// Index id
    #[arg(long, default_value_t = -1, allow_hyphen_values = true)]
    pub index: i32,

    /// Maximum number of records
    #[arg(long, default_value_t = 20, allow_hyphen_values = true)]
    pub limit: i64,
}

impl FilterArgs {
    pub fn to_options(&self) -> DumpOptions {
        DumpOptions {
            space_id: self.space,
            part_id: self.part,
            tag_id: self.tag,
            edge_id: self.edge,
            index_id: self.index,
            limit: self.limit,
            ..DumpOptions::default()
        }
    }
}

/// Store to read from.
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// RocksDB data directory
    #[arg(long)]
    pub path: PathBuf,
}

/// Run blocking core work off the async runtime.
pub(crate) async fn run_blocking<T, F>(work: F) -> DumpResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> DumpResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DumpError::Internal(format!("blocking task failed: {}", e)))?
}

/// A token cancelled on Ctrl-C.
pub(crate) fn interrupt_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = on_signal.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("failed to listen for Ctrl-C: {}", e);
                    return;
                }
                info!("interrupted, cancelling");
                on_signal.cancel();
            }
        }
    });
    cancel
}

pub(crate) fn print_records(records: &[KVString]) {
    if records.is_empty() {
        info!("no records found");
    }
    for record in records {
        println!("{}", record);
    }
}

/// Print raw records as decimal byte lists.
pub(crate) fn print_raw(kvs: &[KV]) {
    let rendered: Vec<KVString> = kvs.iter().map(KV::to_decimal_strings).collect();
    print_records(&rendered);
}
