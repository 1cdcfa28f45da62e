//! `scan`: raw records from a start key, bounded by an end key or a count.
//!
//! ```bash
//! nebula-dump scan --path nebula/data/storage/nebula/1/data --start 255,255,255,255 --limit 2
//! nebula-dump scan --path nebula/data/storage/nebula/1/data --key-type string --start key1 --end key2
//! ```
//!
//! With `--end` the range is `[start, end)` and `--limit` is ignored.

use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{ByteOrder, Dumper, Engine};
use tracing::debug;

use super::{interrupt_token, print_raw, PathArgs};
use crate::error::report;
use crate::key_format::KeyFormat;

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub store: PathArgs,

    /// Notation of --start and --end
    #[arg(long, value_enum, default_value_t = KeyFormat::Bytes)]
    pub key_type: KeyFormat,

    /// First key; empty starts at the beginning of the store
    #[arg(long, default_value = "")]
    pub start: String,

    /// Exclusive upper bound
    #[arg(long)]
    pub end: Option<String>,

    /// Number of records when no --end is given
    #[arg(long, default_value_t = 1)]
    pub limit: usize,
}

pub async fn handle_scan(args: ScanArgs) -> i32 {
    let order = ByteOrder::native();
    let start = match args.key_type.parse(&args.start, order) {
        Ok(start) => start,
        Err(e) => return report("invalid start key", &e),
    };
    let dumper = Dumper::new(Arc::new(Engine::read_only(&args.store.path)), order);
    let cancel = interrupt_token();

    let result = match &args.end {
        Some(end) => {
            let end = match args.key_type.parse(end, order) {
                Ok(end) => end,
                Err(e) => return report("invalid end key", &e),
            };
            debug!(start = ?start, end = ?end, "scan by range");
            dumper.scan_by_range(start, end, &cancel).await
        }
        None => {
            debug!(start = ?start, limit = args.limit, "scan by count");
            dumper.scan_by_count(start, args.limit, &cancel).await
        }
    };

    match result {
        Ok(kvs) => {
            print_raw(&kvs);
            0
        }
        Err(e) => report("scan failed", &e),
    }
}
