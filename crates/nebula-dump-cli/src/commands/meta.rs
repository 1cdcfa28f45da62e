//! `meta <kind>`: decode records of a meta service store.
//!
//! ```bash
//! nebula-dump meta spaces --path nebula/data/meta/nebula/0/data
//! nebula-dump meta tags --path nebula/data/meta/nebula/0/data --space 1 --tag 2
//! nebula-dump meta parts --path nebula/data/meta/nebula/0/data --space 1 --raw
//! ```

use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{ByteOrder, Engine, MetaKind, MetaParser};
use tracing::debug;

use super::{print_raw, print_records, run_blocking, FilterArgs, PathArgs};
use crate::error::report;

#[derive(Args, Debug)]
pub struct MetaArgs {
    /// Record kind: spaces, parts, tags, edges, hosts, machines or indexes
    pub kind: MetaKind,

    #[command(flatten)]
    pub store: PathArgs,

    /// Print raw key and value bytes instead of decoding
    #[arg(long)]
    pub raw: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub async fn handle_meta(args: MetaArgs) -> i32 {
    debug!(?args, "meta command");
    let engine = Arc::new(Engine::read_only(&args.store.path));
    let parser = MetaParser::new(
        args.kind,
        engine,
        args.filter.to_options(),
        ByteOrder::native(),
    );

    if args.raw {
        match run_blocking(move || parser.prefix()).await {
            Ok(kvs) => print_raw(&kvs),
            Err(e) => return report("meta scan failed", &e),
        }
    } else {
        match run_blocking(move || parser.parse_all()).await {
            Ok(records) => print_records(&records),
            Err(e) => return report("meta decode failed", &e),
        }
    }
    0
}
