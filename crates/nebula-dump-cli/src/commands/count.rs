//! `count`: count records of one kind across all partitions.
//!
//! ```bash
//! nebula-dump count --path nebula/data/storage/nebula/1/data --prefix-type 7 --part-num 100
//! nebula-dump count --path nebula/data/storage/nebula/1/data --prefix-type 7 --part-num 100 --prefix 1,0,0,0
//! ```
//!
//! `--prefix` is appended after each partition word.

use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{ByteOrder, Dumper, Engine};
use tracing::debug;

use super::{interrupt_token, PathArgs};
use crate::error::report;
use crate::key_format::KeyFormat;

#[derive(Args, Debug)]
pub struct CountArgs {
    #[command(flatten)]
    pub store: PathArgs,

    /// Notation of --prefix
    #[arg(long, value_enum, default_value_t = KeyFormat::Bytes)]
    pub key_type: KeyFormat,

    /// Extra key bytes after the partition word
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Record kind byte: 1 tag, 2 edge, 3 index, 7 vertex
    #[arg(long, default_value_t = 1)]
    pub prefix_type: u8,

    /// Number of partitions to visit
    #[arg(long, default_value_t = 100)]
    pub part_num: i32,
}

pub async fn handle_count(args: CountArgs) -> i32 {
    let order = ByteOrder::native();
    let extra = match args.key_type.parse(&args.prefix, order) {
        Ok(extra) => extra,
        Err(e) => return report("invalid prefix", &e),
    };
    debug!(?args, "count");

    let dumper = Dumper::new(Arc::new(Engine::read_only(&args.store.path)), order);
    match dumper
        .count_raw(args.part_num, args.prefix_type, extra, &interrupt_token())
        .await
    {
        Ok(total) => {
            println!("key count is {}", total);
            0
        }
        Err(e) => report("count failed", &e),
    }
}
