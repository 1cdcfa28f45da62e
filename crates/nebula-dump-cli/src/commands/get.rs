//! `get`: point lookup of one raw key.
//!
//! ```bash
//! nebula-dump get --path nebula/data/meta/nebula/0/data --key-type string --key __meta_version__
//! nebula-dump get --path nebula/data/storage/nebula/1/data --key 255,255,255,255
//! ```

use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{ByteOrder, Dumper, Engine};
use tracing::{debug, error};

use super::{interrupt_token, print_raw, PathArgs};
use crate::error::{report, CliExitCode};
use crate::key_format::KeyFormat;

#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub store: PathArgs,

    /// Notation of --key
    #[arg(long, value_enum, default_value_t = KeyFormat::Bytes)]
    pub key_type: KeyFormat,

    /// Key to look up
    #[arg(long)]
    pub key: String,
}

pub async fn handle_get(args: GetArgs) -> i32 {
    let order = ByteOrder::native();
    let key = match args.key_type.parse(&args.key, order) {
        Ok(key) => key,
        Err(e) => return report("invalid key", &e),
    };
    debug!(key = ?key, "get");

    let dumper = Dumper::new(Arc::new(Engine::read_only(&args.store.path)), order);
    match dumper.get(key, &interrupt_token()).await {
        Ok(Some(kv)) => {
            print_raw(&[kv]);
            0
        }
        Ok(None) => {
            error!("cannot find the key");
            CliExitCode::Error.into()
        }
        Err(e) => report("get failed", &e),
    }
}
