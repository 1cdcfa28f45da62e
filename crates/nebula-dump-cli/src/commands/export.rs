//! `export`: copy partitions into `<out>/<part>/<kind>.sst` stores.
//!
//! ```bash
//! nebula-dump export --path nebula/data/storage/nebula/1/data --out . --parts 1,2,3
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use nebula_dump_core::engine::export_parts;
use nebula_dump_core::{ByteOrder, DumpError, Engine};
use tracing::info;

use super::PathArgs;
use crate::error::{exit_code_for_error, report, CliExitCode};

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub store: PathArgs,

    /// Output directory
    #[arg(long)]
    pub out: PathBuf,

    /// Partitions to export, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub parts: Vec<i32>,
}

pub async fn handle_export(args: ExportArgs) -> i32 {
    let engine = Arc::new(Engine::read_only(&args.store.path));
    let handles = export_parts(engine, args.out.clone(), &args.parts, ByteOrder::native());

    let mut code = CliExitCode::Success;
    let mut total = 0u64;
    for (part, handle) in args.parts.iter().zip(handles) {
        let result = handle
            .await
            .map_err(|e| DumpError::Internal(format!("export task failed: {}", e)))
            .and_then(|r| r);
        match result {
            Ok(n) => {
                println!("part {}: {} records", part, n);
                total += n;
            }
            Err(e) => {
                report(&format!("export of part {} failed", part), &e);
                code = exit_code_for_error(&e);
            }
        }
    }
    info!(out = %args.out.display(), total, "export finished");
    code.into()
}
