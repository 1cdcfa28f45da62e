use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{Engine, EngineConfig};

use crate::commands::run_blocking;
use crate::error::report;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Directory holding the SST files
    #[arg(long)]
    pub sst_path: PathBuf,

    /// Store to ingest into
    #[arg(long)]
    pub to_path: PathBuf,
}

pub async fn handle_ingest(args: IngestArgs) -> i32 {
    let engine = Arc::new(Engine::new(&args.to_path, EngineConfig::writable()));
    let sst_path = args.sst_path.clone();
    match run_blocking(move || engine.ingest_dir(&sst_path)).await {
        Ok(n) => {
            println!("ingested {} files into {}", n, args.to_path.display());
            0
        }
        Err(e) => report("ingest failed", &e),
    }
}
