//! nebula-dump CLI
//!
//! Inspect the RocksDB data directories of a NebulaGraph cluster offline.
//!
//! # Commands
//!
//! - `meta <kind>`: decode meta service records
//! - `storage <kind>`: decode tag, edge and index records
//! - `get`, `scan`, `count`: raw access to any store
//! - `export`: copy partitions into per-partition stores
//! - `util`: part-id, convert, ingest, prefix
//!
//! Decoded records go to stdout, logs to stderr. Exit code 1 on error, 2
//! when the data itself fails to decode.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;
mod key_format;

/// nebula-dump - decode NebulaGraph on-disk data
#[derive(Parser)]
#[command(name = "nebula-dump")]
#[command(version)]
#[command(about = "A tool to decode nebula-graph data")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode meta service records
    Meta(commands::meta::MetaArgs),
    /// Decode storage records using the space schema
    Storage(commands::storage::StorageArgs),
    /// Look up one raw key
    Get(commands::get::GetArgs),
    /// Scan raw keys by range or count
    Scan(commands::scan::ScanArgs),
    /// Count keys of one kind across partitions
    Count(commands::count::CountArgs),
    /// Export partitions into per-partition stores
    Export(commands::export::ExportArgs),
    /// Utility commands
    Util {
        #[command(subcommand)]
        action: commands::util::UtilCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Meta(args) => commands::meta::handle_meta(args).await,
        Commands::Storage(args) => commands::storage::handle_storage(args).await,
        Commands::Get(args) => commands::get::handle_get(args).await,
        Commands::Scan(args) => commands::scan::handle_scan(args).await,
        Commands::Count(args) => commands::count::handle_count(args).await,
        Commands::Export(args) => commands::export::handle_export(args).await,
        Commands::Util { action } => commands::util::handle_util_command(action).await,
    };

    std::process::exit(exit_code);
}
