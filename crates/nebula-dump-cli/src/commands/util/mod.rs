//! Utility commands
//!
//! - `util part-id`: which partition owns a vid
//! - `util convert`: rewrite a key between notations
//! - `util ingest`: ingest SST files into a writable store
//! - `util prefix`: raw prefix scan

pub mod convert;
pub mod ingest;
pub mod part_id;
pub mod prefix;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum UtilCommands {
    /// Compute the partition owning a vid
    PartId(part_id::PartIdArgs),

    /// Convert a key between bytes, string and int notation
    ///
    /// ```bash
    /// nebula-dump util convert --key-type string --key __meta_version__ --to-type bytes
    /// nebula-dump util convert --key-type bytes --key 255,0,0 --to-type int
    /// ```
    Convert(convert::ConvertArgs),

    /// Ingest every file of a directory into a store, creating it if needed
    Ingest(ingest::IngestArgs),

    /// Print raw records under a byte prefix
    Prefix(prefix::PrefixArgs),
}

pub async fn handle_util_command(action: UtilCommands) -> i32 {
    match action {
        UtilCommands::PartId(args) => part_id::handle_part_id(args),
        UtilCommands::Convert(args) => convert::handle_convert(args),
        UtilCommands::Ingest(args) => ingest::handle_ingest(args).await,
        UtilCommands::Prefix(args) => prefix::handle_prefix(args).await,
    }
}
