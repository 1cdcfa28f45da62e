use clap::{Args, ValueEnum};
use nebula_dump_core::codec::int_to_bytes;
use nebula_dump_core::{get_partition_id, ByteOrder, DumpError, DumpResult};

use crate::error::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VidType {
    String,
    Int,
}

#[derive(Args, Debug)]
pub struct PartIdArgs {
    /// Vertex id
    #[arg(long, allow_hyphen_values = true)]
    pub vid: String,

    #[arg(long, value_enum, default_value_t = VidType::String)]
    pub vid_type: VidType,

    /// Partition count of the space
    #[arg(long)]
    pub parts_count: i32,

    /// Fixed vid length of the space; defaults to 8 for int vids and to the
    /// vid's own length for string vids
    #[arg(long)]
    pub vid_len: Option<usize>,
}

/// Partition of the vid described by `args`.
pub fn part_id(args: &PartIdArgs, order: ByteOrder) -> DumpResult<i32> {
    let bytes = match args.vid_type {
        VidType::String => args.vid.as_bytes().to_vec(),
        VidType::Int => {
            let v: i64 = args.vid.trim().parse().map_err(|e| {
                DumpError::config(format!("invalid integer vid '{}': {}", args.vid, e))
            })?;
            int_to_bytes(v, order)
        }
    };
    let vid_len = args.vid_len.unwrap_or(bytes.len());
    get_partition_id(&bytes, args.parts_count, vid_len, order)
}

pub fn handle_part_id(args: PartIdArgs) -> i32 {
    match part_id(&args, ByteOrder::native()) {
        Ok(id) => {
            println!("part id is: {}", id);
            0
        }
        Err(e) => report("cannot compute part id", &e),
    }
}
