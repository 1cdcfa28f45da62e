use clap::Args;
use nebula_dump_core::ByteOrder;

use crate::error::report;
use crate::key_format::KeyFormat;

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Notation of --key
    #[arg(long, value_enum)]
    pub key_type: KeyFormat,

    /// Key to convert
    #[arg(long, allow_hyphen_values = true)]
    pub key: String,

    /// Target notation
    #[arg(long, value_enum)]
    pub to_type: KeyFormat,
}

pub fn handle_convert(args: ConvertArgs) -> i32 {
    let order = ByteOrder::native();
    let converted = args
        .key_type
        .parse(&args.key, order)
        .and_then(|bytes| args.to_type.render(&bytes, order));
    match converted {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(e) => report("cannot convert key", &e),
    }
}
