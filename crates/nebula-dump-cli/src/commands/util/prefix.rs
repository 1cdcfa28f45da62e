use std::sync::Arc;

use clap::Args;
use nebula_dump_core::{ByteOrder, Engine};

use crate::commands::{print_raw, run_blocking, PathArgs};
use crate::error::report;
use crate::key_format::KeyFormat;

#[derive(Args, Debug)]
pub struct PrefixArgs {
    #[command(flatten)]
    pub store: PathArgs,

    /// Key prefix as decimal bytes, e.g. 7,0,0,0
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Maximum number of records
    #[arg(long, default_value_t = 20, allow_hyphen_values = true)]
    pub limit: i64,
}

pub async fn handle_prefix(args: PrefixArgs) -> i32 {
    let prefix = match KeyFormat::Bytes.parse(&args.prefix, ByteOrder::native()) {
        Ok(prefix) => prefix,
        Err(e) => return report("invalid prefix", &e),
    };
    let engine = Arc::new(Engine::read_only(&args.store.path));
    let limit = args.limit;
    match run_blocking(move || engine.prefix(&prefix, limit)).await {
        Ok(kvs) => {
            print_raw(&kvs);
            0
        }
        Err(e) => report("prefix scan failed", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_store_exits_one() {
        let dir = TempDir::new().unwrap();
        let code = handle_prefix(PrefixArgs {
            store: PathArgs {
                path: dir.path().join("absent"),
            },
            prefix: "7,0,0,0".to_string(),
            limit: 20,
        })
        .await;
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_bad_prefix_exits_one() {
        let code = handle_prefix(PrefixArgs {
            store: PathArgs {
                path: "/unused".into(),
            },
            prefix: "7,x".to_string(),
            limit: 20,
        })
        .await;
        assert_eq!(code, 1);
    }
}
