//! Per record kind scan and decode.
//!
//! Each record kind is a variant of [`MetaKind`] or [`StorageKind`]. A
//! parser is built with a plain constructor from an engine and a
//! [`DumpOptions`](crate::DumpOptions), then offers:
//!
//! - `prefix()`: the raw records matching the options
//! - `parse(kv)`: one record decoded to a [`KVString`](crate::KVString)
//! - `parse_all()`: `prefix()` then `parse()` on every record; the first
//!   failure aborts the call and carries the offending key and value

mod meta;
mod storage;

use std::fmt;
use std::str::FromStr;

pub use meta::MetaParser;
pub use storage::StorageParser;

use crate::engine::{KVString, KV};
use crate::error::{DumpError, DumpResult};

/// Metadata service record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKind {
    Spaces,
    Parts,
    Tags,
    Edges,
    Hosts,
    Machines,
    Indexes,
}

impl MetaKind {
    pub const ALL: [MetaKind; 7] = [
        MetaKind::Spaces,
        MetaKind::Parts,
        MetaKind::Tags,
        MetaKind::Edges,
        MetaKind::Hosts,
        MetaKind::Machines,
        MetaKind::Indexes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetaKind::Spaces => "spaces",
            MetaKind::Parts => "parts",
            MetaKind::Tags => "tags",
            MetaKind::Edges => "edges",
            MetaKind::Hosts => "hosts",
            MetaKind::Machines => "machines",
            MetaKind::Indexes => "indexes",
        }
    }
}

/// Storage daemon record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Tags,
    Edges,
    Indexes,
}

impl StorageKind {
    pub const ALL: [StorageKind; 3] = [StorageKind::Tags, StorageKind::Edges, StorageKind::Indexes];

    pub fn name(self) -> &'static str {
        match self {
            StorageKind::Tags => "tags",
            StorageKind::Edges => "edges",
            StorageKind::Indexes => "indexes",
        }
    }
}

macro_rules! impl_kind_str {
    ($($kind:ty),*) => {
        $(
            impl fmt::Display for $kind {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }

            impl FromStr for $kind {
                type Err = DumpError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::ALL
                        .into_iter()
                        .find(|k| k.name() == s)
                        .ok_or_else(|| {
                            let names: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                            DumpError::config(format!(
                                "unknown record kind '{}', expected one of {}",
                                s,
                                names.join(", ")
                            ))
                        })
                }
            }
        )*
    };
}

impl_kind_str!(MetaKind, StorageKind);

/// Decode every record, failing on the first bad one.
pub(crate) fn parse_each<F>(kind: &str, kvs: &[KV], mut parse: F) -> DumpResult<Vec<KVString>>
where
    F: FnMut(&KV) -> DumpResult<KVString>,
{
    kvs.iter()
        .map(|kv| parse(kv).map_err(|e| e.in_record(kind, &kv.key, &kv.value)))
        .collect()
}
