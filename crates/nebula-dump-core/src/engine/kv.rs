//! Raw and decoded record types.

use crate::codec::bytes_to_decimal_string;

/// One record copied out of the store.
///
/// Key and value are owned copies, independent of any iterator buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KV {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KV {
    pub fn new(key: &[u8], value: &[u8]) -> Self {
        Self {
            key: key.to_vec(),
            value: value.to_vec(),
        }
    }

    /// Both halves as comma separated decimal bytes.
    pub fn to_decimal_strings(&self) -> KVString {
        KVString {
            key: bytes_to_decimal_string(&self.key),
            value: bytes_to_decimal_string(&self.value),
        }
    }
}

/// Human readable form of a decoded record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KVString {
    pub key: String,
    pub value: String,
}

impl KVString {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for KVString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "key: {}, value: {}", self.key, self.value)
    }
}
