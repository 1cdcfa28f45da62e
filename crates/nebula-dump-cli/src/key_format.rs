//! Textual notations for raw keys on the command line.

use clap::ValueEnum;
use nebula_dump_core::codec::{bytes_to_decimal_string, bytes_to_int, int_to_bytes};
use nebula_dump_core::{ByteOrder, DumpError, DumpResult};

/// How a key given on the command line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyFormat {
    /// Comma separated decimal bytes, e.g. `95,95,115`
    Bytes,
    /// The UTF-8 bytes of the text as is
    String,
    /// A signed 64-bit integer in host byte order
    Int,
}

impl KeyFormat {
    /// Parse `text` into raw bytes. Empty text is an empty key in every
    /// notation.
    pub fn parse(self, text: &str, order: ByteOrder) -> DumpResult<Vec<u8>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        match self {
            KeyFormat::Bytes => text
                .split(',')
                .map(|part| {
                    part.trim().parse::<u8>().map_err(|e| {
                        DumpError::config(format!("invalid byte '{}' in '{}': {}", part, text, e))
                    })
                })
                .collect(),
            KeyFormat::String => Ok(text.as_bytes().to_vec()),
            KeyFormat::Int => {
                let v: i64 = text.trim().parse().map_err(|e| {
                    DumpError::config(format!("invalid integer key '{}': {}", text, e))
                })?;
                Ok(int_to_bytes(v, order))
            }
        }
    }

    /// Render raw bytes in this notation.
    pub fn render(self, bytes: &[u8], order: ByteOrder) -> DumpResult<String> {
        match self {
            KeyFormat::Bytes => Ok(bytes_to_decimal_string(bytes)),
            KeyFormat::String => Ok(String::from_utf8_lossy(bytes).to_string()),
            KeyFormat::Int => {
                if bytes.len() > 8 {
                    return Err(DumpError::config(format!(
                        "{} bytes do not fit in a 64-bit integer",
                        bytes.len()
                    )));
                }
                Ok(bytes_to_int::<i64>(bytes, order).to_string())
            }
        }
    }
}
