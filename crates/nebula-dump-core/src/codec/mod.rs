//! Fixed-width integer <-> byte conversion.
//!
//! NebulaGraph writes most integers in keys and values with the host's native
//! byte order (`memcpy` of the in-memory representation). The few exceptions
//! (edge rank, index values) are big-endian and say so explicitly. Every call
//! takes a [`ByteOrder`] instead of consulting a process-wide setting.
//!
//! Short inputs are right-padded with zero bytes before decoding, so a
//! truncated trailing field decodes as if its missing high-order bytes were 0.

mod cursor;
mod murmur;

pub use cursor::ByteCursor;
pub(crate) use cursor::slice;
pub use murmur::{murmur_hash64, MURMUR_SEED};

use crate::error::{DumpError, DumpResult};

/// Byte order used to lay out integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Probe the host's byte order at runtime.
    pub fn native() -> Self {
        let probe = 0x0102_0304u32.to_ne_bytes();
        if probe[0] == 0x04 {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::native()
    }
}

/// Integer types with a fixed encoded width of 1, 2, 4 or 8 bytes.
pub trait FixedInt: Copy + Sized {
    /// Encoded width in bytes.
    const WIDTH: usize;

    /// Encode with the given byte order.
    fn encode(self, order: ByteOrder) -> Vec<u8>;

    /// Decode from exactly `WIDTH` bytes.
    fn decode(bytes: &[u8], order: ByteOrder) -> Self;
}

macro_rules! impl_fixed_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedInt for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn encode(self, order: ByteOrder) -> Vec<u8> {
                    match order {
                        ByteOrder::Little => self.to_le_bytes().to_vec(),
                        ByteOrder::Big => self.to_be_bytes().to_vec(),
                    }
                }

                fn decode(bytes: &[u8], order: ByteOrder) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$t>()];
                    buf.copy_from_slice(&bytes[..Self::WIDTH]);
                    match order {
                        ByteOrder::Little => <$t>::from_le_bytes(buf),
                        ByteOrder::Big => <$t>::from_be_bytes(buf),
                    }
                }
            }
        )*
    };
}

impl_fixed_int!(i8, u8, i16, u16, i32, u32, i64, u64);

/// Encode `value` with `order`.
#[inline]
pub fn int_to_bytes<T: FixedInt>(value: T, order: ByteOrder) -> Vec<u8> {
    value.encode(order)
}

/// Decode a `T` from `bytes`.
///
/// Fewer than `T::WIDTH` bytes are right-padded with zeros; extra bytes are
/// ignored.
pub fn bytes_to_int<T: FixedInt>(bytes: &[u8], order: ByteOrder) -> T {
    if bytes.len() >= T::WIDTH {
        return T::decode(bytes, order);
    }
    let mut padded = bytes.to_vec();
    padded.resize(T::WIDTH, 0);
    T::decode(&padded, order)
}

/// Encode `value` truncated to `width` bytes.
///
/// Fails unless `width` is 1, 2, 4 or 8.
pub fn int_to_bytes_width(value: i64, width: usize, order: ByteOrder) -> DumpResult<Vec<u8>> {
    match width {
        1 => Ok(int_to_bytes(value as i8, order)),
        2 => Ok(int_to_bytes(value as i16, order)),
        4 => Ok(int_to_bytes(value as i32, order)),
        8 => Ok(int_to_bytes(value, order)),
        other => Err(DumpError::config(format!(
            "integer width must be 1, 2, 4 or 8 bytes, got {}",
            other
        ))),
    }
}

/// Decode a signed integer of `width` bytes, sign-extended to `i64`.
///
/// Fails unless `width` is 1, 2, 4 or 8.
pub fn bytes_to_int_width(bytes: &[u8], width: usize, order: ByteOrder) -> DumpResult<i64> {
    match width {
        1 => Ok(bytes_to_int::<i8>(bytes, order) as i64),
        2 => Ok(bytes_to_int::<i16>(bytes, order) as i64),
        4 => Ok(bytes_to_int::<i32>(bytes, order) as i64),
        8 => Ok(bytes_to_int::<i64>(bytes, order)),
        other => Err(DumpError::config(format!(
            "integer width must be 1, 2, 4 or 8 bytes, got {}",
            other
        ))),
    }
}

/// Render bytes as comma separated decimals, e.g. `95,95,115`.
pub fn bytes_to_decimal_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
