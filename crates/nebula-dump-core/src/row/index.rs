//! Index key field values.
//!
//! Values are laid out back to back in index field order, big-endian so
//! that byte order matches value order:
//!
//! | type                         | width       | encoding                    |
//! |------------------------------|-------------|-----------------------------|
//! | BOOL                         | 1           | 0 / 1                       |
//! | INT8..INT64, TIMESTAMP       | 8           | sign bit flipped            |
//! | FLOAT, DOUBLE                | 8           | order-preserving IEEE 754   |
//! | STRING, FIXED_STRING         | type_length | zero padded                 |
//! | DATE / TIME / DATETIME       | 4 / 7 / 11  | packed fields               |
//!
//! A 2-byte nullable bitmap (host order, field `i` is bit `0x8000 >> i`)
//! follows the values when any field is nullable.

use super::reader::{read_date, read_datetime, read_time};
use super::Value;
use crate::codec::{bytes_to_int, ByteCursor, ByteOrder};
use crate::error::{DumpError, DumpResult};
use crate::thrift::{ColumnDef, IndexItem, PropertyType};

/// Rendering of a null index field.
pub const INDEX_NULL: &str = "__null__";

const SIGN: u64 = 1 << 63;
const BITMAP_WIDTH: usize = 2;

/// Width of one field inside an index key.
///
/// # Errors
///
/// * `DumpError::UnsupportedType` - the type has no fixed key width
pub fn index_field_width(field: &ColumnDef) -> DumpResult<usize> {
    let width = match field.type_.type_ {
        PropertyType::Bool => 1,
        PropertyType::Int8
        | PropertyType::Int16
        | PropertyType::Int32
        | PropertyType::Int64
        | PropertyType::Timestamp
        | PropertyType::Float
        | PropertyType::Double => 8,
        PropertyType::String | PropertyType::FixedString => {
            usize::try_from(field.type_.type_length).map_err(|_| {
                DumpError::malformed(format!(
                    "negative length on index field {}",
                    field.name_lossy()
                ))
            })?
        }
        PropertyType::Date => 4,
        PropertyType::Time => 7,
        PropertyType::DateTime => 11,
        other => {
            return Err(DumpError::UnsupportedType(format!(
                "{} on index field {}",
                other,
                field.name_lossy()
            )))
        }
    };
    Ok(width)
}

/// Bytes between the index id and the vid: every field plus the bitmap.
pub fn index_key_width(index: &IndexItem) -> DumpResult<usize> {
    let mut width = 0;
    for field in &index.fields {
        width += index_field_width(field)?;
    }
    if index.has_nullable_field() {
        width += BITMAP_WIDTH;
    }
    Ok(width)
}

fn decode_double(bits: u64) -> f64 {
    if bits & SIGN != 0 {
        f64::from_bits(bits ^ SIGN)
    } else {
        f64::from_bits(!bits)
    }
}

fn decode_field(b: &[u8], field: &ColumnDef) -> DumpResult<Value> {
    let be = ByteOrder::Big;
    let value = match field.type_.type_ {
        PropertyType::Bool => Value::Bool(b[0] != 0),
        PropertyType::Int8
        | PropertyType::Int16
        | PropertyType::Int32
        | PropertyType::Int64
        | PropertyType::Timestamp => Value::Int((bytes_to_int::<u64>(b, be) ^ SIGN) as i64),
        PropertyType::Float | PropertyType::Double => {
            Value::Float(decode_double(bytes_to_int::<u64>(b, be)))
        }
        PropertyType::String | PropertyType::FixedString => {
            let end = b.iter().rposition(|x| *x != 0).map_or(0, |p| p + 1);
            Value::String(b[..end].to_vec())
        }
        PropertyType::Date => read_date(b, be),
        PropertyType::Time => read_time(b, be),
        PropertyType::DateTime => read_datetime(b, be),
        other => return Err(DumpError::UnsupportedType(other.to_string())),
    };
    Ok(value)
}

/// Decode the value region of an index key (fields plus bitmap).
///
/// Null fields come back as [`Value::Null`] whatever bytes they hold.
pub fn decode_index_values(
    region: &[u8],
    index: &IndexItem,
    order: ByteOrder,
) -> DumpResult<Vec<(String, Value)>> {
    let mut c = ByteCursor::new(region, "index values");
    let mut values = Vec::with_capacity(index.fields.len());
    for field in &index.fields {
        let raw = c.take(index_field_width(field)?)?;
        values.push((field.name_lossy(), decode_field(raw, field)?));
    }

    if index.has_nullable_field() {
        let bitmap: u16 = c.read(order)?;
        for (i, (_, value)) in values.iter_mut().enumerate().take(16) {
            if bitmap & (0x8000 >> i) != 0 {
                *value = Value::Null;
            }
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thrift::SchemaId;

    fn index(fields: Vec<ColumnDef>) -> IndexItem {
        IndexItem {
            index_id: 1,
            index_name: b"idx".to_vec(),
            schema_id: SchemaId::Tag(1),
            fields,
            ..IndexItem::default()
        }
    }

    fn encode_double(v: f64) -> [u8; 8] {
        let bits = v.to_bits();
        let out = if v.is_sign_negative() { !bits } else { bits ^ SIGN };
        out.to_be_bytes()
    }

    #[test]
    fn test_widths() {
        let idx = index(vec![
            ColumnDef::new("a", PropertyType::Int32, 0, false),
            ColumnDef::new("b", PropertyType::FixedString, 10, false),
        ]);
        assert_eq!(index_key_width(&idx).unwrap(), 18);

        let idx = index(vec![ColumnDef::new("a", PropertyType::Bool, 0, true)]);
        assert_eq!(index_key_width(&idx).unwrap(), 3);

        let idx = index(vec![ColumnDef::new("g", PropertyType::Geography, 0, false)]);
        assert!(matches!(
            index_key_width(&idx).unwrap_err(),
            DumpError::UnsupportedType(_)
        ));
    }

    #[test]
    fn test_decode_values() {
        let idx = index(vec![
            ColumnDef::new("age", PropertyType::Int64, 0, false),
            ColumnDef::new("score", PropertyType::Double, 0, false),
            ColumnDef::new("name", PropertyType::FixedString, 5, false),
        ]);
        let mut region = ((-5i64 as u64) ^ SIGN).to_be_bytes().to_vec();
        region.extend_from_slice(&encode_double(-2.5));
        region.extend_from_slice(b"Tim\0\0");

        let values = decode_index_values(&region, &idx, ByteOrder::Little).unwrap();
        assert_eq!(values[0], ("age".to_string(), Value::Int(-5)));
        assert_eq!(values[1], ("score".to_string(), Value::Float(-2.5)));
        assert_eq!(values[2], ("name".to_string(), Value::String(b"Tim".to_vec())));
    }

    #[test]
    fn test_double_encoding_preserves_order() {
        let xs = [-10.0, -0.5, 0.0, 0.5, 3.0];
        for w in xs.windows(2) {
            assert!(encode_double(w[0]) < encode_double(w[1]));
        }
        for x in xs {
            assert_eq!(decode_double(u64::from_be_bytes(encode_double(x))), x);
        }
    }

    #[test]
    fn test_nullable_bitmap() {
        let idx = index(vec![
            ColumnDef::new("a", PropertyType::Int64, 0, true),
            ColumnDef::new("b", PropertyType::Int64, 0, true),
        ]);
        let mut region = (1u64 ^ SIGN).to_be_bytes().to_vec();
        region.extend_from_slice(&(2u64 ^ SIGN).to_be_bytes());
        region.extend_from_slice(&0x4000u16.to_le_bytes());

        let values = decode_index_values(&region, &idx, ByteOrder::Little).unwrap();
        assert_eq!(values[0].1, Value::Int(1));
        assert_eq!(values[1].1, Value::Null);

        // Missing bitmap.
        assert!(decode_index_values(&region[..16], &idx, ByteOrder::Little).is_err());
    }
}
