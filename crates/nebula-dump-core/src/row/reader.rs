//! Row blob decoding.
//!
//! ```text
//! header   : byte0 (low 3 bits = l) + version(l bytes, zero padded to 8)
//! nulls    : ceil(nullable columns / 8) bytes, MSB first, if any column is nullable
//! fixed    : one slot per column in schema order
//! strings  : STRING slots hold offset(4) + len(4) into the whole blob
//! timestamp: last 8 bytes of the blob
//! ```

use super::{Row, Value};
use crate::codec::{bytes_to_int, slice, ByteCursor, ByteOrder};
use crate::error::{DumpError, DumpResult};
use crate::thrift::{ColumnDef, PropertyType, Schema};

/// Width of the trailing write timestamp.
pub const TIMESTAMP_WIDTH: usize = 8;

const DATE_WIDTH: usize = 4;
const TIME_WIDTH: usize = 7;
const DATETIME_WIDTH: usize = 11;

/// Version header at the front of a row blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHeader {
    pub version: i64,
    /// Header length in bytes, including byte 0.
    pub len: usize,
}

impl RowHeader {
    /// # Errors
    ///
    /// * `DumpError::MalformedRecord` - the blob is empty or shorter than
    ///   the declared version width
    pub fn parse(value: &[u8], order: ByteOrder) -> DumpResult<Self> {
        let first = *value
            .first()
            .ok_or_else(|| DumpError::malformed("empty row value"))?;
        let l = (first & 0x07) as usize;
        if l == 0 {
            return Ok(Self { version: 0, len: 1 });
        }
        let raw = slice(value, 1, l, "row version")?;
        Ok(Self {
            version: bytes_to_int(raw, order),
            len: l + 1,
        })
    }
}

/// Reads column values out of one row blob.
pub struct RowReader<'a> {
    schema: &'a Schema,
    buf: &'a [u8],
    header_len: usize,
    null_bytes: usize,
    order: ByteOrder,
}

impl<'a> RowReader<'a> {
    pub fn new(schema: &'a Schema, buf: &'a [u8], header: RowHeader, order: ByteOrder) -> Self {
        let nullable = schema.columns.iter().filter(|c| c.nullable).count();
        let null_bytes = if nullable == 0 { 0 } else { ((nullable - 1) >> 3) + 1 };
        Self {
            schema,
            buf,
            header_len: header.len,
            null_bytes,
            order,
        }
    }

    /// Decode every column in schema order.
    ///
    /// Null columns still consume their fixed slot.
    pub fn read(&self) -> DumpResult<Vec<Value>> {
        let fixed_start = self.header_len + self.null_bytes;
        let end = self
            .buf
            .len()
            .checked_sub(TIMESTAMP_WIDTH)
            .ok_or_else(|| DumpError::malformed("row value shorter than its timestamp"))?;
        let region = self.buf.get(fixed_start..end).ok_or_else(|| {
            DumpError::malformed(format!(
                "row value of {} bytes has no room for its header",
                self.buf.len()
            ))
        })?;

        let mut cursor = ByteCursor::new(region, "row value");
        let mut nullable_idx = 0usize;
        let mut values = Vec::with_capacity(self.schema.columns.len());
        for column in &self.schema.columns {
            let is_null = if column.nullable {
                let null = self.is_null(nullable_idx)?;
                nullable_idx += 1;
                null
            } else {
                false
            };
            let value = self.read_column(&mut cursor, column)?;
            values.push(if is_null { Value::Null } else { value });
        }
        Ok(values)
    }

    fn is_null(&self, idx: usize) -> DumpResult<bool> {
        let byte = slice(self.buf, self.header_len + (idx >> 3), 1, "null bitmap")?[0];
        Ok(byte & (0x80 >> (idx & 7)) != 0)
    }

    fn read_column(&self, c: &mut ByteCursor<'_>, column: &ColumnDef) -> DumpResult<Value> {
        let order = self.order;
        let ty = column.type_.type_;
        let value = match ty {
            PropertyType::Bool => Value::Bool(c.take(1)?[0] != 0),
            PropertyType::Int8 => Value::Int(c.read::<i8>(order)? as i64),
            PropertyType::Int16 => Value::Int(c.read::<i16>(order)? as i64),
            PropertyType::Int32 => Value::Int(c.read::<i32>(order)? as i64),
            PropertyType::Int64 | PropertyType::Timestamp => Value::Int(c.read::<i64>(order)?),
            PropertyType::Float => Value::Float(f32::from_bits(c.read::<u32>(order)?) as f64),
            PropertyType::Double => Value::Float(f64::from_bits(c.read::<u64>(order)?)),
            PropertyType::FixedString => {
                let len = usize::try_from(column.type_.type_length).map_err(|_| {
                    DumpError::malformed(format!(
                        "negative fixed string length on column {}",
                        column.name_lossy()
                    ))
                })?;
                Value::String(trim_nul(c.take(len)?).to_vec())
            }
            PropertyType::String => {
                let offset: i32 = c.read(order)?;
                let len: i32 = c.read(order)?;
                let (offset, len) = match (usize::try_from(offset), usize::try_from(len)) {
                    (Ok(o), Ok(l)) => (o, l),
                    _ => {
                        return Err(DumpError::malformed(format!(
                            "negative string offset {} or length {}",
                            offset, len
                        )))
                    }
                };
                Value::String(slice(self.buf, offset, len, "string column")?.to_vec())
            }
            PropertyType::Date => read_date(c.take(DATE_WIDTH)?, order),
            PropertyType::Time => read_time(c.take(TIME_WIDTH)?, order),
            PropertyType::DateTime => read_datetime(c.take(DATETIME_WIDTH)?, order),
            other => {
                return Err(DumpError::UnsupportedType(format!(
                    "{} on column {}",
                    other,
                    column.name_lossy()
                )))
            }
        };
        Ok(value)
    }
}

fn trim_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|b| *b != 0).map_or(0, |p| p + 1);
    &bytes[..end]
}

pub(crate) fn read_date(b: &[u8], order: ByteOrder) -> Value {
    Value::Date {
        year: bytes_to_int(&b[0..2], order),
        month: b[2] as i8,
        day: b[3] as i8,
    }
}

pub(crate) fn read_time(b: &[u8], order: ByteOrder) -> Value {
    Value::Time {
        hour: b[0] as i8,
        minute: b[1] as i8,
        sec: b[2] as i8,
        microsec: bytes_to_int(&b[3..7], order),
    }
}

pub(crate) fn read_datetime(b: &[u8], order: ByteOrder) -> Value {
    Value::DateTime {
        year: bytes_to_int(&b[0..2], order),
        month: b[2] as i8,
        day: b[3] as i8,
        hour: b[4] as i8,
        minute: b[5] as i8,
        sec: b[6] as i8,
        microsec: bytes_to_int(&b[7..11], order),
    }
}

/// Decode a full row: header, columns and trailing timestamp.
///
/// `schema` must be the version named by `header`.
pub fn decode_row(
    value: &[u8],
    schema: &Schema,
    header: RowHeader,
    order: ByteOrder,
) -> DumpResult<Row> {
    let values = RowReader::new(schema, value, header, order).read()?;
    let ts_start = value.len() - TIMESTAMP_WIDTH;
    let timestamp = bytes_to_int(&value[ts_start..], order);
    Ok(Row {
        version: header.version,
        columns: schema.column_names().into_iter().zip(values).collect(),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LE: ByteOrder = ByteOrder::Little;

    fn schema(cols: Vec<ColumnDef>) -> Schema {
        Schema::new(cols)
    }

    #[test]
    fn test_header() {
        assert_eq!(RowHeader::parse(&[0x08], LE).unwrap(), RowHeader { version: 0, len: 1 });
        let h = RowHeader::parse(&[0x09, 0x05], LE).unwrap();
        assert_eq!(h, RowHeader { version: 5, len: 2 });
        assert!(RowHeader::parse(&[], LE).is_err());
        assert!(RowHeader::parse(&[0x03, 0x01], LE).is_err());
    }

    #[test]
    fn test_fixed_and_string_columns() {
        let s = schema(vec![
            ColumnDef::new("name", PropertyType::String, 0, false),
            ColumnDef::new("age", PropertyType::Int64, 0, false),
            ColumnDef::new("ok", PropertyType::Bool, 0, false),
        ]);
        // header(1) + string slot(8) + int(8) + bool(1) = 18, then "Tim", then ts
        let mut value = vec![0x08];
        value.extend_from_slice(&18i32.to_le_bytes());
        value.extend_from_slice(&3i32.to_le_bytes());
        value.extend_from_slice(&42i64.to_le_bytes());
        value.push(1);
        value.extend_from_slice(b"Tim");
        value.extend_from_slice(&1234i64.to_le_bytes());

        let header = RowHeader::parse(&value, LE).unwrap();
        let row = decode_row(&value, &s, header, LE).unwrap();
        assert_eq!(
            row.to_string(),
            "version:0, name:\"Tim\", age:42, ok:true, timestamp:1234"
        );
    }

    #[test]
    fn test_null_bitmap_consumes_slot() {
        let s = schema(vec![
            ColumnDef::new("a", PropertyType::Int32, 0, true),
            ColumnDef::new("b", PropertyType::Int32, 0, true),
        ]);
        // header(1) + bitmap(1): first nullable column is null
        let mut value = vec![0x08, 0x80];
        value.extend_from_slice(&7i32.to_le_bytes());
        value.extend_from_slice(&8i32.to_le_bytes());
        value.extend_from_slice(&0i64.to_le_bytes());

        let values = RowReader::new(&s, &value, RowHeader::parse(&value, LE).unwrap(), LE)
            .read()
            .unwrap();
        assert_eq!(values, vec![Value::Null, Value::Int(8)]);
    }

    #[test]
    fn test_extended_types() {
        let s = schema(vec![
            ColumnDef::new("d", PropertyType::Date, 0, false),
            ColumnDef::new("t", PropertyType::Time, 0, false),
            ColumnDef::new("f", PropertyType::Double, 0, false),
            ColumnDef::new("c", PropertyType::FixedString, 4, false),
        ]);
        let mut value = vec![0x08];
        value.extend_from_slice(&2020i16.to_le_bytes());
        value.extend_from_slice(&[2, 29]);
        value.extend_from_slice(&[23, 59, 58]);
        value.extend_from_slice(&500i32.to_le_bytes());
        value.extend_from_slice(&1.5f64.to_le_bytes());
        value.extend_from_slice(b"ab\0\0");
        value.extend_from_slice(&0i64.to_le_bytes());

        let values = RowReader::new(&s, &value, RowHeader::parse(&value, LE).unwrap(), LE)
            .read()
            .unwrap();
        let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
        assert_eq!(rendered, vec!["2020-02-29", "23:59:58.000500", "1.5", "\"ab\""]);
    }

    #[test]
    fn test_unsupported_and_truncated() {
        let s = schema(vec![ColumnDef::new("g", PropertyType::Geography, 0, false)]);
        let value = [0x08, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        let err = RowReader::new(&s, &value, RowHeader { version: 0, len: 1 }, LE)
            .read()
            .unwrap_err();
        assert!(matches!(err, DumpError::UnsupportedType(_)));

        let s = schema(vec![ColumnDef::new("n", PropertyType::Int64, 0, false)]);
        let value = [0x08, 1, 2, 0, 0, 0, 0, 0, 0, 0];
        let err = RowReader::new(&s, &value, RowHeader { version: 0, len: 1 }, LE)
            .read()
            .unwrap_err();
        assert!(err.is_malformed());
    }
}
