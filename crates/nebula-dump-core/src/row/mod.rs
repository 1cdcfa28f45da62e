//! Typed values decoded from row blobs and index keys.

mod index;
mod reader;

use std::fmt;

pub use index::{decode_index_values, index_field_width, index_key_width, INDEX_NULL};
pub use reader::{decode_row, RowHeader, RowReader, TIMESTAMP_WIDTH};

/// One decoded column or index field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(Vec<u8>),
    Date {
        year: i16,
        month: i8,
        day: i8,
    },
    Time {
        hour: i8,
        minute: i8,
        sec: i8,
        microsec: i32,
    },
    DateTime {
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        sec: i8,
        microsec: i32,
    },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("__NULL__"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => {
                let s = v.to_string();
                if v.is_finite() && !s.contains('.') {
                    write!(f, "{}.0", s)
                } else {
                    f.write_str(&s)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", String::from_utf8_lossy(s)),
            Value::Date { year, month, day } => write!(f, "{:04}-{:02}-{:02}", year, month, day),
            Value::Time {
                hour,
                minute,
                sec,
                microsec,
            } => write!(f, "{:02}:{:02}:{:02}.{:06}", hour, minute, sec, microsec),
            Value::DateTime {
                year,
                month,
                day,
                hour,
                minute,
                sec,
                microsec,
            } => write!(
                f,
                "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
                year, month, day, hour, minute, sec, microsec
            ),
        }
    }
}

/// A decoded tag or edge row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub version: i64,
    /// `(column name, value)` in schema order.
    pub columns: Vec<(String, Value)>,
    /// Write time appended after the last column.
    pub timestamp: i64,
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "version:{}", self.version)?;
        for (name, value) in &self.columns {
            write!(f, ", {}:{}", name, value)?;
        }
        write!(f, ", timestamp:{}", self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_formatting() {
        assert_eq!(Value::Null.to_string(), "__NULL__");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::String(b"Tim".to_vec()).to_string(), "\"Tim\"");
        assert_eq!(
            Value::Date { year: 2021, month: 3, day: 9 }.to_string(),
            "2021-03-09"
        );
        assert_eq!(
            Value::Time { hour: 7, minute: 5, sec: 0, microsec: 12 }.to_string(),
            "07:05:00.000012"
        );
        assert_eq!(
            Value::DateTime {
                year: 2010,
                month: 1,
                day: 2,
                hour: 3,
                minute: 4,
                sec: 5,
                microsec: 6
            }
            .to_string(),
            "2010-01-02T03:04:05.000006"
        );
    }

    #[test]
    fn test_row_display() {
        let row = Row {
            version: 1,
            columns: vec![
                ("name".to_string(), Value::String(b"a".to_vec())),
                ("age".to_string(), Value::Int(3)),
            ],
            timestamp: 99,
        };
        assert_eq!(row.to_string(), "version:1, name:\"a\", age:3, timestamp:99");
    }
}
