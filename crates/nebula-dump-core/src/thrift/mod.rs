//! Thrift encoding of the metadata schema entities.
//!
//! Meta values on disk (space descriptors, tag/edge schemas, index items) and
//! the persisted schema cache use the Thrift compact protocol; the metadata
//! RPC uses the framed binary protocol. Entities implement [`ThriftStruct`]
//! by hand against the field ids of the cluster IDL, skipping any field they
//! do not know so newer servers stay readable.

mod meta_service;
mod types;

pub(crate) use meta_service::{call as meta_service_call, MetaRequest, MetaResponse, Payload};
pub use types::{
    ColumnDef, ColumnTypeDef, EdgeItem, HostAddr, IdName, IndexItem, PropertyType, Schema,
    SchemaId, SchemaProp, SpaceDesc, SpaceItem, TagItem,
};

use thrift::protocol::{
    TCompactInputProtocol, TCompactOutputProtocol, TInputProtocol, TListIdentifier,
    TOutputProtocol, TType,
};

use crate::error::{DumpError, DumpResult};

/// A struct that can be read from and written to any Thrift protocol.
pub trait ThriftStruct: Sized {
    /// Read one struct, skipping unknown fields.
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self>;

    /// Write the struct including its stop field.
    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()>;
}

/// Encode `value` with the compact protocol.
pub fn compact_serialize<T: ThriftStruct>(value: &T) -> DumpResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut o = TCompactOutputProtocol::new(&mut buf);
        value
            .write_to(&mut o)
            .map_err(|e| DumpError::Internal(format!("compact encode failed: {}", e)))?;
        o.flush()
            .map_err(|e| DumpError::Internal(format!("compact encode failed: {}", e)))?;
    }
    Ok(buf)
}

/// Decode a compact-encoded `T` from `bytes`.
///
/// # Errors
///
/// * `DumpError::MalformedRecord` - the bytes are truncated or not a valid
///   encoding of `T`
pub fn compact_deserialize<T: ThriftStruct>(bytes: &[u8]) -> DumpResult<T> {
    let mut i = TCompactInputProtocol::new(bytes);
    T::read_from(&mut i).map_err(|e| DumpError::malformed(format!("compact decode failed: {}", e)))
}

/// Read a list, decoding elements of `element_type` with `read` and skipping
/// any other element type.
///
/// The announced size is not trusted for allocation: a corrupt header runs
/// into the end of the buffer and fails instead.
fn read_list_of<T, F>(
    i: &mut dyn TInputProtocol,
    element_type: TType,
    mut read: F,
) -> thrift::Result<Vec<T>>
where
    F: FnMut(&mut dyn TInputProtocol) -> thrift::Result<T>,
{
    let ident = i.read_list_begin()?;
    let mut out = Vec::new();
    for _ in 0..ident.size {
        if ident.element_type == element_type {
            out.push(read(i)?);
        } else {
            i.skip(ident.element_type)?;
        }
    }
    i.read_list_end()?;
    Ok(out)
}

/// Read a list of structs.
pub(crate) fn read_struct_list<T: ThriftStruct>(
    i: &mut dyn TInputProtocol,
) -> thrift::Result<Vec<T>> {
    read_list_of(i, TType::Struct, |i| T::read_from(i))
}

/// Read a list of binary strings.
pub(crate) fn read_binary_list(i: &mut dyn TInputProtocol) -> thrift::Result<Vec<Vec<u8>>> {
    read_list_of(i, TType::String, |i| i.read_bytes())
}

/// Write a list of structs.
pub(crate) fn write_struct_list<T: ThriftStruct>(
    o: &mut dyn TOutputProtocol,
    items: &[T],
) -> thrift::Result<()> {
    o.write_list_begin(&TListIdentifier::new(TType::Struct, items.len() as i32))?;
    for item in items {
        item.write_to(o)?;
    }
    o.write_list_end()
}
