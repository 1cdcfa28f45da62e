//! Request and response envelopes of the `MetaService` RPCs used to build
//! the schema cache.

use thrift::protocol::{
    TFieldIdentifier, TInputProtocol, TMessageIdentifier, TMessageType, TOutputProtocol,
    TStructIdentifier, TType,
};

use super::types::{read_struct, HostAddr};
use super::{read_struct_list, ThriftStruct};

/// Request bodies. Every request the dumper sends is empty, carries a space
/// name, or carries a space id in field 1.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MetaRequest<'a> {
    Empty,
    SpaceName(&'a [u8]),
    SpaceId(i32),
}

impl MetaRequest<'_> {
    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("Req"))?;
        match self {
            MetaRequest::Empty => {}
            MetaRequest::SpaceName(name) => {
                o.write_field_begin(&TFieldIdentifier::new("space_name", TType::String, 1))?;
                o.write_bytes(name)?;
                o.write_field_end()?;
            }
            MetaRequest::SpaceId(id) => {
                o.write_field_begin(&TFieldIdentifier::new("space_id", TType::I32, 1))?;
                o.write_i32(*id)?;
                o.write_field_end()?;
            }
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// The third field of a response, holding the actual result.
pub(crate) trait Payload: Default {
    fn read_payload(i: &mut dyn TInputProtocol, ty: TType) -> thrift::Result<Self>;
}

impl<T: ThriftStruct> Payload for Vec<T> {
    fn read_payload(i: &mut dyn TInputProtocol, ty: TType) -> thrift::Result<Self> {
        if ty != TType::List {
            i.skip(ty)?;
            return Ok(Vec::new());
        }
        read_struct_list(i)
    }
}

impl<T: ThriftStruct> Payload for Option<T> {
    fn read_payload(i: &mut dyn TInputProtocol, ty: TType) -> thrift::Result<Self> {
        if ty != TType::Struct {
            i.skip(ty)?;
            return Ok(None);
        }
        T::read_from(i).map(Some)
    }
}

impl Payload for () {
    fn read_payload(i: &mut dyn TInputProtocol, ty: TType) -> thrift::Result<Self> {
        i.skip(ty)
    }
}

/// `{1: code, 2: leader, 3: payload}`, shared by every meta response.
#[derive(Debug, Default)]
pub(crate) struct MetaResponse<P> {
    pub code: i32,
    pub leader: HostAddr,
    pub payload: P,
}

impl<P: Payload> MetaResponse<P> {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.code = i.read_i32()?,
                (2, TType::Struct) => out.leader = HostAddr::read_from(i)?,
                (3, _) => out.payload = P::read_payload(i, ty)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }
}

/// Send `method(req)` and read its result.
///
/// The call is framed as `{method}_args { 1: req }` and answered with
/// `{method}_result { 0: success }`. A server exception or a reply without
/// a success field is an error.
pub(crate) fn call<P: Payload>(
    i: &mut dyn TInputProtocol,
    o: &mut dyn TOutputProtocol,
    method: &str,
    seq: i32,
    req: MetaRequest<'_>,
) -> thrift::Result<MetaResponse<P>> {
    o.write_message_begin(&TMessageIdentifier::new(method, TMessageType::Call, seq))?;
    o.write_struct_begin(&TStructIdentifier::new(format!("{}_args", method)))?;
    o.write_field_begin(&TFieldIdentifier::new("req", TType::Struct, 1))?;
    req.write_to(o)?;
    o.write_field_end()?;
    o.write_field_stop()?;
    o.write_struct_end()?;
    o.write_message_end()?;
    o.flush()?;

    let ident = i.read_message_begin()?;
    if ident.message_type == TMessageType::Exception {
        let err = thrift::Error::read_application_error_from_in_protocol(i)?;
        i.read_message_end()?;
        return Err(thrift::Error::Application(err));
    }
    if ident.name != method || ident.sequence_number != seq {
        return Err(thrift::Error::Application(thrift::ApplicationError::new(
            thrift::ApplicationErrorKind::WrongMethodName,
            format!(
                "expected reply to {}#{}, got {}#{}",
                method, seq, ident.name, ident.sequence_number
            ),
        )));
    }

    let mut success = None;
    read_struct(i, |i, id, ty| {
        if id == 0 && ty == TType::Struct {
            success = Some(MetaResponse::<P>::read_from(i)?);
            return Ok(true);
        }
        Ok(false)
    })?;
    i.read_message_end()?;

    success.ok_or_else(|| {
        thrift::Error::Application(thrift::ApplicationError::new(
            thrift::ApplicationErrorKind::MissingResult,
            format!("{} returned no result", method),
        ))
    })
}
