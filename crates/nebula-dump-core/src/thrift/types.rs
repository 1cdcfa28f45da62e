//! Schema entities of the metadata service.
//!
//! Field ids follow `meta.thrift` / `common.thrift` of the graph cluster.
//! Binary fields stay `Vec<u8>` because the server does not guarantee UTF-8.

use thrift::protocol::{
    TFieldIdentifier, TInputProtocol, TListIdentifier, TOutputProtocol, TStructIdentifier, TType,
};

use super::{read_binary_list, read_struct_list, write_struct_list, ThriftStruct};

/// Walk the fields of a struct, handing each `(id, type)` to `on_field`.
///
/// Fields the callback does not consume (returns `false`) are skipped.
pub(crate) fn read_struct<F>(i: &mut dyn TInputProtocol, mut on_field: F) -> thrift::Result<()>
where
    F: FnMut(&mut dyn TInputProtocol, i16, TType) -> thrift::Result<bool>,
{
    i.read_struct_begin()?;
    loop {
        let field = i.read_field_begin()?;
        if field.field_type == TType::Stop {
            break;
        }
        let handled = match field.id {
            Some(id) => on_field(&mut *i, id, field.field_type)?,
            None => false,
        };
        if !handled {
            i.skip(field.field_type)?;
        }
        i.read_field_end()?;
    }
    i.read_struct_end()
}

fn begin(o: &mut dyn TOutputProtocol, name: &str, ty: TType, id: i16) -> thrift::Result<()> {
    o.write_field_begin(&TFieldIdentifier::new(name, ty, id))
}

fn write_i32(o: &mut dyn TOutputProtocol, name: &str, id: i16, v: i32) -> thrift::Result<()> {
    begin(o, name, TType::I32, id)?;
    o.write_i32(v)?;
    o.write_field_end()
}

fn write_i64(o: &mut dyn TOutputProtocol, name: &str, id: i16, v: i64) -> thrift::Result<()> {
    begin(o, name, TType::I64, id)?;
    o.write_i64(v)?;
    o.write_field_end()
}

fn write_binary(o: &mut dyn TOutputProtocol, name: &str, id: i16, v: &[u8]) -> thrift::Result<()> {
    begin(o, name, TType::String, id)?;
    o.write_bytes(v)?;
    o.write_field_end()
}

fn write_struct<T: ThriftStruct>(
    o: &mut dyn TOutputProtocol,
    name: &str,
    id: i16,
    v: &T,
) -> thrift::Result<()> {
    begin(o, name, TType::Struct, id)?;
    v.write_to(o)?;
    o.write_field_end()
}

/// Column and vid types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PropertyType {
    #[default]
    Unknown,
    Bool,
    Int64,
    Vid,
    Float,
    Double,
    String,
    FixedString,
    Int8,
    Int16,
    Int32,
    Timestamp,
    Duration,
    Date,
    DateTime,
    Time,
    Geography,
    /// A value this build does not know.
    Other(i32),
}

impl PropertyType {
    pub fn from_i32(v: i32) -> Self {
        match v {
            0 => Self::Unknown,
            1 => Self::Bool,
            2 => Self::Int64,
            3 => Self::Vid,
            4 => Self::Float,
            5 => Self::Double,
            6 => Self::String,
            7 => Self::FixedString,
            8 => Self::Int8,
            9 => Self::Int16,
            10 => Self::Int32,
            21 => Self::Timestamp,
            23 => Self::Duration,
            24 => Self::Date,
            25 => Self::DateTime,
            26 => Self::Time,
            31 => Self::Geography,
            other => Self::Other(other),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Bool => 1,
            Self::Int64 => 2,
            Self::Vid => 3,
            Self::Float => 4,
            Self::Double => 5,
            Self::String => 6,
            Self::FixedString => 7,
            Self::Int8 => 8,
            Self::Int16 => 9,
            Self::Int32 => 10,
            Self::Timestamp => 21,
            Self::Duration => 23,
            Self::Date => 24,
            Self::DateTime => 25,
            Self::Time => 26,
            Self::Geography => 31,
            Self::Other(v) => v,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Bool => "BOOL",
            Self::Int64 => "INT64",
            Self::Vid => "VID",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::FixedString => "FIXED_STRING",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Timestamp => "TIMESTAMP",
            Self::Duration => "DURATION",
            Self::Date => "DATE",
            Self::DateTime => "DATETIME",
            Self::Time => "TIME",
            Self::Geography => "GEOGRAPHY",
            Self::Other(v) => return write!(f, "PropertyType({})", v),
        };
        f.write_str(name)
    }
}

/// `common.ColumnTypeDef`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnTypeDef {
    pub type_: PropertyType,
    /// Declared width for `FIXED_STRING` and fixed-length vids.
    pub type_length: i16,
    pub geo_shape: Option<i32>,
}

impl ColumnTypeDef {
    pub fn new(type_: PropertyType, type_length: i16) -> Self {
        Self {
            type_,
            type_length,
            geo_shape: None,
        }
    }
}

impl ThriftStruct for ColumnTypeDef {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.type_ = PropertyType::from_i32(i.read_i32()?),
                (2, TType::I16) => out.type_length = i.read_i16()?,
                (3, TType::I32) => out.geo_shape = Some(i.read_i32()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("ColumnTypeDef"))?;
        write_i32(o, "type", 1, self.type_.as_i32())?;
        begin(o, "type_length", TType::I16, 2)?;
        o.write_i16(self.type_length)?;
        o.write_field_end()?;
        if let Some(shape) = self.geo_shape {
            write_i32(o, "geo_shape", 3, shape)?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.ColumnDef`: one column of a tag/edge schema or one index field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnDef {
    pub name: Vec<u8>,
    pub type_: ColumnTypeDef,
    /// Serialized default expression, opaque here.
    pub default_value: Option<Vec<u8>>,
    pub nullable: bool,
    pub comment: Option<Vec<u8>>,
}

impl ColumnDef {
    /// A column with no default and no comment.
    pub fn new(name: &str, type_: PropertyType, type_length: i16, nullable: bool) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            type_: ColumnTypeDef::new(type_, type_length),
            default_value: None,
            nullable,
            comment: None,
        }
    }

    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

impl ThriftStruct for ColumnDef {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::String) => out.name = i.read_bytes()?,
                (2, TType::Struct) => out.type_ = ColumnTypeDef::read_from(i)?,
                (3, TType::String) => out.default_value = Some(i.read_bytes()?),
                (4, TType::Bool) => out.nullable = i.read_bool()?,
                (5, TType::String) => out.comment = Some(i.read_bytes()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("ColumnDef"))?;
        write_binary(o, "name", 1, &self.name)?;
        write_struct(o, "type", 2, &self.type_)?;
        if let Some(default) = &self.default_value {
            write_binary(o, "default_value", 3, default)?;
        }
        begin(o, "nullable", TType::Bool, 4)?;
        o.write_bool(self.nullable)?;
        o.write_field_end()?;
        if let Some(comment) = &self.comment {
            write_binary(o, "comment", 5, comment)?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.SchemaProp`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaProp {
    pub ttl_duration: Option<i64>,
    pub ttl_col: Option<Vec<u8>>,
    pub comment: Option<Vec<u8>>,
}

impl ThriftStruct for SchemaProp {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I64) => out.ttl_duration = Some(i.read_i64()?),
                (2, TType::String) => out.ttl_col = Some(i.read_bytes()?),
                (3, TType::String) => out.comment = Some(i.read_bytes()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("SchemaProp"))?;
        if let Some(ttl) = self.ttl_duration {
            write_i64(o, "ttl_duration", 1, ttl)?;
        }
        if let Some(col) = &self.ttl_col {
            write_binary(o, "ttl_col", 2, col)?;
        }
        if let Some(comment) = &self.comment {
            write_binary(o, "comment", 3, comment)?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.Schema`: ordered columns plus properties.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
    pub schema_prop: SchemaProp,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self {
            columns,
            schema_prop: SchemaProp::default(),
        }
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(ColumnDef::name_lossy).collect()
    }
}

impl ThriftStruct for Schema {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::List) => out.columns = read_struct_list(i)?,
                (2, TType::Struct) => out.schema_prop = SchemaProp::read_from(i)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("Schema"))?;
        begin(o, "columns", TType::List, 1)?;
        write_struct_list(o, &self.columns)?;
        o.write_field_end()?;
        write_struct(o, "schema_prop", 2, &self.schema_prop)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.SpaceDesc`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpaceDesc {
    pub space_name: Vec<u8>,
    pub partition_num: i32,
    pub replica_factor: i32,
    pub charset_name: Vec<u8>,
    pub collate_name: Vec<u8>,
    pub vid_type: ColumnTypeDef,
    pub zone_names: Vec<Vec<u8>>,
    pub isolation_level: Option<i32>,
    pub comment: Option<Vec<u8>>,
}

impl ThriftStruct for SpaceDesc {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::String) => out.space_name = i.read_bytes()?,
                (2, TType::I32) => out.partition_num = i.read_i32()?,
                (3, TType::I32) => out.replica_factor = i.read_i32()?,
                (4, TType::String) => out.charset_name = i.read_bytes()?,
                (5, TType::String) => out.collate_name = i.read_bytes()?,
                (6, TType::Struct) => out.vid_type = ColumnTypeDef::read_from(i)?,
                (7, TType::List) => out.zone_names = read_binary_list(i)?,
                (8, TType::I32) => out.isolation_level = Some(i.read_i32()?),
                (9, TType::String) => out.comment = Some(i.read_bytes()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("SpaceDesc"))?;
        write_binary(o, "space_name", 1, &self.space_name)?;
        write_i32(o, "partition_num", 2, self.partition_num)?;
        write_i32(o, "replica_factor", 3, self.replica_factor)?;
        write_binary(o, "charset_name", 4, &self.charset_name)?;
        write_binary(o, "collate_name", 5, &self.collate_name)?;
        write_struct(o, "vid_type", 6, &self.vid_type)?;
        begin(o, "zone_names", TType::List, 7)?;
        o.write_list_begin(&TListIdentifier::new(
            TType::String,
            self.zone_names.len() as i32,
        ))?;
        for zone in &self.zone_names {
            o.write_bytes(zone)?;
        }
        o.write_list_end()?;
        o.write_field_end()?;
        if let Some(level) = self.isolation_level {
            write_i32(o, "isolation_level", 8, level)?;
        }
        if let Some(comment) = &self.comment {
            write_binary(o, "comment", 9, comment)?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.SpaceItem`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpaceItem {
    pub space_id: i32,
    pub properties: SpaceDesc,
}

impl SpaceItem {
    pub fn new(space_id: i32, name: &str, partition_num: i32, vid_type: ColumnTypeDef) -> Self {
        Self {
            space_id,
            properties: SpaceDesc {
                space_name: name.as_bytes().to_vec(),
                partition_num,
                replica_factor: 1,
                vid_type,
                ..SpaceDesc::default()
            },
        }
    }

    /// Width of a vid in this space: 8 for integer vids, the declared
    /// length for fixed-string vids.
    pub fn vid_len(&self) -> usize {
        match self.properties.vid_type.type_ {
            PropertyType::Int64 => 8,
            _ => self.properties.vid_type.type_length.max(0) as usize,
        }
    }

    pub fn is_int_vid(&self) -> bool {
        self.properties.vid_type.type_ == PropertyType::Int64
    }

    pub fn partition_num(&self) -> i32 {
        self.properties.partition_num
    }
}

impl ThriftStruct for SpaceItem {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.space_id = i.read_i32()?,
                (2, TType::Struct) => out.properties = SpaceDesc::read_from(i)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("SpaceItem"))?;
        write_i32(o, "space_id", 1, self.space_id)?;
        write_struct(o, "properties", 2, &self.properties)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.TagItem`: one version of a tag schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagItem {
    pub tag_id: i32,
    pub tag_name: Vec<u8>,
    pub version: i64,
    pub schema: Schema,
}

impl ThriftStruct for TagItem {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.tag_id = i.read_i32()?,
                (2, TType::String) => out.tag_name = i.read_bytes()?,
                (3, TType::I64) => out.version = i.read_i64()?,
                (4, TType::Struct) => out.schema = Schema::read_from(i)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("TagItem"))?;
        write_i32(o, "tag_id", 1, self.tag_id)?;
        write_binary(o, "tag_name", 2, &self.tag_name)?;
        write_i64(o, "version", 3, self.version)?;
        write_struct(o, "schema", 4, &self.schema)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.EdgeItem`: one version of an edge schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EdgeItem {
    pub edge_type: i32,
    pub edge_name: Vec<u8>,
    pub version: i64,
    pub schema: Schema,
}

impl ThriftStruct for EdgeItem {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.edge_type = i.read_i32()?,
                (2, TType::String) => out.edge_name = i.read_bytes()?,
                (3, TType::I64) => out.version = i.read_i64()?,
                (4, TType::Struct) => out.schema = Schema::read_from(i)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("EdgeItem"))?;
        write_i32(o, "edge_type", 1, self.edge_type)?;
        write_binary(o, "edge_name", 2, &self.edge_name)?;
        write_i64(o, "version", 3, self.version)?;
        write_struct(o, "schema", 4, &self.schema)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `common.SchemaID`: the tag or edge an index is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaId {
    Tag(i32),
    Edge(i32),
}

impl Default for SchemaId {
    fn default() -> Self {
        SchemaId::Tag(0)
    }
}

impl ThriftStruct for SchemaId {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out = SchemaId::Tag(i.read_i32()?),
                (2, TType::I32) => out = SchemaId::Edge(i.read_i32()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("SchemaID"))?;
        match self {
            SchemaId::Tag(id) => write_i32(o, "tag_id", 1, *id)?,
            SchemaId::Edge(id) => write_i32(o, "edge_type", 2, *id)?,
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.IndexItem`: a secondary index definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexItem {
    pub index_id: i32,
    pub index_name: Vec<u8>,
    pub schema_id: SchemaId,
    pub schema_name: Vec<u8>,
    /// Indexed columns in key order.
    pub fields: Vec<ColumnDef>,
    pub comment: Option<Vec<u8>>,
}

impl IndexItem {
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(ColumnDef::name_lossy).collect()
    }

    /// Whether the key carries the 2-byte nullable bitmap.
    pub fn has_nullable_field(&self) -> bool {
        self.fields.iter().any(|f| f.nullable)
    }
}

impl ThriftStruct for IndexItem {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::I32) => out.index_id = i.read_i32()?,
                (2, TType::String) => out.index_name = i.read_bytes()?,
                (3, TType::Struct) => out.schema_id = SchemaId::read_from(i)?,
                (4, TType::String) => out.schema_name = i.read_bytes()?,
                (5, TType::List) => out.fields = read_struct_list(i)?,
                (6, TType::String) => out.comment = Some(i.read_bytes()?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("IndexItem"))?;
        write_i32(o, "index_id", 1, self.index_id)?;
        write_binary(o, "index_name", 2, &self.index_name)?;
        write_struct(o, "schema_id", 3, &self.schema_id)?;
        write_binary(o, "schema_name", 4, &self.schema_name)?;
        begin(o, "fields", TType::List, 5)?;
        write_struct_list(o, &self.fields)?;
        o.write_field_end()?;
        if let Some(comment) = &self.comment {
            write_binary(o, "comment", 6, comment)?;
        }
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `common.HostAddr`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostAddr {
    pub host: String,
    pub port: i32,
}

impl std::fmt::Display for HostAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl ThriftStruct for HostAddr {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::String) => out.host = i.read_string()?,
                (2, TType::I32) => out.port = i.read_i32()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("HostAddr"))?;
        begin(o, "host", TType::String, 1)?;
        o.write_string(&self.host)?;
        o.write_field_end()?;
        write_i32(o, "port", 2, self.port)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}

/// `meta.IdName` as returned by `listSpaces`. Only the first id of the
/// union is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdName {
    pub id: i32,
    pub name: Vec<u8>,
}

impl ThriftStruct for IdName {
    fn read_from(i: &mut dyn TInputProtocol) -> thrift::Result<Self> {
        let mut out = Self::default();
        read_struct(i, |i, id, ty| {
            match (id, ty) {
                (1, TType::Struct) => {
                    read_struct(i, |i, _, ty| {
                        if ty == TType::I32 {
                            out.id = i.read_i32()?;
                            return Ok(true);
                        }
                        Ok(false)
                    })?;
                }
                (2, TType::String) => out.name = i.read_bytes()?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(out)
    }

    fn write_to(&self, o: &mut dyn TOutputProtocol) -> thrift::Result<()> {
        o.write_struct_begin(&TStructIdentifier::new("IdName"))?;
        begin(o, "id", TType::Struct, 1)?;
        o.write_struct_begin(&TStructIdentifier::new("ID"))?;
        write_i32(o, "space_id", 1, self.id)?;
        o.write_field_stop()?;
        o.write_struct_end()?;
        o.write_field_end()?;
        write_binary(o, "name", 2, &self.name)?;
        o.write_field_stop()?;
        o.write_struct_end()
    }
}
