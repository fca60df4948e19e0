//! Declarative record schemas and the generic decoder that walks them.
//!
//! Each record type lists its fields in wire order as [`FieldDescriptor`]s.
//! [`decode_record`] reads them one by one, honouring the extra-data-flags
//! (EDF) gate on optional fields, and hands every decoded value to
//! [`Record::assign`].
//!
//! ```text
//! descriptor:  name | wire kind | EDF mask | mode
//! ---------------------------------------------------
//! "name"       CString   -          Wire
//! "edf"        Byte      -          Wire
//! "port"       Int16     0x80       Wire     (read only if edf & 0x80)
//! "latency"    Int64     -          Derived  (never on the wire)
//! ```

use tracing::trace;

use crate::core::response::RESPONSE_HEADER_LEN;
use crate::core::wire::WireReader;
use crate::error::{QueryError, Result};

/// How a field is laid out on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireKind {
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    CString,
    /// One byte that must be one of the listed values
    Enum(&'static [u8]),
}

impl WireKind {
    /// Fixed width in bytes, `None` for strings
    pub fn width(&self) -> Option<usize> {
        match self {
            WireKind::Byte | WireKind::Enum(_) => Some(1),
            WireKind::Int16 => Some(2),
            WireKind::Int32 | WireKind::Float32 => Some(4),
            WireKind::Int64 => Some(8),
            WireKind::CString => None,
        }
    }
}

/// Whether the generic pass reads a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Read from the wire in declaration order
    Wire,
    /// Computed by the client after decoding
    Derived,
    /// Game-specific structure this decoder does not handle
    Custom,
}

/// One entry of a record schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: WireKind,
    pub edf_mask: Option<u8>,
    pub mode: FieldMode,
}

impl FieldDescriptor {
    pub const fn wire(name: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            kind,
            edf_mask: None,
            mode: FieldMode::Wire,
        }
    }

    pub const fn derived(name: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            kind,
            edf_mask: None,
            mode: FieldMode::Derived,
        }
    }

    pub const fn custom(name: &'static str) -> Self {
        Self {
            name,
            kind: WireKind::Byte,
            edf_mask: None,
            mode: FieldMode::Custom,
        }
    }

    /// Gate this field on an EDF bit
    pub const fn when_edf(mut self, mask: u8) -> Self {
        self.edf_mask = Some(mask);
        self
    }
}

/// A decoded field value, tagged with its wire kind
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Str(String),
    Enum(u8),
}

impl FieldValue {
    pub fn into_u8(self, field: &'static str) -> Result<u8> {
        match self {
            FieldValue::Byte(v) | FieldValue::Enum(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }

    pub fn into_i16(self, field: &'static str) -> Result<i16> {
        match self {
            FieldValue::Int16(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }

    pub fn into_i32(self, field: &'static str) -> Result<i32> {
        match self {
            FieldValue::Int32(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }

    pub fn into_i64(self, field: &'static str) -> Result<i64> {
        match self {
            FieldValue::Int64(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }

    pub fn into_f32(self, field: &'static str) -> Result<f32> {
        match self {
            FieldValue::Float32(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }

    pub fn into_string(self, field: &'static str) -> Result<String> {
        match self {
            FieldValue::Str(v) => Ok(v),
            _ => Err(QueryError::SchemaMismatch { field }),
        }
    }
}

/// A type that can be populated from a schema walk.
///
/// Records start at `Default` so fields skipped by the EDF gate keep their
/// type's default value.
pub trait Record: Default {
    /// Fields in wire order
    const SCHEMA: &'static [FieldDescriptor];

    /// Store a decoded value in the field named `field`
    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<()>;

    /// Cross-field checks run once every field is assigned
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Options for a single [`decode_record`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Name of the EDF byte field; enables EDF gating when set
    pub edf_field: Option<&'static str>,
    /// Drop the 5-byte response header before the first field
    pub strip_header: bool,
}

impl DecodeOptions {
    /// Options for a top-level response: header stripped, EDF gated on `edf_field`
    pub fn response(edf_field: &'static str) -> Self {
        Self {
            edf_field: Some(edf_field),
            strip_header: true,
        }
    }
}

/// Decode one `R` from the front of `data`.
///
/// Returns the record and the bytes after it, so passes can be chained over
/// one buffer.
pub fn decode_record<R: Record>(data: &[u8], options: DecodeOptions) -> Result<(R, &[u8])> {
    let mut reader = WireReader::new(data);
    if options.strip_header {
        reader.skip("header", RESPONSE_HEADER_LEN)?;
    }

    let mut record = R::default();
    let mut edf: Option<u8> = None;

    for field in R::SCHEMA {
        if field.mode != FieldMode::Wire {
            continue;
        }

        if let (Some(edf_name), Some(mask)) = (options.edf_field, field.edf_mask) {
            let flags = edf.ok_or(QueryError::SchemaMismatch { field: edf_name })?;
            if flags & mask == 0 {
                trace!(field = field.name, edf = flags, "Field absent per EDF");
                continue;
            }
        }

        let value = read_field(&mut reader, field)?;

        if options.edf_field == Some(field.name) {
            edf = Some(value.clone().into_u8(field.name)?);
        }

        record.assign(field.name, value)?;
    }

    record.validate()?;
    Ok((record, reader.remaining()))
}

fn read_field(reader: &mut WireReader<'_>, field: &FieldDescriptor) -> Result<FieldValue> {
    let name = field.name;
    let value = match field.kind {
        WireKind::Byte => FieldValue::Byte(reader.read_u8(name)?),
        WireKind::Int16 => FieldValue::Int16(reader.read_i16(name)?),
        WireKind::Int32 => FieldValue::Int32(reader.read_i32(name)?),
        WireKind::Int64 => FieldValue::Int64(reader.read_i64(name)?),
        WireKind::Float32 => FieldValue::Float32(reader.read_f32(name)?),
        WireKind::CString => FieldValue::Str(reader.read_cstring(name)?),
        WireKind::Enum(domain) => {
            let raw = reader.read_u8(name)?;
            if !domain.contains(&raw) {
                return Err(QueryError::InvalidFieldValue {
                    field: name,
                    value: u64::from(raw),
                });
            }
            FieldValue::Enum(raw)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLORS: &[u8] = &[1, 2];

    #[derive(Debug, Default)]
    struct Probe {
        tag: String,
        flags: u8,
        gated: i16,
        color: u8,
        local: i64,
    }

    impl Record for Probe {
        const SCHEMA: &'static [FieldDescriptor] = &[
            FieldDescriptor::wire("tag", WireKind::CString),
            FieldDescriptor::wire("flags", WireKind::Byte),
            FieldDescriptor::wire("gated", WireKind::Int16).when_edf(0x02),
            FieldDescriptor::custom("opaque"),
            FieldDescriptor::wire("color", WireKind::Enum(COLORS)),
            FieldDescriptor::derived("local", WireKind::Int64),
        ];

        fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<()> {
            match field {
                "tag" => self.tag = value.into_string(field)?,
                "flags" => self.flags = value.into_u8(field)?,
                "gated" => self.gated = value.into_i16(field)?,
                "color" => self.color = value.into_u8(field)?,
                "local" => self.local = value.into_i64(field)?,
                _ => return Err(QueryError::SchemaMismatch { field }),
            }
            Ok(())
        }
    }

    fn gated() -> DecodeOptions {
        DecodeOptions {
            edf_field: Some("flags"),
            strip_header: false,
        }
    }

    #[test]
    fn test_gate_closed_skips_without_advancing() {
        let data = b"x\0\x00\x02tail";
        let (probe, rest) = decode_record::<Probe>(data, gated()).unwrap();
        assert_eq!(probe.tag, "x");
        assert_eq!(probe.gated, 0);
        assert_eq!(probe.color, 2);
        assert_eq!(probe.local, 0);
        assert_eq!(rest, b"tail");
    }

    #[test]
    fn test_gate_open_reads_field() {
        let data = b"x\0\x02\x39\x30\x01";
        let (probe, rest) = decode_record::<Probe>(data, gated()).unwrap();
        assert_eq!(probe.gated, 12345);
        assert_eq!(probe.color, 1);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_without_edf_field_gated_fields_are_read() {
        let data = b"x\0\x00\x39\x30\x01";
        let (probe, _) = decode_record::<Probe>(data, DecodeOptions::default()).unwrap();
        assert_eq!(probe.gated, 12345);
    }

    #[test]
    fn test_enum_outside_domain() {
        let data = b"x\0\x00\x07";
        let err = decode_record::<Probe>(data, gated()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidFieldValue {
                field: "color",
                value: 7
            }
        ));
    }

    #[test]
    fn test_header_stripped() {
        let data = b"\xFF\xFF\xFF\xFF\x49y\0\x00\x01";
        let options = DecodeOptions {
            strip_header: true,
            ..gated()
        };
        let (probe, _) = decode_record::<Probe>(data, options).unwrap();
        assert_eq!(probe.tag, "y");
    }

    #[test]
    fn test_truncated_in_gated_field() {
        let data = b"x\0\x02\x39";
        let err = decode_record::<Probe>(data, gated()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::TruncatedResponse { field: "gated", .. }
        ));
    }

    #[test]
    fn test_widths() {
        assert_eq!(WireKind::Int64.width(), Some(8));
        assert_eq!(WireKind::Enum(COLORS).width(), Some(1));
        assert_eq!(WireKind::CString.width(), None);
    }
}
