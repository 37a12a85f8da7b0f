//! OSC type alphabet, access levels, and JSON projection of argument values

use crate::{Error, Result};
use rosc::OscType;
use serde_json::{json, Value as Json};

/// OSC type tag codes advertised through the query protocol.
///
/// Covers the standard alphabet (`i`, `f`, `s`, `b`) and the extended tags;
/// `T`, `F`, `N` and `I` carry no payload on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCode {
    /// `i` - 32-bit integer
    Int32,
    /// `f` - 32-bit float
    Float32,
    /// `s` - string
    OscString,
    /// `b` - blob
    Blob,
    /// `h` - 64-bit integer
    Int64,
    /// `t` - OSC timetag
    TimeTag,
    /// `d` - 64-bit float
    Double,
    /// `S` - alternate string
    AltString,
    /// `c` - single character
    Char,
    /// `r` - 32-bit RGBA color
    Rgba,
    /// `m` - 4-byte MIDI message
    Midi,
    /// `T` - true (no payload)
    True,
    /// `F` - false (no payload)
    False,
    /// `N` - nil (no payload)
    Nil,
    /// `I` - infinitum (no payload)
    Infinitum,
}

impl TypeCode {
    /// The wire tag character for this code
    pub fn as_char(self) -> char {
        match self {
            TypeCode::Int32 => 'i',
            TypeCode::Float32 => 'f',
            TypeCode::OscString => 's',
            TypeCode::Blob => 'b',
            TypeCode::Int64 => 'h',
            TypeCode::TimeTag => 't',
            TypeCode::Double => 'd',
            TypeCode::AltString => 'S',
            TypeCode::Char => 'c',
            TypeCode::Rgba => 'r',
            TypeCode::Midi => 'm',
            TypeCode::True => 'T',
            TypeCode::False => 'F',
            TypeCode::Nil => 'N',
            TypeCode::Infinitum => 'I',
        }
    }

    /// Parse a wire tag character
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'i' => Ok(TypeCode::Int32),
            'f' => Ok(TypeCode::Float32),
            's' => Ok(TypeCode::OscString),
            'b' => Ok(TypeCode::Blob),
            'h' => Ok(TypeCode::Int64),
            't' => Ok(TypeCode::TimeTag),
            'd' => Ok(TypeCode::Double),
            'S' => Ok(TypeCode::AltString),
            'c' => Ok(TypeCode::Char),
            'r' => Ok(TypeCode::Rgba),
            'm' => Ok(TypeCode::Midi),
            'T' => Ok(TypeCode::True),
            'F' => Ok(TypeCode::False),
            'N' => Ok(TypeCode::Nil),
            'I' => Ok(TypeCode::Infinitum),
            other => Err(Error::UnknownTypeCode(other)),
        }
    }
}

/// The declared type of one argument slot: a single tag, or a nested
/// ordered list rendered as `[...]` in the TYPE string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgType {
    Code(TypeCode),
    Tuple(Vec<ArgType>),
}

impl ArgType {
    pub(crate) fn append_to(&self, out: &mut String) {
        match self {
            ArgType::Code(code) => out.push(code.as_char()),
            ArgType::Tuple(items) => {
                out.push('[');
                for item in items {
                    item.append_to(out);
                }
                out.push(']');
            }
        }
    }
}

impl From<TypeCode> for ArgType {
    fn from(code: TypeCode) -> Self {
        ArgType::Code(code)
    }
}

/// Access level of a method, serialized as its integer value.
///
/// Containers left unset default to `NoValue` on serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Access {
    #[default]
    NoValue = 0,
    ReadOnly = 1,
    WriteOnly = 2,
    ReadWrite = 3,
}

impl Access {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Access::NoValue),
            1 => Some(Access::ReadOnly),
            2 => Some(Access::WriteOnly),
            3 => Some(Access::ReadWrite),
            _ => None,
        }
    }

    /// Whether a VALUE query can be answered for this access level
    pub fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }
}

/// Per-argument policy for coercing out-of-range inputs.
///
/// Opaque to this crate; it is advertised verbatim through CLIPMODE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    None,
    Low,
    High,
    Both,
}

impl ClipMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClipMode::None => "none",
            ClipMode::Low => "low",
            ClipMode::High => "high",
            ClipMode::Both => "both",
        }
    }
}

/// Project a stored argument value to JSON.
///
/// Blobs become byte arrays, color and MIDI become 4-element arrays, and a
/// timetag becomes `[seconds, fractional]` (a combined 64-bit NTP value
/// would not survive JSON's f64 numbers). Nil and Infinitum project as null.
pub fn value_to_json(value: &OscType) -> Json {
    match value {
        OscType::Int(i) => json!(*i),
        OscType::Float(f) => json!(*f),
        OscType::String(s) => json!(s),
        OscType::Blob(b) => Json::Array(b.iter().map(|&byte| json!(byte)).collect()),
        OscType::Time(t) => json!([t.seconds, t.fractional]),
        OscType::Long(l) => json!(*l),
        OscType::Double(d) => json!(*d),
        OscType::Char(c) => Json::String(c.to_string()),
        OscType::Color(c) => json!([c.red, c.green, c.blue, c.alpha]),
        OscType::Midi(m) => json!([m.port, m.status, m.data1, m.data2]),
        OscType::Bool(b) => json!(*b),
        OscType::Array(arr) => Json::Array(arr.content.iter().map(value_to_json).collect()),
        OscType::Nil | OscType::Inf => Json::Null,
    }
}
