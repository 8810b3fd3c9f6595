//! Typed sample values.
//!
//! Every sample, statistic entry and event attribute in a telemetry stream is
//! a [`TypedValue`]: a closed union selected by a one-byte [`ValueType`] tag.
//! Projections are checked. Any numeric (or boolean) value widens to any
//! numeric target, but strings and vectors never coerce to numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValueError};
use crate::string::RawString;

/// Wire type tag of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ValueType {
    U8 = 0,
    U16 = 2,
    U32 = 3,
    I32 = 4,
    U64 = 6,
    I64 = 7,
    F64 = 10,
    F32 = 11,
    String = 15,
    Bool = 20,
    Vec2 = 50,
    DVec2 = 51,
}

impl ValueType {
    /// All known tags, in wire order.
    pub const ALL: [ValueType; 12] = [
        ValueType::U8,
        ValueType::U16,
        ValueType::U32,
        ValueType::I32,
        ValueType::U64,
        ValueType::I64,
        ValueType::F64,
        ValueType::F32,
        ValueType::String,
        ValueType::Bool,
        ValueType::Vec2,
        ValueType::DVec2,
    ];

    /// Decode a wire tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: u8) -> Option<Self> {
        ValueType::ALL.iter().copied().find(|t| t.tag() == tag)
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// True for tags that project to a number without loss of meaning.
    pub fn is_numeric(self) -> bool {
        !matches!(
            self,
            ValueType::String | ValueType::Vec2 | ValueType::DVec2
        )
    }

    /// Encoded size in bytes, or `None` for variable-length strings.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            ValueType::Bool | ValueType::U8 => Some(1),
            ValueType::U16 => Some(2),
            ValueType::U32 | ValueType::I32 | ValueType::F32 => Some(4),
            ValueType::U64 | ValueType::I64 | ValueType::F64 | ValueType::Vec2 => Some(8),
            ValueType::DVec2 => Some(16),
            ValueType::String => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::I32 => "i32",
            ValueType::U64 => "u64",
            ValueType::I64 => "i64",
            ValueType::F64 => "f64",
            ValueType::F32 => "f32",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Vec2 => "vec2",
            ValueType::DVec2 => "dvec2",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single decoded value. The variant is the type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Vec2([f32; 2]),
    DVec2([f64; 2]),
    String(RawString),
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Bool(_) => ValueType::Bool,
            TypedValue::U8(_) => ValueType::U8,
            TypedValue::U16(_) => ValueType::U16,
            TypedValue::U32(_) => ValueType::U32,
            TypedValue::U64(_) => ValueType::U64,
            TypedValue::I32(_) => ValueType::I32,
            TypedValue::I64(_) => ValueType::I64,
            TypedValue::F32(_) => ValueType::F32,
            TypedValue::F64(_) => ValueType::F64,
            TypedValue::Vec2(_) => ValueType::Vec2,
            TypedValue::DVec2(_) => ValueType::DVec2,
            TypedValue::String(_) => ValueType::String,
        }
    }

    fn unsupported(&self, to: &'static str) -> ValueError {
        ValueError::UnsupportedValueConversion {
            from: self.value_type(),
            to,
        }
    }

    /// Project to `f64`. Booleans map to 0/1.
    pub fn as_f64(&self) -> Result<f64> {
        match *self {
            TypedValue::Bool(v) => Ok(if v { 1.0 } else { 0.0 }),
            TypedValue::U8(v) => Ok(v as f64),
            TypedValue::U16(v) => Ok(v as f64),
            TypedValue::U32(v) => Ok(v as f64),
            TypedValue::U64(v) => Ok(v as f64),
            TypedValue::I32(v) => Ok(v as f64),
            TypedValue::I64(v) => Ok(v as f64),
            TypedValue::F32(v) => Ok(v as f64),
            TypedValue::F64(v) => Ok(v),
            _ => Err(self.unsupported("f64")),
        }
    }

    pub fn as_f32(&self) -> Result<f32> {
        match *self {
            TypedValue::F32(v) => Ok(v),
            _ => self
                .as_f64()
                .map(|v| v as f32)
                .map_err(|_| self.unsupported("f32")),
        }
    }

    /// Project to `u64`. Signed and float sources use `as` cast semantics.
    pub fn as_u64(&self) -> Result<u64> {
        match *self {
            TypedValue::Bool(v) => Ok(v as u64),
            TypedValue::U8(v) => Ok(v as u64),
            TypedValue::U16(v) => Ok(v as u64),
            TypedValue::U32(v) => Ok(v as u64),
            TypedValue::U64(v) => Ok(v),
            TypedValue::I32(v) => Ok(v as u64),
            TypedValue::I64(v) => Ok(v as u64),
            TypedValue::F32(v) => Ok(v as u64),
            TypedValue::F64(v) => Ok(v as u64),
            _ => Err(self.unsupported("u64")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match *self {
            TypedValue::Bool(v) => Ok(v as i64),
            TypedValue::U8(v) => Ok(v as i64),
            TypedValue::U16(v) => Ok(v as i64),
            TypedValue::U32(v) => Ok(v as i64),
            TypedValue::U64(v) => Ok(v as i64),
            TypedValue::I32(v) => Ok(v as i64),
            TypedValue::I64(v) => Ok(v),
            TypedValue::F32(v) => Ok(v as i64),
            TypedValue::F64(v) => Ok(v as i64),
            _ => Err(self.unsupported("i64")),
        }
    }

    /// Project to `bool`. Numbers are true when non-zero.
    pub fn as_bool(&self) -> Result<bool> {
        match *self {
            TypedValue::Bool(v) => Ok(v),
            _ => self
                .as_f64()
                .map(|v| v != 0.0)
                .map_err(|_| self.unsupported("bool")),
        }
    }

    pub fn as_str(&self) -> Result<&RawString> {
        match self {
            TypedValue::String(s) => Ok(s),
            _ => Err(self.unsupported("string")),
        }
    }

    /// Both vector components widened to `f64`.
    pub fn as_vec2(&self) -> Result<[f64; 2]> {
        match *self {
            TypedValue::Vec2([x, y]) => Ok([x as f64, y as f64]),
            TypedValue::DVec2(v) => Ok(v),
            _ => Err(self.unsupported("vec2")),
        }
    }

    /// Representative scalar used for charting and aggregation.
    ///
    /// Numbers project as in [`as_f64`](Self::as_f64), vectors use their
    /// Euclidean magnitude and strings are 0.
    pub fn scalar(&self) -> f64 {
        match *self {
            TypedValue::Vec2([x, y]) => (x as f64).hypot(y as f64),
            TypedValue::DVec2([x, y]) => x.hypot(y),
            TypedValue::String(_) => 0.0,
            _ => self.as_f64().unwrap_or(0.0),
        }
    }

    /// Second minus first component, for `[begin, end]` duration pairs.
    pub fn span(&self) -> Option<f64> {
        self.as_vec2().ok().map(|[begin, end]| end - begin)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Bool(v) => write!(f, "{}", v),
            TypedValue::U8(v) => write!(f, "{}", v),
            TypedValue::U16(v) => write!(f, "{}", v),
            TypedValue::U32(v) => write!(f, "{}", v),
            TypedValue::U64(v) => write!(f, "{}", v),
            TypedValue::I32(v) => write!(f, "{}", v),
            TypedValue::I64(v) => write!(f, "{}", v),
            TypedValue::F32(v) => write!(f, "{}", v),
            TypedValue::F64(v) => write!(f, "{}", v),
            TypedValue::Vec2([x, y]) => write!(f, "({}, {})", x, y),
            TypedValue::DVec2([x, y]) => write!(f, "({}, {})", x, y),
            TypedValue::String(s) => write!(f, "{}", s),
        }
    }
}
