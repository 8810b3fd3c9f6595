//! Sequential little-endian reader over an untrusted byte buffer.
//!
//! Every read is bounds-checked and fails with
//! [`TelemetryError::UnexpectedEndOfStream`] instead of reading past the
//! buffer. Decoded floats that are NaN or infinite are replaced with 0.0 so a
//! single corrupt sample cannot poison aggregate statistics.

use tlm_common::{RawString, TypedValue, Unit, ValueType};

use crate::error::{Result, TelemetryError};

/// Read position over an immutable buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0 }
    }

    /// Start reading at `offset` (clamped to the buffer length).
    pub fn with_offset(data: &'a [u8], offset: usize) -> Self {
        ByteCursor {
            data,
            pos: offset.min(data.len()),
        }
    }

    /// Bytes consumed from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Consume `count` raw bytes.
    pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(TelemetryError::UnexpectedEndOfStream {
                offset: self.pos,
                needed: count,
                remaining: self.remaining(),
            });
        }

        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.array().map(i16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.array().map(i32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.array().map(i64::from_le_bytes)
    }

    /// Read an `f32`; NaN and infinities decode as 0.0.
    pub fn read_f32(&mut self) -> Result<f32> {
        let value = self.array().map(f32::from_le_bytes)?;
        Ok(if value.is_finite() { value } else { 0.0 })
    }

    /// Read an `f64`; NaN and infinities decode as 0.0.
    pub fn read_f64(&mut self) -> Result<f64> {
        let value = self.array().map(f64::from_le_bytes)?;
        Ok(if value.is_finite() { value } else { 0.0 })
    }

    /// Read a string with a one-byte length prefix. Bytes are kept verbatim.
    pub fn read_string(&mut self) -> Result<RawString> {
        let length = self.read_u8()? as usize;
        self.take(length).map(RawString::from)
    }

    /// Read a value encoded as `value_type`.
    pub fn read_value(&mut self, value_type: ValueType) -> Result<TypedValue> {
        let value = match value_type {
            ValueType::Bool => TypedValue::Bool(self.read_bool()?),
            ValueType::U8 => TypedValue::U8(self.read_u8()?),
            ValueType::U16 => TypedValue::U16(self.read_u16()?),
            ValueType::U32 => TypedValue::U32(self.read_u32()?),
            ValueType::U64 => TypedValue::U64(self.read_u64()?),
            ValueType::I32 => TypedValue::I32(self.read_i32()?),
            ValueType::I64 => TypedValue::I64(self.read_i64()?),
            ValueType::F32 => TypedValue::F32(self.read_f32()?),
            ValueType::F64 => TypedValue::F64(self.read_f64()?),
            ValueType::Vec2 => TypedValue::Vec2([self.read_f32()?, self.read_f32()?]),
            ValueType::DVec2 => TypedValue::DVec2([self.read_f64()?, self.read_f64()?]),
            ValueType::String => TypedValue::String(self.read_string()?),
        };
        Ok(value)
    }

    /// Read a value type tag byte.
    pub fn read_value_type(&mut self) -> Result<ValueType> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        ValueType::from_tag(tag).ok_or(TelemetryError::UnknownValueType { tag, offset })
    }

    /// Read a unit tag byte.
    pub fn read_unit(&mut self) -> Result<Unit> {
        let offset = self.pos;
        let tag = self.read_u8()?;
        Unit::from_tag(tag).ok_or(TelemetryError::UnknownUnit { tag, offset })
    }
}
