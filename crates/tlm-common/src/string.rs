//! Raw strings as they appear on the wire.
//!
//! The stream stores strings as a one-byte length followed by raw bytes with
//! no charset guarantee. [`RawString`] keeps those bytes verbatim and only
//! decodes lossily when a caller asks for display text.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Byte string copied verbatim from the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawString(Vec<u8>);

impl RawString {
    /// Wrap raw bytes without validation.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        RawString(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display text, replacing invalid UTF-8 sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }
}

impl From<&str> for RawString {
    fn from(value: &str) -> Self {
        RawString(value.as_bytes().to_vec())
    }
}

impl From<String> for RawString {
    fn from(value: String) -> Self {
        RawString(value.into_bytes())
    }
}

impl From<&[u8]> for RawString {
    fn from(value: &[u8]) -> Self {
        RawString(value.to_vec())
    }
}

impl PartialEq<str> for RawString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for RawString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for RawString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for RawString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RawString::from)
    }
}
