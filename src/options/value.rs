//! Option storage kinds and values.

use std::time::Duration;

use crate::core::constants::{INT32_SIZE, INT64_SIZE};

/// Storage kind of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Boolean, passed as a 32-bit integer.
    Bool,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Duration, passed as 32-bit milliseconds.
    Duration,
    /// One of a fixed set of 32-bit discriminants.
    Enum,
    /// Variable-length byte string.
    Bytes,
}

impl OptionKind {
    /// Exact raw size for fixed kinds, `None` for byte strings.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            OptionKind::Bool | OptionKind::Int32 | OptionKind::Duration | OptionKind::Enum => {
                Some(INT32_SIZE)
            }
            OptionKind::Int64 => Some(INT64_SIZE),
            OptionKind::Bytes => None,
        }
    }
}

/// Value of one option.
///
/// Byte strings are length-delimited; they are never null-terminated and may
/// contain null bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer value.
    Int32(i32),
    /// 64-bit integer value.
    Int64(i64),
    /// Millisecond-granular duration.
    Duration(Duration),
    /// Enum discriminant.
    Enum(i32),
    /// Byte string.
    Bytes(Vec<u8>),
}

impl OptionValue {
    /// Storage kind of this value.
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Int32(_) => OptionKind::Int32,
            OptionValue::Int64(_) => OptionKind::Int64,
            OptionValue::Duration(_) => OptionKind::Duration,
            OptionValue::Enum(_) => OptionKind::Enum,
            OptionValue::Bytes(_) => OptionKind::Bytes,
        }
    }

    /// Size of the raw (application-facing) form.
    pub fn raw_len(&self) -> usize {
        match self {
            OptionValue::Bytes(b) => b.len(),
            other => other.kind().fixed_size().unwrap_or(0),
        }
    }

    /// Raw form in native byte order, as passed through a C-style API.
    ///
    /// Durations saturate at `i32::MAX` milliseconds.
    pub fn to_raw(&self) -> Vec<u8> {
        match self {
            OptionValue::Bool(b) => i32::from(*b).to_ne_bytes().to_vec(),
            OptionValue::Int32(v) | OptionValue::Enum(v) => v.to_ne_bytes().to_vec(),
            OptionValue::Int64(v) => v.to_ne_bytes().to_vec(),
            OptionValue::Duration(d) => duration_to_millis(*d).to_ne_bytes().to_vec(),
            OptionValue::Bytes(b) => b.clone(),
        }
    }

    /// Boolean content, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer content of any integral kind.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int32(v) | OptionValue::Enum(v) => Some(i64::from(*v)),
            OptionValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Duration content, if this is a duration.
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            OptionValue::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Byte content, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            OptionValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Milliseconds of `d`, saturated to the 32-bit wire range.
pub(crate) fn duration_to_millis(d: Duration) -> i32 {
    i32::try_from(d.as_millis()).unwrap_or(i32::MAX)
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int32(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int64(v)
    }
}

impl From<Duration> for OptionValue {
    fn from(v: Duration) -> Self {
        OptionValue::Duration(v)
    }
}

impl From<&[u8]> for OptionValue {
    fn from(v: &[u8]) -> Self {
        OptionValue::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(v: Vec<u8>) -> Self {
        OptionValue::Bytes(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Bytes(v.as_bytes().to_vec())
    }
}

/// Compile-time default value for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initial {
    /// Boolean default.
    Bool(bool),
    /// 32-bit integer default.
    Int32(i32),
    /// 64-bit integer default.
    Int64(i64),
    /// Duration default in milliseconds.
    Millis(u64),
    /// Enum discriminant default.
    Enum(i32),
    /// Byte string default.
    Bytes(&'static [u8]),
}

impl Initial {
    /// Materialize the default.
    pub fn to_value(self) -> OptionValue {
        match self {
            Initial::Bool(v) => OptionValue::Bool(v),
            Initial::Int32(v) => OptionValue::Int32(v),
            Initial::Int64(v) => OptionValue::Int64(v),
            Initial::Millis(ms) => OptionValue::Duration(Duration::from_millis(ms)),
            Initial::Enum(v) => OptionValue::Enum(v),
            Initial::Bytes(b) => OptionValue::Bytes(b.to_vec()),
        }
    }
}
