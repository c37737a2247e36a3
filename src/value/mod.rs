//! Boundary-neutral typed values.
//!
//! Every SQL value crossing the boundary is carried in a [`TypedSlot`], a
//! tagged union whose tags form the wire contract with the native caller.
//! The [`codec`] submodule converts slots to and from driver-level values.

pub mod codec;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use crate::blob::BlobRead;
use crate::driver::sql_type::SqlType;
use crate::error::{Error, Result};

pub use codec::ValueCodec;

/// Kind of a typed slot.
///
/// The numeric tags identify each kind across the boundary and must agree
/// verbatim in both directions; they are the wire contract with the native
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Null,
    String,
    Int32,
    Byte,
    Float64,
    Float32,
    Boolean,
    Date,
    Time,
    Timestamp,
    Binary,
    Blob,
    Int64,
    Int16,
    Numeric,
}

impl SlotKind {
    /// The boundary tag for this kind.
    pub const fn tag(self) -> u8 {
        match self {
            SlotKind::Null => 0,
            SlotKind::String => 1,
            SlotKind::Int32 => 2,
            SlotKind::Byte => 3,
            SlotKind::Float64 => 4,
            SlotKind::Float32 => 5,
            SlotKind::Boolean => 6,
            SlotKind::Date => 7,
            SlotKind::Time => 8,
            SlotKind::Timestamp => 9,
            SlotKind::Binary => 10,
            SlotKind::Blob => 11,
            SlotKind::Int64 => 12,
            SlotKind::Int16 => 13,
            SlotKind::Numeric => 14,
        }
    }

    /// Resolve a boundary tag, failing fast on an unknown value.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(SlotKind::Null),
            1 => Ok(SlotKind::String),
            2 => Ok(SlotKind::Int32),
            3 => Ok(SlotKind::Byte),
            4 => Ok(SlotKind::Float64),
            5 => Ok(SlotKind::Float32),
            6 => Ok(SlotKind::Boolean),
            7 => Ok(SlotKind::Date),
            8 => Ok(SlotKind::Time),
            9 => Ok(SlotKind::Timestamp),
            10 => Ok(SlotKind::Binary),
            11 => Ok(SlotKind::Blob),
            12 => Ok(SlotKind::Int64),
            13 => Ok(SlotKind::Int16),
            14 => Ok(SlotKind::Numeric),
            _ => Err(Error::UnknownTypeTag { tag }),
        }
    }

    /// The SQL type to bind when the parameter value is NULL.
    ///
    /// [`SlotKind::Null`] has no declared type of its own; its bind target
    /// is resolved from the statement's parameter metadata instead.
    pub const fn null_bind_type(self) -> SqlType {
        match self {
            SlotKind::Null => SqlType::Null,
            SlotKind::String => SqlType::Varchar,
            SlotKind::Int32 => SqlType::Integer,
            SlotKind::Byte => SqlType::Char,
            SlotKind::Float64 => SqlType::Double,
            SlotKind::Float32 => SqlType::Float,
            SlotKind::Boolean => SqlType::Boolean,
            SlotKind::Date => SqlType::Date,
            SlotKind::Time => SqlType::Time,
            SlotKind::Timestamp => SqlType::Timestamp,
            SlotKind::Binary => SqlType::Binary,
            SlotKind::Blob => SqlType::Blob,
            SlotKind::Int64 => SqlType::BigInt,
            SlotKind::Int16 => SqlType::SmallInt,
            SlotKind::Numeric => SqlType::Numeric,
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::Null => "null",
            SlotKind::String => "string",
            SlotKind::Int32 => "int32",
            SlotKind::Byte => "byte",
            SlotKind::Float64 => "float64",
            SlotKind::Float32 => "float32",
            SlotKind::Boolean => "boolean",
            SlotKind::Date => "date",
            SlotKind::Time => "time",
            SlotKind::Timestamp => "timestamp",
            SlotKind::Binary => "binary",
            SlotKind::Blob => "blob",
            SlotKind::Int64 => "int64",
            SlotKind::Int16 => "int16",
            SlotKind::Numeric => "numeric",
        };
        write!(f, "{}", name)
    }
}

/// Exact decimal value carried as text plus precision and scale.
///
/// Kept as decimal digits rather than a binary float so a round-trip never
/// rounds; equality is defined on (digits, precision, scale).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericValue {
    /// Decimal digits, as the driver rendered them (e.g. "-12.3400").
    pub digits: String,
    /// Total number of significant digits.
    pub precision: u32,
    /// Digits to the right of the decimal point.
    pub scale: u32,
}

impl NumericValue {
    pub fn new(digits: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self {
            digits: digits.into(),
            precision,
            scale,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digits)
    }
}

/// A single boundary value.
pub enum TypedSlot {
    /// Generic NULL with no declared type.
    Null,
    String(String),
    Int32(i32),
    Byte(i8),
    Float64(f64),
    Float32(f32),
    Boolean(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Binary(Vec<u8>),
    /// Large object, streamed rather than materialized.
    Blob(Box<dyn BlobRead>),
    Int64(i64),
    Int16(i16),
    Numeric(NumericValue),
}

impl TypedSlot {
    /// The kind of this slot.
    pub fn kind(&self) -> SlotKind {
        match self {
            TypedSlot::Null => SlotKind::Null,
            TypedSlot::String(_) => SlotKind::String,
            TypedSlot::Int32(_) => SlotKind::Int32,
            TypedSlot::Byte(_) => SlotKind::Byte,
            TypedSlot::Float64(_) => SlotKind::Float64,
            TypedSlot::Float32(_) => SlotKind::Float32,
            TypedSlot::Boolean(_) => SlotKind::Boolean,
            TypedSlot::Date(_) => SlotKind::Date,
            TypedSlot::Time(_) => SlotKind::Time,
            TypedSlot::Timestamp(_) => SlotKind::Timestamp,
            TypedSlot::Binary(_) => SlotKind::Binary,
            TypedSlot::Blob(_) => SlotKind::Blob,
            TypedSlot::Int64(_) => SlotKind::Int64,
            TypedSlot::Int16(_) => SlotKind::Int16,
            TypedSlot::Numeric(_) => SlotKind::Numeric,
        }
    }

    /// Check if the slot is the generic NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, TypedSlot::Null)
    }
}

impl PartialEq for TypedSlot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypedSlot::Null, TypedSlot::Null) => true,
            (TypedSlot::String(a), TypedSlot::String(b)) => a == b,
            (TypedSlot::Int32(a), TypedSlot::Int32(b)) => a == b,
            (TypedSlot::Byte(a), TypedSlot::Byte(b)) => a == b,
            (TypedSlot::Float64(a), TypedSlot::Float64(b)) => a == b,
            (TypedSlot::Float32(a), TypedSlot::Float32(b)) => a == b,
            (TypedSlot::Boolean(a), TypedSlot::Boolean(b)) => a == b,
            (TypedSlot::Date(a), TypedSlot::Date(b)) => a == b,
            (TypedSlot::Time(a), TypedSlot::Time(b)) => a == b,
            (TypedSlot::Timestamp(a), TypedSlot::Timestamp(b)) => a == b,
            (TypedSlot::Binary(a), TypedSlot::Binary(b)) => a == b,
            (TypedSlot::Numeric(a), TypedSlot::Numeric(b)) => a == b,
            (TypedSlot::Int64(a), TypedSlot::Int64(b)) => a == b,
            (TypedSlot::Int16(a), TypedSlot::Int16(b)) => a == b,
            // Streams carry no comparable value.
            (TypedSlot::Blob(_), TypedSlot::Blob(_)) => false,
            _ => false,
        }
    }
}

impl fmt::Debug for TypedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedSlot::Null => write!(f, "Null"),
            TypedSlot::String(v) => f.debug_tuple("String").field(v).finish(),
            TypedSlot::Int32(v) => f.debug_tuple("Int32").field(v).finish(),
            TypedSlot::Byte(v) => f.debug_tuple("Byte").field(v).finish(),
            TypedSlot::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            TypedSlot::Float32(v) => f.debug_tuple("Float32").field(v).finish(),
            TypedSlot::Boolean(v) => f.debug_tuple("Boolean").field(v).finish(),
            TypedSlot::Date(v) => f.debug_tuple("Date").field(v).finish(),
            TypedSlot::Time(v) => f.debug_tuple("Time").field(v).finish(),
            TypedSlot::Timestamp(v) => f.debug_tuple("Timestamp").field(v).finish(),
            TypedSlot::Binary(v) => write!(f, "Binary({} bytes)", v.len()),
            TypedSlot::Blob(_) => write!(f, "Blob(<stream>)"),
            TypedSlot::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            TypedSlot::Int16(v) => f.debug_tuple("Int16").field(v).finish(),
            TypedSlot::Numeric(v) => f.debug_tuple("Numeric").field(v).finish(),
        }
    }
}

/// Identifier case folding: fold to lower case only when upper-casing the
/// string is a no-op.
///
/// This asymmetric test is a legacy catalog-identifier convention; strings
/// with mixed case pass through untouched. Callers depend on the exact
/// behavior, quirks included, so it is preserved rather than replaced with
/// a blanket downcase.
pub fn fold_identifier(s: &str) -> String {
    if s.to_uppercase() == s {
        s.to_lowercase()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for tag in 0u8..=14 {
            let kind = SlotKind::from_tag(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
    }

    #[test]
    fn test_unknown_tag_fails_fast() {
        match SlotKind::from_tag(15) {
            Err(Error::UnknownTypeTag { tag }) => assert_eq!(tag, 15),
            other => panic!("expected UnknownTypeTag, got {other:?}"),
        }
    }

    #[test]
    fn test_fold_all_upper() {
        assert_eq!(fold_identifier("ORDERS"), "orders");
    }

    #[test]
    fn test_fold_mixed_case_untouched() {
        assert_eq!(fold_identifier("MyTable"), "MyTable");
    }

    #[test]
    fn test_fold_already_lower_untouched() {
        // "orders".to_uppercase() changes it, so it passes through.
        assert_eq!(fold_identifier("orders"), "orders");
    }

    #[test]
    fn test_fold_idempotent() {
        for s in ["ORDERS", "orders", "MyTable", "PUBLIC.ORDERS", "a_b_1"] {
            let once = fold_identifier(s);
            assert_eq!(fold_identifier(&once), once);
        }
    }

    #[test]
    fn test_numeric_equality_is_textual() {
        let a = NumericValue::new("1.50", 3, 2);
        let b = NumericValue::new("1.50", 3, 2);
        let c = NumericValue::new("1.5", 2, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_slot_kind_matches_variant() {
        assert_eq!(TypedSlot::Int32(0).kind(), SlotKind::Int32);
        assert_eq!(
            TypedSlot::Numeric(NumericValue::new("0", 1, 0)).kind(),
            SlotKind::Numeric
        );
        assert_eq!(TypedSlot::Null.kind(), SlotKind::Null);
    }
}
