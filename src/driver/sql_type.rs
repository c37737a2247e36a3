//! Standard numeric SQL type codes reported by drivers.
//!
//! Drivers describe result columns and statement parameters with the
//! standard small-integer type codes. The bridge never interprets these
//! beyond mapping them to a portable type-name tag for column metadata
//! and picking a bind target for SQL NULL parameters.

/// A driver-level SQL type with its standard numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Bit,
    TinyInt,
    BigInt,
    LongVarBinary,
    VarBinary,
    Binary,
    LongVarChar,
    Null,
    Char,
    Numeric,
    Decimal,
    Integer,
    SmallInt,
    Float,
    Real,
    Double,
    Varchar,
    Boolean,
    Date,
    Time,
    Timestamp,
    DataLink,
    Other,
    JavaObject,
    Distinct,
    Struct,
    Array,
    Blob,
    Clob,
    Ref,
    NClob,
    SqlXml,
    RowId,
    NChar,
    NVarchar,
    LongNVarchar,
}

impl SqlType {
    /// The standard numeric code for this type.
    pub const fn code(self) -> i32 {
        match self {
            SqlType::Bit => -7,
            SqlType::TinyInt => -6,
            SqlType::BigInt => -5,
            SqlType::LongVarBinary => -4,
            SqlType::VarBinary => -3,
            SqlType::Binary => -2,
            SqlType::LongVarChar => -1,
            SqlType::Null => 0,
            SqlType::Char => 1,
            SqlType::Numeric => 2,
            SqlType::Decimal => 3,
            SqlType::Integer => 4,
            SqlType::SmallInt => 5,
            SqlType::Float => 6,
            SqlType::Real => 7,
            SqlType::Double => 8,
            SqlType::Varchar => 12,
            SqlType::Boolean => 16,
            SqlType::Date => 91,
            SqlType::Time => 92,
            SqlType::Timestamp => 93,
            SqlType::DataLink => 70,
            SqlType::Other => 1111,
            SqlType::JavaObject => 2000,
            SqlType::Distinct => 2001,
            SqlType::Struct => 2002,
            SqlType::Array => 2003,
            SqlType::Blob => 2004,
            SqlType::Clob => 2005,
            SqlType::Ref => 2006,
            SqlType::NClob => 2011,
            SqlType::SqlXml => 2009,
            SqlType::RowId => -8,
            SqlType::NChar => -15,
            SqlType::NVarchar => -9,
            SqlType::LongNVarchar => -16,
        }
    }
}

/// Nullability code: the column rejects NULL values.
pub const COLUMN_NO_NULLS: i32 = 0;
/// Nullability code: the column accepts NULL values.
pub const COLUMN_NULLABLE: i32 = 1;
/// Nullability code: nullability is unknown.
pub const COLUMN_NULLABLE_UNKNOWN: i32 = 2;

/// Whether a driver nullability code means the column accepts NULLs.
///
/// Exactly one code means "not nullable"; every other value, including
/// "unknown", is treated as nullable.
pub fn code_is_nullable(code: i32) -> bool {
    code != COLUMN_NO_NULLS
}

/// Map a driver numeric SQL type code to a portable type-name tag.
///
/// Unmatched codes map to "binary" as the safe opaque default.
pub fn portable_type_name(code: i32) -> &'static str {
    match code {
        c if c == SqlType::Varchar.code()
            || c == SqlType::Char.code()
            || c == SqlType::NChar.code()
            || c == SqlType::NVarchar.code()
            || c == SqlType::LongVarChar.code()
            || c == SqlType::LongNVarchar.code()
            || c == SqlType::RowId.code()
            || c == SqlType::SqlXml.code() =>
        {
            "string"
        }
        c if c == SqlType::Boolean.code() || c == SqlType::Bit.code() => "boolean",
        c if c == SqlType::Integer.code() => "int32",
        c if c == SqlType::BigInt.code() => "int64",
        c if c == SqlType::SmallInt.code() => "int16",
        c if c == SqlType::TinyInt.code() => "byte",
        c if c == SqlType::Double.code() => "float64",
        c if c == SqlType::Float.code() || c == SqlType::Real.code() => "float32",
        c if c == SqlType::Date.code() => "date",
        c if c == SqlType::Time.code() => "time",
        c if c == SqlType::Timestamp.code() => "datetime",
        c if c == SqlType::Numeric.code() || c == SqlType::Decimal.code() => "decimal",
        c if c == SqlType::Blob.code() => "blob",
        c if c == SqlType::Null.code() => "null",
        _ => "binary",
    }
}
