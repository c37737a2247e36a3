//! The driver seam: object-safe traits a concrete database driver implements.
//!
//! The bridge never talks to a database itself; it drives one of these
//! trait objects and presents a uniform value and metadata model on top.
//! Every call is a blocking round-trip to the data source; the caller
//! serializes all access to a given connection, statement, cursor, or blob.
//!
//! Getter semantics follow the usual driver convention: scalar getters
//! return the zero value on SQL NULL and [`DriverRows::was_null`] reports
//! the nullness of the most recent read, while object getters return
//! `Option`. Column and parameter indexes are 1-based at this seam.

pub mod sql_type;

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::Result;
use crate::value::NumericValue;

/// Description of one result column as reported by the driver.
#[derive(Debug, Clone)]
pub struct ResultColumn {
    /// Column name.
    pub name: String,
    /// Display label, when the driver distinguishes one from the name.
    pub label: Option<String>,
    /// Numeric SQL type code (see [`sql_type`]).
    pub type_code: i32,
}

impl ResultColumn {
    pub fn new(name: impl Into<String>, type_code: i32) -> Self {
        Self {
            name: name.into(),
            label: None,
            type_code,
        }
    }
}

/// A live connection to the underlying database.
pub trait DriverConnection {
    /// Product name and version, joined by a space.
    fn server_version(&mut self) -> Result<String>;

    /// Whether the connection is in auto-commit mode.
    fn auto_commit(&mut self) -> Result<bool>;

    fn set_auto_commit(&mut self, on: bool) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    fn rollback(&mut self) -> Result<()>;

    /// Create a named savepoint in the current transaction.
    fn set_savepoint(&mut self, name: &str) -> Result<()>;

    /// Roll back to a named savepoint.
    fn rollback_savepoint(&mut self, name: &str) -> Result<()>;

    /// Release a named savepoint.
    fn release_savepoint(&mut self, name: &str) -> Result<()>;

    /// Prepare a parameterized statement.
    fn prepare(&mut self, sql: &str) -> Result<Box<dyn DriverStatement>>;

    /// Execute a plain SELECT with no parameters.
    fn execute_query(&mut self, sql: &str) -> Result<Box<dyn DriverRows>>;

    /// Open the introspection surface of this connection.
    fn metadata(&mut self) -> Result<Box<dyn DriverMetadata>>;

    /// Release the connection.
    fn close(&mut self) -> Result<()>;
}

/// A prepared, parameterized statement.
pub trait DriverStatement {
    fn parameter_count(&mut self) -> Result<usize>;

    /// Declared SQL type code of the parameter at the 1-based `index`.
    fn parameter_type(&mut self, index: usize) -> Result<i32>;

    /// Bind SQL NULL of the given declared type.
    fn bind_null(&mut self, index: usize, type_code: i32) -> Result<()>;

    fn bind_string(&mut self, index: usize, value: &str) -> Result<()>;
    fn bind_i32(&mut self, index: usize, value: i32) -> Result<()>;
    fn bind_i64(&mut self, index: usize, value: i64) -> Result<()>;
    fn bind_i16(&mut self, index: usize, value: i16) -> Result<()>;
    fn bind_i8(&mut self, index: usize, value: i8) -> Result<()>;
    fn bind_f64(&mut self, index: usize, value: f64) -> Result<()>;
    fn bind_f32(&mut self, index: usize, value: f32) -> Result<()>;
    fn bind_bool(&mut self, index: usize, value: bool) -> Result<()>;
    fn bind_date(&mut self, index: usize, value: NaiveDate) -> Result<()>;
    fn bind_time(&mut self, index: usize, value: NaiveTime) -> Result<()>;
    fn bind_timestamp(&mut self, index: usize, value: NaiveDateTime) -> Result<()>;
    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()>;
    fn bind_numeric(&mut self, index: usize, value: &NumericValue) -> Result<()>;

    /// Bind a large object from a sequential stream of `len` bytes.
    fn bind_blob(&mut self, index: usize, data: &mut dyn std::io::Read, len: u64) -> Result<()>;

    fn clear_parameters(&mut self) -> Result<()>;

    /// Execute; returns true when a result set is available.
    fn execute(&mut self) -> Result<bool>;

    /// The result set produced by the last execution.
    fn result_rows(&mut self) -> Result<Box<dyn DriverRows>>;

    /// Rows affected by the last non-SELECT execution.
    fn affected_rows(&mut self) -> Result<i64>;
}

/// A forward-only driver result set positioned before its first row.
pub trait DriverRows {
    /// The columns of this result set.
    fn columns(&mut self) -> Result<Vec<ResultColumn>>;

    /// Move to the next row; false when no more rows are available.
    fn next(&mut self) -> Result<bool>;

    /// Whether the most recently read value was SQL NULL.
    fn was_null(&self) -> bool;

    fn get_string(&mut self, col: usize) -> Result<Option<String>>;
    fn get_i32(&mut self, col: usize) -> Result<i32>;
    fn get_i64(&mut self, col: usize) -> Result<i64>;
    fn get_i16(&mut self, col: usize) -> Result<i16>;
    fn get_i8(&mut self, col: usize) -> Result<i8>;
    fn get_f64(&mut self, col: usize) -> Result<f64>;
    fn get_f32(&mut self, col: usize) -> Result<f32>;
    fn get_bool(&mut self, col: usize) -> Result<bool>;
    fn get_date(&mut self, col: usize) -> Result<Option<NaiveDate>>;
    fn get_time(&mut self, col: usize) -> Result<Option<NaiveTime>>;
    fn get_timestamp(&mut self, col: usize) -> Result<Option<NaiveDateTime>>;
    fn get_bytes(&mut self, col: usize) -> Result<Option<Bytes>>;
    fn get_blob(&mut self, col: usize) -> Result<Option<Box<dyn DriverBlob>>>;
    fn get_numeric(&mut self, col: usize) -> Result<Option<NumericValue>>;

    /// Release the driver cursor; further calls are undefined.
    fn close(&mut self) -> Result<()>;
}

/// A driver-side large-object reference.
///
/// Positions are 1-based, per the driver convention. Reads are
/// offset-addressed and must not assume sequential access.
pub trait DriverBlob {
    /// Total length in bytes.
    fn length(&mut self) -> Result<u64>;

    /// Read at most `len` bytes starting at the 1-based `pos`.
    fn read(&mut self, pos: u64, len: usize) -> Result<Bytes>;

    /// Write `data` at the 1-based `pos`, returning the bytes written.
    fn write(&mut self, pos: u64, data: &[u8]) -> Result<usize>;
}

/// Catalog introspection as exposed by the driver.
///
/// `tables` and `columns` accept catalog/schema/name filters and apply
/// them server-side; `schemas` takes none, so schema enumeration filters
/// client-side.
pub trait DriverMetadata {
    /// The connection's current catalog, when the driver has one.
    fn catalog(&mut self) -> Result<Option<String>>;

    /// Schema names on the connection's default search path.
    fn current_schemas(&mut self) -> Result<Vec<String>>;

    /// All schemas: (catalog name, schema name) per row, schema first.
    fn schemas(&mut self) -> Result<Box<dyn DriverRows>>;

    /// Tables matching the filters; `types` restricts the table types
    /// (e.g. `["VIEW"]`), `None` meaning all.
    ///
    /// Row shape (1-based): catalog, schema, name, type, remarks.
    fn tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        name: Option<&str>,
        types: Option<&[&str]>,
    ) -> Result<Box<dyn DriverRows>>;

    /// Columns of the tables matching the filters.
    ///
    /// Row shape (1-based): catalog, schema, table, column name, data type
    /// code (int), type name, column size (int), buffer length (int),
    /// decimal digits (int), radix (int), nullability code (int), remarks,
    /// column default, reserved, reserved, char octet length (int),
    /// ordinal position (int).
    fn columns(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<Box<dyn DriverRows>>;
}
