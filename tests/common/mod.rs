//! In-memory mock driver backing the integration tests.
//!
//! Implements the full driver seam over plain vectors, with shared
//! handles (`Rc<RefCell<..>>`) so tests can inspect what the bridge did
//! after handing the boxed driver over.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::io::Read;
use std::rc::Rc;

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use sql_bridge_rs::driver::{
    DriverBlob, DriverConnection, DriverMetadata, DriverRows, DriverStatement, ResultColumn,
};
use sql_bridge_rs::{Error, NumericValue, Result};

/// One stored cell of a mock result set.
#[derive(Debug, Clone)]
pub enum MockValue {
    Null,
    Str(String),
    I32(i32),
    I64(i64),
    I16(i16),
    I8(i8),
    F64(f64),
    F32(f32),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Ts(NaiveDateTime),
    Bytes(Vec<u8>),
    Blob(Vec<u8>),
    Num(NumericValue),
}

impl MockValue {
    pub fn s(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// Forward-only result set over stored rows. Indexes are 1-based.
pub struct MockRows {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<MockValue>>,
    pos: usize,
    was_null: bool,
    pub closed: Rc<Cell<bool>>,
}

impl MockRows {
    pub fn new(columns: Vec<ResultColumn>, rows: Vec<Vec<MockValue>>) -> Self {
        Self {
            columns,
            rows,
            pos: 0,
            was_null: false,
            closed: Rc::new(Cell::new(false)),
        }
    }

    fn cell(&self, col: usize) -> Result<MockValue> {
        if self.pos == 0 || self.pos > self.rows.len() {
            return Err(Error::driver("no current row"));
        }
        self.rows[self.pos - 1]
            .get(col - 1)
            .cloned()
            .ok_or_else(|| Error::driver(format!("no column {col}")))
    }
}

macro_rules! mock_scalar_get {
    ($name:ident, $variant:ident, $ty:ty) => {
        fn $name(&mut self, col: usize) -> Result<$ty> {
            match self.cell(col)? {
                MockValue::Null => {
                    self.was_null = true;
                    Ok(Default::default())
                }
                MockValue::$variant(v) => {
                    self.was_null = false;
                    Ok(v)
                }
                other => Err(Error::driver(format!("cell {other:?} is not {}", stringify!($variant)))),
            }
        }
    };
}

macro_rules! mock_option_get {
    ($name:ident, $variant:ident, $ty:ty) => {
        fn $name(&mut self, col: usize) -> Result<Option<$ty>> {
            match self.cell(col)? {
                MockValue::Null => {
                    self.was_null = true;
                    Ok(None)
                }
                MockValue::$variant(v) => {
                    self.was_null = false;
                    Ok(Some(v))
                }
                other => Err(Error::driver(format!("cell {other:?} is not {}", stringify!($variant)))),
            }
        }
    };
}

impl DriverRows for MockRows {
    fn columns(&mut self) -> Result<Vec<ResultColumn>> {
        Ok(self.columns.clone())
    }

    fn next(&mut self) -> Result<bool> {
        if self.pos < self.rows.len() {
            self.pos += 1;
            Ok(true)
        } else {
            self.pos = self.rows.len() + 1;
            Ok(false)
        }
    }

    fn was_null(&self) -> bool {
        self.was_null
    }

    fn get_string(&mut self, col: usize) -> Result<Option<String>> {
        match self.cell(col)? {
            MockValue::Null => {
                self.was_null = true;
                Ok(None)
            }
            MockValue::Str(v) => {
                self.was_null = false;
                Ok(Some(v))
            }
            // Drivers render numerics as text on request.
            MockValue::I32(v) => {
                self.was_null = false;
                Ok(Some(v.to_string()))
            }
            other => Err(Error::driver(format!("cell {other:?} is not Str"))),
        }
    }

    mock_scalar_get!(get_i32, I32, i32);
    mock_scalar_get!(get_i64, I64, i64);
    mock_scalar_get!(get_i16, I16, i16);
    mock_scalar_get!(get_i8, I8, i8);
    mock_scalar_get!(get_f64, F64, f64);
    mock_scalar_get!(get_f32, F32, f32);
    mock_scalar_get!(get_bool, Bool, bool);
    mock_option_get!(get_date, Date, NaiveDate);
    mock_option_get!(get_time, Time, NaiveTime);
    mock_option_get!(get_timestamp, Ts, NaiveDateTime);
    mock_option_get!(get_numeric, Num, NumericValue);

    fn get_bytes(&mut self, col: usize) -> Result<Option<Bytes>> {
        match self.cell(col)? {
            MockValue::Null => {
                self.was_null = true;
                Ok(None)
            }
            MockValue::Bytes(v) => {
                self.was_null = false;
                Ok(Some(Bytes::from(v)))
            }
            other => Err(Error::driver(format!("cell {other:?} is not Bytes"))),
        }
    }

    fn get_blob(&mut self, col: usize) -> Result<Option<Box<dyn DriverBlob>>> {
        match self.cell(col)? {
            MockValue::Null => {
                self.was_null = true;
                Ok(None)
            }
            MockValue::Blob(v) => {
                self.was_null = false;
                Ok(Some(Box::new(MockBlob::new(v))))
            }
            other => Err(Error::driver(format!("cell {other:?} is not Blob"))),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed.set(true);
        Ok(())
    }
}

/// Driver-side blob over a shared byte vector. Positions are 1-based.
pub struct MockBlob {
    pub data: Rc<RefCell<Vec<u8>>>,
    pub write_cap: Option<usize>,
    pub last_read_pos: Rc<Cell<Option<u64>>>,
    pub last_write_pos: Rc<Cell<Option<u64>>>,
}

impl MockBlob {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Rc::new(RefCell::new(data)),
            write_cap: None,
            last_read_pos: Rc::new(Cell::new(None)),
            last_write_pos: Rc::new(Cell::new(None)),
        }
    }

    /// Cap how many bytes a single write accepts, to provoke short
    /// writes.
    pub fn with_write_cap(mut self, cap: usize) -> Self {
        self.write_cap = Some(cap);
        self
    }
}

impl DriverBlob for MockBlob {
    fn length(&mut self) -> Result<u64> {
        Ok(self.data.borrow().len() as u64)
    }

    fn read(&mut self, pos: u64, len: usize) -> Result<Bytes> {
        if pos == 0 {
            return Err(Error::driver("blob position must be 1-based"));
        }
        self.last_read_pos.set(Some(pos));
        let data = self.data.borrow();
        let start = (pos - 1) as usize;
        if start >= data.len() {
            return Ok(Bytes::new());
        }
        let end = (start + len).min(data.len());
        Ok(Bytes::copy_from_slice(&data[start..end]))
    }

    fn write(&mut self, pos: u64, data: &[u8]) -> Result<usize> {
        if pos == 0 {
            return Err(Error::driver("blob position must be 1-based"));
        }
        self.last_write_pos.set(Some(pos));
        let take = match self.write_cap {
            Some(cap) => data.len().min(cap),
            None => data.len(),
        };
        let start = (pos - 1) as usize;
        let mut stored = self.data.borrow_mut();
        if stored.len() < start + take {
            stored.resize(start + take, 0);
        }
        stored[start..start + take].copy_from_slice(&data[..take]);
        Ok(take)
    }
}

/// What a statement received from the bridge, for assertions.
#[derive(Debug, Clone)]
pub enum BindRecord {
    Null(i32),
    Str(String),
    I32(i32),
    I64(i64),
    I16(i16),
    I8(i8),
    F64(f64),
    F32(f32),
    Bool(bool),
    Date(NaiveDate),
    Time(NaiveTime),
    Ts(NaiveDateTime),
    Bytes(Vec<u8>),
    Num(NumericValue),
    Blob(Vec<u8>, u64),
}

#[derive(Default)]
pub struct StmtState {
    /// Declared driver type code per parameter (1-based access).
    pub param_types: Vec<i32>,
    /// Log of (1-based index, record) for every bind call.
    pub binds: Vec<(usize, BindRecord)>,
    pub clear_calls: u32,
    pub execute_calls: u32,
    pub result: Option<(Vec<ResultColumn>, Vec<Vec<MockValue>>)>,
    pub affected: i64,
}

pub struct MockStatement {
    pub state: Rc<RefCell<StmtState>>,
}

macro_rules! mock_bind {
    ($name:ident, $variant:ident, $ty:ty) => {
        fn $name(&mut self, index: usize, value: $ty) -> Result<()> {
            self.state
                .borrow_mut()
                .binds
                .push((index, BindRecord::$variant(value)));
            Ok(())
        }
    };
}

impl DriverStatement for MockStatement {
    fn parameter_count(&mut self) -> Result<usize> {
        Ok(self.state.borrow().param_types.len())
    }

    fn parameter_type(&mut self, index: usize) -> Result<i32> {
        self.state
            .borrow()
            .param_types
            .get(index - 1)
            .copied()
            .ok_or_else(|| Error::driver(format!("no parameter {index}")))
    }

    fn bind_null(&mut self, index: usize, type_code: i32) -> Result<()> {
        self.state
            .borrow_mut()
            .binds
            .push((index, BindRecord::Null(type_code)));
        Ok(())
    }

    fn bind_string(&mut self, index: usize, value: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .binds
            .push((index, BindRecord::Str(value.to_string())));
        Ok(())
    }

    mock_bind!(bind_i32, I32, i32);
    mock_bind!(bind_i64, I64, i64);
    mock_bind!(bind_i16, I16, i16);
    mock_bind!(bind_i8, I8, i8);
    mock_bind!(bind_f64, F64, f64);
    mock_bind!(bind_f32, F32, f32);
    mock_bind!(bind_bool, Bool, bool);
    mock_bind!(bind_date, Date, NaiveDate);
    mock_bind!(bind_time, Time, NaiveTime);
    mock_bind!(bind_timestamp, Ts, NaiveDateTime);

    fn bind_bytes(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.state
            .borrow_mut()
            .binds
            .push((index, BindRecord::Bytes(value.to_vec())));
        Ok(())
    }

    fn bind_numeric(&mut self, index: usize, value: &NumericValue) -> Result<()> {
        self.state
            .borrow_mut()
            .binds
            .push((index, BindRecord::Num(value.clone())));
        Ok(())
    }

    fn bind_blob(&mut self, index: usize, data: &mut dyn Read, len: u64) -> Result<()> {
        let mut body = Vec::new();
        data.read_to_end(&mut body)?;
        self.state
            .borrow_mut()
            .binds
            .push((index, BindRecord::Blob(body, len)));
        Ok(())
    }

    fn clear_parameters(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.binds.clear();
        state.clear_calls += 1;
        Ok(())
    }

    fn execute(&mut self) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        state.execute_calls += 1;
        Ok(state.result.is_some())
    }

    fn result_rows(&mut self) -> Result<Box<dyn DriverRows>> {
        let state = self.state.borrow();
        let (columns, rows) = state
            .result
            .clone()
            .ok_or_else(|| Error::driver("statement has no result set"))?;
        Ok(Box::new(MockRows::new(columns, rows)))
    }

    fn affected_rows(&mut self) -> Result<i64> {
        Ok(self.state.borrow().affected)
    }
}

/// One table known to [`MockMetadata`].
#[derive(Debug, Clone)]
pub struct MockTable {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: String,
    pub remarks: Option<String>,
    pub columns: Vec<MockColumn>,
}

impl MockTable {
    pub fn new(catalog: &str, schema: &str, name: &str, kind: &str) -> Self {
        Self {
            catalog: Some(catalog.to_string()),
            schema: Some(schema.to_string()),
            name: name.to_string(),
            kind: kind.to_string(),
            remarks: None,
            columns: Vec::new(),
        }
    }
}

/// One column of a mock table, in driver introspection terms.
#[derive(Debug, Clone)]
pub struct MockColumn {
    pub name: String,
    pub type_code: i32,
    pub type_name: String,
    pub size: i32,
    pub decimal_digits: i32,
    pub nullable: i32,
    pub remarks: Option<String>,
    pub default: Option<String>,
    pub octet_len: i32,
    pub ordinal: i32,
}

impl MockColumn {
    pub fn new(name: &str, type_code: i32, type_name: &str, nullable: i32, ordinal: i32) -> Self {
        Self {
            name: name.to_string(),
            type_code,
            type_name: type_name.to_string(),
            size: 0,
            decimal_digits: 0,
            nullable,
            remarks: None,
            default: None,
            octet_len: 0,
            ordinal,
        }
    }
}

fn opt(v: &Option<String>) -> MockValue {
    match v {
        Some(s) => MockValue::s(s),
        None => MockValue::Null,
    }
}

/// Introspection surface over stored tables and schemas.
#[derive(Debug, Clone, Default)]
pub struct MockMetadata {
    pub catalog: Option<String>,
    pub current_schemas: Vec<String>,
    pub current_schemas_fail: bool,
    /// (schema, catalog) pairs, the driver's schema listing order.
    pub schemas: Vec<(Option<String>, Option<String>)>,
    pub tables: Vec<MockTable>,
}

impl DriverMetadata for MockMetadata {
    fn catalog(&mut self) -> Result<Option<String>> {
        Ok(self.catalog.clone())
    }

    fn current_schemas(&mut self) -> Result<Vec<String>> {
        if self.current_schemas_fail {
            return Err(Error::driver("current schemas unsupported"));
        }
        Ok(self.current_schemas.clone())
    }

    fn schemas(&mut self) -> Result<Box<dyn DriverRows>> {
        let columns = vec![
            ResultColumn::new("TABLE_SCHEM", 12),
            ResultColumn::new("TABLE_CATALOG", 12),
        ];
        let rows = self
            .schemas
            .iter()
            .map(|(schema, catalog)| vec![opt(schema), opt(catalog)])
            .collect();
        Ok(Box::new(MockRows::new(columns, rows)))
    }

    fn tables(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        name: Option<&str>,
        types: Option<&[&str]>,
    ) -> Result<Box<dyn DriverRows>> {
        let columns = vec![
            ResultColumn::new("TABLE_CAT", 12),
            ResultColumn::new("TABLE_SCHEM", 12),
            ResultColumn::new("TABLE_NAME", 12),
            ResultColumn::new("TABLE_TYPE", 12),
            ResultColumn::new("REMARKS", 12),
        ];
        let rows = self
            .tables
            .iter()
            .filter(|t| {
                catalog.map_or(true, |c| t.catalog.as_deref() == Some(c))
                    && schema.map_or(true, |s| t.schema.as_deref() == Some(s))
                    && name.map_or(true, |n| t.name == n)
                    && types.map_or(true, |ts| ts.contains(&t.kind.as_str()))
            })
            .map(|t| {
                vec![
                    opt(&t.catalog),
                    opt(&t.schema),
                    MockValue::s(&t.name),
                    MockValue::s(&t.kind),
                    opt(&t.remarks),
                ]
            })
            .collect();
        Ok(Box::new(MockRows::new(columns, rows)))
    }

    fn columns(
        &mut self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: Option<&str>,
    ) -> Result<Box<dyn DriverRows>> {
        let columns = (1..=17)
            .map(|i| ResultColumn::new(format!("C{i}"), 12))
            .collect();
        let mut rows = Vec::new();
        for t in self.tables.iter().filter(|t| {
            catalog.map_or(true, |c| t.catalog.as_deref() == Some(c))
                && schema.map_or(true, |s| t.schema.as_deref() == Some(s))
                && table.map_or(true, |n| t.name == n)
        }) {
            for c in &t.columns {
                rows.push(vec![
                    opt(&t.catalog),                 // 1 catalog
                    opt(&t.schema),                  // 2 schema
                    MockValue::s(&t.name),           // 3 table
                    MockValue::s(&c.name),           // 4 column name
                    MockValue::I32(c.type_code),     // 5 data type code
                    MockValue::s(&c.type_name),      // 6 type name
                    MockValue::I32(c.size),          // 7 column size
                    MockValue::I32(0),               // 8 buffer length
                    MockValue::I32(c.decimal_digits),// 9 decimal digits
                    MockValue::I32(10),              // 10 radix
                    MockValue::I32(c.nullable),      // 11 nullability code
                    opt(&c.remarks),                 // 12 remarks
                    opt(&c.default),                 // 13 column default
                    MockValue::Null,                 // 14 reserved
                    MockValue::Null,                 // 15 reserved
                    MockValue::I32(c.octet_len),     // 16 char octet length
                    MockValue::I32(c.ordinal),       // 17 ordinal position
                ]);
            }
        }
        Ok(Box::new(MockRows::new(columns, rows)))
    }
}

#[derive(Default)]
pub struct ConnState {
    pub auto_commit: bool,
    pub commits: u32,
    pub rollbacks: u32,
    pub savepoints_set: Vec<String>,
    pub savepoints_rolled_back: Vec<String>,
    pub savepoints_released: Vec<String>,
    pub queries: Vec<String>,
    pub closed: bool,
}

/// Driver connection over in-memory state.
pub struct MockConnection {
    pub state: Rc<RefCell<ConnState>>,
    pub metadata: MockMetadata,
    /// Template applied to the next prepared statement.
    pub next_stmt: Rc<RefCell<StmtState>>,
    /// Result set template for direct queries.
    pub query_result: Option<(Vec<ResultColumn>, Vec<Vec<MockValue>>)>,
}

impl MockConnection {
    pub fn new() -> Self {
        let state = ConnState {
            auto_commit: true,
            ..ConnState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            metadata: MockMetadata::default(),
            next_stmt: Rc::new(RefCell::new(StmtState::default())),
            query_result: None,
        }
    }
}

impl DriverConnection for MockConnection {
    fn server_version(&mut self) -> Result<String> {
        Ok("MockDB 1.0".to_string())
    }

    fn auto_commit(&mut self) -> Result<bool> {
        Ok(self.state.borrow().auto_commit)
    }

    fn set_auto_commit(&mut self, on: bool) -> Result<()> {
        self.state.borrow_mut().auto_commit = on;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.state.borrow_mut().commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.state.borrow_mut().rollbacks += 1;
        Ok(())
    }

    fn set_savepoint(&mut self, name: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .savepoints_set
            .push(name.to_string());
        Ok(())
    }

    fn rollback_savepoint(&mut self, name: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .savepoints_rolled_back
            .push(name.to_string());
        Ok(())
    }

    fn release_savepoint(&mut self, name: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .savepoints_released
            .push(name.to_string());
        Ok(())
    }

    fn prepare(&mut self, _sql: &str) -> Result<Box<dyn DriverStatement>> {
        Ok(Box::new(MockStatement {
            state: Rc::clone(&self.next_stmt),
        }))
    }

    fn execute_query(&mut self, sql: &str) -> Result<Box<dyn DriverRows>> {
        self.state.borrow_mut().queries.push(sql.to_string());
        let (columns, rows) = self
            .query_result
            .clone()
            .ok_or_else(|| Error::driver("no result configured"))?;
        Ok(Box::new(MockRows::new(columns, rows)))
    }

    fn metadata(&mut self) -> Result<Box<dyn DriverMetadata>> {
        Ok(Box::new(self.metadata.clone()))
    }

    fn close(&mut self) -> Result<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}
