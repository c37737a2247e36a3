//! Metadata enumerator cursors with fixed row shapes.
//!
//! Every enumerator presents a fixed column set (name, order, kind); the
//! order and count are a public contract, native callers index by
//! position. The catalog column of each shape is never NULL (a driver
//! NULL surfaces as "") and identifier columns are folded through
//! [`fold_identifier`].

use crate::cursor::{Cursor, CursorState};
use crate::driver::sql_type::{code_is_nullable, portable_type_name};
use crate::driver::DriverRows;
use crate::error::{Error, Result};
use crate::row::{ColumnDescriptor, RowSink};
use crate::value::{fold_identifier, SlotKind, ValueCodec};

use super::{MetaFilter, SchemaIdentity};

/// Column shape of [`SchemaRows`].
pub fn schema_shape() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("catalog_name", SlotKind::String),
        ColumnDescriptor::new("schema_name", SlotKind::String),
        ColumnDescriptor::new("schema_owner", SlotKind::String),
        ColumnDescriptor::new("schema_internal", SlotKind::Boolean),
    ]
}

/// Column shape of [`TableRows`].
pub fn table_shape() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("table_catalog", SlotKind::String),
        ColumnDescriptor::new("table_schema", SlotKind::String),
        ColumnDescriptor::new("table_name", SlotKind::String),
        ColumnDescriptor::new("table_type", SlotKind::String),
        ColumnDescriptor::new("is_insertable_into", SlotKind::Boolean),
        ColumnDescriptor::new("table_comments", SlotKind::String),
        ColumnDescriptor::new("table_short_name", SlotKind::String),
        ColumnDescriptor::new("table_full_name", SlotKind::String),
        ColumnDescriptor::new("table_owner", SlotKind::String),
    ]
}

/// Column shape of [`ViewRows`].
pub fn view_shape() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("table_catalog", SlotKind::String),
        ColumnDescriptor::new("table_schema", SlotKind::String),
        ColumnDescriptor::new("table_name", SlotKind::String),
        ColumnDescriptor::new("view_definition", SlotKind::String),
        ColumnDescriptor::new("check_option", SlotKind::String),
        ColumnDescriptor::new("is_updatable", SlotKind::Boolean),
    ]
}

/// Column shape of [`ColumnRows`].
pub fn column_shape() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("table_catalog", SlotKind::String),
        ColumnDescriptor::new("table_schema", SlotKind::String),
        ColumnDescriptor::new("table_name", SlotKind::String),
        ColumnDescriptor::new("column_name", SlotKind::String),
        ColumnDescriptor::new("ordinal_position", SlotKind::Int32),
        ColumnDescriptor::new("column_default", SlotKind::String),
        ColumnDescriptor::new("is_nullable", SlotKind::Boolean),
        ColumnDescriptor::new("data_type", SlotKind::String),
        ColumnDescriptor::new("array_spec", SlotKind::String),
        ColumnDescriptor::new("gtype", SlotKind::String),
        ColumnDescriptor::new("character_maximum_length", SlotKind::Int32),
        ColumnDescriptor::new("character_octet_length", SlotKind::Int32),
        ColumnDescriptor::new("numeric_precision", SlotKind::Int32),
        ColumnDescriptor::new("numeric_scale", SlotKind::Int32),
        ColumnDescriptor::new("datetime_precision", SlotKind::Int32),
        ColumnDescriptor::new("character_set_catalog", SlotKind::String),
        ColumnDescriptor::new("character_set_schema", SlotKind::String),
        ColumnDescriptor::new("character_set_name", SlotKind::String),
        ColumnDescriptor::new("collation_catalog", SlotKind::String),
        ColumnDescriptor::new("collation_schema", SlotKind::String),
        ColumnDescriptor::new("collation_name", SlotKind::String),
        ColumnDescriptor::new("extra", SlotKind::String),
        ColumnDescriptor::new("is_updatable", SlotKind::String),
        ColumnDescriptor::new("column_comments", SlotKind::String),
    ]
}

/// Column shape of [`ConstraintRows`].
pub fn constraint_shape() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("constraint_catalog", SlotKind::String),
        ColumnDescriptor::new("constraint_schema", SlotKind::String),
        ColumnDescriptor::new("constraint_name", SlotKind::String),
        ColumnDescriptor::new("table_catalog", SlotKind::String),
        ColumnDescriptor::new("table_schema", SlotKind::String),
        ColumnDescriptor::new("table_name", SlotKind::String),
        ColumnDescriptor::new("constraint_type", SlotKind::String),
        ColumnDescriptor::new("check_clause", SlotKind::String),
        ColumnDescriptor::new("is_deferrable", SlotKind::Boolean),
        ColumnDescriptor::new("initially_deferred", SlotKind::Boolean),
    ]
}

fn codecs_for(shape: &[ColumnDescriptor]) -> Vec<ValueCodec> {
    shape
        .iter()
        .enumerate()
        .map(|(i, d)| ValueCodec::new(d.kind, i))
        .collect()
}

fn check_open(state: CursorState) -> Result<bool> {
    match state {
        CursorState::Closed => Err(Error::CursorClosed),
        CursorState::Exhausted => Ok(false),
        CursorState::Open => Ok(true),
    }
}

/// Fold the qualified "schema.name" form, treating NULLs as empty.
fn qualified_name(schema: Option<&str>, name: Option<&str>) -> String {
    fold_identifier(&format!(
        "{}.{}",
        schema.unwrap_or_default(),
        name.unwrap_or_default()
    ))
}

/// Enumerates schemas: catalog_name, schema_name, schema_owner,
/// schema_internal.
///
/// The driver's schema listing takes no filters, so catalog/schema
/// filtering happens here, skipping non-matching rows. The skip is a
/// plain loop; a filtered scan over a large catalog must not grow any
/// stack.
pub struct SchemaRows {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    filter: MetaFilter,
    state: CursorState,
    fetched: u64,
}

impl SchemaRows {
    pub(crate) fn new(rows: Box<dyn DriverRows>, filter: MetaFilter) -> Self {
        let descriptors = schema_shape();
        let mut codecs = codecs_for(&descriptors);
        codecs[0].no_null_as_empty = true;
        codecs[0].convert_lowercase = true;
        codecs[1].convert_lowercase = true;
        Self {
            rows,
            descriptors,
            codecs,
            filter,
            state: CursorState::Open,
            fetched: 0,
        }
    }
}

impl Cursor for SchemaRows {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        if !check_open(self.state)? {
            return Ok(false);
        }
        loop {
            if !self.rows.next()? {
                self.state = CursorState::Exhausted;
                return Ok(false);
            }
            if let Some(catalog) = &self.filter.catalog {
                if self.rows.get_string(2)?.as_deref() != Some(catalog) {
                    continue;
                }
            }
            if let Some(schema) = &self.filter.schema {
                if self.rows.get_string(1)?.as_deref() != Some(schema) {
                    continue;
                }
            }
            // Driver shape is (schema, catalog); ours leads with catalog.
            self.codecs[0].read_into(self.rows.as_mut(), 1, sink)?;
            self.codecs[1].read_into(self.rows.as_mut(), 0, sink)?;
            sink.set_bool(3, false);
            self.fetched += 1;
            return Ok(true);
        }
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}

/// Enumerates tables: table_catalog, table_schema, table_name, table_type,
/// is_insertable_into, table_comments, table_short_name, table_full_name,
/// table_owner.
///
/// The short name is the bare table name when the table's schema is
/// current, otherwise the qualified "schema.name"; the full name is always
/// the qualified form, both folded.
pub struct TableRows {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    identity: SchemaIdentity,
    state: CursorState,
    fetched: u64,
}

impl TableRows {
    pub(crate) fn new(rows: Box<dyn DriverRows>, identity: SchemaIdentity) -> Self {
        let descriptors = table_shape();
        let mut codecs = codecs_for(&descriptors);
        codecs[0].no_null_as_empty = true;
        codecs[0].convert_lowercase = true;
        codecs[1].convert_lowercase = true;
        codecs[2].convert_lowercase = true;
        codecs[6].convert_lowercase = true;
        codecs[7].convert_lowercase = true;
        Self {
            rows,
            descriptors,
            codecs,
            identity,
            state: CursorState::Open,
            fetched: 0,
        }
    }
}

impl Cursor for TableRows {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        if !check_open(self.state)? {
            return Ok(false);
        }
        if !self.rows.next()? {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        for i in 0..4 {
            self.codecs[i].read_into(self.rows.as_mut(), i, sink)?;
        }
        self.codecs[5].read_into(self.rows.as_mut(), 4, sink)?;

        let schema = self.rows.get_string(2)?;
        let name = self.rows.get_string(3)?;
        let full = qualified_name(schema.as_deref(), name.as_deref());
        if self
            .identity
            .is_current(schema.as_deref().unwrap_or_default())
        {
            sink.set_string(6, &fold_identifier(name.as_deref().unwrap_or_default()));
        } else {
            sink.set_string(6, &full);
        }
        sink.set_string(7, &full);

        self.fetched += 1;
        Ok(true)
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}

/// Enumerates views: table_catalog, table_schema, table_name,
/// view_definition, check_option, is_updatable.
///
/// Drivers expose neither the defining query nor updatability uniformly,
/// so the last three columns stay NULL.
pub struct ViewRows {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    state: CursorState,
    fetched: u64,
}

impl ViewRows {
    pub(crate) fn new(rows: Box<dyn DriverRows>) -> Self {
        let descriptors = view_shape();
        let mut codecs = codecs_for(&descriptors);
        codecs[0].no_null_as_empty = true;
        codecs[0].convert_lowercase = true;
        codecs[1].convert_lowercase = true;
        codecs[2].convert_lowercase = true;
        Self {
            rows,
            descriptors,
            codecs,
            state: CursorState::Open,
            fetched: 0,
        }
    }
}

impl Cursor for ViewRows {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        if !check_open(self.state)? {
            return Ok(false);
        }
        if !self.rows.next()? {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        for i in 0..3 {
            self.codecs[i].read_into(self.rows.as_mut(), i, sink)?;
        }
        self.fetched += 1;
        Ok(true)
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}

/// Enumerates table columns, 24 positions (see [`column_shape`]).
///
/// `gtype` carries the portable type-name tag derived from the driver's
/// numeric SQL type code; `is_nullable` derives from the driver
/// nullability code, where only an explicit "no nulls" counts as not
/// nullable.
pub struct ColumnRows {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    state: CursorState,
    fetched: u64,
}

impl ColumnRows {
    pub(crate) fn new(rows: Box<dyn DriverRows>) -> Self {
        let descriptors = column_shape();
        let mut codecs = codecs_for(&descriptors);
        codecs[0].no_null_as_empty = true;
        codecs[0].convert_lowercase = true;
        for i in [1, 2, 3, 7, 15, 16, 17, 18, 19, 20] {
            codecs[i].convert_lowercase = true;
        }
        Self {
            rows,
            descriptors,
            codecs,
            state: CursorState::Open,
            fetched: 0,
        }
    }
}

impl Cursor for ColumnRows {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        if !check_open(self.state)? {
            return Ok(false);
        }
        if !self.rows.next()? {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        let rows = self.rows.as_mut();
        self.codecs[0].read_into(rows, 0, sink)?;
        self.codecs[1].read_into(rows, 1, sink)?;
        self.codecs[2].read_into(rows, 2, sink)?;
        self.codecs[3].read_into(rows, 3, sink)?;
        self.codecs[4].read_into(rows, 16, sink)?; // ordinal position
        self.codecs[5].read_into(rows, 12, sink)?; // column default

        let nullable = code_is_nullable(rows.get_i32(11)?);
        sink.set_bool(6, nullable);

        self.codecs[7].read_into(rows, 5, sink)?; // driver type name

        let type_code = rows.get_i32(5)?;
        sink.set_string(9, portable_type_name(type_code));

        self.codecs[11].read_into(rows, 15, sink)?; // char octet length
        self.codecs[12].read_into(rows, 8, sink)?; // numeric precision
        self.codecs[23].read_into(rows, 11, sink)?; // comments

        self.fetched += 1;
        Ok(true)
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}

/// Enumerates table constraints, 10 positions (see [`constraint_shape`]).
///
/// Built over the driver's table listing; drivers expose constraint
/// detail too unevenly for more than the identifying columns and the
/// short/full names.
pub struct ConstraintRows {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    identity: SchemaIdentity,
    state: CursorState,
    fetched: u64,
}

impl ConstraintRows {
    pub(crate) fn new(rows: Box<dyn DriverRows>, identity: SchemaIdentity) -> Self {
        let descriptors = constraint_shape();
        let mut codecs = codecs_for(&descriptors);
        codecs[0].no_null_as_empty = true;
        codecs[0].convert_lowercase = true;
        codecs[1].convert_lowercase = true;
        codecs[2].convert_lowercase = true;
        codecs[6].convert_lowercase = true;
        codecs[7].convert_lowercase = true;
        Self {
            rows,
            descriptors,
            codecs,
            identity,
            state: CursorState::Open,
            fetched: 0,
        }
    }
}

impl Cursor for ConstraintRows {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        if !check_open(self.state)? {
            return Ok(false);
        }
        if !self.rows.next()? {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        for i in 0..4 {
            self.codecs[i].read_into(self.rows.as_mut(), i, sink)?;
        }
        self.codecs[5].read_into(self.rows.as_mut(), 4, sink)?;

        let schema = self.rows.get_string(2)?;
        let name = self.rows.get_string(3)?;
        let full = qualified_name(schema.as_deref(), name.as_deref());
        if self
            .identity
            .is_current(schema.as_deref().unwrap_or_default())
        {
            sink.set_string(6, &fold_identifier(name.as_deref().unwrap_or_default()));
        } else {
            sink.set_string(6, &full);
        }
        sink.set_string(7, &full);

        self.fetched += 1;
        Ok(true)
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_are_stable() {
        assert_eq!(schema_shape().len(), 4);
        assert_eq!(table_shape().len(), 9);
        assert_eq!(view_shape().len(), 6);
        assert_eq!(column_shape().len(), 24);
        assert_eq!(constraint_shape().len(), 10);
    }

    #[test]
    fn test_table_shape_positions() {
        let shape = table_shape();
        assert_eq!(shape[0].name, "table_catalog");
        assert_eq!(shape[6].name, "table_short_name");
        assert_eq!(shape[7].name, "table_full_name");
        assert_eq!(shape[4].kind, SlotKind::Boolean);
    }

    #[test]
    fn test_qualified_name_folds() {
        assert_eq!(qualified_name(Some("PUBLIC"), Some("ORDERS")), "public.orders");
        assert_eq!(qualified_name(Some("MySch"), Some("T")), "MySch.T");
        assert_eq!(qualified_name(None, Some("T")), ".t");
    }
}
