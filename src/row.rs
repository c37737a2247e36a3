//! The native-side row boundary.
//!
//! Decoded values are pushed into a caller-owned [`RowSink`], one setter
//! call per non-NULL column. The absence of a setter call is the NULL
//! signal; a sink starts each row with every position empty.

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::blob::BlobHandle;
use crate::value::{NumericValue, SlotKind, TypedSlot};

/// Describes one result column presented to the native caller.
///
/// Position in the descriptor sequence is the only identity.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Display label, when distinct from the name.
    pub label: Option<String>,
    /// Declared slot kind.
    pub kind: SlotKind,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, kind: SlotKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
        }
    }
}

/// An opaque, caller-owned destination for one row's decoded values.
///
/// Setters are positional; the codec calls at most one setter per column
/// per row. Columns with no setter call hold SQL NULL.
pub trait RowSink {
    fn set_string(&mut self, col: usize, value: &str);
    fn set_i32(&mut self, col: usize, value: i32);
    fn set_i64(&mut self, col: usize, value: i64);
    fn set_i16(&mut self, col: usize, value: i16);
    fn set_i8(&mut self, col: usize, value: i8);
    fn set_f64(&mut self, col: usize, value: f64);
    fn set_f32(&mut self, col: usize, value: f32);
    fn set_bool(&mut self, col: usize, value: bool);
    fn set_date(&mut self, col: usize, value: NaiveDate);
    fn set_time(&mut self, col: usize, value: NaiveTime);
    fn set_timestamp(&mut self, col: usize, value: NaiveDateTime);
    fn set_binary(&mut self, col: usize, value: Bytes);
    fn set_blob(&mut self, col: usize, value: BlobHandle);
    fn set_numeric(&mut self, col: usize, value: NumericValue);
}

/// Reference [`RowSink`] storing values as [`TypedSlot`]s.
///
/// Intended for callers without a native row representation of their own,
/// and used throughout the test suite. `None` positions are SQL NULL.
#[derive(Debug, Default)]
pub struct SlotRow {
    slots: Vec<Option<TypedSlot>>,
}

impl SlotRow {
    /// Create a row with `ncols` empty positions.
    pub fn new(ncols: usize) -> Self {
        let mut slots = Vec::with_capacity(ncols);
        slots.resize_with(ncols, || None);
        Self { slots }
    }

    /// Clear every position back to NULL, keeping the width.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value at `col`, `None` meaning SQL NULL.
    pub fn get(&self, col: usize) -> Option<&TypedSlot> {
        self.slots.get(col).and_then(|s| s.as_ref())
    }

    /// Take the value at `col`, leaving NULL behind.
    pub fn take(&mut self, col: usize) -> Option<TypedSlot> {
        self.slots.get_mut(col).and_then(|s| s.take())
    }

    fn put(&mut self, col: usize, value: TypedSlot) {
        if col >= self.slots.len() {
            self.slots.resize_with(col + 1, || None);
        }
        self.slots[col] = Some(value);
    }
}

impl RowSink for SlotRow {
    fn set_string(&mut self, col: usize, value: &str) {
        self.put(col, TypedSlot::String(value.to_string()));
    }

    fn set_i32(&mut self, col: usize, value: i32) {
        self.put(col, TypedSlot::Int32(value));
    }

    fn set_i64(&mut self, col: usize, value: i64) {
        self.put(col, TypedSlot::Int64(value));
    }

    fn set_i16(&mut self, col: usize, value: i16) {
        self.put(col, TypedSlot::Int16(value));
    }

    fn set_i8(&mut self, col: usize, value: i8) {
        self.put(col, TypedSlot::Byte(value));
    }

    fn set_f64(&mut self, col: usize, value: f64) {
        self.put(col, TypedSlot::Float64(value));
    }

    fn set_f32(&mut self, col: usize, value: f32) {
        self.put(col, TypedSlot::Float32(value));
    }

    fn set_bool(&mut self, col: usize, value: bool) {
        self.put(col, TypedSlot::Boolean(value));
    }

    fn set_date(&mut self, col: usize, value: NaiveDate) {
        self.put(col, TypedSlot::Date(value));
    }

    fn set_time(&mut self, col: usize, value: NaiveTime) {
        self.put(col, TypedSlot::Time(value));
    }

    fn set_timestamp(&mut self, col: usize, value: NaiveDateTime) {
        self.put(col, TypedSlot::Timestamp(value));
    }

    fn set_binary(&mut self, col: usize, value: Bytes) {
        self.put(col, TypedSlot::Binary(value.to_vec()));
    }

    fn set_blob(&mut self, col: usize, value: BlobHandle) {
        self.put(col, TypedSlot::Blob(Box::new(value)));
    }

    fn set_numeric(&mut self, col: usize, value: NumericValue) {
        self.put(col, TypedSlot::Numeric(value));
    }
}
