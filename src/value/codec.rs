//! Per-kind value conversion between the driver and the boundary.
//!
//! One [`ValueCodec`] is bound per column or parameter. Reading pushes the
//! driver value into the caller's row sink; binding decodes a boundary slot
//! into the driver's typed bind API. NULL handling is asymmetric by design:
//! on read, the absence of a sink write is the NULL signal (except String
//! with `no_null_as_empty`), and nullness is always taken from the driver's
//! NULL indicator after the read, never inferred from a zero value.

use crate::blob::{BlobHandle, BlobStream};
use crate::driver::{DriverRows, DriverStatement};
use crate::error::{Error, Result};
use crate::row::RowSink;
use crate::value::{fold_identifier, SlotKind, TypedSlot};

/// Converter for a single column or parameter of a declared kind.
#[derive(Debug, Clone)]
pub struct ValueCodec {
    kind: SlotKind,
    /// Position in the caller's row sink.
    sink_column: usize,
    /// Fold string identifiers to lower case (String kind only).
    pub convert_lowercase: bool,
    /// Surface a NULL string as "" instead of omitting it (String kind only).
    pub no_null_as_empty: bool,
}

impl ValueCodec {
    /// Create a codec for a declared kind, writing to `sink_column`.
    pub fn new(kind: SlotKind, sink_column: usize) -> Self {
        Self {
            kind,
            sink_column,
            convert_lowercase: false,
            no_null_as_empty: false,
        }
    }

    /// Create a codec from a boundary type tag; unknown tags fail fast.
    pub fn from_tag(tag: u8, sink_column: usize) -> Result<Self> {
        Ok(Self::new(SlotKind::from_tag(tag)?, sink_column))
    }

    /// The declared kind.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// The sink position this codec writes to.
    pub fn sink_column(&self) -> usize {
        self.sink_column
    }

    fn read_err(&self, col: usize, e: Error) -> Error {
        match e {
            e @ Error::TypeConversion { .. } => e,
            e => Error::conversion(col, self.kind, e.to_string()),
        }
    }

    /// Read the value at the 0-based driver column `col` into the sink.
    ///
    /// SQL NULL produces no sink write for every kind except String with
    /// `no_null_as_empty` set, which writes "".
    pub fn read_into(
        &self,
        rows: &mut dyn DriverRows,
        col: usize,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let dcol = col + 1;
        match self.kind {
            SlotKind::Null => {}
            SlotKind::String => {
                match rows.get_string(dcol).map_err(|e| self.read_err(col, e))? {
                    None => {
                        if self.no_null_as_empty {
                            sink.set_string(self.sink_column, "");
                        }
                    }
                    Some(s) => {
                        if self.convert_lowercase {
                            sink.set_string(self.sink_column, &fold_identifier(&s));
                        } else {
                            sink.set_string(self.sink_column, &s);
                        }
                    }
                }
            }
            SlotKind::Int32 => {
                let i = rows.get_i32(dcol).map_err(|e| self.read_err(col, e))?;
                if i != 0 || !rows.was_null() {
                    sink.set_i32(self.sink_column, i);
                }
            }
            SlotKind::Byte => {
                let b = rows.get_i8(dcol).map_err(|e| self.read_err(col, e))?;
                if b != 0 || !rows.was_null() {
                    sink.set_i8(self.sink_column, b);
                }
            }
            SlotKind::Float64 => {
                let d = rows.get_f64(dcol).map_err(|e| self.read_err(col, e))?;
                if d != 0.0 || !rows.was_null() {
                    sink.set_f64(self.sink_column, d);
                }
            }
            SlotKind::Float32 => {
                let f = rows.get_f32(dcol).map_err(|e| self.read_err(col, e))?;
                if f != 0.0 || !rows.was_null() {
                    sink.set_f32(self.sink_column, f);
                }
            }
            SlotKind::Boolean => {
                let b = rows.get_bool(dcol).map_err(|e| self.read_err(col, e))?;
                if b || !rows.was_null() {
                    sink.set_bool(self.sink_column, b);
                }
            }
            SlotKind::Int64 => {
                let l = rows.get_i64(dcol).map_err(|e| self.read_err(col, e))?;
                if l != 0 || !rows.was_null() {
                    sink.set_i64(self.sink_column, l);
                }
            }
            SlotKind::Int16 => {
                let s = rows.get_i16(dcol).map_err(|e| self.read_err(col, e))?;
                if s != 0 || !rows.was_null() {
                    sink.set_i16(self.sink_column, s);
                }
            }
            SlotKind::Date => {
                if let Some(d) = rows.get_date(dcol).map_err(|e| self.read_err(col, e))? {
                    sink.set_date(self.sink_column, d);
                }
            }
            SlotKind::Time => {
                if let Some(t) = rows.get_time(dcol).map_err(|e| self.read_err(col, e))? {
                    sink.set_time(self.sink_column, t);
                }
            }
            SlotKind::Timestamp => {
                if let Some(ts) = rows
                    .get_timestamp(dcol)
                    .map_err(|e| self.read_err(col, e))?
                {
                    sink.set_timestamp(self.sink_column, ts);
                }
            }
            SlotKind::Binary => {
                if let Some(bin) = rows.get_bytes(dcol).map_err(|e| self.read_err(col, e))? {
                    sink.set_binary(self.sink_column, bin);
                }
            }
            SlotKind::Blob => {
                if let Some(blob) = rows.get_blob(dcol).map_err(|e| self.read_err(col, e))? {
                    sink.set_blob(self.sink_column, BlobHandle::new(blob));
                }
            }
            SlotKind::Numeric => {
                if let Some(n) = rows.get_numeric(dcol).map_err(|e| self.read_err(col, e))? {
                    sink.set_numeric(self.sink_column, n);
                }
            }
        }
        Ok(())
    }

    fn mismatch(&self, index: usize, slot: &TypedSlot) -> Error {
        Error::conversion(
            index,
            self.kind,
            format!("slot holds a {} value", slot.kind()),
        )
    }

    /// Bind the 0-based parameter `index` from a boundary slot.
    ///
    /// `None` binds SQL NULL of the kind's declared type. For the Null
    /// kind, the bind target type is resolved from the statement's own
    /// parameter metadata, whether or not a slot is supplied.
    pub fn bind_into(
        &self,
        stmt: &mut dyn DriverStatement,
        index: usize,
        value: Option<&mut TypedSlot>,
    ) -> Result<()> {
        let didx = index + 1;
        let wrap = |e: Error| match e {
            e @ Error::TypeConversion { .. } => e,
            e => Error::conversion(index, self.kind, e.to_string()),
        };

        if self.kind == SlotKind::Null {
            let t = stmt.parameter_type(didx).map_err(wrap)?;
            return stmt.bind_null(didx, t).map_err(wrap);
        }

        let slot = match value {
            None => {
                return stmt
                    .bind_null(didx, self.kind.null_bind_type().code())
                    .map_err(wrap);
            }
            Some(slot) => slot,
        };

        match (self.kind, slot) {
            (SlotKind::String, TypedSlot::String(s)) => stmt.bind_string(didx, s),
            (SlotKind::Int32, TypedSlot::Int32(i)) => stmt.bind_i32(didx, *i),
            (SlotKind::Byte, TypedSlot::Byte(b)) => stmt.bind_i8(didx, *b),
            (SlotKind::Float64, TypedSlot::Float64(d)) => stmt.bind_f64(didx, *d),
            (SlotKind::Float32, TypedSlot::Float32(f)) => stmt.bind_f32(didx, *f),
            (SlotKind::Boolean, TypedSlot::Boolean(b)) => stmt.bind_bool(didx, *b),
            (SlotKind::Date, TypedSlot::Date(d)) => stmt.bind_date(didx, *d),
            (SlotKind::Time, TypedSlot::Time(t)) => stmt.bind_time(didx, *t),
            (SlotKind::Timestamp, TypedSlot::Timestamp(ts)) => stmt.bind_timestamp(didx, *ts),
            (SlotKind::Binary, TypedSlot::Binary(bin)) => stmt.bind_bytes(didx, bin),
            (SlotKind::Int64, TypedSlot::Int64(l)) => stmt.bind_i64(didx, *l),
            (SlotKind::Int16, TypedSlot::Int16(s)) => stmt.bind_i16(didx, *s),
            (SlotKind::Numeric, TypedSlot::Numeric(n)) => stmt.bind_numeric(didx, n),
            (SlotKind::Blob, TypedSlot::Blob(source)) => {
                let mut stream = BlobStream::new(&mut **source).map_err(wrap)?;
                let len = stream.size();
                stmt.bind_blob(didx, &mut stream, len)
            }
            (_, slot) => return Err(self.mismatch(index, slot)),
        }
        .map_err(wrap)
    }
}
