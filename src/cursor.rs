//! Forward-only cursors over query results.
//!
//! A cursor advances one row at a time and pushes every declared column's
//! value through its codec into a caller-supplied row sink. The same trait
//! shapes both plain query results ([`RowCursor`]) and the metadata
//! enumerators in [`crate::meta`].

use crate::driver::DriverRows;
use crate::error::{Error, Result};
use crate::row::{ColumnDescriptor, RowSink};
use crate::value::{SlotKind, ValueCodec};

/// Lifecycle of a cursor.
///
/// `Open` becomes `Exhausted` at end of data, a terminal state that every
/// further `advance` reports again. `close` is allowed in any state; there
/// is no way back to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Open,
    Exhausted,
    Closed,
}

/// Common interface of all cursor types.
pub trait Cursor {
    /// Descriptors of the columns this cursor produces, in sink order.
    fn columns(&self) -> &[ColumnDescriptor];

    /// Move to the next row, filling `sink`; false when exhausted.
    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool>;

    /// Current lifecycle state.
    fn state(&self) -> CursorState;

    /// Rows produced so far.
    fn rowcount(&self) -> u64;

    /// Release the underlying driver cursor.
    fn close(&mut self);
}

/// Cursor over a driver result set with caller-declared column kinds.
///
/// [`RowCursor::declare_types`] must be called exactly once before the
/// first advance; the declared kinds are checked against the driver's
/// column count before any row is fetched.
pub struct RowCursor {
    rows: Box<dyn DriverRows>,
    descriptors: Vec<ColumnDescriptor>,
    codecs: Vec<ValueCodec>,
    declared: bool,
    state: CursorState,
    rows_fetched: u64,
}

impl RowCursor {
    /// Wrap a driver result set.
    pub fn new(mut rows: Box<dyn DriverRows>) -> Result<Self> {
        let descriptors = rows
            .columns()?
            .into_iter()
            .map(|c| {
                let mut d = ColumnDescriptor::new(c.name, SlotKind::Null);
                d.label = c.label;
                d
            })
            .collect();
        Ok(Self {
            rows,
            descriptors,
            codecs: Vec::new(),
            declared: false,
            state: CursorState::Open,
            rows_fetched: 0,
        })
    }

    /// Number of result columns.
    pub fn column_count(&self) -> usize {
        self.descriptors.len()
    }

    /// Declare the expected kind of every column, exactly once.
    ///
    /// Fails before any row is fetched when the count does not match the
    /// underlying query's column count.
    pub fn declare_types(&mut self, kinds: &[SlotKind]) -> Result<()> {
        if self.declared {
            return Err(Error::TypesAlreadyDeclared);
        }
        if kinds.len() != self.descriptors.len() {
            return Err(Error::TypeCountMismatch {
                expected: self.descriptors.len(),
                got: kinds.len(),
            });
        }
        for (i, kind) in kinds.iter().enumerate() {
            self.codecs.push(ValueCodec::new(*kind, i));
            self.descriptors[i].kind = *kind;
        }
        self.declared = true;
        Ok(())
    }

    /// Declare column kinds from raw boundary tags.
    pub fn declare_type_tags(&mut self, tags: &[u8]) -> Result<()> {
        let kinds = tags
            .iter()
            .map(|t| SlotKind::from_tag(*t))
            .collect::<Result<Vec<_>>>()?;
        self.declare_types(&kinds)
    }
}

impl Cursor for RowCursor {
    fn columns(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    fn advance(&mut self, sink: &mut dyn RowSink) -> Result<bool> {
        match self.state {
            CursorState::Closed => return Err(Error::CursorClosed),
            CursorState::Exhausted => return Ok(false),
            CursorState::Open => {}
        }
        if !self.declared {
            return Err(Error::TypesNotDeclared);
        }
        if !self.rows.next()? {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        for (col, codec) in self.codecs.iter().enumerate() {
            codec.read_into(self.rows.as_mut(), col, sink)?;
        }
        self.rows_fetched += 1;
        Ok(true)
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn rowcount(&self) -> u64 {
        self.rows_fetched
    }

    fn close(&mut self) {
        if self.state != CursorState::Closed {
            // A failed driver-side release still leaves the cursor closed
            // on the bridge side.
            let _ = self.rows.close();
            self.state = CursorState::Closed;
        }
    }
}
