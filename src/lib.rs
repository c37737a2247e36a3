//! Typed value bridge between a native database layer and managed-style
//! drivers.
//!
//! Two concerns live here. The marshaling layer carries typed values
//! across the driver seam without losing type identity or nullness: a
//! tagged slot model ([`value::TypedSlot`]), read/bind codecs, forward-only
//! cursors, and streamed large objects. The metadata layer normalizes
//! driver introspection into canonical enumerators with fixed row shapes,
//! folded identifiers, and short/full qualified names; driver families
//! with deviant metadata plug in through a registry.
//!
//! Everything is blocking and single-threaded by design; the driver seam
//! is the set of object-safe traits in [`driver`].

pub mod blob;
pub mod connection;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod meta;
pub mod row;
pub mod value;

pub use blob::{BlobHandle, BlobRead, BlobStream};
pub use connection::{Connection, PreparedStatement};
pub use cursor::{Cursor, CursorState, RowCursor};
pub use error::{Error, Result};
pub use meta::{CatalogRegistry, GenericCatalog, MetaCatalog, MetaFilter};
pub use row::{ColumnDescriptor, RowSink, SlotRow};
pub use value::{fold_identifier, NumericValue, SlotKind, TypedSlot};
