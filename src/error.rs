//! Error types for the SQL bridge.

use std::io;
use thiserror::Error;

use crate::value::SlotKind;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for bridge operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while moving blob data.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reported by the underlying database driver.
    ///
    /// Connection or execution failures are carried verbatim; the bridge
    /// never retries them.
    #[error("Driver error: {message}")]
    Driver { message: String },

    /// A value could not be converted at a column or parameter.
    #[error("Cannot convert value at index {index} as {kind}: {message}")]
    TypeConversion {
        index: usize,
        kind: SlotKind,
        message: String,
    },

    /// Unknown boundary type tag.
    #[error("Unhandled protocol type {tag}")]
    UnknownTypeTag { tag: u8 },

    /// Declared type count differs from the actual column/parameter count.
    #[error("Number of types differs from number of columns: expected {expected}, got {got}")]
    TypeCountMismatch { expected: usize, got: usize },

    /// Column types were declared more than once on the same cursor.
    #[error("Column types already declared")]
    TypesAlreadyDeclared,

    /// The cursor was advanced before its column types were declared.
    #[error("Column types not declared")]
    TypesNotDeclared,

    /// The cursor was used after being closed.
    #[error("Cursor is closed")]
    CursorClosed,

    /// A blob write stored fewer bytes than supplied.
    #[error("Could not write the complete blob: wrote {written} of {expected} bytes")]
    ShortBlobWrite { expected: usize, written: usize },

    /// A transaction is already in progress.
    #[error("Transaction already started")]
    TransactionActive,

    /// No transaction is in progress.
    #[error("No transaction started")]
    NoTransaction,

    /// A savepoint with this name already exists.
    #[error("Savepoint '{name}' already exists")]
    DuplicateSavepoint { name: String },

    /// No savepoint with this name exists.
    #[error("No savepoint '{name}' found")]
    UnknownSavepoint { name: String },
}

impl Error {
    /// Create a driver error.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a type conversion error for a column or parameter index.
    pub fn conversion(index: usize, kind: SlotKind, message: impl Into<String>) -> Self {
        Self::TypeConversion {
            index,
            kind,
            message: message.into(),
        }
    }
}
