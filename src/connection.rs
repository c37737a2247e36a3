//! Connection surface: queries, prepared statements, transactions,
//! savepoints, and the metadata catalog.

use std::collections::HashSet;

use tracing::debug;

use crate::cursor::RowCursor;
use crate::driver::{DriverConnection, DriverStatement};
use crate::error::{Error, Result};
use crate::meta::{CatalogRegistry, MetaCatalog};
use crate::value::{SlotKind, TypedSlot, ValueCodec};

/// A bridge connection over a concrete driver.
///
/// Wraps the driver connection with the typed statement surface and the
/// transaction/savepoint bookkeeping the native side expects. All access
/// is blocking; one caller at a time.
pub struct Connection {
    driver_id: String,
    conn: Box<dyn DriverConnection>,
    registry: CatalogRegistry,
    savepoints: HashSet<String>,
    catalog: Option<Box<dyn MetaCatalog>>,
}

impl Connection {
    /// Wrap an open driver connection.
    ///
    /// `driver_id` is the driver's identifier (typically its class-style
    /// dotted name); the metadata catalog is resolved from it on first
    /// use.
    pub fn new(driver_id: impl Into<String>, conn: Box<dyn DriverConnection>) -> Self {
        Self::with_registry(driver_id, conn, CatalogRegistry::with_builtin())
    }

    /// Wrap with a caller-supplied catalog registry.
    pub fn with_registry(
        driver_id: impl Into<String>,
        conn: Box<dyn DriverConnection>,
        registry: CatalogRegistry,
    ) -> Self {
        Self {
            driver_id: driver_id.into(),
            conn,
            registry,
            savepoints: HashSet::new(),
            catalog: None,
        }
    }

    /// The driver identifier this connection was opened with.
    pub fn driver_id(&self) -> &str {
        &self.driver_id
    }

    /// Server product name and version.
    pub fn server_version(&mut self) -> Result<String> {
        self.conn.server_version()
    }

    /// Execute a plain SELECT, returning a cursor positioned before the
    /// first row. Slot kinds must be declared on the cursor before the
    /// first fetch.
    pub fn execute_query(&mut self, sql: &str) -> Result<RowCursor> {
        debug!(sql, "executing direct query");
        let rows = self.conn.execute_query(sql)?;
        RowCursor::new(rows)
    }

    /// Prepare a parameterized statement.
    pub fn prepare(&mut self, sql: &str) -> Result<PreparedStatement> {
        debug!(sql, "preparing statement");
        let stmt = self.conn.prepare(sql)?;
        Ok(PreparedStatement::new(stmt))
    }

    /// Start a transaction by leaving auto-commit.
    ///
    /// Fails with [`Error::TransactionActive`] when one is already
    /// running.
    pub fn begin(&mut self) -> Result<()> {
        if !self.conn.auto_commit()? {
            return Err(Error::TransactionActive);
        }
        self.conn.set_auto_commit(false)
    }

    /// Commit the running transaction and restore auto-commit.
    pub fn commit(&mut self) -> Result<()> {
        if self.conn.auto_commit()? {
            return Err(Error::NoTransaction);
        }
        self.conn.commit()?;
        self.conn.set_auto_commit(true)?;
        self.savepoints.clear();
        Ok(())
    }

    /// Roll back the running transaction and restore auto-commit.
    pub fn rollback(&mut self) -> Result<()> {
        if self.conn.auto_commit()? {
            return Err(Error::NoTransaction);
        }
        self.conn.rollback()?;
        self.conn.set_auto_commit(true)?;
        self.savepoints.clear();
        Ok(())
    }

    /// Create a named savepoint in the running transaction.
    pub fn add_savepoint(&mut self, name: &str) -> Result<()> {
        if self.conn.auto_commit()? {
            return Err(Error::NoTransaction);
        }
        if self.savepoints.contains(name) {
            return Err(Error::DuplicateSavepoint {
                name: name.to_string(),
            });
        }
        self.conn.set_savepoint(name)?;
        self.savepoints.insert(name.to_string());
        Ok(())
    }

    /// Roll back to a named savepoint. The savepoint stays usable.
    pub fn rollback_savepoint(&mut self, name: &str) -> Result<()> {
        if !self.savepoints.contains(name) {
            return Err(Error::UnknownSavepoint {
                name: name.to_string(),
            });
        }
        self.conn.rollback_savepoint(name)
    }

    /// Release a named savepoint.
    pub fn release_savepoint(&mut self, name: &str) -> Result<()> {
        if !self.savepoints.remove(name) {
            return Err(Error::UnknownSavepoint {
                name: name.to_string(),
            });
        }
        self.conn.release_savepoint(name)
    }

    /// The metadata catalog for this connection, resolved from the driver
    /// identifier on first use.
    pub fn catalog(&mut self) -> Result<&mut dyn MetaCatalog> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => {
                let md = self.conn.metadata()?;
                self.registry.resolve(&self.driver_id, md)
            }
        };
        Ok(self.catalog.insert(catalog).as_mut())
    }

    /// Close the underlying driver connection.
    pub fn close(&mut self) -> Result<()> {
        debug!(driver = %self.driver_id, "closing connection");
        self.catalog = None;
        self.savepoints.clear();
        self.conn.close()
    }
}

/// A prepared statement with declared parameter kinds.
///
/// Parameter kinds are declared exactly once before the first bind;
/// indexes here are 0-based, translation to the driver's 1-based
/// convention happens at the seam.
pub struct PreparedStatement {
    stmt: Box<dyn DriverStatement>,
    codecs: Option<Vec<ValueCodec>>,
}

impl PreparedStatement {
    fn new(stmt: Box<dyn DriverStatement>) -> Self {
        Self { stmt, codecs: None }
    }

    /// Declare the slot kind of every parameter, exactly once. The count
    /// must match the statement's parameter count.
    pub fn declare_param_types(&mut self, kinds: &[SlotKind]) -> Result<()> {
        if self.codecs.is_some() {
            return Err(Error::TypesAlreadyDeclared);
        }
        let expected = self.stmt.parameter_count()?;
        if kinds.len() != expected {
            return Err(Error::TypeCountMismatch {
                expected,
                got: kinds.len(),
            });
        }
        self.codecs = Some(
            kinds
                .iter()
                .enumerate()
                .map(|(i, &kind)| ValueCodec::new(kind, i))
                .collect(),
        );
        Ok(())
    }

    /// Declare parameter kinds from wire tags.
    pub fn declare_param_type_tags(&mut self, tags: &[u8]) -> Result<()> {
        let kinds = tags
            .iter()
            .map(|&t| SlotKind::from_tag(t))
            .collect::<Result<Vec<_>>>()?;
        self.declare_param_types(&kinds)
    }

    /// Number of parameters the statement takes.
    pub fn parameter_count(&mut self) -> Result<usize> {
        self.stmt.parameter_count()
    }

    /// Bind one parameter at the 0-based `index`. `None` binds SQL NULL
    /// of the declared kind's bind type.
    pub fn set_parameter(&mut self, index: usize, value: Option<&mut TypedSlot>) -> Result<()> {
        let codecs = self.codecs.as_ref().ok_or(Error::TypesNotDeclared)?;
        let codec = codecs.get(index).ok_or(Error::TypeCountMismatch {
            expected: codecs.len(),
            got: index + 1,
        })?;
        codec.bind_into(self.stmt.as_mut(), index, value)
    }

    /// Drop all parameter bindings.
    pub fn clear_parameters(&mut self) -> Result<()> {
        self.stmt.clear_parameters()
    }

    /// Execute; true when a result set is available.
    pub fn execute(&mut self) -> Result<bool> {
        self.stmt.execute()
    }

    /// Cursor over the result set of the last execution.
    pub fn result_cursor(&mut self) -> Result<RowCursor> {
        let rows = self.stmt.result_rows()?;
        RowCursor::new(rows)
    }

    /// Rows affected by the last non-SELECT execution.
    pub fn affected_rows(&mut self) -> Result<i64> {
        self.stmt.affected_rows()
    }
}
