//! Canonical relational metadata over driver introspection.
//!
//! Drivers disagree on how they expose standard catalog views, so all
//! metadata flows through a [`MetaCatalog`]: a default implementation over
//! [`DriverMetadata`] that normalizes identities (case folding, synthetic
//! empty catalog) and computes short/full qualified names against the
//! connection's current-schema set. Driver families whose metadata
//! deviates from the standard get their own catalog type, chosen by the
//! [`registry`].

pub mod registry;
pub mod rows;

mod derby;
mod hsqldb;
mod sqlserver;

use std::collections::HashSet;

use crate::driver::DriverMetadata;
use crate::error::Result;
use crate::value::fold_identifier;

pub use derby::DerbyCatalog;
pub use hsqldb::HsqldbCatalog;
pub use registry::CatalogRegistry;
pub use rows::{ColumnRows, ConstraintRows, SchemaRows, TableRows, ViewRows};
pub use sqlserver::SqlServerCatalog;

/// The set of schema names considered "current" for a connection.
///
/// Used only to decide whether a table's qualified name may be abbreviated
/// to its short form. Populated once at catalog construction, immutable
/// thereafter; names are stored folded through the identifier heuristic.
#[derive(Debug, Clone, Default)]
pub struct SchemaIdentity {
    current: HashSet<String>,
}

impl SchemaIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema as current.
    pub fn add(&mut self, schema: &str) {
        self.current.insert(fold_identifier(schema));
    }

    /// Whether a schema is on the current search path.
    pub fn is_current(&self, schema: &str) -> bool {
        self.current.contains(&fold_identifier(schema))
    }
}

/// Catalog/schema/name filter for metadata enumeration.
///
/// `None` fields match everything. Filters are pushed down to the driver
/// where its introspection call accepts them; schema enumeration filters
/// client-side.
#[derive(Debug, Clone, Default)]
pub struct MetaFilter {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: Option<String>,
}

impl MetaFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Canonical metadata enumeration for one connection.
///
/// Each enumerator returns a cursor with a fixed, documented column shape
/// (see [`rows`]); order and count are the public contract with the native
/// caller, which indexes by position.
pub trait MetaCatalog {
    /// The connection's catalog name; never NULL, "" when the driver has
    /// no catalog identity.
    fn catalog_name(&mut self) -> Result<String>;

    /// The current-schema set computed at construction.
    fn schema_identity(&self) -> &SchemaIdentity;

    fn schemas(&mut self, filter: MetaFilter) -> Result<SchemaRows>;

    fn tables(&mut self, filter: MetaFilter) -> Result<TableRows>;

    fn views(&mut self, filter: MetaFilter) -> Result<ViewRows>;

    fn columns(&mut self, filter: MetaFilter) -> Result<ColumnRows>;

    /// Table constraints; `constraint_name` is accepted for interface
    /// compatibility but no driver call filters on it yet.
    fn constraints(
        &mut self,
        filter: MetaFilter,
        constraint_name: Option<&str>,
    ) -> Result<ConstraintRows>;
}

/// Default [`MetaCatalog`] for drivers with standard introspection.
pub struct GenericCatalog {
    md: Box<dyn DriverMetadata>,
    identity: SchemaIdentity,
}

impl GenericCatalog {
    /// Build over a driver's introspection surface.
    ///
    /// The current-schema set is taken from the driver; a driver that
    /// cannot report one yields an empty set rather than a failure.
    pub fn new(md: Box<dyn DriverMetadata>) -> Self {
        Self::with_current_schemas(md, &[])
    }

    /// Build with additional pre-registered current schemas.
    ///
    /// Used by driver-family catalogs whose current schema is a fixed
    /// convention rather than something worth a query.
    pub fn with_current_schemas(mut md: Box<dyn DriverMetadata>, extra: &[&str]) -> Self {
        let mut identity = SchemaIdentity::new();
        match md.current_schemas() {
            Ok(schemas) => {
                for schema in &schemas {
                    identity.add(schema);
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "driver reported no current schemas");
            }
        }
        for schema in extra {
            identity.add(schema);
        }
        Self { md, identity }
    }
}

impl MetaCatalog for GenericCatalog {
    fn catalog_name(&mut self) -> Result<String> {
        // Catalogs are definitionally non-null in this model.
        Ok(self.md.catalog()?.unwrap_or_default())
    }

    fn schema_identity(&self) -> &SchemaIdentity {
        &self.identity
    }

    fn schemas(&mut self, filter: MetaFilter) -> Result<SchemaRows> {
        let rows = self.md.schemas()?;
        Ok(SchemaRows::new(rows, filter))
    }

    fn tables(&mut self, filter: MetaFilter) -> Result<TableRows> {
        let rows = self.md.tables(
            filter.catalog.as_deref(),
            filter.schema.as_deref(),
            filter.name.as_deref(),
            None,
        )?;
        Ok(TableRows::new(rows, self.identity.clone()))
    }

    fn views(&mut self, filter: MetaFilter) -> Result<ViewRows> {
        let rows = self.md.tables(
            filter.catalog.as_deref(),
            filter.schema.as_deref(),
            filter.name.as_deref(),
            Some(&["VIEW"]),
        )?;
        Ok(ViewRows::new(rows))
    }

    fn columns(&mut self, filter: MetaFilter) -> Result<ColumnRows> {
        let rows = self.md.columns(
            filter.catalog.as_deref(),
            filter.schema.as_deref(),
            filter.name.as_deref(),
        )?;
        Ok(ColumnRows::new(rows))
    }

    fn constraints(
        &mut self,
        filter: MetaFilter,
        _constraint_name: Option<&str>,
    ) -> Result<ConstraintRows> {
        let rows = self.md.tables(
            filter.catalog.as_deref(),
            filter.schema.as_deref(),
            filter.name.as_deref(),
            None,
        )?;
        Ok(ConstraintRows::new(rows, self.identity.clone()))
    }
}
