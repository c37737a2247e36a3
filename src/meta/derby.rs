//! Derby family catalog.

use crate::driver::DriverMetadata;
use crate::error::Result;

use super::{
    ColumnRows, ConstraintRows, GenericCatalog, MetaCatalog, MetaFilter, SchemaIdentity,
    SchemaRows, TableRows, ViewRows,
};

/// Catalog for the Derby driver family.
///
/// Derby defaults the current schema to `APP` when the connection does
/// not name one.
pub struct DerbyCatalog {
    inner: GenericCatalog,
}

impl DerbyCatalog {
    pub fn new(md: Box<dyn DriverMetadata>) -> Self {
        Self {
            inner: GenericCatalog::with_current_schemas(md, &["APP"]),
        }
    }
}

impl MetaCatalog for DerbyCatalog {
    fn catalog_name(&mut self) -> Result<String> {
        self.inner.catalog_name()
    }

    fn schema_identity(&self) -> &SchemaIdentity {
        self.inner.schema_identity()
    }

    fn schemas(&mut self, filter: MetaFilter) -> Result<SchemaRows> {
        self.inner.schemas(filter)
    }

    fn tables(&mut self, filter: MetaFilter) -> Result<TableRows> {
        self.inner.tables(filter)
    }

    fn views(&mut self, filter: MetaFilter) -> Result<ViewRows> {
        self.inner.views(filter)
    }

    fn columns(&mut self, filter: MetaFilter) -> Result<ColumnRows> {
        self.inner.columns(filter)
    }

    fn constraints(
        &mut self,
        filter: MetaFilter,
        constraint_name: Option<&str>,
    ) -> Result<ConstraintRows> {
        self.inner.constraints(filter, constraint_name)
    }
}
