//! Driver-to-catalog resolution.
//!
//! Some driver families need their own [`MetaCatalog`]; the registry maps
//! a driver identifier to the right catalog type. Resolution never fails:
//! a factory that errors hands the metadata handle back so the next rule
//! can try, and the generic catalog is the terminal fallback.

use std::collections::HashMap;

use tracing::debug;

use crate::driver::DriverMetadata;
use crate::error::Error;

use super::{DerbyCatalog, GenericCatalog, HsqldbCatalog, MetaCatalog, SqlServerCatalog};

/// Outcome of one factory attempt. On failure the metadata handle comes
/// back with the error so resolution can continue.
pub type FactoryResult = std::result::Result<Box<dyn MetaCatalog>, (Error, Box<dyn DriverMetadata>)>;

/// Builds a specialized catalog over a driver's metadata handle.
pub type CatalogFactory = fn(Box<dyn DriverMetadata>) -> FactoryResult;

/// Maps driver identifiers to catalog factories.
///
/// Lookup order: exact derived name, then substring family markers in
/// registration order, then the generic fallback.
pub struct CatalogRegistry {
    exact: HashMap<String, CatalogFactory>,
    families: Vec<(&'static str, CatalogFactory)>,
}

impl CatalogRegistry {
    /// An empty registry; every driver resolves to the generic catalog.
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            families: Vec::new(),
        }
    }

    /// The built-in rules for the driver families with known metadata
    /// deviations.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_exact("org_hsqldb_jdbcdriver_meta", |md| {
            Ok(Box::new(HsqldbCatalog::new(md)))
        });
        registry.register_family("org.apache.derby.jdbc", |md| {
            Ok(Box::new(DerbyCatalog::new(md)))
        });
        registry.register_family("sqlserver", |md| Ok(Box::new(SqlServerCatalog::new(md))));
        registry.register_family("com.ashna.jturbo.driver.Driver", |md| {
            Ok(Box::new(SqlServerCatalog::new(md)))
        });
        registry.register_family("com.inet.tds.TdsDriver", |md| {
            Ok(Box::new(SqlServerCatalog::new(md)))
        });
        registry.register_family("org.hsqldb", |md| Ok(Box::new(HsqldbCatalog::new(md))));
        registry
    }

    /// Register a factory under an exact derived name (see
    /// [`derived_name`]).
    pub fn register_exact(&mut self, name: impl Into<String>, factory: CatalogFactory) {
        self.exact.insert(name.into(), factory);
    }

    /// Register a factory for every driver whose identifier contains the
    /// marker.
    pub fn register_family(&mut self, marker: &'static str, factory: CatalogFactory) {
        self.families.push((marker, factory));
    }

    /// Resolve the catalog for a driver identifier.
    ///
    /// Never fails: factory errors are logged and resolution moves on, the
    /// generic catalog closes the chain.
    pub fn resolve(&self, driver_id: &str, md: Box<dyn DriverMetadata>) -> Box<dyn MetaCatalog> {
        let mut md = md;
        let derived = derived_name(driver_id);
        if let Some(factory) = self.exact.get(&derived) {
            match factory(md) {
                Ok(catalog) => return catalog,
                Err((e, returned)) => {
                    debug!(driver = driver_id, name = %derived, error = %e,
                        "named catalog unavailable, trying family rules");
                    md = returned;
                }
            }
        }
        for (marker, factory) in &self.families {
            if !driver_id.contains(marker) {
                continue;
            }
            match factory(md) {
                Ok(catalog) => return catalog,
                Err((e, returned)) => {
                    debug!(driver = driver_id, marker, error = %e,
                        "family catalog unavailable, trying next rule");
                    md = returned;
                }
            }
        }
        Box::new(GenericCatalog::new(md))
    }
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// The registry name derived from a driver identifier: dots become
/// underscores, the result is lower-cased and suffixed with `_meta`.
pub fn derived_name(driver_id: &str) -> String {
    let mut name = driver_id.replace('.', "_").to_lowercase();
    name.push_str("_meta");
    name
}
