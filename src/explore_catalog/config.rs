//! Explore definition loading.
//!
//! Explores are normally produced by the upstream model compiler and handed
//! over as YAML or JSON documents:
//!
//! ```yaml
//! name: orders
//! baseTable: orders
//! joinedTables:
//!   - table: customers
//!     compiledSqlOn: orders.customer_id = customers.id
//! tables:
//!   orders:
//!     name: orders
//!     sqlTable: '"analytics"."orders"'
//!     dimensions:
//!       status:
//!         name: status
//!         table: orders
//!         type: string
//!         compiledSql: orders.status
//!     metrics:
//!       total:
//!         name: total
//!         table: orders
//!         type: sum
//!         compiledSql: SUM(orders.amount)
//! ```
//!
//! The snake_case spellings (`base_table`, `sql_table`, ...) are accepted as
//! well. Every loader runs [`Explore::validate`] before returning.

use super::errors::CatalogError;
use super::explore::Explore;
use std::fs;
use std::path::Path;

impl Explore {
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let explore: Explore = serde_yaml::from_str(content).map_err(CatalogError::parse_error)?;
        explore.validate()?;
        Ok(explore)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let explore: Explore = serde_json::from_str(content).map_err(CatalogError::parse_error)?;
        explore.validate()?;
        Ok(explore)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::read_error(path.display().to_string(), e))?;

        log::debug!("Loading explore definition from {}", path.display());
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }
}
