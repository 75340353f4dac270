//! explore-sql - Compile metric queries over explores into SQL
//!
//! This crate provides:
//! - Explore catalog types (tables, dimensions, metrics, joins) and loading
//! - Metric query types with a nested AND/OR filter tree
//! - SQL generation: SELECT/FROM/JOIN/WHERE/GROUP BY/ORDER BY/LIMIT, with an
//!   outer CTE stage for table calculations
//!
//! # Example
//!
//! ```ignore
//! use explore_sql::{compile, CompiledMetricQuery, Explore};
//!
//! let explore = Explore::from_file("orders.yaml")?;
//! let query = CompiledMetricQuery::from_json_str(&std::fs::read_to_string("query.json")?)?;
//! let sql = compile(&explore, &query)?;
//! ```

pub mod config;
pub mod explore_catalog;
pub mod metric_query;
pub mod sql_generator;

pub use config::{CompilerConfig, QuoteStyle};
pub use explore_catalog::{field_id, CatalogError, DimensionType, Explore};
pub use metric_query::{
    default_sort_field, CompiledMetricQuery, CompiledTableCalculation, FilterGroup, FilterNode,
    FilterOperator, FilterRule, FilterValue, GroupOperator, SortField,
};
pub use sql_generator::{compile, generate_sql, generate_where_clause, SqlGeneratorError};
