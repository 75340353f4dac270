//! Schema catalog: explores, their tables and queryable fields.
//!
//! The catalog is read-only input to the SQL generator. It is produced
//! upstream with every field's SQL already compiled for the target warehouse.

pub mod config;
pub mod errors;
pub mod explore;

#[cfg(test)]
pub mod testing;

pub use errors::CatalogError;
pub use explore::{
    field_id, CompiledTable, Dimension, DimensionType, Explore, ExploreJoin, Metric, MetricType,
};
