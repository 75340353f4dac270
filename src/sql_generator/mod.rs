//! SQL generation for metric queries.
//!
//! [`generate_sql`] resolves a [`CompiledMetricQuery`] against an [`Explore`]
//! into a [`QueryPlan`] and renders it as one SQL statement. The WHERE clause
//! comes from [`FilterTreeCompiler`]. Output is deterministic and contains no
//! partial SQL on error.

use crate::config::CompilerConfig;
use crate::explore_catalog::Explore;
use crate::metric_query::CompiledMetricQuery;

pub mod common;
mod errors;
pub mod predicates;
mod to_sql_query;
mod where_clause;

pub use errors::SqlGeneratorError;
pub use to_sql_query::{render_plan_to_sql, QueryPlan, ToSql};
pub use where_clause::{generate_where_clause, FilterTreeCompiler};

pub fn generate_sql(
    explore: &Explore,
    query: &CompiledMetricQuery,
    config: &CompilerConfig,
) -> Result<String, SqlGeneratorError> {
    let plan = QueryPlan::build(explore, query, config)?;
    Ok(render_plan_to_sql(&plan))
}

/// [`generate_sql`] with the default configuration
pub fn compile(
    explore: &Explore,
    query: &CompiledMetricQuery,
) -> Result<String, SqlGeneratorError> {
    generate_sql(explore, query, &CompilerConfig::default())
}
