//! Metric query input: selected fields, filter tree, sorts, limit and
//! table calculations.

mod default_sort;
pub mod filters;

pub use default_sort::default_sort_field;
pub use filters::{
    FilterGroup, FilterNode, FilterOperator, FilterRule, FilterValue, GroupOperator,
};

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortField {
    #[serde(alias = "field_id")]
    pub field_id: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortField {
    pub fn asc(field_id: impl Into<String>) -> Self {
        SortField {
            field_id: field_id.into(),
            descending: false,
        }
    }

    pub fn desc(field_id: impl Into<String>) -> Self {
        SortField {
            field_id: field_id.into(),
            descending: true,
        }
    }
}

/// Derived column evaluated over the aliases of the base query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTableCalculation {
    pub name: String,
    #[serde(default, alias = "display_name")]
    pub display_name: String,
    /// Authored expression, e.g. `${table1.dim1} + ${table1.metric1}`
    #[serde(default)]
    pub sql: String,
    /// Expression over field ids, e.g. `table1_dim1 + table1_metric1`
    #[serde(alias = "compiled_sql")]
    pub compiled_sql: String,
}

impl CompiledTableCalculation {
    pub fn new(name: impl Into<String>, compiled_sql: impl Into<String>) -> Self {
        CompiledTableCalculation {
            name: name.into(),
            display_name: String::new(),
            sql: String::new(),
            compiled_sql: compiled_sql.into(),
        }
    }
}

/// Wire keys are camelCase; the snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompiledMetricQuery {
    /// Dimension field ids, in SELECT and GROUP BY order
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub filters: FilterGroup,
    #[serde(default)]
    pub sorts: Vec<SortField>,
    #[validate(range(min = 1, message = "Limit must be a positive integer"))]
    pub limit: u32,
    #[serde(default, alias = "table_calculations")]
    pub table_calculations: Vec<CompiledTableCalculation>,
}

impl CompiledMetricQuery {
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
