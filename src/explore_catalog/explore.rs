use super::errors::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Build the canonical identifier of a field: `<table>_<name>`.
///
/// The same string is used as the SELECT alias and as the lookup key for
/// sorts and filters.
pub fn field_id(table: &str, name: &str) -> String {
    format!("{}_{}", table, name)
}

/// Declared value type of a dimension. Drives filter operator semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionType {
    String,
    Number,
    Date,
    Timestamp,
    Boolean,
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DimensionType::String => "string",
            DimensionType::Number => "number",
            DimensionType::Date => "date",
            DimensionType::Timestamp => "timestamp",
            DimensionType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Aggregation applied by a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Average,
    Count,
    CountDistinct,
    Sum,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
    pub table: String,
    #[serde(rename = "type")]
    pub dimension_type: DimensionType,
    /// Raw SQL as authored, before `${TABLE}` references were resolved
    #[serde(default)]
    pub sql: String,
    /// Dialect-ready SQL expression usable in SELECT and WHERE positions
    #[serde(alias = "compiled_sql")]
    pub compiled_sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub name: String,
    pub table: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[serde(default)]
    pub sql: String,
    /// Aggregate SQL expression, e.g. `MAX(table1.number_column)`
    #[serde(alias = "compiled_sql")]
    pub compiled_sql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Dimension {
    pub fn field_id(&self) -> String {
        field_id(&self.table, &self.name)
    }
}

impl Metric {
    pub fn field_id(&self) -> String {
        field_id(&self.table, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledTable {
    pub name: String,
    /// Fully qualified, already quoted table reference, e.g. `` `db`.`schema`.`table1` ``
    #[serde(alias = "sql_table")]
    pub sql_table: String,
    #[serde(default)]
    pub dimensions: BTreeMap<String, Dimension>,
    #[serde(default)]
    pub metrics: BTreeMap<String, Metric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreJoin {
    /// Key into `Explore::tables`; also used as the join alias
    pub table: String,
    /// Precompiled `ON` condition
    #[serde(alias = "compiled_sql_on")]
    pub compiled_sql_on: String,
}

/// Root of the schema catalog: one base table, its joins and every
/// queryable field.
///
/// Wire keys are camelCase (`baseTable`, `sqlTable`, `compiledSql`);
/// snake_case spellings are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explore {
    pub name: String,
    #[serde(alias = "base_table")]
    pub base_table: String,
    #[serde(default, alias = "joined_tables")]
    pub joined_tables: Vec<ExploreJoin>,
    pub tables: BTreeMap<String, CompiledTable>,
}

impl Explore {
    pub fn base_table(&self) -> Option<&CompiledTable> {
        self.tables.get(&self.base_table)
    }

    pub fn get_dimensions(&self) -> impl Iterator<Item = &Dimension> + '_ {
        self.tables.values().flat_map(|t| t.dimensions.values())
    }

    pub fn get_metrics(&self) -> impl Iterator<Item = &Metric> + '_ {
        self.tables.values().flat_map(|t| t.metrics.values())
    }

    pub fn find_dimension(&self, id: &str) -> Option<&Dimension> {
        self.get_dimensions().find(|d| d.field_id() == id)
    }

    pub fn find_metric(&self, id: &str) -> Option<&Metric> {
        self.get_metrics().find(|m| m.field_id() == id)
    }

    /// Structural checks: base table and join targets exist, field ids are unique.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.tables.contains_key(&self.base_table) {
            return Err(CatalogError::MissingBaseTable {
                explore: self.name.clone(),
                table: self.base_table.clone(),
            });
        }

        for join in &self.joined_tables {
            if !self.tables.contains_key(&join.table) {
                return Err(CatalogError::UnknownJoinTable {
                    explore: self.name.clone(),
                    table: join.table.clone(),
                });
            }
        }

        // `a_b` + `c` and `a` + `b_c` both yield `a_b_c`
        let mut seen = HashSet::new();
        let ids = self
            .get_dimensions()
            .map(Dimension::field_id)
            .chain(self.get_metrics().map(Metric::field_id));
        for id in ids {
            if !seen.insert(id.clone()) {
                return Err(CatalogError::DuplicateFieldId {
                    explore: self.name.clone(),
                    field_id: id,
                });
            }
        }

        log::trace!(
            "Explore '{}' validated: {} tables, {} fields",
            self.name,
            self.tables.len(),
            seen.len()
        );
        Ok(())
    }
}
