use super::common::quoted_alias;
use super::errors::SqlGeneratorError;
use super::where_clause::FilterTreeCompiler;
use crate::config::CompilerConfig;
use crate::explore_catalog::{CatalogError, Explore};
use crate::metric_query::{CompiledMetricQuery, SortField};
use validator::Validate;

/// Name of the CTE holding the base query when table calculations are present
const METRICS_CTE: &str = "metrics";

pub trait ToSql {
    fn to_sql(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expression: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItems {
    pub items: Vec<SelectItem>,
    pub quote: char,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromTable {
    pub sql_table: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub sql_table: String,
    pub alias: String,
    pub on: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinItems(pub Vec<Join>);

/// Positional GROUP BY over the first `n` select columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupByPositions(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItems(pub Vec<SortField>);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitItem(pub u32);

/// Outer SELECT over the `metrics` CTE
#[derive(Debug, Clone, PartialEq)]
pub struct TableCalculationItems {
    pub items: Vec<SelectItem>,
    pub quote: char,
}

/// Every clause of a metric query, resolved against the explore
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub select: SelectItems,
    pub from: FromTable,
    pub joins: JoinItems,
    pub filters: String,
    pub group_by: GroupByPositions,
    pub order_by: OrderByItems,
    pub limit: LimitItem,
    pub table_calculations: TableCalculationItems,
}

impl ToSql for SelectItems {
    fn to_sql(&self) -> String {
        let columns: Vec<String> = self
            .items
            .iter()
            .map(|item| {
                format!(
                    "  {} AS {}",
                    item.expression,
                    quoted_alias(&item.alias, self.quote)
                )
            })
            .collect();
        format!("SELECT\n{}", columns.join(",\n"))
    }
}

impl ToSql for FromTable {
    fn to_sql(&self) -> String {
        format!("FROM {} AS {}", self.sql_table, self.alias)
    }
}

impl ToSql for JoinItems {
    fn to_sql(&self) -> String {
        self.0
            .iter()
            .map(|join| {
                format!(
                    "LEFT JOIN {} AS {}\n  ON {}",
                    join.sql_table, join.alias, join.on
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl ToSql for GroupByPositions {
    fn to_sql(&self) -> String {
        if self.0 == 0 {
            return String::new();
        }
        let positions: Vec<String> = (1..=self.0).map(|i| i.to_string()).collect();
        format!("GROUP BY {}", positions.join(","))
    }
}

impl ToSql for OrderByItems {
    fn to_sql(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|sort| {
                if sort.descending {
                    format!("{} DESC", sort.field_id)
                } else {
                    sort.field_id.clone()
                }
            })
            .collect();
        format!("ORDER BY {}", fields.join(", "))
    }
}

impl ToSql for LimitItem {
    fn to_sql(&self) -> String {
        format!("LIMIT {}", self.0)
    }
}

impl ToSql for TableCalculationItems {
    fn to_sql(&self) -> String {
        let columns: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} AS {}", item.expression, quoted_alias(&item.alias, self.quote)))
            .collect();
        format!("SELECT\n  *,\n  {}", columns.join(",\n  "))
    }
}

impl ToSql for QueryPlan {
    fn to_sql(&self) -> String {
        render_plan_to_sql(self)
    }
}

impl QueryPlan {
    /// Resolve every referenced field and the filter tree. Fails on the first
    /// unknown field; nothing is rendered in that case.
    pub fn build(
        explore: &Explore,
        query: &CompiledMetricQuery,
        config: &CompilerConfig,
    ) -> Result<Self, SqlGeneratorError> {
        explore.validate()?;
        query
            .validate()
            .map_err(|e| SqlGeneratorError::InvalidQuery(e.to_string()))?;

        let base_table = explore
            .base_table()
            .ok_or_else(|| CatalogError::MissingBaseTable {
                explore: explore.name.clone(),
                table: explore.base_table.clone(),
            })?;

        let quote = config.quote_style.quote_char(&base_table.sql_table);
        log::debug!(
            "Using alias quote character {} for explore '{}' ({})",
            quote,
            explore.name,
            config.quote_style
        );

        let joins = explore
            .joined_tables
            .iter()
            .map(|join| -> Result<Join, SqlGeneratorError> {
                let table = explore.tables.get(&join.table).ok_or_else(|| {
                    CatalogError::UnknownJoinTable {
                        explore: explore.name.clone(),
                        table: join.table.clone(),
                    }
                })?;
                Ok(Join {
                    sql_table: table.sql_table.clone(),
                    alias: join.table.clone(),
                    on: join.compiled_sql_on.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(query.dimensions.len() + query.metrics.len());
        for id in &query.dimensions {
            let dimension = explore
                .find_dimension(id)
                .ok_or_else(|| SqlGeneratorError::UnknownFieldReference(id.clone()))?;
            items.push(SelectItem {
                expression: dimension.compiled_sql.clone(),
                alias: id.clone(),
            });
        }
        for id in &query.metrics {
            let metric = explore
                .find_metric(id)
                .ok_or_else(|| SqlGeneratorError::UnknownFieldReference(id.clone()))?;
            items.push(SelectItem {
                expression: metric.compiled_sql.clone(),
                alias: id.clone(),
            });
        }
        if items.is_empty() {
            return Err(SqlGeneratorError::InvalidQuery(
                "at least one dimension or metric must be selected".to_string(),
            ));
        }

        let filters =
            FilterTreeCompiler::new(explore, config).generate_where_clause(&query.filters)?;

        let table_calculations = query
            .table_calculations
            .iter()
            .map(|calc| SelectItem {
                expression: calc.compiled_sql.clone(),
                alias: calc.name.clone(),
            })
            .collect();

        Ok(QueryPlan {
            select: SelectItems { items, quote },
            from: FromTable {
                sql_table: base_table.sql_table.clone(),
                alias: explore.base_table.clone(),
            },
            joins: JoinItems(joins),
            filters,
            group_by: GroupByPositions(query.dimensions.len()),
            order_by: OrderByItems(query.sorts.clone()),
            limit: LimitItem(query.limit),
            table_calculations: TableCalculationItems {
                items: table_calculations,
                quote,
            },
        })
    }
}

/// Join the clauses with single newlines. Empty clauses still take a line.
pub fn render_plan_to_sql(plan: &QueryPlan) -> String {
    let base = [
        plan.select.to_sql(),
        plan.from.to_sql(),
        plan.joins.to_sql(),
        plan.filters.clone(),
        plan.group_by.to_sql(),
    ];

    if plan.table_calculations.items.is_empty() {
        log::debug!("Rendering metric query without table calculations");
        let mut clauses = base.to_vec();
        clauses.push(plan.order_by.to_sql());
        clauses.push(plan.limit.to_sql());
        return clauses.join("\n");
    }

    // ORDER BY and LIMIT apply to the outer query so they can use calculations
    log::debug!(
        "Wrapping base query in CTE '{}' for {} table calculation(s)",
        METRICS_CTE,
        plan.table_calculations.items.len()
    );
    let cte = format!("WITH {} AS (\n{}\n)", METRICS_CTE, base.join("\n"));
    [
        cte,
        plan.table_calculations.to_sql(),
        format!("FROM {}", METRICS_CTE),
        plan.order_by.to_sql(),
        plan.limit.to_sql(),
    ]
    .join("\n")
}
