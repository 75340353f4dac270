//! Golden-output tests for complete metric queries

use super::{load_explore, load_query};
use explore_sql::{
    compile, CompiledMetricQuery, CompiledTableCalculation, FilterGroup, FilterOperator,
    FilterRule, SortField, SqlGeneratorError,
};

const METRIC_QUERY_SQL: &str = r#"WITH metrics AS (
SELECT
  table1.dim1 AS `table1_dim1`,
  MAX(table1.number_column) AS `table1_metric1`
FROM `db`.`schema`.`table1` AS table1


GROUP BY 1
)
SELECT
  *,
  table1_dim1 + table1_metric1 AS `calc3`
FROM metrics
ORDER BY table1_metric1 DESC
LIMIT 10"#;

const METRIC_QUERY_WITH_FILTERS_SQL: &str = r#"WITH metrics AS (
SELECT
  table1.dim1 AS `table1_dim1`,
  table1.dim2 AS `table1_dim2`,
  MAX(table1.number_column) AS `table1_metric1`
FROM `db`.`schema`.`table1` AS table1

WHERE (
  (
    (table1.dim1) IN (1,2)
    AND (table1.dim1) IS NOT NULL
  )
  AND (
    (table1.dim2) IN ('test','test2')
    OR (table1.dim2) IS NULL
  )
)
GROUP BY 1,2
)
SELECT
  *,
  table1_dim1 + table1_metric1 AS `calc3`
FROM metrics
ORDER BY table1_metric1 DESC
LIMIT 10"#;

const JOINED_QUERY_SQL: &str = r#"SELECT
  SUM(orders.amount) AS "orders_total"
FROM "analytics"."orders" AS orders
LEFT JOIN "analytics"."customers" AS customers
  ON orders.customer_id = customers.id
WHERE (
  (customers.name) IN ('Ann')
)


LIMIT 5"#;

fn joined_query() -> CompiledMetricQuery {
    CompiledMetricQuery {
        dimensions: vec![],
        metrics: vec!["orders_total".to_string()],
        filters: FilterGroup::and(vec![FilterRule::new(
            "customers",
            "name",
            FilterOperator::Equals,
            vec!["Ann".into()],
        )
        .into()]),
        sorts: vec![],
        limit: 5,
        table_calculations: vec![],
    }
}

#[test]
fn test_simple_metric_query() {
    let explore = load_explore("table1_explore.yaml");
    let query = load_query("metric_query.json");
    assert_eq!(compile(&explore, &query).unwrap(), METRIC_QUERY_SQL);
}

#[test]
fn test_metric_query_with_filters() {
    let explore = load_explore("table1_explore.yaml");
    let query = load_query("metric_query_with_filters.json");
    assert_eq!(compile(&explore, &query).unwrap(), METRIC_QUERY_WITH_FILTERS_SQL);
}

#[test]
fn test_camel_case_inputs_compile_identically() {
    let explore = load_explore("table1_explore.json");
    assert_eq!(explore, load_explore("table1_explore.yaml"));

    // Same query as metric_query_with_filters.json, with `1.0` in place of `1`
    let query = load_query("metric_query_camel_case.json");
    assert_eq!(compile(&explore, &query).unwrap(), METRIC_QUERY_WITH_FILTERS_SQL);
}

#[test]
fn test_joined_query_without_dimensions() {
    let explore = load_explore("orders_explore.json");
    let sql = compile(&explore, &joined_query()).unwrap();
    assert_eq!(sql, JOINED_QUERY_SQL);
    assert!(!sql.contains("GROUP BY"));
    assert!(!sql.contains("WITH metrics"));
}

#[test]
fn test_compile_is_deterministic() {
    let explore = load_explore("table1_explore.yaml");
    let query = load_query("metric_query_with_filters.json");
    assert_eq!(compile(&explore, &query).unwrap(), compile(&explore, &query).unwrap());
}

#[test]
fn test_cte_only_with_table_calculations() {
    let explore = load_explore("table1_explore.yaml");
    let mut query = load_query("metric_query.json");
    query.table_calculations.clear();

    let sql = compile(&explore, &query).unwrap();
    assert_eq!(
        sql,
        "SELECT\n  table1.dim1 AS `table1_dim1`,\n  MAX(table1.number_column) AS `table1_metric1`\n\
         FROM `db`.`schema`.`table1` AS table1\n\n\nGROUP BY 1\nORDER BY table1_metric1 DESC\nLIMIT 10"
    );

    query.table_calculations = vec![
        CompiledTableCalculation::new("double_metric", "table1_metric1 * 2"),
        CompiledTableCalculation::new("half_metric", "table1_metric1 / 2"),
    ];
    query.sorts = vec![SortField::desc("double_metric"), SortField::asc("table1_dim1")];
    let sql = compile(&explore, &query).unwrap();
    assert!(sql.starts_with("WITH metrics AS (\n"));
    assert!(sql.ends_with(
        "SELECT\n  *,\n  table1_metric1 * 2 AS `double_metric`,\n  table1_metric1 / 2 AS `half_metric`\n\
         FROM metrics\nORDER BY double_metric DESC, table1_dim1\nLIMIT 10"
    ));
}

#[test]
fn test_unknown_dimension_produces_no_sql() {
    let explore = load_explore("table1_explore.yaml");
    let mut query = load_query("metric_query.json");
    query.dimensions.push("table1_dim9".to_string());
    assert_eq!(
        compile(&explore, &query),
        Err(SqlGeneratorError::UnknownFieldReference("table1_dim9".to_string()))
    );
}

#[test]
fn test_unknown_metric_produces_no_sql() {
    let explore = load_explore("table1_explore.yaml");
    let mut query = load_query("metric_query.json");
    // Dimensions are not metrics
    query.metrics = vec!["table1_dim2".to_string()];
    assert_eq!(
        compile(&explore, &query),
        Err(SqlGeneratorError::UnknownFieldReference("table1_dim2".to_string()))
    );
}

#[test]
fn test_unknown_filter_field_produces_no_sql() {
    let explore = load_explore("orders_explore.json");
    let mut query = joined_query();
    query.filters = FilterGroup::or(vec![FilterRule::new(
        "customers",
        "email",
        FilterOperator::IsNull,
        vec![],
    )
    .into()]);
    assert_eq!(
        compile(&explore, &query),
        Err(SqlGeneratorError::UnknownFieldReference("customers_email".to_string()))
    );
}

#[test]
fn test_invalid_queries() {
    let explore = load_explore("orders_explore.json");

    let mut zero_limit = joined_query();
    zero_limit.limit = 0;
    assert!(matches!(
        compile(&explore, &zero_limit),
        Err(SqlGeneratorError::InvalidQuery(_))
    ));

    let mut nothing_selected = joined_query();
    nothing_selected.metrics.clear();
    assert!(matches!(
        compile(&explore, &nothing_selected),
        Err(SqlGeneratorError::InvalidQuery(_))
    ));
}

#[test]
fn test_operator_not_valid_for_type() {
    let explore = load_explore("orders_explore.json");
    let mut query = joined_query();
    query.filters = FilterGroup::and(vec![FilterRule::new(
        "orders",
        "created",
        FilterOperator::StartsWith,
        vec!["2021".into()],
    )
    .into()]);
    assert!(matches!(
        compile(&explore, &query),
        Err(SqlGeneratorError::UnsupportedOperator { .. })
    ));
}
