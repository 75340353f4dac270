//! Alias quoting: inferred from the base table or set explicitly

use super::{load_explore, load_query};
use explore_sql::{compile, generate_sql, CompilerConfig, QuoteStyle};

#[test]
fn test_inferred_backtick_from_base_table() {
    let explore = load_explore("table1_explore.yaml");
    let sql = compile(&explore, &load_query("metric_query.json")).unwrap();
    assert!(sql.contains("table1.dim1 AS `table1_dim1`"));
    assert!(sql.contains("AS `calc3`"));
}

#[test]
fn test_inferred_double_quote_from_base_table() {
    let explore = load_explore("orders_explore.json");
    let query = explore_sql::CompiledMetricQuery::from_json_str(
        r#"{"dimensions": ["orders_status"], "metrics": ["orders_total"], "limit": 1}"#,
    )
    .unwrap();
    let sql = compile(&explore, &query).unwrap();
    assert!(sql.contains("orders.status AS \"orders_status\""));
}

#[test]
fn test_unquoted_base_table_falls_back_to_backtick() {
    let mut explore = load_explore("table1_explore.yaml");
    if let Some(table) = explore.tables.get_mut("table1") {
        table.sql_table = "db.schema.table1".to_string();
    }
    let sql = compile(&explore, &load_query("metric_query.json")).unwrap();
    assert!(sql.contains("FROM db.schema.table1 AS table1"));
    assert!(sql.contains("AS `table1_metric1`"));
}

#[test]
fn test_explicit_quote_style_overrides_inference() {
    let explore = load_explore("table1_explore.yaml");
    let config = CompilerConfig {
        quote_style: QuoteStyle::DoubleQuote,
        ..Default::default()
    };
    let sql = generate_sql(&explore, &load_query("metric_query.json"), &config).unwrap();
    assert!(sql.contains("table1.dim1 AS \"table1_dim1\""));
    assert!(sql.contains("table1_dim1 + table1_metric1 AS \"calc3\""));
    // Table references are emitted verbatim
    assert!(sql.contains("FROM `db`.`schema`.`table1` AS table1"));
}
