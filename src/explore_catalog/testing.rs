//! Explores shared by unit tests

use super::{CompiledTable, Dimension, DimensionType, Explore, ExploreJoin, Metric, MetricType};
use std::collections::BTreeMap;

pub fn dimension(table: &str, name: &str, dimension_type: DimensionType) -> Dimension {
    Dimension {
        name: name.to_string(),
        table: table.to_string(),
        dimension_type,
        sql: format!("${{TABLE}}.{}", name),
        compiled_sql: format!("{}.{}", table, name),
        description: None,
    }
}

pub fn metric(table: &str, name: &str, metric_type: MetricType, compiled_sql: &str) -> Metric {
    Metric {
        name: name.to_string(),
        table: table.to_string(),
        metric_type,
        sql: String::new(),
        compiled_sql: compiled_sql.to_string(),
        description: None,
    }
}

pub fn table(
    name: &str,
    sql_table: &str,
    dimensions: Vec<Dimension>,
    metrics: Vec<Metric>,
) -> CompiledTable {
    CompiledTable {
        name: name.to_string(),
        sql_table: sql_table.to_string(),
        dimensions: dimensions.into_iter().map(|d| (d.name.clone(), d)).collect(),
        metrics: metrics.into_iter().map(|m| (m.name.clone(), m)).collect(),
    }
}

/// Single backtick-quoted table: `dim1` number, `dim2` string, `metric1` = MAX
pub fn table1_explore() -> Explore {
    let table1 = table(
        "table1",
        "`db`.`schema`.`table1`",
        vec![
            dimension("table1", "dim1", DimensionType::Number),
            dimension("table1", "dim2", DimensionType::String),
        ],
        vec![metric("table1", "metric1", MetricType::Max, "MAX(table1.number_column)")],
    );
    Explore {
        name: "table1".to_string(),
        base_table: "table1".to_string(),
        joined_tables: vec![],
        tables: BTreeMap::from([("table1".to_string(), table1)]),
    }
}

/// Double-quoted orders table joined to customers, with every dimension type
pub fn orders_explore() -> Explore {
    let orders = table(
        "orders",
        "\"analytics\".\"orders\"",
        vec![
            dimension("orders", "status", DimensionType::String),
            dimension("orders", "amount", DimensionType::Number),
            dimension("orders", "order_date", DimensionType::Date),
            dimension("orders", "is_paid", DimensionType::Boolean),
        ],
        vec![
            metric("orders", "total", MetricType::Sum, "SUM(orders.amount)"),
            metric("orders", "count", MetricType::Count, "COUNT(orders.id)"),
        ],
    );
    let customers = table(
        "customers",
        "\"analytics\".\"customers\"",
        vec![
            dimension("customers", "name", DimensionType::String),
            dimension("customers", "created", DimensionType::Timestamp),
        ],
        vec![],
    );
    Explore {
        name: "orders".to_string(),
        base_table: "orders".to_string(),
        joined_tables: vec![ExploreJoin {
            table: "customers".to_string(),
            compiled_sql_on: "orders.customer_id = customers.id".to_string(),
        }],
        tables: BTreeMap::from([
            ("orders".to_string(), orders),
            ("customers".to_string(), customers),
        ]),
    }
}
