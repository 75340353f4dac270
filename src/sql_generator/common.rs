//! Common utilities for SQL generation

/// Quote a string value as a single-quoted SQL literal, doubling embedded quotes.
///
/// # Examples
/// ```
/// use explore_sql::sql_generator::common::string_literal;
/// assert_eq!(string_literal("test"), "'test'");
/// assert_eq!(string_literal("it's"), "'it''s'");
/// ```
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Wrap an alias in the query's quote character
///
/// # Examples
/// ```
/// use explore_sql::sql_generator::common::quoted_alias;
/// assert_eq!(quoted_alias("table1_dim1", '`'), "`table1_dim1`");
/// ```
pub fn quoted_alias(alias: &str, quote: char) -> String {
    format!("{quote}{alias}{quote}")
}
