//! Typed filter predicates.
//!
//! A [`FilterRule`] carries a free-form operator and untyped values. Once the
//! referenced dimension's type is known the rule is converted into one of the
//! per-type predicate enums below, which only have variants for operators that
//! are valid on that type. Rendering a typed predicate cannot fail on the
//! operator.

use super::common::string_literal;
use super::errors::SqlGeneratorError;
use crate::explore_catalog::DimensionType;
use crate::metric_query::{FilterOperator, FilterRule, FilterValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum StringPredicate {
    Equals(Vec<String>),
    NotEquals(Vec<String>),
    StartsWith(String),
    IsNull,
    NotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberPredicate {
    Equals(Vec<serde_json::Number>),
    NotEquals(Vec<serde_json::Number>),
    GreaterThan(serde_json::Number),
    LessThan(serde_json::Number),
    IsNull,
    NotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatePredicate {
    Equals(NaiveDateTime),
    NotEquals(NaiveDateTime),
    GreaterThan(NaiveDateTime),
    GreaterThanOrEqual(NaiveDateTime),
    LessThan(NaiveDateTime),
    LessThanOrEqual(NaiveDateTime),
    IsNull,
    NotNull,
}

/// A rule resolved against the type of its dimension
#[derive(Debug, Clone, PartialEq)]
pub enum TypedPredicate {
    String(StringPredicate),
    Number(NumberPredicate),
    Date(DatePredicate),
    Timestamp(DatePredicate),
}

impl TypedPredicate {
    pub fn from_rule(
        field_type: DimensionType,
        rule: &FilterRule,
    ) -> Result<Self, SqlGeneratorError> {
        match field_type {
            DimensionType::String => StringPredicate::from_rule(rule).map(TypedPredicate::String),
            DimensionType::Number => NumberPredicate::from_rule(rule).map(TypedPredicate::Number),
            DimensionType::Date => {
                DatePredicate::from_rule(field_type, rule).map(TypedPredicate::Date)
            }
            DimensionType::Timestamp => {
                DatePredicate::from_rule(field_type, rule).map(TypedPredicate::Timestamp)
            }
            DimensionType::Boolean => Err(SqlGeneratorError::UnsupportedFeature(format!(
                "filters on boolean dimension '{}'",
                rule.field_id()
            ))),
        }
    }

    /// Render against the dimension's compiled SQL
    pub fn render(
        &self,
        target_sql: &str,
        date_format: &str,
        timestamp_format: &str,
    ) -> Result<String, SqlGeneratorError> {
        match self {
            TypedPredicate::String(p) => Ok(p.render(target_sql)),
            TypedPredicate::Number(p) => Ok(p.render(target_sql)),
            TypedPredicate::Date(p) => p.render(target_sql, date_format),
            TypedPredicate::Timestamp(p) => p.render(target_sql, timestamp_format),
        }
    }
}

fn first_value<'a>(rule: &'a FilterRule) -> Result<&'a FilterValue, SqlGeneratorError> {
    rule.values
        .first()
        .ok_or_else(|| SqlGeneratorError::MissingFilterValue {
            field_id: rule.field_id(),
            operator: rule.operator,
        })
}

fn unsupported(field_type: DimensionType, rule: &FilterRule) -> SqlGeneratorError {
    SqlGeneratorError::UnsupportedOperator {
        field_type,
        operator: rule.operator,
    }
}

impl StringPredicate {
    pub fn from_rule(rule: &FilterRule) -> Result<Self, SqlGeneratorError> {
        let strings = || -> Vec<String> { rule.values.iter().map(|v| v.to_string()).collect() };
        match rule.operator {
            FilterOperator::Equals => Ok(StringPredicate::Equals(strings())),
            FilterOperator::NotEquals => Ok(StringPredicate::NotEquals(strings())),
            FilterOperator::StartsWith => {
                Ok(StringPredicate::StartsWith(first_value(rule)?.to_string()))
            }
            FilterOperator::IsNull => Ok(StringPredicate::IsNull),
            FilterOperator::NotNull => Ok(StringPredicate::NotNull),
            _ => Err(unsupported(DimensionType::String, rule)),
        }
    }

    pub fn render(&self, target_sql: &str) -> String {
        let list = |values: &[String]| {
            values
                .iter()
                .map(|v| string_literal(v))
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            StringPredicate::Equals(values) if values.is_empty() => "false".to_string(),
            StringPredicate::Equals(values) => format!("({}) IN ({})", target_sql, list(values)),
            StringPredicate::NotEquals(values) if values.is_empty() => "true".to_string(),
            StringPredicate::NotEquals(values) => {
                format!("({}) NOT IN ({})", target_sql, list(values))
            }
            StringPredicate::StartsWith(prefix) => format!(
                "({}) LIKE {}",
                target_sql,
                string_literal(&format!("{}%", prefix))
            ),
            StringPredicate::IsNull => format!("({}) IS NULL", target_sql),
            StringPredicate::NotNull => format!("({}) IS NOT NULL", target_sql),
        }
    }
}

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integral floats render without a fraction, e.g. `1.0` as `1`
fn normalize_number(n: serde_json::Number) -> serde_json::Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
            (f as i64).into()
        }
        _ => n,
    }
}

fn number_value(
    rule: &FilterRule,
    value: &FilterValue,
) -> Result<serde_json::Number, SqlGeneratorError> {
    match value {
        FilterValue::Number(n) => Ok(normalize_number(n.clone())),
        FilterValue::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i.into());
            }
            s.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(normalize_number)
                .ok_or_else(|| SqlGeneratorError::invalid_value(rule.field_id(), s, "not a number"))
        }
        FilterValue::Boolean(b) => Err(SqlGeneratorError::invalid_value(
            rule.field_id(),
            b,
            "not a number",
        )),
    }
}

impl NumberPredicate {
    pub fn from_rule(rule: &FilterRule) -> Result<Self, SqlGeneratorError> {
        let numbers = || {
            rule.values
                .iter()
                .map(|v| number_value(rule, v))
                .collect::<Result<Vec<_>, _>>()
        };
        match rule.operator {
            FilterOperator::Equals => Ok(NumberPredicate::Equals(numbers()?)),
            FilterOperator::NotEquals => Ok(NumberPredicate::NotEquals(numbers()?)),
            FilterOperator::GreaterThan => Ok(NumberPredicate::GreaterThan(number_value(
                rule,
                first_value(rule)?,
            )?)),
            FilterOperator::LessThan => Ok(NumberPredicate::LessThan(number_value(
                rule,
                first_value(rule)?,
            )?)),
            FilterOperator::IsNull => Ok(NumberPredicate::IsNull),
            FilterOperator::NotNull => Ok(NumberPredicate::NotNull),
            _ => Err(unsupported(DimensionType::Number, rule)),
        }
    }

    pub fn render(&self, target_sql: &str) -> String {
        let list = |values: &[serde_json::Number]| {
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        match self {
            NumberPredicate::Equals(values) if values.is_empty() => "false".to_string(),
            NumberPredicate::Equals(values) => format!("({}) IN ({})", target_sql, list(values)),
            NumberPredicate::NotEquals(values) if values.is_empty() => "true".to_string(),
            NumberPredicate::NotEquals(values) => {
                format!("({}) NOT IN ({})", target_sql, list(values))
            }
            NumberPredicate::GreaterThan(value) => format!("({}) > {}", target_sql, value),
            NumberPredicate::LessThan(value) => format!("({}) < {}", target_sql, value),
            NumberPredicate::IsNull => format!("({}) IS NULL", target_sql),
            NumberPredicate::NotNull => format!("({}) IS NOT NULL", target_sql),
        }
    }
}

/// Accepts RFC 3339, ISO-8601 without offset, plain dates and epoch milliseconds.
/// Values with an offset keep their wall-clock time.
fn parse_date_value(value: &FilterValue) -> Option<NaiveDateTime> {
    match value {
        FilterValue::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.naive_local());
            }
            for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
                    return Some(dt);
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
        FilterValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.naive_utc()),
        FilterValue::Boolean(_) => None,
    }
}

impl DatePredicate {
    pub fn from_rule(
        field_type: DimensionType,
        rule: &FilterRule,
    ) -> Result<Self, SqlGeneratorError> {
        let value = || -> Result<NaiveDateTime, SqlGeneratorError> {
            let raw = first_value(rule)?;
            parse_date_value(raw).ok_or_else(|| {
                SqlGeneratorError::invalid_value(
                    rule.field_id(),
                    raw,
                    format!("not a valid {} value", field_type),
                )
            })
        };
        match rule.operator {
            FilterOperator::Equals => Ok(DatePredicate::Equals(value()?)),
            FilterOperator::NotEquals => Ok(DatePredicate::NotEquals(value()?)),
            FilterOperator::GreaterThan => Ok(DatePredicate::GreaterThan(value()?)),
            FilterOperator::GreaterThanOrEqual => Ok(DatePredicate::GreaterThanOrEqual(value()?)),
            FilterOperator::LessThan => Ok(DatePredicate::LessThan(value()?)),
            FilterOperator::LessThanOrEqual => Ok(DatePredicate::LessThanOrEqual(value()?)),
            FilterOperator::IsNull => Ok(DatePredicate::IsNull),
            FilterOperator::NotNull => Ok(DatePredicate::NotNull),
            FilterOperator::StartsWith => Err(unsupported(field_type, rule)),
        }
    }

    pub fn render(&self, target_sql: &str, format: &str) -> Result<String, SqlGeneratorError> {
        let (symbol, value) = match self {
            DatePredicate::IsNull => return Ok(format!("({}) IS NULL", target_sql)),
            DatePredicate::NotNull => return Ok(format!("({}) IS NOT NULL", target_sql)),
            DatePredicate::Equals(v) => ("=", v),
            DatePredicate::NotEquals(v) => ("!=", v),
            DatePredicate::GreaterThan(v) => (">", v),
            DatePredicate::GreaterThanOrEqual(v) => (">=", v),
            DatePredicate::LessThan(v) => ("<", v),
            DatePredicate::LessThanOrEqual(v) => ("<=", v),
        };

        // chrono reports unusable patterns (e.g. %z on a naive value) as fmt::Error
        let mut formatted = String::new();
        write!(formatted, "{}", value.format(format)).map_err(|_| {
            SqlGeneratorError::UnsupportedFeature(format!(
                "date pattern '{}' cannot format value {}",
                format, value
            ))
        })?;

        Ok(format!(
            "({}) {} ({})",
            target_sql,
            symbol,
            string_literal(&formatted)
        ))
    }
}
