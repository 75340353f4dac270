//! Filter tree carried by a metric query.
//!
//! On the wire a node is a group when it has a `children` list and a leaf
//! otherwise; in Rust the distinction is the [`FilterNode`] variant.

use crate::explore_catalog::field_id;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupOperator {
    And,
    Or,
}

impl fmt::Display for GroupOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupOperator::And => f.write_str("AND"),
            GroupOperator::Or => f.write_str("OR"),
        }
    }
}

/// Every operator a filter rule may carry. Which ones are valid depends on
/// the declared type of the referenced dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    StartsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    IsNull,
    NotNull,
}

impl FilterOperator {
    /// Human readable label used by query editors
    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "is equal to",
            FilterOperator::NotEquals => "is not equal to",
            FilterOperator::StartsWith => "starts with",
            FilterOperator::GreaterThan => "is greater than",
            FilterOperator::GreaterThanOrEqual => "is greater or equal than",
            FilterOperator::LessThan => "is less than",
            FilterOperator::LessThanOrEqual => "is less or equal than",
            FilterOperator::IsNull => "is null",
            FilterOperator::NotNull => "is not null",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "notEquals",
            FilterOperator::StartsWith => "startsWith",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::IsNull => "isNull",
            FilterOperator::NotNull => "notNull",
        };
        f.write_str(name)
    }
}

/// Scalar value attached to a filter rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Boolean(b) => write!(f, "{}", b),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n.into())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Boolean(b)
    }
}

/// Leaf predicate over one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    #[serde(alias = "table_name")]
    pub table_name: String,
    #[serde(alias = "field_name")]
    pub field_name: String,
    pub operator: FilterOperator,
    #[serde(default)]
    pub values: Vec<FilterValue>,
    /// Client-side identifier, not used for rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl FilterRule {
    pub fn new(
        table_name: impl Into<String>,
        field_name: impl Into<String>,
        operator: FilterOperator,
        values: Vec<FilterValue>,
    ) -> Self {
        FilterRule {
            table_name: table_name.into(),
            field_name: field_name.into(),
            operator,
            values,
            id: None,
        }
    }

    pub fn field_id(&self) -> String {
        field_id(&self.table_name, &self.field_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroup {
    pub children: Vec<FilterNode>,
    #[serde(alias = "group_operator")]
    pub group_operator: GroupOperator,
}

impl Default for FilterGroup {
    fn default() -> Self {
        FilterGroup {
            children: Vec::new(),
            group_operator: GroupOperator::And,
        }
    }
}

impl FilterGroup {
    pub fn new(group_operator: GroupOperator, children: Vec<FilterNode>) -> Self {
        FilterGroup {
            children,
            group_operator,
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::new(GroupOperator::And, children)
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::new(GroupOperator::Or, children)
    }

    /// True when the group contains no rule at any depth
    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|child| match child {
            FilterNode::Group(group) => group.is_empty(),
            FilterNode::Leaf(_) => false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Leaf(FilterRule),
}

impl<'de> Deserialize<'de> for FilterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Dispatch on `children` so a malformed leaf reports its own error
        let value = serde_json::Value::deserialize(deserializer)?;
        let node = if value.get("children").is_some() {
            FilterGroup::deserialize(value).map(FilterNode::Group)
        } else {
            FilterRule::deserialize(value).map(FilterNode::Leaf)
        };
        node.map_err(serde::de::Error::custom)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        FilterNode::Group(group)
    }
}

impl From<FilterRule> for FilterNode {
    fn from(rule: FilterRule) -> Self {
        FilterNode::Leaf(rule)
    }
}
