use crate::explore_catalog::{CatalogError, DimensionType};
use crate::metric_query::FilterOperator;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SqlGeneratorError {
    #[error("Tried to reference unknown field id: {0}")]
    UnknownFieldReference(String),
    #[error("Operator '{operator}' is not supported on {field_type} dimensions")]
    UnsupportedOperator {
        field_type: DimensionType,
        operator: FilterOperator,
    },
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),
    #[error("Filter on '{field_id}' with operator '{operator}' requires a value")]
    MissingFilterValue {
        field_id: String,
        operator: FilterOperator,
    },
    #[error("Invalid value '{value}' for filter on '{field_id}': {reason}")]
    InvalidFilterValue {
        field_id: String,
        value: String,
        reason: String,
    },
    #[error("Invalid metric query: {0}")]
    InvalidQuery(String),
    #[error("Invalid explore: {0}")]
    Catalog(#[from] CatalogError),
}

impl SqlGeneratorError {
    pub fn invalid_value(
        field_id: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        SqlGeneratorError::InvalidFilterValue {
            field_id: field_id.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
