//! # Explore Catalog Error Types
//!
//! Errors raised while loading an explore definition from disk or while
//! checking it for structural problems before it is handed to the SQL
//! generator.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Failed to read explore file '{path}': {error}")]
    ConfigReadError { path: String, error: String },
    #[error("Failed to parse explore definition: {error}")]
    ConfigParseError { error: String },
    #[error("Base table `{table}` is not defined in explore `{explore}`")]
    MissingBaseTable { explore: String, table: String },
    #[error("Join references table `{table}` which is not defined in explore `{explore}`")]
    UnknownJoinTable { explore: String, table: String },
    #[error("Field id `{field_id}` is defined more than once in explore `{explore}`")]
    DuplicateFieldId { explore: String, field_id: String },
}

impl CatalogError {
    /// Create a ConfigReadError from any displayable I/O failure
    pub fn read_error(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        CatalogError::ConfigReadError {
            path: path.into(),
            error: error.to_string(),
        }
    }

    /// Create a ConfigParseError from any displayable deserialization failure
    pub fn parse_error(error: impl std::fmt::Display) -> Self {
        CatalogError::ConfigParseError {
            error: error.to_string(),
        }
    }
}
