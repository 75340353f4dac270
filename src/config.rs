use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// How generated column aliases are quoted.
///
/// `Infer` looks at the first character of the base table's SQL reference:
/// a double quote selects `"`, anything else a backtick. This is a heuristic
/// and only sees the base table; set an explicit style when the warehouse
/// is known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteStyle {
    #[default]
    Infer,
    Backtick,
    DoubleQuote,
}

impl QuoteStyle {
    /// Resolve the quote character for a query over `base_table_sql`
    pub fn quote_char(&self, base_table_sql: &str) -> char {
        match self {
            QuoteStyle::Backtick => '`',
            QuoteStyle::DoubleQuote => '"',
            QuoteStyle::Infer => {
                if base_table_sql.starts_with('"') {
                    '"'
                } else {
                    '`'
                }
            }
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown quote style '{0}' (expected infer, backtick or double-quote)")]
pub struct ParseQuoteStyleError(String);

impl FromStr for QuoteStyle {
    type Err = ParseQuoteStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infer" => Ok(QuoteStyle::Infer),
            "backtick" => Ok(QuoteStyle::Backtick),
            "double-quote" | "double_quote" => Ok(QuoteStyle::DoubleQuote),
            _ => Err(ParseQuoteStyleError(s.to_string())),
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStyle::Infer => f.write_str("infer"),
            QuoteStyle::Backtick => f.write_str("backtick"),
            QuoteStyle::DoubleQuote => f.write_str("double-quote"),
        }
    }
}

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// SQL generator configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompilerConfig {
    /// Quoting of generated aliases
    pub quote_style: QuoteStyle,

    /// chrono pattern for DATE filter values
    #[validate(
        length(min = 1, message = "Date format cannot be empty"),
        custom(function = "validate_chrono_format")
    )]
    pub date_format: String,

    /// chrono pattern for TIMESTAMP filter values
    #[validate(
        length(min = 1, message = "Timestamp format cannot be empty"),
        custom(function = "validate_chrono_format")
    )]
    pub timestamp_format: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            quote_style: QuoteStyle::Infer,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            quote_style: parse_env_var("EXPLORE_SQL_QUOTE_STYLE", "infer")?,
            date_format: env::var("EXPLORE_SQL_DATE_FORMAT")
                .unwrap_or_else(|_| DEFAULT_DATE_FORMAT.to_string()),
            timestamp_format: env::var("EXPLORE_SQL_TIMESTAMP_FORMAT")
                .unwrap_or_else(|_| DEFAULT_TIMESTAMP_FORMAT.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            quote_style: cli.quote_style,
            date_format: cli.date_format,
            timestamp_format: cli.timestamp_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file; missing keys take their defaults
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub quote_style: QuoteStyle,
    pub date_format: String,
    pub timestamp_format: String,
}

fn validate_chrono_format(format: &str) -> Result<(), ValidationError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        let mut error = ValidationError::new("chrono_format");
        error.message = Some(format!("Invalid date/time pattern '{}'", format).into());
        return Err(error);
    }
    Ok(())
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
