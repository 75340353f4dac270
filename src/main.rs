use anyhow::Context;
use clap::Parser;
use explore_sql::{config, generate_sql, CompiledMetricQuery, Explore};
use std::path::{Path, PathBuf};

/// explore-sql - Compile a metric query against an explore into SQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Explore definition (YAML, or JSON with a .json extension)
    #[arg(long)]
    explore: PathBuf,

    /// Metric query (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    query: PathBuf,

    /// Alias quoting: infer, backtick or double-quote
    #[arg(long, env = "EXPLORE_SQL_QUOTE_STYLE", default_value = "infer")]
    quote_style: config::QuoteStyle,

    /// chrono pattern for DATE filter values
    #[arg(long, env = "EXPLORE_SQL_DATE_FORMAT", default_value = config::DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// chrono pattern for TIMESTAMP filter values
    #[arg(
        long,
        env = "EXPLORE_SQL_TIMESTAMP_FORMAT",
        default_value = config::DEFAULT_TIMESTAMP_FORMAT
    )]
    timestamp_format: String,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            quote_style: cli.quote_style,
            date_format: cli.date_format,
            timestamp_format: cli.timestamp_format,
        }
    }
}

fn load_query(path: &Path) -> anyhow::Result<CompiledMetricQuery> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file '{}'", path.display()))?;
    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let query = if is_yaml {
        CompiledMetricQuery::from_yaml_str(&content)?
    } else {
        CompiledMetricQuery::from_json_str(&content)?
    };
    Ok(query)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let explore_path = cli.explore.clone();
    let query_path = cli.query.clone();

    let config = config::CompilerConfig::from_cli(cli.into()).context("Configuration error")?;
    let explore = Explore::from_file(&explore_path)?;
    let query = load_query(&query_path)?;

    log::info!(
        "Compiling query with {} dimension(s) and {} metric(s) against explore '{}'",
        query.dimensions.len(),
        query.metrics.len(),
        explore.name
    );
    let sql = generate_sql(&explore, &query, &config)?;
    println!("{}", sql);
    Ok(())
}
