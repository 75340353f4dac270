//! Integration tests: fixture explores and queries compiled end to end

mod query_builder_tests;
mod quoting_tests;

use explore_sql::{CompiledMetricQuery, Explore};

pub fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

pub fn load_explore(name: &str) -> Explore {
    Explore::from_file(fixture_path(name)).expect("Failed to load explore fixture")
}

pub fn load_query(name: &str) -> CompiledMetricQuery {
    let content =
        std::fs::read_to_string(fixture_path(name)).expect("Failed to read query fixture");
    CompiledMetricQuery::from_json_str(&content).expect("Failed to parse query fixture")
}
