//! Load raw scenarios from CSV batches or JSON files

use super::RawScenario;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Load all scenarios from a CSV file with a camelCase header row.
///
/// Blank cells are treated as missing values.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<RawScenario>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening scenario file {}", path.display()))?;
    load_scenarios_from_reader(file).with_context(|| format!("reading scenarios from {}", path.display()))
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<RawScenario>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut scenarios = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        // Header is line 1
        let row: RawScenario = result.with_context(|| format!("parsing scenario on line {}", index + 2))?;
        scenarios.push(row);
    }

    Ok(scenarios)
}

/// Load a single scenario from a JSON file
pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> Result<RawScenario> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening scenario file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing scenario JSON {}", path.display()))
}
