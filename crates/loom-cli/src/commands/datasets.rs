use std::error::Error;

use clap::Args;
use loom_core::LoomConfig;
use loom_datasets::{DatasetConfig, DatasetFixtures};
use serde::Serialize;

#[derive(Args, Debug)]
pub struct DatasetsArgs {
    /// Include datasets too large for the test suite.
    #[arg(long)]
    pub all: bool,
    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DatasetRow<'a> {
    #[serde(flatten)]
    config: &'a DatasetConfig,
    test_sized: bool,
}

pub fn run(args: &DatasetsArgs, config: &LoomConfig) -> Result<(), Box<dyn Error>> {
    let fixtures = DatasetFixtures::from_config(config)?;
    let rows: Vec<DatasetRow<'_>> = fixtures
        .registry()
        .iter()
        .filter(|dataset| args.all || dataset.is_test_sized())
        .map(|dataset| DatasetRow {
            config: dataset,
            test_sized: dataset.is_test_sized(),
        })
        .collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{:<24} {:>8} {:>8}", "name", "rows", "features");
    for row in &rows {
        println!(
            "{:<24} {:>8} {:>8}",
            row.config.name, row.config.row_count, row.config.feature_count
        );
    }
    Ok(())
}
